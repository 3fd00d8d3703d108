// Block encoding example
use gifwire::block::{
    DisposalMethod, GraphicsControlExtension, Header, ImageBlock,
    ImageDescriptor, LogicalScreenDescriptor,
};
use gifwire::palette::{ColorTable, ColorTableEntry};
use gifwire::{
    ByteStreamSource, CanvasHeight, CanvasWidth, ColorIndex, DelayTime,
    DocumentBuilder,
};
use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};

fn main() -> Result<(), Box<dyn Error>> {
    let mut f = BufWriter::new(File::create("test.gif")?);
    let tbl = ColorTable::new(vec![
        ColorTableEntry::new(0, 0, 0),
        ColorTableEntry::new(255, 255, 255),
    ])?;
    let screen = LogicalScreenDescriptor::new(
        CanvasWidth::new(4)?,
        CanvasHeight::new(4)?,
        Some(&tbl),
        Some(ColorIndex::new(1)?),
    )?;
    let desc = ImageDescriptor::new(0, 0, 4, 4, None);
    #[rustfmt::skip]
    let indices = [
        1, 0, 0, 1,
        0, 1, 1, 0,
        0, 1, 1, 0,
        1, 0, 0, 1,
    ];
    let gce = GraphicsControlExtension::new(
        DisposalMethod::Keep,
        DelayTime::new(50)?,
    );
    let image = ImageBlock::with_indices(desc, None, tbl.len_bits(), &indices)?
        .with_graphic_control(gce);
    let mut builder = DocumentBuilder::new();
    builder.header(Header::default());
    builder.screen(screen, Some(tbl))?;
    builder.image(image)?;
    builder.finish().write_to(&mut f)?;
    f.flush()?;
    Ok(())
}
