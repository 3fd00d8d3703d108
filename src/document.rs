// document.rs
//
// Copyright (c) 2019-2026  Douglas Lau
//
//! Document assembly
use crate::block::{
    Application, Block, Comment, Header, ImageBlock, LogicalScreenDescriptor,
    Trailer, Version,
};
use crate::error::{Error, Result};
use crate::palette::ColorTable;
use crate::stream::ByteStreamSource;

/// Builder state, following the block grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing written yet
    Empty,
    /// Header written
    HeaderWritten,
    /// Logical screen descriptor (and global color table) written
    ScreenDescriptorWritten,
    /// One or more image blocks written
    ImageBlocksWritten,
}

/// Builder which assembles blocks into a [Document] in grammar order.
///
/// Steps must be called in sequence: [header], [screen], any number of
/// [image]s, then [finish].  Calling a step out of order panics, as does
/// adding an extension block after a GIF87a header.
///
/// ## Example
/// ```
/// use gifwire::block::{Header, ImageBlock, ImageData, ImageDescriptor};
/// use gifwire::block::LogicalScreenDescriptor;
/// use gifwire::palette::{ColorTable, ColorTableEntry};
/// use gifwire::{ByteStreamSource, CanvasHeight, CanvasWidth, DocumentBuilder};
///
/// # fn main() -> gifwire::Result<()> {
/// let tbl = ColorTable::new(vec![
///     ColorTableEntry::new(0xFF, 0, 0),
///     ColorTableEntry::new(0, 0, 0),
/// ])?;
/// let lsd = LogicalScreenDescriptor::new(
///     CanvasWidth::new(2)?,
///     CanvasHeight::new(2)?,
///     Some(&tbl),
///     None,
/// )?;
/// let desc = ImageDescriptor::new(0, 0, 2, 2, None);
/// let data = ImageData::compress(2, &[0, 1, 1, 0])?;
/// let mut builder = DocumentBuilder::new();
/// builder.header(Header::default());
/// builder.screen(lsd, Some(tbl))?;
/// builder.image(ImageBlock::new(desc, None, data)?)?;
/// let gif = builder.finish().bytes();
/// assert_eq!(&gif[..6], b"GIF89a");
/// assert_eq!(gif.last(), Some(&0x3B));
/// # Ok(())
/// # }
/// ```
///
/// [Document]: struct.Document.html
/// [header]: struct.DocumentBuilder.html#method.header
/// [screen]: struct.DocumentBuilder.html#method.screen
/// [image]: struct.DocumentBuilder.html#method.image
/// [finish]: struct.DocumentBuilder.html#method.finish
#[derive(Debug)]
pub struct DocumentBuilder {
    /// Current state
    state: State,
    /// Header version
    version: Version,
    /// Blocks written so far
    blocks: Vec<Block>,
    /// Logical screen descriptor
    screen: Option<LogicalScreenDescriptor>,
    /// Number of global color table entries
    global_len: Option<usize>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    /// Create a new document builder
    pub fn new() -> Self {
        DocumentBuilder {
            state: State::Empty,
            version: Version::default(),
            blocks: Vec::new(),
            screen: None,
            global_len: None,
        }
    }

    /// Check the current state before an assembly step
    fn expect_state(&self, step: &str, states: &[State]) {
        if !states.contains(&self.state) {
            panic!("invalid block sequence: {} in state {:?}", step, self.state);
        }
    }

    /// Check that the header version allows extension blocks
    fn expect_extensions(&self, step: &str) {
        if self.version == Version::Gif87a {
            panic!("invalid block sequence: {} requires GIF89a", step);
        }
    }

    /// Append a block
    fn push(&mut self, block: Block) {
        trace!("block: {}", block.name());
        self.blocks.push(block);
    }

    /// Write the header block
    pub fn header(&mut self, header: Header) {
        self.expect_state("header", &[State::Empty]);
        self.version = header.version();
        self.push(header.into());
        self.state = State::HeaderWritten;
    }

    /// Write the logical screen descriptor, with optional global color table.
    ///
    /// The color table must agree with the descriptor's packed field.
    pub fn screen(
        &mut self,
        screen: LogicalScreenDescriptor,
        global_color_table: Option<ColorTable>,
    ) -> Result<()> {
        self.expect_state("screen", &[State::HeaderWritten]);
        if !screen.describes(global_color_table.as_ref()) {
            return Err(Error::ColorTableMismatch);
        }
        self.screen = Some(screen);
        self.global_len = global_color_table.as_ref().map(ColorTable::len);
        self.push(screen.into());
        if let Some(tbl) = global_color_table {
            self.push(Block::GlobalColorTable(tbl));
        }
        self.state = State::ScreenDescriptorWritten;
        Ok(())
    }

    /// Write an application extension for animation looping.
    ///
    /// Must directly follow the screen descriptor / global color table.
    pub fn loop_count(&mut self, loop_count: u16) {
        self.expect_state("loop count", &[State::ScreenDescriptorWritten]);
        self.expect_extensions("loop count");
        match self.blocks.last() {
            Some(Block::LogicalScreenDescriptor(_))
            | Some(Block::GlobalColorTable(_)) => (),
            _ => panic!("invalid block sequence: loop count after extension"),
        }
        self.push(Application::with_loop_count(loop_count).into());
    }

    /// Write a comment extension
    pub fn comment(&mut self, comment: Comment) {
        self.expect_state(
            "comment",
            &[State::ScreenDescriptorWritten, State::ImageBlocksWritten],
        );
        self.expect_extensions("comment");
        self.push(comment.into());
    }

    /// Write one image block.
    ///
    /// Fails if no color table is available for the image, or a transparent
    /// color is out of bounds for it.
    pub fn image(&mut self, image: ImageBlock) -> Result<()> {
        self.expect_state(
            "image",
            &[State::ScreenDescriptorWritten, State::ImageBlocksWritten],
        );
        if image.graphic_control_ext().is_some() {
            self.expect_extensions("graphic control");
        }
        let table_len = image
            .local_color_table()
            .map(ColorTable::len)
            .or(self.global_len)
            .ok_or(Error::MissingColorTable)?;
        if let Some(idx) =
            image.graphic_control_ext().and_then(|g| g.transparent_color())
        {
            if usize::from(idx) >= table_len {
                return Err(Error::InvalidColorIndex(idx));
            }
        }
        if let Some(screen) = &self.screen {
            let desc = image.image_desc();
            let right = u32::from(desc.left()) + u32::from(desc.width());
            let bottom = u32::from(desc.top()) + u32::from(desc.height());
            if right > u32::from(screen.screen_width())
                || bottom > u32::from(screen.screen_height())
            {
                warn!(
                    "image {}x{} at {},{} exceeds screen {}x{}",
                    desc.width(),
                    desc.height(),
                    desc.left(),
                    desc.top(),
                    screen.screen_width(),
                    screen.screen_height(),
                );
            }
        }
        for block in image.into_blocks() {
            self.push(block);
        }
        self.state = State::ImageBlocksWritten;
        Ok(())
    }

    /// Write the trailer and finish the document
    pub fn finish(mut self) -> Document {
        self.expect_state(
            "finish",
            &[State::ScreenDescriptorWritten, State::ImageBlocksWritten],
        );
        self.push(Trailer::default().into());
        let doc = Document {
            blocks: self.blocks,
        };
        debug!(
            "document finished: {} blocks, {} bytes",
            doc.blocks.len(),
            doc.len()
        );
        doc
    }
}

/// A complete GIF document, ready to be encoded.
///
/// Created by [DocumentBuilder::finish], and immutable thereafter.
///
/// [DocumentBuilder::finish]: struct.DocumentBuilder.html#method.finish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Get the blocks, in file order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Get the number of image blocks
    pub fn image_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::ImageDescriptor(_)))
            .count()
    }

    /// Get the encoded length, in bytes
    pub fn len(&self) -> usize {
        let mut buf = Vec::new();
        self.blocks.iter().fold(0, |len, b| {
            buf.clear();
            b.format(&mut buf);
            len + buf.len()
        })
    }

    /// Check whether any extension requires GIF89a
    pub fn requires_89a(&self) -> bool {
        self.blocks.iter().any(Block::is_extension)
    }
}

impl ByteStreamSource for Document {
    fn format(&self, buf: &mut Vec<u8>) {
        for block in &self.blocks {
            block.format(buf);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::block::{
        DisposalMethod, GraphicsControlExtension, ImageData, ImageDescriptor,
    };
    use crate::byte_math::concat;
    use crate::palette::ColorTableEntry;
    use crate::scalar::{CanvasHeight, CanvasWidth, ColorIndex, DelayTime};

    fn red_black() -> ColorTable {
        ColorTable::new(vec![
            ColorTableEntry::new(255, 0, 0),
            ColorTableEntry::new(0, 0, 0),
        ])
        .unwrap()
    }

    fn screen(tbl: Option<&ColorTable>) -> LogicalScreenDescriptor {
        LogicalScreenDescriptor::new(
            CanvasWidth::from(4u16),
            CanvasHeight::from(4u16),
            tbl,
            tbl.map(|_| ColorIndex::from(0u8)),
        )
        .unwrap()
    }

    fn image(left: u16) -> ImageBlock {
        let desc = ImageDescriptor::new(left, 0, 2, 2, None);
        let data = ImageData::compress(2, &[0, 1, 1, 0]).unwrap();
        ImageBlock::new(desc, None, data).unwrap()
    }

    fn started_87a() -> DocumentBuilder {
        let tbl = red_black();
        let mut builder = DocumentBuilder::new();
        builder.header(Header::with_version(Version::Gif87a));
        builder.screen(screen(Some(&tbl)), Some(tbl)).unwrap();
        builder
    }

    fn started() -> DocumentBuilder {
        let tbl = red_black();
        let mut builder = DocumentBuilder::new();
        builder.header(Header::default());
        builder.screen(screen(Some(&tbl)), Some(tbl)).unwrap();
        builder
    }

    #[test]
    fn minimal() {
        let mut builder = DocumentBuilder::new();
        builder.header(Header::with_version(Version::Gif87a));
        builder.screen(screen(None), None).unwrap();
        let doc = builder.finish();
        assert_eq!(
            doc.bytes(),
            [
                b'G', b'I', b'F', b'8', b'7', b'a', 0x04, 0x00, 0x04, 0x00,
                0x00, 0x00, 0x00, 0x3B,
            ]
        );
        assert_eq!(doc.image_count(), 0);
        assert!(!doc.requires_89a());
    }

    #[test]
    fn grammar_order() {
        let mut builder = started();
        builder.loop_count(0);
        builder.comment(Comment::new("gifwire"));
        let gce =
            GraphicsControlExtension::new(DisposalMethod::Keep, DelayTime::from(10u16));
        builder.image(image(0).with_graphic_control(gce)).unwrap();
        builder.image(image(2)).unwrap();
        let doc = builder.finish();
        let names: Vec<&str> = doc.blocks().iter().map(Block::name).collect();
        assert_eq!(
            names,
            [
                "Header",
                "Logical Screen Descriptor",
                "Global Color Table",
                "Application Extension",
                "Comment Extension",
                "Graphics Control Extension",
                "Image Descriptor",
                "Image Data",
                "Image Descriptor",
                "Image Data",
                "Trailer",
            ]
        );
        assert_eq!(doc.image_count(), 2);
        assert!(doc.requires_89a());
    }

    #[test]
    fn deterministic() {
        let mut builder = started();
        builder.image(image(0)).unwrap();
        let doc = builder.finish();
        let a = doc.bytes();
        let b = doc.bytes();
        assert_eq!(a, b);
        assert_eq!(a.len(), doc.len());
        let mut out = vec![];
        doc.write_to(&mut out).unwrap();
        assert_eq!(out, a);
    }

    #[test]
    fn concat_blocks() {
        let mut builder = started();
        builder.image(image(0)).unwrap();
        let doc = builder.finish();
        let sources: Vec<&dyn ByteStreamSource> = doc
            .blocks()
            .iter()
            .map(|b| b as &dyn ByteStreamSource)
            .collect();
        assert_eq!(concat(&sources), doc.bytes());
        let header = Header::default();
        let trailer = Trailer::default();
        let both = concat(&[&header, &trailer]);
        assert_eq!(both, b"GIF89a;");
    }

    #[test]
    fn table_mismatch() {
        let mut builder = DocumentBuilder::new();
        builder.header(Header::default());
        let tbl = red_black();
        let err = builder.screen(screen(Some(&tbl)), None).unwrap_err();
        assert!(matches!(err, Error::ColorTableMismatch));
        let err = builder.screen(screen(None), Some(tbl)).unwrap_err();
        assert!(err.is_format());
        builder.screen(screen(None), None).unwrap();
    }

    #[test]
    fn missing_table() {
        let mut builder = DocumentBuilder::new();
        builder.header(Header::default());
        builder.screen(screen(None), None).unwrap();
        let err = builder.image(image(0)).unwrap_err();
        assert!(matches!(err, Error::MissingColorTable));
        let tbl = red_black();
        let desc = ImageDescriptor::new(0, 0, 1, 1, Some(&tbl));
        let data = ImageData::compress(2, &[1]).unwrap();
        let img = ImageBlock::new(desc, Some(tbl), data).unwrap();
        builder.image(img).unwrap();
    }

    #[test]
    fn transparent_bounds() {
        let mut builder = started();
        let gce = GraphicsControlExtension::default()
            .with_transparent_color(Some(ColorIndex::from(2u8)));
        let err = builder.image(image(0).with_graphic_control(gce));
        assert!(matches!(err, Err(Error::InvalidColorIndex(2))));
        let gce = GraphicsControlExtension::default()
            .with_transparent_color(Some(ColorIndex::from(1u8)));
        builder.image(image(0).with_graphic_control(gce)).unwrap();
    }

    #[test]
    fn outside_screen() {
        let mut builder = started();
        builder.image(image(3)).unwrap();
        assert_eq!(builder.finish().image_count(), 1);
    }

    #[test]
    #[should_panic]
    fn screen_before_header() {
        let mut builder = DocumentBuilder::new();
        let _ = builder.screen(screen(None), None);
    }

    #[test]
    #[should_panic]
    fn header_twice() {
        let mut builder = started();
        builder.header(Header::default());
    }

    #[test]
    #[should_panic]
    fn image_before_screen() {
        let mut builder = DocumentBuilder::new();
        builder.header(Header::default());
        let _ = builder.image(image(0));
    }

    #[test]
    #[should_panic]
    fn finish_without_screen() {
        let mut builder = DocumentBuilder::new();
        builder.header(Header::default());
        builder.finish();
    }

    #[test]
    #[should_panic]
    fn loop_count_after_image() {
        let mut builder = started();
        builder.image(image(0)).unwrap();
        builder.loop_count(1);
    }

    #[test]
    #[should_panic]
    fn loop_count_after_comment() {
        let mut builder = started();
        builder.comment(Comment::new("x"));
        builder.loop_count(1);
    }

    #[test]
    fn gif87a_images() {
        let mut builder = started_87a();
        builder.image(image(0)).unwrap();
        let doc = builder.finish();
        assert_eq!(&doc.bytes()[..6], b"GIF87a");
        assert!(!doc.requires_89a());
    }

    #[test]
    #[should_panic]
    fn gif87a_loop_count() {
        let mut builder = started_87a();
        builder.loop_count(0);
    }

    #[test]
    #[should_panic]
    fn gif87a_comment() {
        let mut builder = started_87a();
        builder.comment(Comment::new("x"));
    }

    #[test]
    #[should_panic]
    fn gif87a_graphic_control() {
        let mut builder = started_87a();
        let gce = GraphicsControlExtension::default();
        let _ = builder.image(image(0).with_graphic_control(gce));
    }
}
