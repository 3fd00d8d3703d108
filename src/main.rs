// main.rs      gifwire command
//
// Copyright (c) 2019-2026  Douglas Lau
//
#![forbid(unsafe_code)]

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use gifwire::block::{
    Block, Comment, DisposalMethod, GraphicsControlExtension, Header,
    ImageBlock, ImageDescriptor, LogicalScreenDescriptor,
};
use gifwire::palette::ColorTable;
use gifwire::{
    ByteStreamSource, CanvasHeight, CanvasWidth, ColorIndex, DelayTime,
    Document, DocumentBuilder,
};
use pix::rgb::SRgb8;
use pix::Palette;
use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Crate version
const VERSION: &'static str = std::env!("CARGO_PKG_VERSION");

/// Main entry point
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder().format_timestamp(None).init();
    let mut out = StandardStream::stdout(ColorChoice::Auto);
    match create_app().get_matches().subcommand() {
        ("swatch", Some(matches)) => swatch(&mut out, matches)?,
        _ => unreachable!(),
    }
    out.reset()?;
    Ok(())
}

/// Create clap App
fn create_app() -> App<'static, 'static> {
    App::new("gifwire")
        .version(VERSION)
        .setting(AppSettings::GlobalVersion)
        .about("GIF block encoder")
        .setting(AppSettings::ArgRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("swatch")
                .about("Encode a striped color swatch")
                .arg(
                    Arg::with_name("output")
                        .required(true)
                        .help("output file"),
                )
                .arg(
                    Arg::with_name("width")
                        .long("width")
                        .takes_value(true)
                        .default_value("16")
                        .help("canvas width"),
                )
                .arg(
                    Arg::with_name("height")
                        .long("height")
                        .takes_value(true)
                        .default_value("16")
                        .help("canvas height"),
                )
                .arg(
                    Arg::with_name("color")
                        .short("c")
                        .long("color")
                        .takes_value(true)
                        .multiple(true)
                        .number_of_values(1)
                        .help("stripe color (RRGGBB)"),
                )
                .arg(
                    Arg::with_name("frames")
                        .long("frames")
                        .takes_value(true)
                        .default_value("1")
                        .help("number of animation frames"),
                )
                .arg(
                    Arg::with_name("delay")
                        .long("delay")
                        .takes_value(true)
                        .default_value("10")
                        .help("frame delay (centiseconds)"),
                )
                .arg(
                    Arg::with_name("comment")
                        .long("comment")
                        .takes_value(true)
                        .help("comment text"),
                ),
        )
}

/// Parse an RRGGBB color
fn parse_color(s: &str) -> Result<SRgb8, Box<dyn Error>> {
    let hex = s.trim_start_matches('#');
    if hex.len() != 6 {
        return Err(format!("invalid color: {}", s).into());
    }
    let red = u8::from_str_radix(&hex[0..2], 16)?;
    let green = u8::from_str_radix(&hex[2..4], 16)?;
    let blue = u8::from_str_radix(&hex[4..6], 16)?;
    Ok(SRgb8::new(red, green, blue))
}

/// Handle swatch subcommand
fn swatch(
    out: &mut StandardStream,
    matches: &ArgMatches,
) -> Result<(), Box<dyn Error>> {
    let width = CanvasWidth::new(matches.value_of("width").unwrap().parse()?)?;
    let height =
        CanvasHeight::new(matches.value_of("height").unwrap().parse()?)?;
    let frames: u32 = matches.value_of("frames").unwrap().parse()?;
    let delay = DelayTime::new(matches.value_of("delay").unwrap().parse()?)?;
    let mut palette = Palette::new(256);
    let mut stripes = vec![];
    let colors: Vec<&str> = match matches.values_of("color") {
        Some(values) => values.collect(),
        None => vec!["000000", "FFFFFF"],
    };
    for c in colors {
        match palette.set_entry(parse_color(c)?) {
            Some(idx) => stripes.push(idx as u8),
            None => return Err("too many colors".into()),
        }
    }
    let tbl = ColorTable::from_palette(&palette)?;
    let screen = LogicalScreenDescriptor::new(
        width,
        height,
        Some(&tbl),
        Some(ColorIndex::from(stripes[0])),
    )?;
    let mut builder = DocumentBuilder::new();
    builder.header(Header::default());
    builder.screen(screen, Some(tbl))?;
    if frames > 1 {
        builder.loop_count(0);
    }
    if let Some(text) = matches.value_of("comment") {
        builder.comment(Comment::new(text));
    }
    let len_bits = screen.color_table_config().map_or(0, |c| c.len_bits());
    for frame in 0..frames as usize {
        let indices = stripe_indices(width, height, &stripes, frame);
        let desc = ImageDescriptor::new(
            0,
            0,
            width.value(),
            height.value(),
            None,
        );
        let mut image = ImageBlock::with_indices(desc, None, len_bits, &indices)?;
        if frames > 1 {
            let gce = GraphicsControlExtension::new(DisposalMethod::Keep, delay);
            image = image.with_graphic_control(gce);
        }
        builder.image(image)?;
    }
    let doc = builder.finish();
    let path = matches.value_of("output").unwrap();
    let mut writer = BufWriter::new(File::create(path)?);
    doc.write_to(&mut writer)?;
    writer.flush()?;
    show_doc(out, path, &doc)
}

/// Make color indices for one frame of vertical stripes
fn stripe_indices(
    width: CanvasWidth,
    height: CanvasHeight,
    stripes: &[u8],
    frame: usize,
) -> Vec<u8> {
    let w = usize::from(width.value());
    let h = usize::from(height.value());
    let n = stripes.len();
    let mut indices = Vec::with_capacity(w * h);
    for _y in 0..h {
        for x in 0..w {
            indices.push(stripes[(x * n / w + frame) % n]);
        }
    }
    indices
}

/// Show block table of a document
fn show_doc(
    out: &mut StandardStream,
    path: &str,
    doc: &Document,
) -> Result<(), Box<dyn Error>> {
    let mut magenta = ColorSpec::new();
    magenta.set_fg(Some(Color::Magenta));
    let mut yellow = ColorSpec::new();
    yellow.set_fg(Some(Color::Yellow)).set_intense(true);
    let mut bold = ColorSpec::new();
    bold.set_fg(Some(Color::White))
        .set_intense(true)
        .set_bold(true);
    let mut dflt = ColorSpec::new();
    dflt.set_fg(Some(Color::White));
    out.set_color(&magenta)?;
    writeln!(out, "{}", path)?;
    out.set_color(&bold)?;
    writeln!(
        out,
        "frames: {}, bytes: {}",
        doc.image_count(),
        doc.len()
    )?;
    out.set_color(&yellow)?;
    writeln!(out, " {:>8} {:>6}  Block", "Offset", "Bytes")?;
    let mut offset = 0;
    for block in doc.blocks() {
        let len = block.bytes().len();
        out.set_color(&dflt)?;
        write!(out, " {:>8}", offset)?;
        out.set_color(&bold)?;
        write!(out, " {:>6}", len)?;
        out.set_color(&dflt)?;
        writeln!(out, "  {}", describe(block))?;
        offset += len;
    }
    Ok(())
}

/// Describe one block
fn describe(block: &Block) -> String {
    match block {
        Block::LogicalScreenDescriptor(b) => format!(
            "{} {}x{}",
            block.name(),
            b.screen_width(),
            b.screen_height()
        ),
        Block::GlobalColorTable(t) | Block::LocalColorTable(t) => {
            format!("{} ({} colors)", block.name(), t.len())
        }
        Block::GraphicControl(b) => {
            format!("{} {:.2}s", block.name(), b.delay_time_cs() as f32 / 100.0)
        }
        Block::ImageDescriptor(b) => format!(
            "{} {}x{} at {},{}",
            block.name(),
            b.width(),
            b.height(),
            b.left(),
            b.top()
        ),
        Block::Application(b) => {
            format!("{} (repeat: {})", block.name(), b.loop_count())
        }
        _ => block.name().to_string(),
    }
}
