// block.rs
//
// Copyright (c) 2019-2026  Douglas Lau
//
//! GIF file blocks
use crate::byte_math::{le16, pack, sub_blocks};
use crate::error::{Error, Result};
use crate::palette::ColorTable;
use crate::scalar::{
    AspectRatio, CanvasHeight, CanvasWidth, ColorIndex, ColorResolution,
    DelayTime,
};
use crate::stream::ByteStreamSource;

/// Image separator (0x2C)
const IMAGE_SEPARATOR: u8 = b',';

/// Extension introducer (0x21)
const EXTENSION_INTRODUCER: u8 = b'!';

/// GIF trailer (0x3B)
const TRAILER: u8 = b';';

/// Application identifier and authentication code for looping
const NETSCAPE: &[u8] = b"NETSCAPE2.0";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ExtensionCode {
    GraphicControl,
    Comment,
    Application,
}

impl From<ExtensionCode> for u8 {
    fn from(t: ExtensionCode) -> Self {
        use self::ExtensionCode::*;
        match t {
            GraphicControl => 0xF9,
            Comment => 0xFE,
            Application => 0xFF,
        }
    }
}

/// Packed-field description of a color table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTableConfig {
    len_bits: u8,
    sorted: bool,
}

impl From<&ColorTable> for ColorTableConfig {
    fn from(tbl: &ColorTable) -> Self {
        ColorTableConfig {
            len_bits: tbl.len_bits(),
            sorted: tbl.sorted(),
        }
    }
}

impl ColorTableConfig {
    /// Get the number of entries
    pub fn len(&self) -> usize {
        2 << self.len_bits
    }

    /// Check if the table is sorted
    pub fn sorted(&self) -> bool {
        self.sorted
    }

    /// Get the 3-bit size exponent
    pub fn len_bits(&self) -> u8 {
        self.len_bits
    }

    /// Check whether a color table is described by a config
    fn describes(cfg: Option<Self>, tbl: Option<&ColorTable>) -> bool {
        cfg == tbl.map(ColorTableConfig::from)
    }
}

/// GIF version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// GIF87a: no extension blocks
    Gif87a,
    /// GIF89a
    Gif89a,
}

impl Default for Version {
    fn default() -> Self {
        Version::Gif89a
    }
}

/// Header block: signature and version
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    version: Version,
}

impl Header {
    /// Create a header with a specific version
    pub fn with_version(version: Version) -> Self {
        Header { version }
    }

    /// Get the version
    pub fn version(&self) -> Version {
        self.version
    }
}

impl ByteStreamSource for Header {
    fn format(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(b"GIF");
        buf.extend_from_slice(match self.version {
            Version::Gif87a => b"87a",
            Version::Gif89a => b"89a",
        });
    }
}

/// Logical screen descriptor block.
///
/// Describes the canvas and the global color table (if any).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalScreenDescriptor {
    screen_width: CanvasWidth,
    screen_height: CanvasHeight,
    color_table: Option<ColorTableConfig>,
    color_resolution: Option<ColorResolution>,
    background_color_idx: ColorIndex,
    pixel_aspect_ratio: AspectRatio,
}

impl LogicalScreenDescriptor {
    /// Create a new logical screen descriptor.
    ///
    /// A background color index requires a global color table, and must be
    /// within its bounds.
    pub fn new(
        screen_width: CanvasWidth,
        screen_height: CanvasHeight,
        color_table: Option<&ColorTable>,
        background_color_idx: Option<ColorIndex>,
    ) -> Result<Self> {
        let background_color_idx = match (color_table, background_color_idx)
        {
            (None, Some(_)) => return Err(Error::MissingColorTable),
            (Some(tbl), Some(idx)) => {
                if usize::from(idx.value()) >= tbl.len() {
                    return Err(Error::InvalidColorIndex(idx.value()));
                }
                idx
            }
            (_, None) => ColorIndex::default(),
        };
        Ok(LogicalScreenDescriptor {
            screen_width,
            screen_height,
            color_table: color_table.map(ColorTableConfig::from),
            color_resolution: None,
            background_color_idx,
            pixel_aspect_ratio: AspectRatio::default(),
        })
    }

    /// Set the color resolution of the source image
    pub fn with_color_resolution(mut self, res: ColorResolution) -> Self {
        self.color_resolution = Some(res);
        self
    }

    /// Set the pixel aspect ratio
    pub fn with_pixel_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.pixel_aspect_ratio = ratio;
        self
    }

    pub fn screen_width(&self) -> u16 {
        self.screen_width.value()
    }

    pub fn screen_height(&self) -> u16 {
        self.screen_height.value()
    }

    /// Get the global color table config
    pub fn color_table_config(&self) -> Option<ColorTableConfig> {
        self.color_table
    }

    /// Get the color resolution.
    ///
    /// Unless set explicitly, this is derived from the color table size.
    pub fn color_resolution(&self) -> ColorResolution {
        self.color_resolution.unwrap_or_else(|| {
            ColorResolution::from_field(
                self.color_table.map_or(0, |c| c.len_bits()),
            )
        })
    }

    pub fn background_color_idx(&self) -> u8 {
        self.background_color_idx.value()
    }

    pub fn pixel_aspect_ratio(&self) -> u8 {
        self.pixel_aspect_ratio.value()
    }

    /// Get the packed flags byte
    pub fn flags(&self) -> u8 {
        let tbl = self.color_table;
        pack(&[
            (tbl.is_some() as u8, 1),
            (self.color_resolution().field(), 3),
            (tbl.map_or(false, |c| c.sorted()) as u8, 1),
            (tbl.map_or(0, |c| c.len_bits()), 3),
        ])
    }

    /// Check whether a global color table agrees with this descriptor
    pub(crate) fn describes(&self, tbl: Option<&ColorTable>) -> bool {
        ColorTableConfig::describes(self.color_table, tbl)
    }
}

impl ByteStreamSource for LogicalScreenDescriptor {
    fn format(&self, buf: &mut Vec<u8>) {
        buf.reserve(7);
        buf.extend_from_slice(&le16(self.screen_width()));
        buf.extend_from_slice(&le16(self.screen_height()));
        buf.push(self.flags());
        buf.push(self.background_color_idx());
        buf.push(self.pixel_aspect_ratio());
    }
}

/// Frame disposal method
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DisposalMethod {
    /// No disposal specified
    NoAction,
    /// Leave frame in place
    Keep,
    /// Restore area to background color
    Background,
    /// Restore area to previous frame
    Previous,
}

impl Default for DisposalMethod {
    fn default() -> Self {
        DisposalMethod::Keep
    }
}

impl From<DisposalMethod> for u8 {
    fn from(d: DisposalMethod) -> Self {
        use self::DisposalMethod::*;
        match d {
            NoAction => 0,
            Keep => 1,
            Background => 2,
            Previous => 3,
        }
    }
}

/// Graphics control extension block.
///
/// Controls timing and transparency of the following image.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GraphicsControlExtension {
    disposal_method: DisposalMethod,
    delay_time: DelayTime,
    user_input: bool,
    transparent_color: Option<ColorIndex>,
}

impl GraphicsControlExtension {
    /// Create a new graphics control extension
    pub fn new(disposal_method: DisposalMethod, delay_time: DelayTime) -> Self {
        GraphicsControlExtension {
            disposal_method,
            delay_time,
            ..Default::default()
        }
    }

    /// Set the user input flag
    pub fn with_user_input(mut self, user_input: bool) -> Self {
        self.user_input = user_input;
        self
    }

    /// Set the transparent color index
    pub fn with_transparent_color(
        mut self,
        transparent_color: Option<ColorIndex>,
    ) -> Self {
        self.transparent_color = transparent_color;
        self
    }

    pub fn disposal_method(&self) -> DisposalMethod {
        self.disposal_method
    }

    /// Get the delay time, in centiseconds
    pub fn delay_time_cs(&self) -> u16 {
        self.delay_time.value()
    }

    pub fn user_input(&self) -> bool {
        self.user_input
    }

    pub fn transparent_color(&self) -> Option<u8> {
        self.transparent_color.map(ColorIndex::value)
    }

    /// Get the packed flags byte
    pub fn flags(&self) -> u8 {
        pack(&[
            (0, 3), // reserved
            (u8::from(self.disposal_method), 3),
            (self.user_input as u8, 1),
            (self.transparent_color.is_some() as u8, 1),
        ])
    }
}

impl ByteStreamSource for GraphicsControlExtension {
    fn format(&self, buf: &mut Vec<u8>) {
        buf.reserve(8);
        buf.push(EXTENSION_INTRODUCER);
        buf.push(ExtensionCode::GraphicControl.into());
        buf.push(4); // block size
        buf.push(self.flags());
        buf.extend_from_slice(&le16(self.delay_time_cs()));
        buf.push(self.transparent_color().unwrap_or(0));
        buf.push(0); // block size
    }
}

/// Application extension block for animation looping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Application {
    loop_count: u16,
}

impl Application {
    /// Create a looping extension.
    ///
    /// A loop count of zero means loop forever.
    pub fn with_loop_count(loop_count: u16) -> Self {
        Application { loop_count }
    }

    pub fn loop_count(&self) -> u16 {
        self.loop_count
    }
}

impl ByteStreamSource for Application {
    fn format(&self, buf: &mut Vec<u8>) {
        buf.push(EXTENSION_INTRODUCER);
        buf.push(ExtensionCode::Application.into());
        buf.push(NETSCAPE.len() as u8); // block size
        buf.extend_from_slice(NETSCAPE);
        buf.push(3); // block size
        buf.push(1); // sub-block ID
        buf.extend_from_slice(&le16(self.loop_count));
        buf.push(0); // block size
    }
}

/// Comment extension block
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Comment {
    text: Vec<u8>, // ascii only comments recommended
}

impl Comment {
    /// Create a new comment
    pub fn new<T: AsRef<[u8]>>(text: T) -> Self {
        Comment {
            text: text.as_ref().to_vec(),
        }
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }
}

impl ByteStreamSource for Comment {
    fn format(&self, buf: &mut Vec<u8>) {
        buf.push(EXTENSION_INTRODUCER);
        buf.push(ExtensionCode::Comment.into());
        sub_blocks(&self.text, buf);
    }
}

/// Image descriptor block.
///
/// Placement of an image on the canvas.  Keeping the image within the
/// logical screen is the caller's responsibility.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImageDescriptor {
    left: u16,
    top: u16,
    width: u16,
    height: u16,
    interlaced: bool,
    color_table: Option<ColorTableConfig>,
}

impl ImageDescriptor {
    /// Create a new image descriptor
    pub fn new(
        left: u16,
        top: u16,
        width: u16,
        height: u16,
        color_table: Option<&ColorTable>,
    ) -> Self {
        ImageDescriptor {
            left,
            top,
            width,
            height,
            interlaced: false,
            color_table: color_table.map(ColorTableConfig::from),
        }
    }

    /// Set the interlaced flag
    pub fn with_interlaced(mut self, interlaced: bool) -> Self {
        self.interlaced = interlaced;
        self
    }

    pub fn left(&self) -> u16 {
        self.left
    }

    pub fn top(&self) -> u16 {
        self.top
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn interlaced(&self) -> bool {
        self.interlaced
    }

    /// Get the local color table config
    pub fn color_table_config(&self) -> Option<ColorTableConfig> {
        self.color_table
    }

    /// Get the image size, in pixels
    pub fn image_sz(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Get the packed flags byte
    pub fn flags(&self) -> u8 {
        let tbl = self.color_table;
        pack(&[
            (tbl.is_some() as u8, 1),
            (self.interlaced as u8, 1),
            (tbl.map_or(false, |c| c.sorted()) as u8, 1),
            (0, 2), // reserved
            (tbl.map_or(0, |c| c.len_bits()), 3),
        ])
    }
}

impl ByteStreamSource for ImageDescriptor {
    fn format(&self, buf: &mut Vec<u8>) {
        buf.reserve(10);
        buf.push(IMAGE_SEPARATOR);
        buf.extend_from_slice(&le16(self.left));
        buf.extend_from_slice(&le16(self.top));
        buf.extend_from_slice(&le16(self.width));
        buf.extend_from_slice(&le16(self.height));
        buf.push(self.flags());
    }
}

/// Image data block: LZW-compressed color indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    min_code_size: u8,
    codes: Vec<u8>,
}

impl ImageData {
    /// Create image data from LZW code bytes compressed elsewhere
    pub fn with_codes(min_code_size: u8, codes: Vec<u8>) -> Result<Self> {
        check_code_size(min_code_size)?;
        Ok(ImageData {
            min_code_size,
            codes,
        })
    }

    /// Create image data by compressing color indices.
    ///
    /// Every index must be representable with `min_code_size` bits.
    pub fn compress(min_code_size: u8, indices: &[u8]) -> Result<Self> {
        check_code_size(min_code_size)?;
        let limit = 1u16 << min_code_size;
        if let Some(&idx) = indices.iter().find(|&&i| u16::from(i) >= limit) {
            return Err(Error::InvalidColorIndex(idx));
        }
        let mut codes = Vec::with_capacity(indices.len() / 2);
        if !indices.is_empty() {
            let mut enc = lzw::Encoder::new(
                lzw::LsbWriter::new(&mut codes),
                min_code_size,
            )?;
            enc.encode_bytes(indices)?;
        }
        trace!("compressed {} indices to {} bytes", indices.len(), codes.len());
        Ok(ImageData {
            min_code_size,
            codes,
        })
    }

    /// Get the minimum code size needed for a color table
    pub fn min_code_size_for(tbl: &ColorTable) -> u8 {
        (tbl.len_bits() + 1).max(2)
    }

    pub fn min_code_size(&self) -> u8 {
        self.min_code_size
    }

    /// Get the LZW code bytes
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }
}

/// Check an LZW minimum code size
fn check_code_size(min_code_size: u8) -> Result<()> {
    match min_code_size {
        2..=8 => Ok(()),
        _ => Err(Error::InvalidCodeSize(min_code_size)),
    }
}

impl ByteStreamSource for ImageData {
    fn format(&self, buf: &mut Vec<u8>) {
        buf.push(self.min_code_size);
        sub_blocks(&self.codes, buf);
    }
}

/// Trailer block: end of file
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {}

impl ByteStreamSource for Trailer {
    fn format(&self, buf: &mut Vec<u8>) {
        buf.push(TRAILER);
    }
}

/// One image, with its optional control extension and local color table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlock {
    graphic_control_ext: Option<GraphicsControlExtension>,
    image_desc: ImageDescriptor,
    local_color_table: Option<ColorTable>,
    image_data: ImageData,
}

impl ImageBlock {
    /// Create a new image block.
    ///
    /// The local color table must agree with the image descriptor.
    pub fn new(
        image_desc: ImageDescriptor,
        local_color_table: Option<ColorTable>,
        image_data: ImageData,
    ) -> Result<Self> {
        if !ColorTableConfig::describes(
            image_desc.color_table_config(),
            local_color_table.as_ref(),
        ) {
            return Err(Error::ColorTableMismatch);
        }
        Ok(ImageBlock {
            graphic_control_ext: None,
            image_desc,
            local_color_table,
            image_data,
        })
    }

    /// Create an image block by compressing color indices.
    ///
    /// The minimum code size is derived from the color table in effect.
    /// There must be one index per pixel, and each must be within the
    /// color table.
    pub fn with_indices(
        image_desc: ImageDescriptor,
        local_color_table: Option<ColorTable>,
        global_len_bits: u8,
        indices: &[u8],
    ) -> Result<Self> {
        if indices.len() != image_desc.image_sz() {
            return Err(Error::InvalidFrameDimensions);
        }
        let bits = local_color_table
            .as_ref()
            .map_or(global_len_bits, ColorTable::len_bits);
        let table_len = 2usize << bits;
        if let Some(&idx) =
            indices.iter().find(|&&i| usize::from(i) >= table_len)
        {
            return Err(Error::InvalidColorIndex(idx));
        }
        let image_data = ImageData::compress((bits + 1).max(2), indices)?;
        Self::new(image_desc, local_color_table, image_data)
    }

    /// Add a graphics control extension
    pub fn with_graphic_control(mut self, ext: GraphicsControlExtension) -> Self {
        self.graphic_control_ext = Some(ext);
        self
    }

    pub fn graphic_control_ext(&self) -> Option<&GraphicsControlExtension> {
        self.graphic_control_ext.as_ref()
    }

    pub fn image_desc(&self) -> &ImageDescriptor {
        &self.image_desc
    }

    pub fn local_color_table(&self) -> Option<&ColorTable> {
        self.local_color_table.as_ref()
    }

    pub fn image_data(&self) -> &ImageData {
        &self.image_data
    }

    /// Split into blocks, in file order
    pub(crate) fn into_blocks(self) -> impl Iterator<Item = Block> {
        let gce = self.graphic_control_ext.map(Block::from);
        let desc = Some(Block::from(self.image_desc));
        let tbl = self.local_color_table.map(Block::LocalColorTable);
        let data = Some(Block::from(self.image_data));
        vec![gce, desc, tbl, data].into_iter().flatten()
    }
}

impl ByteStreamSource for ImageBlock {
    fn format(&self, buf: &mut Vec<u8>) {
        if let Some(ext) = &self.graphic_control_ext {
            ext.format(buf);
        }
        self.image_desc.format(buf);
        if let Some(tbl) = &self.local_color_table {
            tbl.format(buf);
        }
        self.image_data.format(buf);
    }
}

/// A block within a GIF file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Header(Header),
    LogicalScreenDescriptor(LogicalScreenDescriptor),
    GlobalColorTable(ColorTable),
    Application(Application),
    Comment(Comment),
    GraphicControl(GraphicsControlExtension),
    ImageDescriptor(ImageDescriptor),
    LocalColorTable(ColorTable),
    ImageData(ImageData),
    Trailer(Trailer),
}

impl Block {
    /// Get the block name
    pub fn name(&self) -> &'static str {
        use self::Block::*;
        match self {
            Header(_) => "Header",
            LogicalScreenDescriptor(_) => "Logical Screen Descriptor",
            GlobalColorTable(_) => "Global Color Table",
            Application(_) => "Application Extension",
            Comment(_) => "Comment Extension",
            GraphicControl(_) => "Graphics Control Extension",
            ImageDescriptor(_) => "Image Descriptor",
            LocalColorTable(_) => "Local Color Table",
            ImageData(_) => "Image Data",
            Trailer(_) => "Trailer",
        }
    }

    /// Check if the block is only valid in GIF89a
    pub fn is_extension(&self) -> bool {
        use self::Block::*;
        matches!(self, Application(_) | Comment(_) | GraphicControl(_))
    }
}

impl ByteStreamSource for Block {
    fn format(&self, buf: &mut Vec<u8>) {
        use self::Block::*;
        match self {
            Header(b) => b.format(buf),
            LogicalScreenDescriptor(b) => b.format(buf),
            GlobalColorTable(b) => b.format(buf),
            Application(b) => b.format(buf),
            Comment(b) => b.format(buf),
            GraphicControl(b) => b.format(buf),
            ImageDescriptor(b) => b.format(buf),
            LocalColorTable(b) => b.format(buf),
            ImageData(b) => b.format(buf),
            Trailer(b) => b.format(buf),
        }
    }
}

impl From<Header> for Block {
    fn from(b: Header) -> Self {
        Block::Header(b)
    }
}

impl From<LogicalScreenDescriptor> for Block {
    fn from(b: LogicalScreenDescriptor) -> Self {
        Block::LogicalScreenDescriptor(b)
    }
}

impl From<Application> for Block {
    fn from(b: Application) -> Self {
        Block::Application(b)
    }
}

impl From<Comment> for Block {
    fn from(b: Comment) -> Self {
        Block::Comment(b)
    }
}

impl From<GraphicsControlExtension> for Block {
    fn from(b: GraphicsControlExtension) -> Self {
        Block::GraphicControl(b)
    }
}

impl From<ImageDescriptor> for Block {
    fn from(b: ImageDescriptor) -> Self {
        Block::ImageDescriptor(b)
    }
}

impl From<ImageData> for Block {
    fn from(b: ImageData) -> Self {
        Block::ImageData(b)
    }
}

impl From<Trailer> for Block {
    fn from(b: Trailer) -> Self {
        Block::Trailer(b)
    }
}
