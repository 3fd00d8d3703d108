// palette.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Color tables
use crate::error::{Error, Result};
use crate::stream::ByteStreamSource;
use pix::rgb::{Rgb, SRgb8};
use pix::Palette;

/// Number of channels per color table entry
const CHANNELS: usize = 3;

/// Maximum number of entries in a color table
const MAX_LEN: usize = 256;

/// One RGB entry in a color table
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorTableEntry {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl ColorTableEntry {
    /// Create a new color table entry
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        ColorTableEntry { red, green, blue }
    }
}

impl From<SRgb8> for ColorTableEntry {
    fn from(clr: SRgb8) -> Self {
        ColorTableEntry::new(
            u8::from(Rgb::red(clr)),
            u8::from(Rgb::green(clr)),
            u8::from(Rgb::blue(clr)),
        )
    }
}

impl From<[u8; 3]> for ColorTableEntry {
    fn from(rgb: [u8; 3]) -> Self {
        ColorTableEntry::new(rgb[0], rgb[1], rgb[2])
    }
}

/// Ordered palette, used as either a global or local color table.
///
/// The number of entries must be a power of two between 2 and 256.
///
/// ## Example
/// ```
/// use gifwire::palette::{ColorTable, ColorTableEntry};
/// use gifwire::ByteStreamSource;
///
/// let tbl = ColorTable::new(vec![
///     ColorTableEntry::new(0xFF, 0, 0),
///     ColorTableEntry::new(0, 0, 0),
/// ])
/// .unwrap();
/// assert_eq!(tbl.bytes(), [0xFF, 0, 0, 0, 0, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    entries: Vec<ColorTableEntry>,
    sorted: bool,
}

impl ColorTable {
    /// Create a new color table
    pub fn new(entries: Vec<ColorTableEntry>) -> Result<Self> {
        let len = entries.len();
        if len < 2 || len > MAX_LEN || !len.is_power_of_two() {
            return Err(Error::InvalidColorTableLen(len));
        }
        Ok(ColorTable {
            entries,
            sorted: false,
        })
    }

    /// Create a color table from a palette.
    ///
    /// Unused entries are padded with black, up to the next valid length.
    pub fn from_palette(palette: &Palette) -> Result<Self> {
        let len = palette.len();
        if len > MAX_LEN {
            return Err(Error::InvalidColorTableLen(len));
        }
        let mut entries: Vec<ColorTableEntry> = (0..len)
            .filter_map(|i| palette.entry(i))
            .map(ColorTableEntry::from)
            .collect();
        entries.resize(len.max(2).next_power_of_two(), ColorTableEntry::default());
        Self::new(entries)
    }

    /// Mark the table as sorted by decreasing importance
    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Check if the table is sorted
    pub fn sorted(&self) -> bool {
        self.sorted
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the entries
    pub fn entries(&self) -> &[ColorTableEntry] {
        &self.entries
    }

    /// Get one entry
    pub fn entry(&self, idx: u8) -> Option<ColorTableEntry> {
        self.entries.get(usize::from(idx)).copied()
    }

    /// Get the 3-bit size exponent for packed fields (log2(len) - 1)
    pub fn len_bits(&self) -> u8 {
        (self.len().trailing_zeros() - 1) as u8
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.len() * CHANNELS
    }
}

impl ByteStreamSource for ColorTable {
    fn format(&self, buf: &mut Vec<u8>) {
        buf.reserve(self.size_bytes());
        for e in &self.entries {
            buf.extend_from_slice(&[e.red, e.green, e.blue]);
        }
    }
}
