// error.rs
//
// Copyright (c) 2019-2026  Douglas Lau
//
use std::fmt;
use std::io;
use std::num::TryFromIntError;

/// Errors encountered while building or encoding blocks
#[derive(Debug)]
pub enum Error {
    /// A wrapped I/O error.
    Io(io::Error),
    /// Integer too large for its field width.
    TryFromInt(TryFromIntError),
    /// Color resolution not in 1..=8 bits.
    InvalidColorResolution(u8),
    /// LZW minimum code size not in 2..=8.
    InvalidCodeSize(u8),
    /// [ColorTable](palette/struct.ColorTable.html) length not a power of
    /// two between 2 and 256.
    InvalidColorTableLen(usize),
    /// Color index given, but no color table to index into.
    MissingColorTable,
    /// Color index out of bounds for its color table.
    InvalidColorIndex(u8),
    /// Color table does not agree with the packed field describing it.
    ColorTableMismatch,
    /// Image data does not match the image dimensions.
    InvalidFrameDimensions,
}

/// Gifwire result type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if a value exceeded its wire-format range.
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            Error::TryFromInt(_)
                | Error::InvalidColorResolution(_)
                | Error::InvalidCodeSize(_)
        )
    }

    /// Check if a structural invariant was violated.
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            Error::InvalidColorTableLen(_)
                | Error::MissingColorTable
                | Error::InvalidColorIndex(_)
                | Error::ColorTableMismatch
                | Error::InvalidFrameDimensions
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(fmt),
            Error::TryFromInt(err) => err.fmt(fmt),
            _ => fmt::Debug::fmt(self, fmt),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            Error::TryFromInt(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<TryFromIntError> for Error {
    fn from(err: TryFromIntError) -> Self {
        Error::TryFromInt(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn classify() {
        let err = Error::from(u16::try_from(70_000u32).unwrap_err());
        assert!(err.is_range());
        assert!(!err.is_format());
        assert!(Error::InvalidColorTableLen(3).is_format());
        assert!(Error::MissingColorTable.is_format());
        assert!(Error::InvalidFrameDimensions.is_format());
        assert!(!Error::Io(io::ErrorKind::Other.into()).is_format());
    }

    #[test]
    fn display() {
        assert_eq!(Error::MissingColorTable.to_string(), "MissingColorTable");
        assert_eq!(
            Error::InvalidColorIndex(4).to_string(),
            "InvalidColorIndex(4)"
        );
    }
}
