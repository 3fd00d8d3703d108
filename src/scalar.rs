// scalar.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Validated scalar fields
use crate::error::{Error, Result};
use std::convert::TryFrom;

/// Define a scalar field wrapping an unsigned integer type
macro_rules! scalar_field {
    ($(#[$doc:meta])* $name:ident, $inner:ty) => {
        $(#[$doc])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($inner);

        impl $name {
            /// Create a new field, checking the value fits its width
            pub fn new(value: u32) -> Result<Self> {
                Ok($name(<$inner>::try_from(value)?))
            }

            /// Get the field value
            pub fn value(self) -> $inner {
                self.0
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                $name(value)
            }
        }

        impl TryFrom<u32> for $name {
            type Error = Error;

            fn try_from(value: u32) -> Result<Self> {
                Self::new(value)
            }
        }

        impl From<$name> for $inner {
            fn from(field: $name) -> Self {
                field.0
            }
        }
    };
}

scalar_field!(
    /// Logical screen width, in pixels
    CanvasWidth,
    u16
);

scalar_field!(
    /// Logical screen height, in pixels
    CanvasHeight,
    u16
);

scalar_field!(
    /// Index into a color table
    ColorIndex,
    u8
);

scalar_field!(
    /// Pixel aspect ratio byte.
    ///
    /// Zero means no aspect ratio information; otherwise the ratio is
    /// `(value + 15) / 64`.
    AspectRatio,
    u8
);

scalar_field!(
    /// Frame delay time, in centiseconds (hundredths of a second)
    DelayTime,
    u16
);

/// Number of bits per primary color in the source image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorResolution(u8);

impl ColorResolution {
    /// Create a color resolution from a bit count (1..=8)
    pub fn new(bits: u8) -> Result<Self> {
        match bits {
            1..=8 => Ok(ColorResolution(bits)),
            _ => Err(Error::InvalidColorResolution(bits)),
        }
    }

    /// Create a color resolution from its 3-bit packed field value
    pub(crate) fn from_field(field: u8) -> Self {
        ColorResolution((field & 0b0111) + 1)
    }

    /// Get the number of bits per primary color
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Get the 3-bit packed field value
    pub(crate) fn field(self) -> u8 {
        self.0 - 1
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::byte_math::le16;

    #[test]
    fn canvas_range() {
        assert_eq!(CanvasWidth::new(0).unwrap().value(), 0);
        assert_eq!(CanvasWidth::new(65535).unwrap().value(), 65535);
        assert_eq!(CanvasHeight::try_from(640u32).unwrap(), CanvasHeight::from(640u16));
        let err = CanvasWidth::new(65536).unwrap_err();
        assert!(err.is_range());
        assert!(CanvasHeight::new(u32::MAX).unwrap_err().is_range());
    }

    #[test]
    fn canvas_le16() {
        for v in (0..=65535u32).step_by(97) {
            let w = CanvasWidth::new(v).unwrap();
            assert_eq!(u16::from_le_bytes(le16(w.value())) as u32, v);
        }
    }

    #[test]
    fn byte_range() {
        assert_eq!(ColorIndex::new(255).unwrap().value(), 255);
        assert!(ColorIndex::new(256).unwrap_err().is_range());
        assert!(AspectRatio::new(300).is_err());
        assert_eq!(u16::from(DelayTime::from(150u16)), 150);
    }

    #[test]
    fn color_resolution() {
        assert!(ColorResolution::new(0).unwrap_err().is_range());
        assert!(ColorResolution::new(9).is_err());
        let r = ColorResolution::new(8).unwrap();
        assert_eq!(r.field(), 7);
        assert_eq!(ColorResolution::from_field(r.field()), r);
        assert_eq!(ColorResolution::from_field(0).bits(), 1);
    }
}
