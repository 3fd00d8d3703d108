// stream.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Byte stream source trait
use std::io::{self, Write};

/// A value with a canonical GIF wire-format representation.
///
/// Output must depend only on the value itself, so calling [bytes] twice
/// yields identical sequences and sources can be concatenated in any order.
///
/// [bytes]: trait.ByteStreamSource.html#method.bytes
pub trait ByteStreamSource {
    /// Append wire-format bytes to a buffer.
    fn format(&self, buf: &mut Vec<u8>);

    /// Get the wire-format bytes.
    fn bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.format(&mut buf);
        buf
    }

    /// Write the wire-format bytes to a writer.
    fn write_to(&self, w: &mut dyn Write) -> io::Result<()> {
        w.write_all(&self.bytes())
    }
}

impl<T: ByteStreamSource + ?Sized> ByteStreamSource for &T {
    fn format(&self, buf: &mut Vec<u8>) {
        (**self).format(buf)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct Fixed(&'static [u8]);

    impl ByteStreamSource for Fixed {
        fn format(&self, buf: &mut Vec<u8>) {
            buf.extend_from_slice(self.0);
        }
    }

    #[test]
    fn provided_methods() {
        let f = Fixed(b"GIF");
        assert_eq!(f.bytes(), b"GIF");
        assert_eq!((&f).bytes(), f.bytes());
        let mut out = vec![];
        f.write_to(&mut out).unwrap();
        assert_eq!(out, b"GIF");
    }

    #[test]
    fn format_appends() {
        let mut buf = vec![0x00];
        Fixed(b"89a").format(&mut buf);
        assert_eq!(buf, b"\x0089a");
    }
}
