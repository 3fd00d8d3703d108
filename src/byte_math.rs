// byte_math.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Byte utilities for GIF wire formatting
use crate::stream::ByteStreamSource;

/// Maximum length of one data sub-block
pub const SUB_BLOCK_MAX: usize = 0xFF;

/// Encode a 16-bit value, low byte first.
pub fn le16(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

/// Pack (value, bit width) fields into one byte, most significant first.
///
/// # Panics
///
/// Panics if the widths do not sum to 8, or a value does not fit in its
/// width.  The layout of every packed byte is fixed by the format.
pub fn pack(fields: &[(u8, u8)]) -> u8 {
    let total: u8 = fields.iter().map(|(_, width)| width).sum();
    assert_eq!(total, 8, "packed field widths must sum to 8");
    fields.iter().fold(0, |byte, &(value, width)| {
        assert!(
            u16::from(value) < 1 << width,
            "packed value {} exceeds {} bits",
            value,
            width
        );
        ((u16::from(byte) << width) | u16::from(value)) as u8
    })
}

/// Concatenate the bytes of several sources into one buffer.
pub fn concat(sources: &[&dyn ByteStreamSource]) -> Vec<u8> {
    let mut buf = Vec::new();
    for src in sources {
        src.format(&mut buf);
    }
    buf
}

/// Frame data as length-prefixed sub-blocks, followed by a terminator.
pub fn sub_blocks(data: &[u8], buf: &mut Vec<u8>) {
    buf.reserve(data.len() + data.len() / SUB_BLOCK_MAX + 2);
    for chunk in data.chunks(SUB_BLOCK_MAX) {
        buf.push(chunk.len() as u8); // block size
        buf.extend_from_slice(chunk);
    }
    buf.push(0); // block size
}

/// Unpack a byte into fields of the given widths (inverse of `pack`)
#[cfg(test)]
pub(crate) fn unpack(byte: u8, widths: &[u8]) -> Vec<u8> {
    let mut shift = 8;
    widths
        .iter()
        .map(|width| {
            shift -= width;
            let mask = ((1u16 << width) - 1) as u8;
            (byte >> shift) & mask
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    struct Raw(Vec<u8>);

    impl ByteStreamSource for Raw {
        fn format(&self, buf: &mut Vec<u8>) {
            buf.extend_from_slice(&self.0);
        }
    }

    #[test]
    fn le16_values() {
        assert_eq!(le16(0), [0, 0]);
        assert_eq!(le16(10), [0x0A, 0x00]);
        assert_eq!(le16(0x1234), [0x34, 0x12]);
        assert_eq!(le16(u16::MAX), [0xFF, 0xFF]);
        for v in (0..=u16::MAX).step_by(257) {
            assert_eq!(u16::from_le_bytes(le16(v)), v);
        }
    }

    #[test]
    fn pack_layouts() {
        assert_eq!(pack(&[(1, 1), (1, 3), (0, 1), (1, 3)]), 0x91);
        assert_eq!(pack(&[(0, 3), (2, 3), (0, 1), (1, 1)]), 0b0000_1001);
        assert_eq!(pack(&[(0xAB, 8)]), 0xAB);
        assert_eq!(pack(&[(1, 1); 8]), 0xFF);
    }

    #[test]
    fn pack_unpack() {
        let layouts: &[&[u8]] = &[
            &[1, 3, 1, 3],
            &[1, 1, 1, 2, 3],
            &[3, 3, 1, 1],
            &[8],
            &[4, 4],
            &[1, 1, 1, 1, 1, 1, 1, 1],
        ];
        for widths in layouts {
            for seed in 0..=255u8 {
                let fields: Vec<(u8, u8)> = widths
                    .iter()
                    .enumerate()
                    .map(|(i, &w)| {
                        let mask = ((1u16 << w) - 1) as u8;
                        (seed.rotate_left(i as u32) & mask, w)
                    })
                    .collect();
                let byte = pack(&fields);
                let values: Vec<u8> = fields.iter().map(|f| f.0).collect();
                assert_eq!(unpack(byte, widths), values);
            }
        }
    }

    #[test]
    #[should_panic]
    fn pack_short() {
        pack(&[(1, 1), (0, 3)]);
    }

    #[test]
    #[should_panic]
    fn pack_long() {
        pack(&[(1, 4), (0, 3), (0, 2)]);
    }

    #[test]
    #[should_panic]
    fn pack_overflow() {
        pack(&[(4, 2), (0, 6)]);
    }

    #[test]
    fn concat_len() {
        let a = Raw(vec![1, 2, 3]);
        let b = Raw(vec![]);
        let c = Raw(vec![4; 300]);
        let buf = concat(&[&a, &b, &c]);
        assert_eq!(buf.len(), a.bytes().len() + b.bytes().len() + c.bytes().len());
        assert_eq!(&buf[..4], &[1, 2, 3, 4]);
        assert!(concat(&[]).is_empty());
    }

    #[test]
    fn sub_block_framing() {
        let mut buf = vec![];
        sub_blocks(&[], &mut buf);
        assert_eq!(buf, [0]);
        let mut buf = vec![];
        sub_blocks(&[7; 255], &mut buf);
        assert_eq!(buf.len(), 257);
        assert_eq!(buf[0], 255);
        assert_eq!(buf[256], 0);
        let mut buf = vec![];
        sub_blocks(&[7; 256], &mut buf);
        assert_eq!(buf.len(), 1 + 255 + 1 + 1 + 1);
        assert_eq!(buf[256], 1);
        assert_eq!(buf[258], 0);
    }
}
