// cargo fuzz run encode corpus/encode -- -timeout=30

#![no_main]

use libfuzzer_sys::fuzz_target;

use gifwire::block::ImageData;
use gifwire::ByteStreamSource;

fuzz_target!(|data: &[u8]| {
    if let Some((&code_size, indices)) = data.split_first() {
        if let Ok(image) = ImageData::compress(code_size, indices) {
            let bytes = image.bytes();
            assert_eq!(bytes[0], code_size);
            assert_eq!(bytes.last(), Some(&0));
            // walk sub-blocks up to the terminator
            let mut pos = 1;
            while bytes[pos] != 0 {
                pos += usize::from(bytes[pos]) + 1;
            }
            assert_eq!(pos, bytes.len() - 1);
        }
    }
});
