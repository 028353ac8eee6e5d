#![no_main]

use latchkey_core::{PinBuffer, PinPush, PIN_LENGTH};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut buffer = PinBuffer::new();

    for &byte in data {
        // High bit selects removal so sequences mix pushes and pops
        if byte & 0x80 != 0 {
            let had_digits = !buffer.is_empty();
            assert_eq!(buffer.pop(), had_digits);
            continue;
        }

        let before = buffer.len();
        match buffer.push(char::from(byte)) {
            PinPush::Added(len) => {
                assert_eq!(len, before + 1);
                assert!(len < PIN_LENGTH);
            }
            PinPush::Completed => {
                assert!(buffer.is_full());
                let code = buffer.take().unwrap();
                assert_eq!(code.len(), PIN_LENGTH);
                assert!(code.as_str().chars().all(|c| c.is_ascii_digit()));
                assert!(buffer.is_empty());
            }
            PinPush::Rejected => assert_eq!(buffer.len(), before),
        }
        assert!(buffer.len() <= PIN_LENGTH);
    }
});
