#![no_main]
use libfuzzer_sys::fuzz_target;

use boundcopy_core::{BoundedBuffer, CopyOutcome};

// First two bytes pick the capacity, the rest is the source. Run under
// `cargo fuzz` so AddressSanitizer watches every access.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let capacity = usize::from(u16::from_le_bytes([data[0], data[1]])).max(1);
    let source = &data[2..];

    let Ok(mut buf) = BoundedBuffer::new(capacity) else {
        return;
    };
    let outcome = buf.write_bounded(source);

    assert!(buf.len() <= capacity);
    assert_eq!(outcome, CopyOutcome::classify(source.len(), capacity));
    assert_eq!(buf.as_slice(), &source[..source.len().min(capacity)]);
});
