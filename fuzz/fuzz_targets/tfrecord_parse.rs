//! Fuzz target for TFRecord framing and Example decoding.
//!
//! Run with:
//!   cargo +nightly fuzz run tfrecord_parse

#![no_main]

use geococo2tfrecord::tfrecord::{decode_example, read_tfrecord_slice};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(entries) = read_tfrecord_slice(data) {
        for entry in entries {
            let _ = decode_example(&entry);
        }
    }
});
