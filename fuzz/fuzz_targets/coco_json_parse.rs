//! Fuzz target for COCO JSON parsing.
//!
//! Run with:
//!   cargo +nightly fuzz run coco_json_parse

#![no_main]

use geococo2tfrecord::ir::io_coco_json::from_coco_slice;
use geococo2tfrecord::record::fuzz_build_records;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Annotation files above 10MB are not interesting here.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(set) = from_coco_slice(data) {
        let categories = set.category_ids();
        for id in set.image_ids() {
            for ann_id in set.annotation_ids(id, &categories) {
                let _ = set.annotation(ann_id);
            }
        }
        let _ = fuzz_build_records(&set);
    }
});
