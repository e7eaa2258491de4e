//! TFRecord output: `tf.train.Example` encoding and the record container.
//!
//! [`encode_record`] turns an [`ImageRecord`](crate::record::ImageRecord)
//! into Example bytes; [`TfRecordWriter`] frames those bytes into a file the
//! TensorFlow Object Detection API can read. The reader side exists to
//! inspect and verify what was written.

mod example;
mod reader;
mod writer;

pub use example::{
    decode_example, encode_record, feature, record_to_example, BytesList, Example, Feature,
    Features, FloatList, Int64List, IMAGE_FORMAT, KEY_BBOX_XMAX, KEY_BBOX_XMIN, KEY_BBOX_YMAX,
    KEY_BBOX_YMIN, KEY_CLASS_LABEL, KEY_CLASS_TEXT, KEY_ENCODED, KEY_FORMAT, KEY_HEIGHT,
    KEY_WIDTH,
};
pub use reader::{read_tfrecord_file, read_tfrecord_slice, TfRecordReader};
pub use writer::{masked_crc32c, write_tfrecord_file, TfRecordWriter};
