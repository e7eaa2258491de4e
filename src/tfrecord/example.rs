//! `tf.train.Example` protobuf messages and the record ↔ Example mapping.
//!
//! The message definitions mirror `tensorflow/core/example/example.proto`
//! and `feature.proto`. They are declared with prost derives so no protoc
//! step is needed at build time.

use std::collections::BTreeMap;

use prost::Message;

use crate::error::ConvertError;
use crate::record::ImageRecord;

pub const KEY_HEIGHT: &str = "image/height";
pub const KEY_WIDTH: &str = "image/width";
pub const KEY_BBOX_XMIN: &str = "image/object/bbox/xmin";
pub const KEY_BBOX_YMIN: &str = "image/object/bbox/ymin";
/// Holds the normalized box width, not a right edge.
pub const KEY_BBOX_XMAX: &str = "image/object/bbox/xmax";
/// Holds the normalized box height, not a bottom edge.
pub const KEY_BBOX_YMAX: &str = "image/object/bbox/ymax";
pub const KEY_CLASS_LABEL: &str = "image/object/class/label";
pub const KEY_CLASS_TEXT: &str = "image/object/class/text";
pub const KEY_ENCODED: &str = "image/encoded";
pub const KEY_FORMAT: &str = "image/format";

/// Value of `image/format`. The original datasets are declared as JPEG
/// regardless of the file extension.
pub const IMAGE_FORMAT: &[u8] = b"jpeg";

#[derive(Clone, PartialEq, Message)]
pub struct BytesList {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub value: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, Message)]
pub struct FloatList {
    #[prost(float, repeated, tag = "1")]
    pub value: Vec<f32>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Int64List {
    #[prost(int64, repeated, tag = "1")]
    pub value: Vec<i64>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Feature {
    #[prost(oneof = "feature::Kind", tags = "1, 2, 3")]
    pub kind: Option<feature::Kind>,
}

pub mod feature {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Kind {
        #[prost(message, tag = "1")]
        BytesList(super::BytesList),
        #[prost(message, tag = "2")]
        FloatList(super::FloatList),
        #[prost(message, tag = "3")]
        Int64List(super::Int64List),
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct Features {
    /// Ordered so that encoding the same record twice yields the same bytes.
    #[prost(btree_map = "string, message", tag = "1")]
    pub feature: BTreeMap<String, Feature>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Example {
    #[prost(message, optional, tag = "1")]
    pub features: Option<Features>,
}

impl Feature {
    pub fn bytes(value: Vec<Vec<u8>>) -> Self {
        Self {
            kind: Some(feature::Kind::BytesList(BytesList { value })),
        }
    }

    pub fn floats(value: Vec<f32>) -> Self {
        Self {
            kind: Some(feature::Kind::FloatList(FloatList { value })),
        }
    }

    pub fn int64s(value: Vec<i64>) -> Self {
        Self {
            kind: Some(feature::Kind::Int64List(Int64List { value })),
        }
    }

    pub fn as_bytes_list(&self) -> Option<&[Vec<u8>]> {
        match &self.kind {
            Some(feature::Kind::BytesList(list)) => Some(&list.value),
            _ => None,
        }
    }

    pub fn as_float_list(&self) -> Option<&[f32]> {
        match &self.kind {
            Some(feature::Kind::FloatList(list)) => Some(&list.value),
            _ => None,
        }
    }

    pub fn as_int64_list(&self) -> Option<&[i64]> {
        match &self.kind {
            Some(feature::Kind::Int64List(list)) => Some(&list.value),
            _ => None,
        }
    }
}

impl Example {
    /// Looks up a feature by key.
    pub fn get(&self, key: &str) -> Option<&Feature> {
        self.features.as_ref()?.feature.get(key)
    }
}

/// Converts a record into an Example.
///
/// # Errors
/// [`ConvertError::Serialization`] if the record's per-annotation lists
/// have different lengths.
pub fn record_to_example(record: &ImageRecord) -> Result<Example, ConvertError> {
    if record.annotation_count().is_none() {
        return Err(ConvertError::Serialization {
            message: format!(
                "'{}' has {} boxes, {} labels and {} texts",
                record.file_name,
                record.boxes.len(),
                record.labels.len(),
                record.texts.len()
            ),
        });
    }

    let xmin = record.boxes.iter().map(|b| b.xmin).collect();
    let ymin = record.boxes.iter().map(|b| b.ymin).collect();
    let width_frac = record.boxes.iter().map(|b| b.width_frac).collect();
    let height_frac = record.boxes.iter().map(|b| b.height_frac).collect();
    // Category ids above i64::MAX do not occur in COCO; wrap like TF would.
    let labels = record.labels.iter().map(|id| id.as_u64() as i64).collect();

    let mut feature = BTreeMap::new();
    feature.insert(
        KEY_HEIGHT.to_string(),
        Feature::int64s(vec![i64::from(record.height)]),
    );
    feature.insert(
        KEY_WIDTH.to_string(),
        Feature::int64s(vec![i64::from(record.width)]),
    );
    feature.insert(KEY_BBOX_XMIN.to_string(), Feature::floats(xmin));
    feature.insert(KEY_BBOX_YMIN.to_string(), Feature::floats(ymin));
    feature.insert(KEY_BBOX_XMAX.to_string(), Feature::floats(width_frac));
    feature.insert(KEY_BBOX_YMAX.to_string(), Feature::floats(height_frac));
    feature.insert(KEY_CLASS_LABEL.to_string(), Feature::int64s(labels));
    feature.insert(
        KEY_CLASS_TEXT.to_string(),
        Feature::bytes(record.texts.clone()),
    );
    feature.insert(
        KEY_ENCODED.to_string(),
        Feature::bytes(vec![record.encoded.clone()]),
    );
    feature.insert(
        KEY_FORMAT.to_string(),
        Feature::bytes(vec![IMAGE_FORMAT.to_vec()]),
    );

    Ok(Example {
        features: Some(Features { feature }),
    })
}

/// Serializes a record to `tf.train.Example` wire bytes.
pub fn encode_record(record: &ImageRecord) -> Result<Vec<u8>, ConvertError> {
    Ok(record_to_example(record)?.encode_to_vec())
}

/// Parses `tf.train.Example` wire bytes.
pub fn decode_example(bytes: &[u8]) -> Result<Example, prost::DecodeError> {
    Example::decode(bytes)
}
