//! Per-image detection records.
//!
//! An [`ImageRecord`] is everything one `tf.train.Example` needs: the raw
//! encoded image, its size, and one normalized box, label and label name per
//! annotation.

use crate::error::ConvertError;
use crate::ir::{Annotation, BBoxXYWH, CategoryId, Image, Normalized};

/// A box as written to the detection record.
///
/// The layout follows COCO: `xmin`/`ymin` are the top-left corner and
/// `width_frac`/`height_frac` are the extent, all as fractions of the image
/// size. They are not corner coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedBox {
    pub xmin: f32,
    pub ymin: f32,
    pub width_frac: f32,
    pub height_frac: f32,
}

impl From<BBoxXYWH<Normalized>> for NormalizedBox {
    fn from(bbox: BBoxXYWH<Normalized>) -> Self {
        Self {
            xmin: bbox.x() as f32,
            ymin: bbox.y() as f32,
            width_frac: bbox.width() as f32,
            height_frac: bbox.height() as f32,
        }
    }
}

/// One image ready for serialization.
///
/// `boxes`, `labels` and `texts` are parallel: entry `i` of each describes
/// the same annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageRecord {
    pub file_name: String,
    pub height: u32,
    pub width: u32,
    pub boxes: Vec<NormalizedBox>,
    pub labels: Vec<CategoryId>,
    pub texts: Vec<Vec<u8>>,
    pub encoded: Vec<u8>,
}

impl ImageRecord {
    /// Number of annotations, or `None` if the parallel lists disagree.
    pub fn annotation_count(&self) -> Option<usize> {
        let n = self.boxes.len();
        (self.labels.len() == n && self.texts.len() == n).then_some(n)
    }
}

/// Builds the record for `image` from its annotations and raw bytes.
///
/// `category_name` resolves a label id to its display name; it is a closure
/// so callers can back it with an [`AnnotationSet`](crate::ir::AnnotationSet)
/// or a plain map.
///
/// # Errors
/// - [`ConvertError::InvalidImageSize`] if the image has zero width or
///   height and at least one annotation to normalize.
/// - [`ConvertError::MissingCategory`] if a label has no name.
pub fn build_record<'a, F>(
    image: &Image,
    annotations: &[&Annotation],
    category_name: F,
    encoded: Vec<u8>,
) -> Result<ImageRecord, ConvertError>
where
    F: Fn(CategoryId) -> Option<&'a str>,
{
    if !annotations.is_empty() && (image.width == 0 || image.height == 0) {
        return Err(ConvertError::InvalidImageSize {
            file_name: image.file_name.clone(),
            width: image.width,
            height: image.height,
        });
    }

    let width = f64::from(image.width);
    let height = f64::from(image.height);

    let mut boxes = Vec::with_capacity(annotations.len());
    let mut labels = Vec::with_capacity(annotations.len());
    let mut texts = Vec::with_capacity(annotations.len());

    for ann in annotations {
        let name = category_name(ann.category_id).ok_or(ConvertError::MissingCategory {
            category_id: ann.category_id.as_u64(),
        })?;

        boxes.push(NormalizedBox::from(ann.bbox.to_normalized(width, height)));
        labels.push(ann.category_id);
        texts.push(name.as_bytes().to_vec());
    }

    Ok(ImageRecord {
        file_name: image.file_name.clone(),
        height: image.height,
        width: image.width,
        boxes,
        labels,
        texts,
        encoded,
    })
}

/// Fuzz-only entrypoint: builds and encodes a record for every image in
/// `set`, with empty image bytes.
#[cfg(feature = "fuzzing")]
pub fn fuzz_build_records(set: &crate::ir::AnnotationSet) -> Result<(), ConvertError> {
    let categories = set.category_ids();
    for image in set.images() {
        let annotations: Vec<&Annotation> = set
            .annotation_ids(image.id, &categories)
            .into_iter()
            .filter_map(|id| set.annotation(id))
            .collect();
        let record = build_record(image, &annotations, |id| set.category_name(id), Vec::new())?;
        crate::tfrecord::encode_record(&record)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Pixel;

    fn names(id: CategoryId) -> Option<&'static str> {
        match id.as_u64() {
            1 => Some("building"),
            2 => Some("straße"),
            _ => None,
        }
    }

    #[test]
    fn test_build_normalizes_each_annotation() {
        let image = Image::new(1u64, "tile.png", 200, 100);
        let a = Annotation::new(
            1u64,
            1u64,
            1u64,
            BBoxXYWH::<Pixel>::from_xywh(20.0, 10.0, 50.0, 25.0),
        );
        let b = Annotation::new(
            2u64,
            1u64,
            2u64,
            BBoxXYWH::<Pixel>::from_xywh(0.0, 0.0, 200.0, 100.0),
        );

        let record = build_record(&image, &[&a, &b], names, vec![1, 2, 3]).unwrap();

        assert_eq!(record.annotation_count(), Some(2));
        assert_eq!(
            record.boxes[0],
            NormalizedBox {
                xmin: 0.1,
                ymin: 0.1,
                width_frac: 0.25,
                height_frac: 0.25,
            }
        );
        assert_eq!(record.boxes[1].width_frac, 1.0);
        assert_eq!(record.labels, vec![CategoryId::new(1), CategoryId::new(2)]);
        assert_eq!(record.texts[1], "straße".as_bytes());
        assert_eq!(record.encoded, vec![1, 2, 3]);
        assert_eq!((record.width, record.height), (200, 100));
    }

    #[test]
    fn test_build_without_annotations() {
        let image = Image::new(1u64, "empty.png", 64, 32);
        let record = build_record(&image, &[], names, Vec::new()).unwrap();

        assert_eq!(record.annotation_count(), Some(0));
        assert!(record.boxes.is_empty());
        assert!(record.labels.is_empty());
        assert!(record.texts.is_empty());
        assert_eq!((record.width, record.height), (64, 32));
    }

    #[test]
    fn test_zero_size_with_annotations_fails() {
        let image = Image::new(1u64, "broken.png", 0, 32);
        let ann = Annotation::new(1u64, 1u64, 1u64, BBoxXYWH::from_xywh(0.0, 0.0, 1.0, 1.0));
        let err = build_record(&image, &[&ann], names, Vec::new()).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidImageSize { width: 0, .. }));
    }

    #[test]
    fn test_zero_size_without_annotations_is_fine() {
        let image = Image::new(1u64, "blank.png", 0, 0);
        assert!(build_record(&image, &[], names, Vec::new()).is_ok());
    }

    #[test]
    fn test_unknown_category_fails() {
        let image = Image::new(1u64, "tile.png", 10, 10);
        let ann = Annotation::new(1u64, 1u64, 7u64, BBoxXYWH::from_xywh(0.0, 0.0, 1.0, 1.0));
        let err = build_record(&image, &[&ann], names, Vec::new()).unwrap_err();
        assert!(matches!(err, ConvertError::MissingCategory { category_id: 7 }));
    }

    #[test]
    fn test_mismatched_lists_have_no_count() {
        let image = Image::new(1u64, "tile.png", 10, 10);
        let mut record = build_record(&image, &[], names, Vec::new()).unwrap();
        record.texts.push(b"orphan".to_vec());
        assert_eq!(record.annotation_count(), None);
    }

    #[cfg(feature = "fuzzing")]
    #[test]
    fn test_fuzz_build_records_reports_zero_size() {
        let set = crate::ir::AnnotationSet::new(
            vec![Image::new(1u64, "ok.png", 10, 10), Image::new(2u64, "flat.png", 10, 0)],
            vec![crate::ir::Category::new(1u64, "building")],
            vec![
                Annotation::new(1u64, 1u64, 1u64, BBoxXYWH::from_xywh(1.0, 1.0, 2.0, 2.0)),
                Annotation::new(2u64, 2u64, 1u64, BBoxXYWH::from_xywh(1.0, 0.0, 2.0, 0.0)),
            ],
        )
        .unwrap();
        assert!(matches!(
            fuzz_build_records(&set),
            Err(ConvertError::InvalidImageSize { height: 0, .. })
        ));
    }
}
