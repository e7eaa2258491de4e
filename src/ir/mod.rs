//! COCO annotation model and reader.
//!
//! Boxes carry their coordinate space in the type so that pixel boxes read
//! from COCO and normalized boxes written to TFRecord cannot be mixed up.
//!
//! # Example
//!
//! ```
//! use geococo2tfrecord::ir::{Annotation, AnnotationSet, BBoxXYWH, Category, Image, Pixel};
//!
//! let set = AnnotationSet::new(
//!     vec![Image::new(1u64, "tile.png", 256, 256)],
//!     vec![Category::new(1u64, "building")],
//!     vec![Annotation::new(
//!         1u64, 1u64, 1u64,
//!         BBoxXYWH::<Pixel>::from_xywh(16.0, 32.0, 64.0, 64.0),
//!     )],
//! )
//! .unwrap();
//! assert_eq!(set.image_ids().len(), 1);
//! ```

mod bbox;
mod ids;
pub mod io_coco_json;
mod model;
mod space;

pub use bbox::BBoxXYWH;
pub use ids::{AnnotationId, CategoryId, ImageId};
pub use model::{Annotation, AnnotationSet, Category, DuplicateId, Image};
pub use space::{Normalized, Pixel};
