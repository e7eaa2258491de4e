//! In-memory COCO annotation set.
//!
//! The set is built once by the reader and then only queried. Lookups mirror
//! the ones the conversion needs: images in file order, annotations of one
//! image restricted to a category set, and category names by id.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::bbox::BBoxXYWH;
use super::ids::{AnnotationId, CategoryId, ImageId};
use super::space::Pixel;

/// An image descriptor from the COCO `images` table.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub id: ImageId,

    /// File name relative to the `images/` and `preview/` directories.
    pub file_name: String,

    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,
}

impl Image {
    pub fn new(
        id: impl Into<ImageId>,
        file_name: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            width,
            height,
        }
    }
}

/// A category (class label).
#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A single box annotation.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub id: AnnotationId,
    pub image_id: ImageId,
    pub category_id: CategoryId,

    /// `[x, y, width, height]` in absolute pixels.
    pub bbox: BBoxXYWH<Pixel>,
}

impl Annotation {
    pub fn new(
        id: impl Into<AnnotationId>,
        image_id: impl Into<ImageId>,
        category_id: impl Into<CategoryId>,
        bbox: BBoxXYWH<Pixel>,
    ) -> Self {
        Self {
            id: id.into(),
            image_id: image_id.into(),
            category_id: category_id.into(),
            bbox,
        }
    }
}

/// A COCO table listed the same id twice.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DuplicateId {
    #[error("duplicate image id {0}")]
    Image(ImageId),

    #[error("duplicate category id {0}")]
    Category(CategoryId),

    #[error("duplicate annotation id {0}")]
    Annotation(AnnotationId),
}

/// A loaded, indexed COCO annotation file.
#[derive(Clone, Debug, Default)]
pub struct AnnotationSet {
    images: Vec<Image>,
    categories: Vec<Category>,
    annotations: Vec<Annotation>,

    image_index: HashMap<ImageId, usize>,
    category_index: HashMap<CategoryId, usize>,
    annotation_index: HashMap<AnnotationId, usize>,
    annotations_by_image: HashMap<ImageId, Vec<usize>>,
}

impl AnnotationSet {
    /// Indexes the three COCO tables.
    ///
    /// Every table must have unique ids. Annotations pointing at an image
    /// that is not declared are kept but never returned by
    /// [`annotation_ids`](Self::annotation_ids).
    pub fn new(
        images: Vec<Image>,
        categories: Vec<Category>,
        annotations: Vec<Annotation>,
    ) -> Result<Self, DuplicateId> {
        let mut image_index = HashMap::with_capacity(images.len());
        for (i, image) in images.iter().enumerate() {
            if image_index.insert(image.id, i).is_some() {
                return Err(DuplicateId::Image(image.id));
            }
        }

        let mut category_index = HashMap::with_capacity(categories.len());
        for (i, category) in categories.iter().enumerate() {
            if category_index.insert(category.id, i).is_some() {
                return Err(DuplicateId::Category(category.id));
            }
        }

        let mut annotation_index = HashMap::with_capacity(annotations.len());
        let mut annotations_by_image: HashMap<ImageId, Vec<usize>> = HashMap::new();
        for (i, ann) in annotations.iter().enumerate() {
            if annotation_index.insert(ann.id, i).is_some() {
                return Err(DuplicateId::Annotation(ann.id));
            }
            annotations_by_image.entry(ann.image_id).or_default().push(i);
        }

        Ok(Self {
            images,
            categories,
            annotations,
            image_index,
            category_index,
            annotation_index,
            annotations_by_image,
        })
    }

    /// All image ids, in the order the file lists them.
    pub fn image_ids(&self) -> Vec<ImageId> {
        self.images.iter().map(|img| img.id).collect()
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn image(&self, id: ImageId) -> Option<&Image> {
        self.image_index.get(&id).map(|&i| &self.images[i])
    }

    /// All declared category ids, in file order.
    pub fn category_ids(&self) -> Vec<CategoryId> {
        self.categories.iter().map(|cat| cat.id).collect()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_name(&self, id: CategoryId) -> Option<&str> {
        self.category_index
            .get(&id)
            .map(|&i| self.categories[i].name.as_str())
    }

    /// Annotation ids on `image_id` whose category is in `category_ids`,
    /// in file order.
    pub fn annotation_ids(
        &self,
        image_id: ImageId,
        category_ids: &[CategoryId],
    ) -> Vec<AnnotationId> {
        if !self.image_index.contains_key(&image_id) {
            return Vec::new();
        }
        let wanted: HashSet<CategoryId> = category_ids.iter().copied().collect();

        self.annotations_by_image
            .get(&image_id)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&i| &self.annotations[i])
                    .filter(|ann| wanted.contains(&ann.category_id))
                    .map(|ann| ann.id)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotation_index
            .get(&id)
            .map(|&i| &self.annotations[i])
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}
