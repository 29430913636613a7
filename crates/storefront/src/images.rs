//! # Product Images
//!
//! One image per product, kept in a [`FileStore`] under `{category}/{product_id}`
//! with the category lowercased. The content type is read from the image bytes.

use crate::files::{FileStore, FileStoreError};
use crate::model::{Category, ProductId};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ImageError {
    #[error("Image is empty")]
    Empty,

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error(transparent)]
    Store(#[from] FileStoreError),
}

/// A downloaded product image.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductImage {
    pub content_type: &'static str,
    pub content: Vec<u8>,
}

/// PNG, JPEG, GIF or WebP, recognised by their leading bytes.
pub fn sniff_image_type(content: &[u8]) -> Option<&'static str> {
    match content {
        [0x89, b'P', b'N', b'G', ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        _ => None,
    }
}

fn directory(category: Category) -> String {
    category.as_str().to_ascii_lowercase()
}

#[derive(Clone)]
pub struct ProductImages {
    files: Arc<dyn FileStore>,
}

impl ProductImages {
    pub fn new(files: Arc<dyn FileStore>) -> Self {
        Self { files }
    }

    /// Stores the image, replacing any earlier one for the product.
    #[instrument(skip(self, content), fields(bytes = content.len()))]
    pub async fn upload(
        &self,
        category: Category,
        product_id: &ProductId,
        content: Vec<u8>,
    ) -> Result<(), ImageError> {
        if content.is_empty() {
            return Err(ImageError::Empty);
        }
        let content_type = sniff_image_type(&content).ok_or(ImageError::UnsupportedFormat)?;
        self.files
            .upload(&directory(category), product_id.as_str(), content)
            .await?;
        info!(content_type, "Product image stored");
        Ok(())
    }

    pub async fn download(
        &self,
        category: Category,
        product_id: &ProductId,
    ) -> Result<ProductImage, ImageError> {
        let file = self
            .files
            .download(&directory(category), product_id.as_str())
            .await?;
        let content_type = sniff_image_type(&file.content).ok_or(ImageError::UnsupportedFormat)?;
        Ok(ProductImage {
            content_type,
            content: file.content,
        })
    }

    /// `true` if an image was removed.
    #[instrument(skip(self))]
    pub async fn delete(
        &self,
        category: Category,
        product_id: &ProductId,
    ) -> Result<bool, ImageError> {
        let removed = self
            .files
            .delete(&directory(category), product_id.as_str())
            .await?;
        debug!(removed, "Product image delete");
        Ok(removed)
    }

    pub async fn exists(
        &self,
        category: Category,
        product_id: &ProductId,
    ) -> Result<bool, ImageError> {
        Ok(self
            .files
            .exists(&directory(category), product_id.as_str())
            .await?)
    }
}
