//! # File Store
//!
//! Directory-scoped blob storage used for invoices and product images.
//! [`InMemoryFileStore`] keeps
//! everything in process; an outer layer can plug in a real share behind the
//! same trait.

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FileStoreError {
    #[error("File not found: {directory}/{name}")]
    NotFound { directory: String, name: String },

    #[error("Invalid file path: {0}")]
    InvalidPath(String),

    #[error("File store unavailable: {0}")]
    Unavailable(String),
}

/// A downloaded file.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub name: String,
    pub content_type: &'static str,
    pub content: Vec<u8>,
}

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Stores `content` under `directory/name`, replacing any previous file.
    async fn upload(
        &self,
        directory: &str,
        name: &str,
        content: Vec<u8>,
    ) -> Result<(), FileStoreError>;

    async fn download(&self, directory: &str, name: &str) -> Result<StoredFile, FileStoreError>;

    /// `true` if a file was removed.
    async fn delete(&self, directory: &str, name: &str) -> Result<bool, FileStoreError>;

    async fn exists(&self, directory: &str, name: &str) -> Result<bool, FileStoreError>;
}

/// Content type inferred from the file extension.
pub fn content_type_for(name: &str) -> &'static str {
    let extension = name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

fn check_segment(segment: &str) -> Result<(), FileStoreError> {
    if segment.trim().is_empty() || segment.contains('/') || segment.contains("..") {
        return Err(FileStoreError::InvalidPath(segment.to_string()));
    }
    Ok(())
}

#[derive(Default)]
pub struct InMemoryFileStore {
    files: RwLock<HashMap<(String, String), Vec<u8>>>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of every file in `directory`, sorted.
    pub async fn list(&self, directory: &str) -> Vec<String> {
        let files = self.files.read().await;
        let mut names: Vec<String> = files
            .keys()
            .filter(|(dir, _)| dir == directory)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn upload(
        &self,
        directory: &str,
        name: &str,
        content: Vec<u8>,
    ) -> Result<(), FileStoreError> {
        check_segment(directory)?;
        check_segment(name)?;
        debug!(directory, name, bytes = content.len(), "Upload");
        self.files
            .write()
            .await
            .insert((directory.to_string(), name.to_string()), content);
        Ok(())
    }

    async fn download(&self, directory: &str, name: &str) -> Result<StoredFile, FileStoreError> {
        check_segment(directory)?;
        check_segment(name)?;
        let files = self.files.read().await;
        let content = files
            .get(&(directory.to_string(), name.to_string()))
            .ok_or_else(|| FileStoreError::NotFound {
                directory: directory.to_string(),
                name: name.to_string(),
            })?;
        Ok(StoredFile {
            name: name.to_string(),
            content_type: content_type_for(name),
            content: content.clone(),
        })
    }

    async fn delete(&self, directory: &str, name: &str) -> Result<bool, FileStoreError> {
        check_segment(directory)?;
        check_segment(name)?;
        let removed = self
            .files
            .write()
            .await
            .remove(&(directory.to_string(), name.to_string()))
            .is_some();
        debug!(directory, name, removed, "Delete");
        Ok(removed)
    }

    async fn exists(&self, directory: &str, name: &str) -> Result<bool, FileStoreError> {
        check_segment(directory)?;
        check_segment(name)?;
        Ok(self
            .files
            .read()
            .await
            .contains_key(&(directory.to_string(), name.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_then_download_in_same_directory() {
        let store = InMemoryFileStore::new();
        store.upload("user-1", "a_invoice.txt", b"hello".to_vec()).await.unwrap();

        let file = store.download("user-1", "a_invoice.txt").await.unwrap();
        assert_eq!(file.content, b"hello");
        assert_eq!(file.content_type, "text/plain");

        let other = store.download("user-2", "a_invoice.txt").await;
        assert!(matches!(other, Err(FileStoreError::NotFound { .. })));
        assert_eq!(store.list("user-1").await, vec!["a_invoice.txt".to_string()]);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_file_was_removed() {
        let store = InMemoryFileStore::new();
        store.upload("books", "p-1", b"img".to_vec()).await.unwrap();
        assert!(store.exists("books", "p-1").await.unwrap());

        assert!(store.delete("books", "p-1").await.unwrap());
        assert!(!store.exists("books", "p-1").await.unwrap());
        assert!(!store.delete("books", "p-1").await.unwrap());
    }

    #[tokio::test]
    async fn path_traversal_is_rejected() {
        let store = InMemoryFileStore::new();
        let result = store.upload("../etc", "passwd", Vec::new()).await;
        assert!(matches!(result, Err(FileStoreError::InvalidPath(_))));
    }

    #[test]
    fn content_types_follow_extension() {
        assert_eq!(content_type_for("x.PDF"), "application/pdf");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
