//! Image capability: layout only needs an image's intrinsic size.

use folio_types::{ResourceUri, Size};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;
use thiserror::Error;

/// Error type for resource loading operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Invalid resource format: {0}")]
    InvalidFormat(String),
}

/// Resolves external graphics.
pub trait ImageLoader: Send + Sync + Debug {
    /// Intrinsic size of the image in millipoints.
    fn intrinsic_size(&self, uri: &ResourceUri) -> Result<Size, ResourceError>;

    /// Returns a human-readable name for this loader (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// An image loader over pre-registered sizes.
#[derive(Debug, Default)]
pub struct InMemoryImageLoader {
    images: RwLock<HashMap<String, Size>>,
}

impl InMemoryImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an image under `uri`.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned,
    /// and `ResourceError::InvalidFormat` for a negative size.
    pub fn add(&self, uri: impl Into<String>, size: Size) -> Result<(), ResourceError> {
        let uri = uri.into();
        if size.width < 0 || size.height < 0 {
            return Err(ResourceError::InvalidFormat(format!(
                "negative image size for '{}'",
                uri
            )));
        }
        let mut images = self.images.write().map_err(|_| ResourceError::LoadFailed {
            path: uri.clone(),
            message: "image store lock poisoned".to_string(),
        })?;
        images.insert(uri, size);
        Ok(())
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.images.read().map(|i| i.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ImageLoader for InMemoryImageLoader {
    fn intrinsic_size(&self, uri: &ResourceUri) -> Result<Size, ResourceError> {
        let images = self.images.read().map_err(|_| ResourceError::LoadFailed {
            path: uri.to_string(),
            message: "image store lock poisoned".to_string(),
        })?;
        images
            .get(uri.as_str())
            .copied()
            .ok_or_else(|| ResourceError::NotFound(uri.to_string()))
    }

    fn name(&self) -> &'static str {
        "InMemoryImageLoader"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_resolve() {
        let loader = InMemoryImageLoader::new();
        loader.add("logo.png", Size::new(10_000, 5_000)).unwrap();
        assert_eq!(
            loader.intrinsic_size(&ResourceUri::new("logo.png")),
            Ok(Size::new(10_000, 5_000))
        );
        assert_eq!(loader.len(), 1);
    }

    #[test]
    fn test_missing_image() {
        let loader = InMemoryImageLoader::new();
        assert!(loader.is_empty());
        assert!(matches!(
            loader.intrinsic_size(&ResourceUri::new("nope.png")),
            Err(ResourceError::NotFound(_))
        ));
    }

    #[test]
    fn test_negative_size_rejected() {
        let loader = InMemoryImageLoader::new();
        assert!(loader.add("bad.png", Size::new(-1, 5)).is_err());
    }
}
