use super::config::PipelineConfig;
use super::orchestrator::DocumentPipeline;
use crate::error::PipelineError;
use folio_fo::Document;
use folio_layout::LayoutEnvironment;
use folio_traits::{FixedWidthMetrics, FontMetricsProvider, ImageLoader, InMemoryImageLoader};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// A builder for creating a `DocumentPipeline`.
pub struct PipelineBuilder {
    document: Option<Document>,
    config: PipelineConfig,
    metrics: Arc<dyn FontMetricsProvider>,
    images: Arc<dyn ImageLoader>,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            document: None,
            config: PipelineConfig::default(),
            metrics: Arc::new(FixedWidthMetrics::new()),
            images: Arc::new(InMemoryImageLoader::new()),
        }
    }
}

impl PipelineBuilder {
    /// Creates a new `PipelineBuilder` with default settings, fixed-width
    /// font metrics and an empty image store.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the formatting object tree to lay out.
    pub fn with_document(mut self, document: Document) -> Self {
        self.document = Some(document);
        self
    }

    /// Parses and validates the formatting object tree from JSON.
    pub fn with_document_json(mut self, json: &str) -> Result<Self, PipelineError> {
        self.document = Some(Document::from_json(json)?);
        Ok(self)
    }

    /// Loads the formatting object tree from a JSON file.
    pub fn with_document_file<P: AsRef<Path>>(self, path: P) -> Result<Self, PipelineError> {
        let path_ref = path.as_ref();
        let source = fs::read_to_string(path_ref).map_err(|e| {
            PipelineError::Io(io::Error::new(
                e.kind(),
                format!("Failed to read document from '{}': {}", path_ref.display(), e),
            ))
        })?;
        self.with_document_json(&source)
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the font metrics used to measure text.
    pub fn with_font_metrics(mut self, metrics: Arc<dyn FontMetricsProvider>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Replaces the loader resolving external-graphic sizes.
    pub fn with_image_loader(mut self, images: Arc<dyn ImageLoader>) -> Self {
        self.images = images;
        self
    }

    /// Consumes the builder and creates the `DocumentPipeline`.
    pub fn build(self) -> Result<DocumentPipeline, PipelineError> {
        let document = self.document.ok_or_else(|| {
            PipelineError::Config(
                "No document has been configured. Use `with_document` or `with_document_json`.".to_string(),
            )
        })?;
        let env = LayoutEnvironment::new(self.metrics, self.images, self.config.layout);
        log::debug!(
            "Building pipeline for {} page-sequence(s), fail_fast={}",
            document.page_sequences.len(),
            self.config.fail_fast
        );
        Ok(DocumentPipeline::new(document, env, self.config.fail_fast))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_document_is_a_config_error() {
        let err = PipelineBuilder::new().build().err();
        assert!(matches!(err, Some(PipelineError::Config(_))));
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = PipelineBuilder::new().with_document_json("{").err();
        assert!(matches!(err, Some(PipelineError::Fo(_))));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = PipelineBuilder::new().with_document_file("does/not/exist.json").err();
        assert!(matches!(err, Some(PipelineError::Io(_))));
    }
}
