use folio_fo::FoError;
use folio_layout::LayoutError;
use folio_render_core::RenderError;
use thiserror::Error;

/// A comprehensive error type for the whole formatting session.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Formatting object tree is invalid: {0}")]
    Fo(#[from] FoError),

    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Pipeline is not configured correctly: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
