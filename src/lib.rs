//! Folio lays out formatting object trees into pages.
//!
//! The [`PipelineBuilder`] takes a document (as a [`Document`] or as JSON),
//! the font-metrics and image collaborators and a [`PipelineConfig`]. The
//! resulting [`DocumentPipeline`] formats every page-sequence and hands the
//! pages to a [`Renderer`].
//!
//! ```ignore
//! use folio::{PipelineBuilder, RecordingRenderer};
//!
//! let pipeline = PipelineBuilder::new().with_document_json(json)?.build()?;
//! let mut renderer = RecordingRenderer::new();
//! let report = pipeline.run(&mut renderer)?;
//! println!("{} pages", report.page_count());
//! ```

mod error;
pub mod pipeline;

pub use error::PipelineError;
pub use pipeline::{
    DocumentPipeline, DocumentReport, PipelineBuilder, PipelineConfig, SequenceOutcome, SequenceSummary,
};

pub use folio_fo::Document;
pub use folio_layout::{Area, LayoutConfig, LayoutError, PageViewport, TraitKey, TraitValue};
pub use folio_render_core::{OffDocumentItem, RecordingRenderer, Renderer};
