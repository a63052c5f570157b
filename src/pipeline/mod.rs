//! Document formatting pipeline.
//!
//! - [`PipelineBuilder`]: fluent builder collecting the document, the
//!   collaborators and the configuration
//! - [`DocumentPipeline`]: formats page-sequences and drives a renderer
//! - [`DocumentReport`]: what happened to each page-sequence

mod builder;
pub mod config;
mod orchestrator;

pub use builder::PipelineBuilder;
pub use config::PipelineConfig;
pub use orchestrator::{DocumentPipeline, DocumentReport, SequenceOutcome, SequenceSummary};
