//! Rendering abstractions for the area tree.
//!
//! This crate provides the seam between layout and output formats:
//! - `Renderer` trait receiving page-sequences, pages and off-document items
//! - `RecordingRenderer`, which keeps everything it is given for inspection
//! - Error types for rendering operations

mod error;
mod recording;
mod traits;
mod types;

pub use error::RenderError;
pub use recording::{RecordedSequence, RecordingRenderer};
pub use traits::Renderer;
pub use types::{NamedDestination, OffDocumentItem, PageSequenceStart};
