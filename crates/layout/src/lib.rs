use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The formatting object tree cannot be laid out as given. Fatal to the
    /// page-sequence it occurs in.
    #[error("Structural error in {node}: {message}")]
    Structural { node: String, message: String },

    /// A stepping loop ran past its bound; the element lists never reach a
    /// legal break.
    #[error("Step computation did not terminate in {context} after {limit} iterations")]
    StepExhaustion { context: String, limit: usize },

    /// A child could not produce its element list.
    #[error("Failed to produce elements for {node}: {message}")]
    ElementProduction { node: String, message: String },
}

impl LayoutError {
    pub fn structural(node: impl Into<String>, message: impl Into<String>) -> Self {
        LayoutError::Structural {
            node: node.into(),
            message: message.into(),
        }
    }
}

pub mod algorithms;
pub mod area;
pub mod config;
pub mod element_list;
pub mod elements;
pub mod engine;
pub mod interface;
pub mod materialize;
pub mod nodes;
pub mod painting;
pub mod position;

pub use self::area::{Area, BlockArea, InlineArea, LineArea, PageViewport, TraitKey, TraitValue, Traits};
pub use self::config::LayoutConfig;
pub use self::element_list::ElementRange;
pub use self::elements::{FootnoteRef, KnuthBox, KnuthElement, KnuthGlue, KnuthPenalty};
pub use self::engine::{LayoutEngine, SequenceLayout};
pub use self::interface::{LayoutContext, LayoutEnvironment};
pub use self::position::Position;

pub use folio_style::INFINITE;

#[cfg(test)]
mod table_test;
#[cfg(test)]
mod test_utils;
