//! The bound Formatting Object tree: the input to layout.
//!
//! Every property is already resolved to a concrete value (lengths in
//! millipoints, keep values, border/padding specs). The tree is loaded from
//! JSON and treated as read-only afterwards.

pub mod document;
pub mod master;
pub mod node;
pub mod table;

pub use document::{Document, Flow, PageSequence};
pub use master::{
    BlankOrNotBlank, ConditionalMasterReference, LayoutMasterSet, OddOrEven, PagePosition,
    PageSequenceMaster, RegionBody, SimplePageMaster, SubSequence,
};
pub use node::{
    Block, BlockProps, ExternalGraphic, FoNode, Footnote, Inline, ListBlock, ListItem,
    ListItemPart, TextRun,
};
pub use table::{ColumnWidth, RowProps, Table, TableCell, TableColumn, TableRow, TableSection};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FoError {
    #[error("Failed to parse formatting object JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid formatting object tree: {0}")]
    Invalid(String),
}
