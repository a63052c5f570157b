use folio_types::{FoId, Rect};

/// Announces a page-sequence before its pages are rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSequenceStart {
    /// Position of the sequence in the document.
    pub index: usize,
    pub id: Option<FoId>,
    pub master_reference: String,
    /// Number of the sequence's first page.
    pub first_page_number: u32,
}

/// A link target: the first area produced by a node with an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedDestination {
    pub id: FoId,
    /// Index of the page in the whole document.
    pub page_index: usize,
    pub page_number: u32,
    /// Page-relative rectangle of the area.
    pub rect: Rect,
}

/// Document-level output that is not part of any page.
#[derive(Debug, Clone, PartialEq)]
pub enum OffDocumentItem {
    NamedDestination(NamedDestination),
}
