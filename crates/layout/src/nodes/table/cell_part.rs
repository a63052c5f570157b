use crate::element_list::ElementRange;
use folio_types::Length;

/// The piece of one cell's content included in one table step.
///
/// Which border and padding widths apply depends on where the part lands
/// on the page, so both variants are kept and chosen at materialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPart {
    /// Index of the cell in its section.
    pub cell: usize,
    pub start: usize,
    /// Last element included; `None` for a part that adds nothing.
    pub end: Option<usize>,
    /// The part ends the cell's content and the cell ends on the current row.
    pub last_part: bool,
    /// Leading glue, dropped when the part starts a page.
    pub cond_before: Length,
    pub length: Length,
    pub penalty_length: Length,
    pub bp_before_normal: Length,
    pub bp_before_first: Length,
    pub bp_after_normal: Length,
    pub bp_after_last: Length,
}

impl CellPart {
    pub fn range(&self) -> ElementRange {
        ElementRange::new(self.start, self.end)
    }

    pub fn is_empty(&self) -> bool {
        self.range().is_empty()
    }

    pub fn is_first_part(&self) -> bool {
        self.start == 0 && !self.is_empty()
    }

    pub fn is_last_part(&self) -> bool {
        self.last_part
    }

    pub fn border_padding_before(&self, first_on_page: bool) -> Length {
        if first_on_page {
            self.bp_before_first
        } else {
            self.bp_before_normal
        }
    }

    pub fn border_padding_after(&self, last_on_page: bool) -> Length {
        if last_on_page {
            self.bp_after_last
        } else {
            self.bp_after_normal
        }
    }
}
