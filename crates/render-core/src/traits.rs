use crate::error::RenderError;
use crate::types::{OffDocumentItem, PageSequenceStart};
use folio_layout::PageViewport;

/// A consumer of the area tree, fed one page at a time.
///
/// Calls arrive in document order: `start_page_sequence` before the pages of
/// each sequence, and the sequence's off-document items after its pages.
/// Pages are handed over by value; the renderer owns them from then on.
pub trait Renderer {
    fn start_renderer(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    fn start_page_sequence(&mut self, sequence: &PageSequenceStart) -> Result<(), RenderError>;

    fn render_page(&mut self, page: PageViewport) -> Result<(), RenderError>;

    fn process_off_document_item(&mut self, item: OffDocumentItem) -> Result<(), RenderError>;

    fn stop_renderer(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}
