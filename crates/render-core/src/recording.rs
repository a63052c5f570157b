use crate::error::RenderError;
use crate::traits::Renderer;
use crate::types::{NamedDestination, OffDocumentItem, PageSequenceStart};
use folio_layout::PageViewport;

#[derive(Debug, Clone)]
pub struct RecordedSequence {
    pub start: PageSequenceStart,
    pub pages: Vec<PageViewport>,
    pub destinations: Vec<NamedDestination>,
}

/// Keeps every page-sequence, page and destination it receives.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    sequences: Vec<RecordedSequence>,
    started: bool,
    stopped: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sequences(&self) -> &[RecordedSequence] {
        &self.sequences
    }

    pub fn pages(&self) -> impl Iterator<Item = &PageViewport> {
        self.sequences.iter().flat_map(|s| s.pages.iter())
    }

    pub fn page_count(&self) -> usize {
        self.sequences.iter().map(|s| s.pages.len()).sum()
    }

    pub fn page_numbers(&self) -> Vec<u32> {
        self.pages().map(|p| p.page_number).collect()
    }

    pub fn destinations(&self) -> impl Iterator<Item = &NamedDestination> {
        self.sequences.iter().flat_map(|s| s.destinations.iter())
    }

    pub fn destination(&self, id: &str) -> Option<&NamedDestination> {
        self.destinations().find(|d| d.id.as_str() == id)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn current(&mut self, what: &'static str) -> Result<&mut RecordedSequence, RenderError> {
        if !self.started || self.stopped {
            return Err(RenderError::Sequence {
                what,
                message: "renderer is not running".to_string(),
            });
        }
        self.sequences.last_mut().ok_or_else(|| RenderError::Sequence {
            what,
            message: "no page-sequence was started".to_string(),
        })
    }
}

impl Renderer for RecordingRenderer {
    fn start_renderer(&mut self) -> Result<(), RenderError> {
        self.started = true;
        self.stopped = false;
        Ok(())
    }

    fn start_page_sequence(&mut self, sequence: &PageSequenceStart) -> Result<(), RenderError> {
        if !self.started || self.stopped {
            return Err(RenderError::Sequence {
                what: "page-sequence",
                message: "renderer is not running".to_string(),
            });
        }
        log::debug!(
            "recording page-sequence {} from page {}",
            sequence.index,
            sequence.first_page_number
        );
        self.sequences.push(RecordedSequence {
            start: sequence.clone(),
            pages: Vec::new(),
            destinations: Vec::new(),
        });
        Ok(())
    }

    fn render_page(&mut self, page: PageViewport) -> Result<(), RenderError> {
        self.current("page")?.pages.push(page);
        Ok(())
    }

    fn process_off_document_item(&mut self, item: OffDocumentItem) -> Result<(), RenderError> {
        let sequence = self.current("off-document item")?;
        match item {
            OffDocumentItem::NamedDestination(d) => sequence.destinations.push(d),
        }
        Ok(())
    }

    fn stop_renderer(&mut self) -> Result<(), RenderError> {
        self.stopped = true;
        log::debug!(
            "recording renderer stopped after {} sequences, {} pages",
            self.sequences.len(),
            self.page_count()
        );
        Ok(())
    }
}
