use crate::error::PipelineError;
use folio_fo::{Document, PageSequence};
use folio_layout::{LayoutEngine, LayoutEnvironment, LayoutError, PageViewport};
use folio_render_core::{NamedDestination, OffDocumentItem, PageSequenceStart, Renderer};
use folio_types::FoId;
use std::collections::HashSet;

/// Pages produced by one page-sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceSummary {
    pub first_page_number: u32,
    pub page_count: usize,
}

#[derive(Debug, Clone)]
pub struct SequenceOutcome {
    pub index: usize,
    pub id: Option<FoId>,
    pub master_reference: String,
    pub result: Result<SequenceSummary, LayoutError>,
}

impl SequenceOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// What a run did with each page-sequence, in document order.
#[derive(Debug, Clone, Default)]
pub struct DocumentReport {
    pub sequences: Vec<SequenceOutcome>,
}

impl DocumentReport {
    pub fn page_count(&self) -> usize {
        self.sequences
            .iter()
            .filter_map(|s| s.result.as_ref().ok())
            .map(|s| s.page_count)
            .sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &SequenceOutcome> {
        self.sequences.iter().filter(|s| !s.is_ok())
    }

    pub fn is_success(&self) -> bool {
        self.sequences.iter().all(SequenceOutcome::is_ok)
    }
}

/// The main formatting pipeline: lays out page-sequences one after the
/// other and streams their pages to a renderer.
pub struct DocumentPipeline {
    document: Document,
    engine: LayoutEngine,
    fail_fast: bool,
}

impl DocumentPipeline {
    pub fn new(document: Document, env: LayoutEnvironment, fail_fast: bool) -> Self {
        Self {
            document,
            engine: LayoutEngine::new(env),
            fail_fast,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Formats the whole document into `renderer`.
    ///
    /// A layout error ends only the page-sequence it occurs in, unless the
    /// pipeline is configured to fail fast. Renderer errors always abort.
    pub fn run<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<DocumentReport, PipelineError> {
        renderer.start_renderer()?;
        let mut report = DocumentReport::default();
        let mut session = Session::default();

        for (index, sequence) in self.document.page_sequences.iter().enumerate() {
            let outcome = self.run_sequence(index, sequence, &mut session, renderer)?;
            if let Err(e) = &outcome.result {
                log::warn!("page-sequence {} ('{}') failed: {}", index, sequence.master_reference, e);
                if self.fail_fast {
                    return Err(PipelineError::Layout(e.clone()));
                }
            }
            report.sequences.push(outcome);
        }

        renderer.stop_renderer()?;
        log::debug!(
            "Formatted {} page-sequence(s) into {} page(s)",
            report.sequences.len(),
            report.page_count()
        );
        Ok(report)
    }

    fn run_sequence<R: Renderer + ?Sized>(
        &self,
        index: usize,
        sequence: &PageSequence,
        session: &mut Session,
        renderer: &mut R,
    ) -> Result<SequenceOutcome, PipelineError> {
        let mut outcome = SequenceOutcome {
            index,
            id: sequence.id.clone(),
            master_reference: sequence.master_reference.clone(),
            result: Ok(SequenceSummary {
                first_page_number: session.next_page_number,
                page_count: 0,
            }),
        };
        let layout = match self
            .engine
            .layout_sequence(&self.document.layout_master_set, sequence, session.next_page_number)
        {
            Ok(layout) => layout,
            Err(e) => {
                outcome.result = Err(e);
                return Ok(outcome);
            }
        };

        let first_page_number = layout.pages.first().map_or(session.next_page_number, |p| p.page_number);
        renderer.start_page_sequence(&PageSequenceStart {
            index,
            id: sequence.id.clone(),
            master_reference: sequence.master_reference.clone(),
            first_page_number,
        })?;

        let page_count = layout.pages.len();
        let mut destinations = Vec::new();
        for page in layout.pages {
            destinations.extend(session.destinations(&page));
            session.page_index += 1;
            renderer.render_page(page)?;
        }
        for destination in destinations {
            renderer.process_off_document_item(OffDocumentItem::NamedDestination(destination))?;
        }
        session.next_page_number = layout.next_page_number;

        outcome.result = Ok(SequenceSummary {
            first_page_number,
            page_count,
        });
        Ok(outcome)
    }
}

/// State carried from one page-sequence to the next.
struct Session {
    next_page_number: u32,
    page_index: usize,
    seen_ids: HashSet<FoId>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            next_page_number: 1,
            page_index: 0,
            seen_ids: HashSet::new(),
        }
    }
}

impl Session {
    /// Destinations for the ids first seen on `page`. An id without a block
    /// area of its own points at the region body.
    fn destinations(&mut self, page: &PageViewport) -> Vec<NamedDestination> {
        let mut out = Vec::new();
        for id in &page.ids {
            if !self.seen_ids.insert(id.clone()) {
                continue;
            }
            let rect = page
                .areas_for_id(id.as_str())
                .first()
                .map_or(page.region_body.rect, |(_, rect)| *rect);
            out.push(NamedDestination {
                id: id.clone(),
                page_index: self.page_index,
                page_number: page.page_number,
                rect,
            });
        }
        out
    }
}
