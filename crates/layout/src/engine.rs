//! Page production for one page-sequence.
//!
//! The flow is turned into a single element list at the column width of the
//! first page. Pages are then filled column by column with the page breaker,
//! each page taking its master from the sequence's master reference, and the
//! chosen ranges are materialized into the area tree.

use crate::LayoutError;
use crate::algorithms::masters::{PageConditions, PageMasterSelector, PageRegion};
use crate::algorithms::pagination::{ColumnFill, PageBreaker};
use crate::area::{BlockArea, FlowArea, MainReference, PageViewport, RegionArea, SpanArea, Traits};
use crate::elements::{FootnoteRef, KnuthElement};
use crate::interface::{LayoutContext, LayoutEnvironment};
use crate::materialize::Materializer;
use crate::nodes::{ParagraphOptions, produce_children, stack_children};
use crate::position::Position;
use folio_fo::{LayoutMasterSet, PageSequence};
use folio_style::{BreakClass, Keep};
use folio_types::{FoId, Length, Rect};

/// The pages of one laid-out page-sequence.
#[derive(Debug, Clone, Default)]
pub struct SequenceLayout {
    pub pages: Vec<PageViewport>,
    /// Number the page after the last one would get.
    pub next_page_number: u32,
}

impl SequenceLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

pub struct LayoutEngine {
    env: LayoutEnvironment,
}

impl LayoutEngine {
    pub fn new(env: LayoutEnvironment) -> Self {
        Self { env }
    }

    pub fn environment(&self) -> &LayoutEnvironment {
        &self.env
    }

    /// Lays out `sequence`. Pages are numbered from the sequence's
    /// initial-page-number if it has one, otherwise from `first_page_number`.
    pub fn layout_sequence(
        &self,
        masters: &LayoutMasterSet,
        sequence: &PageSequence,
        first_page_number: u32,
    ) -> Result<SequenceLayout, LayoutError> {
        let start_number = sequence.initial_page_number.unwrap_or(first_page_number);

        // The first page's master decides the flow mapping and the IPD the
        // element lists are built for.
        let first_master = PageMasterSelector::new(masters, &sequence.master_reference)?.next_master(PageConditions {
            first: true,
            page_number: start_number,
            blank: false,
        })?;
        let first_region = PageRegion::from_master(first_master)?;
        if sequence.flow.flow_name != first_region.region_name {
            return Err(LayoutError::structural(
                format!("flow '{}'", sequence.flow.flow_name),
                format!(
                    "not mapped to the region-body '{}' of master '{}'",
                    first_region.region_name, first_master.master_name
                ),
            ));
        }
        let ipd = first_region.column_width();
        let elements = self.flow_elements(sequence, ipd)?;
        log::debug!(
            "page-sequence '{}': {} elements at ipd {}",
            sequence.master_reference,
            elements.len(),
            ipd
        );

        let config = &self.env.config;
        let mut breaker = PageBreaker::new(&elements, config.footnote_separator, config.step_limit(elements.len()));
        let mut selector = PageMasterSelector::new(masters, &sequence.master_reference)?;
        let mut materializer = Materializer::new();
        materializer.note_id(sequence.id.as_ref());

        let mut pages: Vec<PageViewport> = Vec::new();
        let mut page_number = start_number;
        let mut pending = BreakClass::Auto;
        loop {
            let class = pending.max_priority(breaker.leading_break_class());
            let wrong_parity = match class {
                BreakClass::EvenPage => page_number % 2 == 1,
                BreakClass::OddPage => page_number % 2 == 0,
                _ => false,
            };
            let conditions = PageConditions {
                first: pages.is_empty(),
                page_number,
                blank: wrong_parity,
            };
            let master = selector.next_master(conditions)?;
            let region = PageRegion::from_master(master)?;

            if wrong_parity {
                log::debug!("page {}: blank page inserted for {:?}", page_number, class);
                pages.push(page_viewport(&region, pages.len(), page_number, true, Vec::new(), None, Vec::new()));
                page_number += 1;
                pending = BreakClass::Auto;
                continue;
            }
            pending = BreakClass::Auto;

            if region.column_width() != ipd {
                log::warn!(
                    "page {}: master '{}' has column width {} but content was laid out at {}",
                    page_number,
                    master.master_name,
                    region.column_width(),
                    ipd
                );
            }

            let mut flows = Vec::with_capacity(region.column_count);
            let mut notes: Vec<FootnoteRef> = Vec::new();
            for column in 0..region.column_count {
                let reserved = if notes.is_empty() {
                    0
                } else {
                    config.footnote_separator + notes.iter().map(|n| n.length).sum::<Length>()
                };
                let Some(fill) = breaker.next_column(region.rect.height - reserved, !notes.is_empty())? else {
                    break;
                };
                flows.push(self.column_area(&mut materializer, &elements, &fill, &region, column));
                notes.extend(fill.footnotes);
                if fill.break_class.is_page_level() {
                    pending = fill.break_class;
                    break;
                }
            }

            let footnotes = if notes.is_empty() {
                None
            } else {
                let (areas, height) = materializer.footnotes(&notes, region.rect.width, config.footnote_separator);
                let mut area = BlockArea::new(
                    Rect::new(0, region.rect.height - height, region.rect.width, height),
                    Traits::new(),
                );
                area.children = areas;
                Some(area)
            };
            log::debug!(
                "page {}: master '{}', {} columns, {} footnotes",
                page_number,
                master.master_name,
                flows.len(),
                notes.len()
            );
            pages.push(page_viewport(
                &region,
                pages.len(),
                page_number,
                false,
                flows,
                footnotes,
                materializer.take_ids(),
            ));
            page_number += 1;

            if breaker.is_finished() {
                break;
            }
        }

        Ok(SequenceLayout {
            pages,
            next_page_number: page_number,
        })
    }

    /// The element list of the whole flow.
    fn flow_elements(&self, sequence: &PageSequence, ipd: Length) -> Result<Vec<KnuthElement>, LayoutError> {
        let ctx = LayoutContext::new(ipd);
        let options = ParagraphOptions {
            widows: self.env.config.default_widows,
            orphans: self.env.config.default_orphans,
        };
        let children = produce_children(&sequence.flow.children, &ctx, &self.env, &options)?;
        let body = stack_children(children, Keep::default());
        let mut elements = Vec::with_capacity(body.elements.len() + 1);
        if !body.break_before.is_auto() {
            elements.push(KnuthElement::forced_break(body.break_before, Position::None));
        }
        elements.extend(body.elements);
        Ok(elements)
    }

    fn column_area(
        &self,
        materializer: &mut Materializer,
        elements: &[KnuthElement],
        fill: &ColumnFill,
        region: &PageRegion,
        column: usize,
    ) -> FlowArea {
        if fill.overflow {
            log::warn!(
                "column {} overflows: {} of content in {} of space",
                column,
                fill.height,
                region.rect.height
            );
        }
        FlowArea {
            rect: Rect::new(region.column_x(column), 0, region.column_width(), region.rect.height),
            children: materializer.column(&elements[fill.range.clone()], region.column_width()),
        }
    }
}

fn page_viewport(
    region: &PageRegion,
    page_index: usize,
    page_number: u32,
    blank: bool,
    flows: Vec<FlowArea>,
    footnotes: Option<BlockArea>,
    ids: Vec<FoId>,
) -> PageViewport {
    PageViewport {
        page_index,
        page_number,
        master_name: region.master_name.clone(),
        width: region.page_width,
        height: region.page_height,
        blank,
        region_body: RegionArea {
            region_name: region.region_name.clone(),
            rect: region.rect,
            main: MainReference {
                spans: vec![SpanArea {
                    rect: Rect::new(0, 0, region.rect.width, region.rect.height),
                    flows,
                }],
            },
            footnotes,
        },
        ids,
    }
}
