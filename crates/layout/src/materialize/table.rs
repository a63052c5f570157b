//! Areas of the part of a table placed on one page.
//!
//! Row heights are recomputed from what each cell shows on the page: the
//! content of its parts plus the borders and padding that apply where the
//! parts landed. A row that lies wholly on the page keeps at least its
//! resolved height.

use super::{Item, Materializer, items, table_of, table_positions, trimmed};
use crate::area::{Area, BlockArea};
use crate::element_list::{ElementRange, content_length};
use crate::nodes::table::cell_part::CellPart;
use crate::nodes::table::{CellLayout, SectionId, SectionLayout, TableLayout, TableStep};
use crate::painting::box_painter::{BoxEdges, producer_traits};
use crate::position::TablePosition;
use folio_style::Border;
use folio_types::{Length, Rect};
use itertools::Itertools;

/// What one cell shows on the page.
struct CellFragment {
    cell: usize,
    range: ElementRange,
    first: CellPart,
    last: CellPart,
    in_first_step: bool,
    in_last_step: bool,
    starts: bool,
    ends: bool,
}

fn fragments(steps: &[&TableStep]) -> Vec<CellFragment> {
    let mut out: Vec<CellFragment> = Vec::new();
    let last_step = steps.len().saturating_sub(1);
    for (s, step) in steps.iter().enumerate() {
        for part in &step.parts {
            match out.iter_mut().find(|f| f.cell == part.cell) {
                Some(f) => {
                    f.range = f.range.union(part.range());
                    f.last = *part;
                    f.in_last_step = s == last_step;
                    f.ends |= part.is_last_part();
                }
                None => out.push(CellFragment {
                    cell: part.cell,
                    range: part.range(),
                    first: *part,
                    last: *part,
                    in_first_step: s == 0,
                    in_last_step: s == last_step,
                    starts: part.start == 0,
                    ends: part.is_last_part(),
                }),
            }
        }
    }
    out.sort_by_key(|f| f.cell);
    out
}

fn with_width(border: Border, width: Length) -> Border {
    Border {
        width: width.max(0),
        ..border
    }
}

/// Paints the steps of one row group that landed on the page.
struct GroupPainter<'a> {
    section: &'a SectionLayout,
    at_page_top: bool,
    at_page_bottom: bool,
}

impl GroupPainter<'_> {
    fn paint(&self, m: &mut Materializer, steps: &[&TableStep], x: Length, y: Length, out: &mut Vec<Area>) -> Length {
        let (Some(first), Some(last)) = (steps.first(), steps.last()) else {
            return 0;
        };
        let (r0, r1) = (first.row, last.row);
        let rows = &self.section.rows;
        let frags = fragments(steps);

        let heights_of = |f: &CellFragment| {
            let cell = &self.section.cells[f.cell];
            let first_on_page = self.at_page_top && f.in_first_step;
            let last_on_page = self.at_page_bottom && f.in_last_step;
            let before = f.first.border_padding_before(first_on_page);
            let after = f.last.border_padding_after(last_on_page);
            let content = if f.range.is_empty() {
                0
            } else {
                content_length(trimmed(&cell.elements, f.range))
            };
            (before, content, after)
        };

        let mut heights = vec![0; r1 + 1 - r0];
        for r in r0..=r1 {
            let row_start = steps.iter().any(|s| s.row == r && s.row_start);
            let row_finished = steps.iter().any(|s| s.row == r && s.row_finished);
            if row_start && row_finished {
                heights[r - r0] = rows[r].height.opt();
            }
            for f in &frags {
                let cell = &self.section.cells[f.cell];
                if cell.last_row().min(r1) != r {
                    continue;
                }
                let start = cell.row.max(r0);
                let (before, content, after) = heights_of(f);
                let above: Length = heights[start - r0..r - r0].iter().sum();
                heights[r - r0] = heights[r - r0].max(before + content + after - above);
            }
        }

        for f in &frags {
            let cell = &self.section.cells[f.cell];
            let start = cell.row.max(r0) - r0;
            let end = cell.last_row().min(r1) - r0;
            let cell_y = y + heights[..start].iter().sum::<Length>();
            let cell_height = heights[start..=end].iter().sum::<Length>();
            let (before, _, after) = heights_of(f);
            out.push(self.cell_area(m, cell, f, x, cell_y, cell_height, before, after));
        }
        let total = heights.iter().sum();
        log::trace!("rows {}..={} painted with height {}", r0, r1, total);
        total
    }

    #[allow(clippy::too_many_arguments)]
    fn cell_area(
        &self,
        m: &mut Materializer,
        cell: &CellLayout,
        f: &CellFragment,
        x: Length,
        y: Length,
        height: Length,
        before: Length,
        after: Length,
    ) -> Area {
        m.note_id(cell.id.as_ref());
        let b = &cell.borders;
        let padding_before = cell.padding_before.resolve(!f.starts);
        let padding_after = cell.padding_after.resolve(!f.ends);
        let edges = BoxEdges {
            border_before: with_width(b.before, before - padding_before - b.inset),
            border_after: with_width(b.after, after - padding_after - b.inset),
            border_start: with_width(b.start, b.start_width - b.inset),
            border_end: with_width(b.end, b.end_width - b.inset),
            padding_before,
            padding_after,
            padding_start: cell.padding_start,
            padding_end: cell.padding_end,
            background: cell.background.or(self.section.rows[cell.row].background),
        };
        let mut traits = producer_traits("table-cell", cell.id.as_ref(), f.starts, f.ends);
        edges.paint(&mut traits);

        let mut area = BlockArea::new(
            Rect::new(x + cell.x + b.inset, y + b.inset, cell.width - 2 * b.inset, height - 2 * b.inset),
            traits,
        );
        if !f.range.is_empty() {
            let content = trimmed(&cell.elements, f.range);
            let (children, _) = m.stack(
                &items(content),
                cell.content_x() - cell.x - b.inset,
                before - b.inset,
                cell.content_width(),
            );
            area.children = children;
        }
        Area::Block(area)
    }
}

/// Paints the given steps of `section`, group by group.
fn paint_section(
    m: &mut Materializer,
    section: &SectionLayout,
    steps: &[&TableStep],
    at_page_top: bool,
    at_page_bottom: bool,
    x: Length,
    y: Length,
    out: &mut Vec<Area>,
) -> Length {
    let mut cursor = y;
    let groups = steps.iter().chunk_by(|s| s.group);
    let groups: Vec<Vec<&TableStep>> = groups.into_iter().map(|(_, g)| g.copied().collect()).collect();
    let count = groups.len();
    for (i, group) in groups.iter().enumerate() {
        let painter = GroupPainter {
            section,
            at_page_top: at_page_top && i == 0,
            at_page_bottom: at_page_bottom && i + 1 == count,
        };
        cursor += painter.paint(m, group, x, cursor, out);
    }
    cursor - y
}

fn is_table_start(step: &TableStep) -> bool {
    step.section == SectionId::Body(0) && step.group == 0 && step.first_in_group
}

fn is_table_end(table: &TableLayout, step: &TableStep) -> bool {
    let last_section = table.body.len().saturating_sub(1);
    let last_group = table.body.last().map_or(0, |s| s.groups.len().saturating_sub(1));
    step.section == SectionId::Body(last_section) && step.group == last_group && step.last_in_group
}

/// Areas of the table positions in `group`, placed from `(x, y)`.
pub(super) fn table_fragment(m: &mut Materializer, group: &[Item<'_>], x: Length, y: Length) -> (Vec<Area>, Length) {
    let Some(table) = table_of(group) else {
        return (Vec::new(), 0);
    };
    m.note_id(table.id.as_ref());
    let mut has_header = false;
    let mut has_footer = false;
    let mut steps: Vec<&TableStep> = Vec::new();
    for position in table_positions(group) {
        match position {
            TablePosition::Header(_) => has_header = true,
            TablePosition::Footer(_) => has_footer = true,
            TablePosition::Content(c) => steps.push(&c.step),
            TablePosition::Break(_) => {}
        }
    }

    let mut out = Vec::new();
    let mut cursor = y;
    let header_steps: Vec<&TableStep> = table.header_steps.iter().collect();
    let footer_steps: Vec<&TableStep> = table.footer_steps.iter().collect();
    if let Some(header) = &table.header
        && (has_header || (!steps.is_empty() && table.repeats_header()))
    {
        cursor += paint_section(m, header, &header_steps, false, false, x, cursor, &mut out);
    }

    let continues_before = steps.first().is_some_and(|s| !is_table_start(s));
    let continues_after = steps.last().is_some_and(|s| !is_table_end(table, s));
    let sections = steps.iter().chunk_by(|s| s.section);
    let sections: Vec<(SectionId, Vec<&TableStep>)> =
        sections.into_iter().map(|(id, g)| (id, g.copied().collect())).collect();
    let count = sections.len();
    for (i, (id, section_steps)) in sections.iter().enumerate() {
        if let Some(section) = table.section(*id) {
            cursor += paint_section(
                m,
                section,
                section_steps,
                continues_before && i == 0,
                continues_after && i + 1 == count,
                x,
                cursor,
                &mut out,
            );
        }
    }

    if let Some(footer) = &table.footer
        && (has_footer || (!steps.is_empty() && table.repeats_footer()))
    {
        cursor += paint_section(m, footer, &footer_steps, false, false, x, cursor, &mut out);
    }
    log::debug!(
        "table fragment: {} body steps, header {}, footer {}, height {}",
        steps.len(),
        has_header,
        has_footer,
        cursor - y
    );
    (out, cursor - y)
}
