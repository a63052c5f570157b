//! Tables.
//!
//! Each section is placed on a grid, its rows are measured, and each row
//! group is broken into steps by the [`stepper::TableStepper`]. The header
//! and footer become one box each; their lengths are carried by every break
//! inside the body so they can be repeated on the following page.

pub mod active_cell;
pub mod cell_part;
pub mod collapse;
pub mod grid;
pub mod solver;
pub mod stepper;

use self::cell_part::CellPart;
use self::collapse::{CellBorders, resolve_cell_borders};
use self::grid::SectionGrid;
use self::solver::TableSolver;
use self::stepper::{BreakExtras, StepperItem, TableStepper};
use crate::LayoutError;
use crate::element_list::content_length;
use crate::elements::{KnuthElement, KnuthPenalty};
use crate::interface::{ElementProducer, LayoutContext, LayoutEnvironment};
use crate::nodes::block::{BlockShell, paragraph_options};
use crate::nodes::filler::apply_explicit_height;
use crate::nodes::{BlockElements, ParagraphOptions, produce_children, seal_content, stack_children};
use crate::position::{Position, TablePosition};
use folio_fo::{RowProps, Table, TableSection};
use folio_style::{BorderModel, BorderPadding, BreakClass, CondLength, INFINITE, Keep, LengthRange};
use folio_types::{Color, FoId, Length, MinOptMax};
use std::ops::Range;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionId {
    Header,
    Footer,
    Body(usize),
}

#[derive(Debug, Clone, Default)]
pub struct RowLayout {
    pub id: Option<FoId>,
    /// Resolved height: the explicit height extended to fit the cells.
    pub height: MinOptMax,
    /// Height asked for by the row's block-progression-dimension.
    pub explicit: MinOptMax,
    pub keep_together: Keep,
    pub keep_with_next: Keep,
    pub keep_with_previous: Keep,
    pub break_before: BreakClass,
    pub break_after: BreakClass,
    pub background: Option<Color>,
}

impl RowLayout {
    fn from_props(props: &RowProps) -> Self {
        let explicit = props.block_progression_dimension.to_min_opt_max();
        Self {
            id: props.id.clone(),
            height: explicit,
            explicit,
            keep_together: Keep::from(props.keep_together),
            keep_with_next: Keep::from(props.keep_with_next),
            keep_with_previous: Keep::from(props.keep_with_previous),
            break_before: props.break_before,
            break_after: props.break_after,
            background: props.background_color,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CellLayout {
    pub id: Option<FoId>,
    pub row: usize,
    pub row_span: usize,
    pub col: usize,
    pub col_span: usize,
    /// Offset of the cell from the table's content start edge.
    pub x: Length,
    pub width: Length,
    pub borders: CellBorders,
    pub padding_before: CondLength,
    pub padding_after: CondLength,
    pub padding_start: Length,
    pub padding_end: Length,
    pub background: Option<Color>,
    pub block_progression_dimension: LengthRange,
    /// Content elements, padded to the explicit height.
    pub elements: Vec<KnuthElement>,
    /// Length of the content before padding.
    pub content_length: Length,
    pub keep_with_next: Keep,
    pub keep_with_previous: Keep,
}

impl CellLayout {
    pub fn last_row(&self) -> usize {
        self.row + self.row_span.max(1) - 1
    }

    pub fn content_x(&self) -> Length {
        self.x + self.borders.start_width + self.padding_start
    }

    pub fn content_width(&self) -> Length {
        (self.width - self.borders.start_width - self.padding_start - self.borders.end_width - self.padding_end)
            .max(0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SectionLayout {
    pub rows: Vec<RowLayout>,
    pub cells: Vec<CellLayout>,
    pub groups: Vec<Range<usize>>,
}

impl SectionLayout {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A laid out table, shared by the positions of all its elements.
#[derive(Debug, Default)]
pub struct TableLayout {
    pub id: Option<FoId>,
    pub model: BorderModel,
    pub column_widths: Vec<Length>,
    pub header: Option<SectionLayout>,
    pub footer: Option<SectionLayout>,
    pub body: Vec<SectionLayout>,
    pub header_steps: Vec<TableStep>,
    pub footer_steps: Vec<TableStep>,
    pub header_height: Length,
    pub footer_height: Length,
    pub omit_header_at_break: bool,
    pub omit_footer_at_break: bool,
}

impl TableLayout {
    pub fn section(&self, id: SectionId) -> Option<&SectionLayout> {
        match id {
            SectionId::Header => self.header.as_ref(),
            SectionId::Footer => self.footer.as_ref(),
            SectionId::Body(i) => self.body.get(i),
        }
    }

    pub fn width(&self) -> Length {
        self.column_widths.iter().sum()
    }

    /// Header repeated at the top of a page the body continues onto.
    pub fn repeats_header(&self) -> bool {
        !self.omit_header_at_break && !self.header_steps.is_empty()
    }

    /// Footer repeated at the bottom of a page the body continues past.
    pub fn repeats_footer(&self) -> bool {
        !self.omit_footer_at_break && !self.footer_steps.is_empty()
    }
}

/// One step of a row group: the part each active cell adds.
#[derive(Debug, Clone)]
pub struct TableStep {
    pub section: SectionId,
    pub group: usize,
    /// Row whose cells were being finished when the step was taken.
    pub row: usize,
    /// First step taken on `row`.
    pub row_start: bool,
    /// `row` is complete once this step is taken.
    pub row_finished: bool,
    pub parts: Vec<CellPart>,
    pub first_in_group: bool,
    pub last_in_group: bool,
}

#[derive(Debug)]
pub struct TableContentPosition {
    pub table: Arc<TableLayout>,
    pub step: TableStep,
}

/// Builds the section layouts of one table.
struct SectionBuilder<'a> {
    table: &'a Table,
    column_widths: &'a [Length],
    column_count: usize,
    ctx: &'a LayoutContext,
    env: &'a LayoutEnvironment,
    options: ParagraphOptions,
}

impl SectionBuilder<'_> {
    fn build(&self, section: &TableSection, grid: &SectionGrid<'_>) -> Result<SectionLayout, LayoutError> {
        let mut rows: Vec<RowLayout> = section.rows.iter().map(|r| RowLayout::from_props(&r.props)).collect();
        let mut cells = Vec::with_capacity(grid.cells.len());
        for (index, placed) in grid.cells.iter().enumerate() {
            let cell = placed.cell;
            let borders = resolve_cell_borders(
                self.table.border_collapse,
                &self.table.props.border_padding,
                self.table.border_separation,
                grid,
                self.column_count,
                index,
            );
            let column_width = |c: usize| self.column_widths.get(c).copied().unwrap_or(0);
            let x: Length = (0..placed.col).map(column_width).sum();
            let width: Length = placed.columns().map(column_width).sum();
            let mut layout = CellLayout {
                id: cell.id.clone(),
                row: placed.row,
                row_span: placed.row_span,
                col: placed.col,
                col_span: placed.col_span,
                x,
                width,
                borders,
                padding_before: cell.border_padding.padding_before,
                padding_after: cell.border_padding.padding_after,
                padding_start: cell.border_padding.padding_start,
                padding_end: cell.border_padding.padding_end,
                background: cell.background_color,
                block_progression_dimension: cell.block_progression_dimension,
                ..CellLayout::default()
            };
            let cell_ctx = self.ctx.with_ipd(layout.content_width());
            let keep = Keep::from(cell.keep_together);
            let children = produce_children(&cell.children, &cell_ctx, self.env, &self.options)?;
            let content = seal_content(stack_children(children, keep), keep);
            layout.content_length = content_length(&content.elements);
            layout.keep_with_next = content.keep_with_next;
            layout.keep_with_previous = content.keep_with_previous;
            layout.elements = content.elements;
            cells.push(layout);
        }

        let groups = grid.row_groups();
        for group in &groups {
            compute_row_heights(&mut rows, &cells, group.clone());
        }
        for cell in cells.iter_mut() {
            let bpd = cell.block_progression_dimension.to_min_opt_max();
            let row = &rows[cell.row].explicit;
            let min = bpd.min().max(row.min());
            let opt = min.max(bpd.opt().max(row.opt()));
            apply_explicit_height(&mut cell.elements, min, opt);
        }
        Ok(SectionLayout { rows, cells, groups })
    }
}

/// Row heights of one row group: a row is as tall as its explicit height and
/// as tall as the cells ending on it need, less the rows they span above.
fn compute_row_heights(rows: &mut [RowLayout], cells: &[CellLayout], group: Range<usize>) {
    for r in group {
        let explicit = rows[r].explicit;
        let mut height = explicit;
        for cell in cells.iter().filter(|c| c.last_row() == r) {
            let bpd = &cell.block_progression_dimension;
            let mut effective = bpd.optimum.or(bpd.minimum).unwrap_or(0);
            if cell.row == r {
                effective = effective.max(explicit.opt());
            }
            effective = effective.max(cell.content_length);
            let mut needed = effective
                + cell.padding_before.resolve(false)
                + cell.padding_after.resolve(false)
                + cell.borders.before_normal
                + cell.borders.after_normal;
            for prev in cell.row..r {
                needed -= rows[prev].height.opt();
            }
            if needed > height.min() {
                height = height.extend_minimum(needed);
            }
        }
        log::trace!("row {} height {:?}", r, height);
        rows[r].height = height;
    }
}

/// Steps every row group of a section.
fn step_section(
    section: &SectionLayout,
    id: SectionId,
    keep: Keep,
    extras: BreakExtras,
    env: &LayoutEnvironment,
) -> Result<Vec<Vec<StepperItem>>, LayoutError> {
    let element_count: usize = section.cells.iter().map(|c| c.elements.len()).sum();
    let limit = env.config.step_limit(element_count + section.rows.len());
    (0..section.groups.len())
        .map(|g| TableStepper::new(section, id, g, keep, extras).run(limit))
        .collect()
}

/// Steps a header or footer, which is placed whole.
fn step_whole_section(
    section: Option<&SectionLayout>,
    id: SectionId,
    keep: Keep,
    env: &LayoutEnvironment,
) -> Result<(Vec<TableStep>, Length), LayoutError> {
    let Some(section) = section else {
        return Ok((Vec::new(), 0));
    };
    let mut steps = Vec::new();
    let mut height = 0;
    for item in step_section(section, id, keep, BreakExtras::default(), env)?.into_iter().flatten() {
        match item {
            StepperItem::Step { length, step, .. } => {
                height += length;
                steps.push(step);
            }
            StepperItem::Glue(length) => height += length,
            StepperItem::Break { .. } => {}
        }
    }
    Ok((steps, height))
}

fn last_penalty_mut(elements: &mut [KnuthElement]) -> Option<&mut KnuthPenalty> {
    match elements.last_mut() {
        Some(KnuthElement::Penalty(p)) => Some(p),
        _ => None,
    }
}

impl ElementProducer for Table {
    fn produce_elements(
        &self,
        ctx: &LayoutContext,
        env: &LayoutEnvironment,
    ) -> Result<BlockElements, LayoutError> {
        let mut props = self.props.clone();
        if self.border_collapse == BorderModel::Collapse {
            props.border_padding = BorderPadding::default();
        }
        let shell = BlockShell::from_props(&props, "table", ctx);
        let inner_ctx = shell.content_context(ctx, &props);

        let header_grid = self.header.as_ref().map(SectionGrid::place);
        let footer_grid = self.footer.as_ref().map(SectionGrid::place);
        let body_grids: Vec<SectionGrid<'_>> = self.body.iter().map(SectionGrid::place).collect();
        let declared: usize = self.columns.iter().map(|c| c.number_columns_repeated.max(1)).sum();
        let column_count = header_grid
            .iter()
            .chain(footer_grid.iter())
            .chain(body_grids.iter())
            .map(|g| g.column_count)
            .fold(declared, usize::max);
        let column_widths = TableSolver::new(&self.columns).resolve_widths(inner_ctx.ipd, column_count);
        log::debug!("table with {} columns {:?}", column_count, column_widths);

        let builder = SectionBuilder {
            table: self,
            column_widths: &column_widths,
            column_count,
            ctx: &inner_ctx,
            env,
            options: paragraph_options(&self.props, env),
        };
        let header = match (&self.header, &header_grid) {
            (Some(s), Some(g)) => Some(builder.build(s, g)?),
            _ => None,
        };
        let footer = match (&self.footer, &footer_grid) {
            (Some(s), Some(g)) => Some(builder.build(s, g)?),
            _ => None,
        };
        let body = self
            .body
            .iter()
            .zip(&body_grids)
            .map(|(s, g)| builder.build(s, g))
            .collect::<Result<Vec<_>, _>>()?;

        let keep = shell.keep_together;
        let (header_steps, header_height) = step_whole_section(header.as_ref(), SectionId::Header, keep, env)?;
        let (footer_steps, footer_height) = step_whole_section(footer.as_ref(), SectionId::Footer, keep, env)?;
        let extras = BreakExtras {
            header: if self.table_omit_header_at_break { 0 } else { header_height },
            footer: if self.table_omit_footer_at_break { 0 } else { footer_height },
        };
        let body_items = body
            .iter()
            .enumerate()
            .map(|(i, s)| step_section(s, SectionId::Body(i), keep, extras, env))
            .collect::<Result<Vec<_>, _>>()?;

        let table = Arc::new(TableLayout {
            id: self.props.id.clone(),
            model: self.border_collapse,
            column_widths,
            header,
            footer,
            body,
            header_steps,
            footer_steps,
            header_height,
            footer_height,
            omit_header_at_break: self.table_omit_header_at_break,
            omit_footer_at_break: self.table_omit_footer_at_break,
        });

        let mut inner = BlockElements::default();
        let mut elements = Vec::new();
        if !table.header_steps.is_empty() {
            elements.push(KnuthElement::new_box(
                header_height,
                Position::Table(TablePosition::Header(Arc::clone(&table))),
            ));
        }

        let mut previous_row: Option<&RowLayout> = None;
        for (section, groups) in table.body.iter().zip(body_items) {
            for (group, items) in section.groups.iter().zip(groups) {
                let first = &section.rows[group.start];
                match previous_row {
                    Some(prev) => {
                        let brk = prev.break_after.max_priority(first.break_before);
                        let between = prev.keep_with_next.compare(first.keep_with_previous).compare(keep);
                        if let Some(p) = last_penalty_mut(&mut elements) {
                            if !brk.is_auto() {
                                p.value = -INFINITE;
                                p.break_class = brk;
                            } else if !p.is_forced() && between.penalty() > p.value {
                                p.value = between.penalty();
                                p.break_class = between.break_class();
                            }
                        }
                    }
                    None => {
                        inner.break_before = first.break_before;
                        inner.keep_with_previous = first.keep_with_previous;
                    }
                }
                for item in items {
                    elements.push(match item {
                        StepperItem::Step { length, step, footnotes } => {
                            let position = Position::Table(TablePosition::Content(Arc::new(TableContentPosition {
                                table: Arc::clone(&table),
                                step,
                            })));
                            let mut el = KnuthElement::new_box(length, position);
                            if let KnuthElement::Box(b) = &mut el {
                                b.footnotes = footnotes;
                            }
                            el
                        }
                        StepperItem::Break {
                            width,
                            leading_width,
                            value,
                            break_class,
                        } => {
                            let mut el = KnuthElement::break_element(
                                Position::Table(TablePosition::Break(Arc::clone(&table))),
                                width,
                                value,
                                break_class,
                            );
                            if let KnuthElement::Penalty(p) = &mut el {
                                p.leading_width = leading_width;
                            }
                            el
                        }
                        StepperItem::Glue(length) => {
                            let position = Position::Table(TablePosition::Break(Arc::clone(&table)));
                            let mut el = KnuthElement::glue(length, 0, 0, position);
                            if let KnuthElement::Glue(g) = &mut el {
                                g.auxiliary = true;
                            }
                            el
                        }
                    });
                }
                previous_row = section.rows.get(group.end - 1);
            }
        }

        if let Some(last) = previous_row {
            if let Some(p) = last_penalty_mut(&mut elements) {
                if p.is_forced() {
                    inner.break_after = p.break_class;
                }
                elements.pop();
            }
            inner.break_after = inner.break_after.max_priority(last.break_after);
            inner.keep_with_next = last.keep_with_next;
        }

        if !table.footer_steps.is_empty() {
            elements.push(KnuthElement::new_box(
                footer_height,
                Position::Table(TablePosition::Footer(Arc::clone(&table))),
            ));
        }
        log::debug!(
            "table: {} elements, header {} footer {}",
            elements.len(),
            header_height,
            footer_height
        );
        inner.elements = elements;
        Ok(shell.wrap(inner))
    }
}
