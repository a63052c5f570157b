//! Breaks a row group into steps.
//!
//! All cells of the active row are stepped together: each step is the
//! smallest length at which one of them reaches a legal break, and every
//! cell that fits includes its content up to that length. A row starts only
//! once the cells still running from the rows above have caught up with the
//! first step of the new row's cells.

use super::active_cell::ActiveCell;
use super::{SectionId, SectionLayout, TableStep};
use crate::LayoutError;
use crate::element_list::ElementRange;
use crate::elements::FootnoteRef;
use folio_style::{BreakClass, INFINITE, Keep};
use folio_types::Length;
use std::ops::Range;

#[derive(Debug, Clone)]
pub enum StepperItem {
    Step {
        length: Length,
        step: TableStep,
        footnotes: Vec<FootnoteRef>,
    },
    Break {
        width: Length,
        leading_width: Length,
        value: i32,
        break_class: BreakClass,
    },
    Glue(Length),
}

/// Lengths repeated at every break inside the body.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreakExtras {
    /// Footer closing the page before the break.
    pub footer: Length,
    /// Header opening the page after the break.
    pub header: Length,
}

pub struct TableStepper<'a> {
    section: &'a SectionLayout,
    section_id: SectionId,
    group_index: usize,
    group: Range<usize>,
    table_keep: Keep,
    extras: BreakExtras,
    active: Vec<ActiveCell<'a>>,
    next_active: Vec<ActiveCell<'a>>,
    active_row: usize,
    previous_rows_length: Length,
    row_first_step: Length,
    row_finished: bool,
    delaying: bool,
    row_start: bool,
    next_break_class: BreakClass,
}

impl<'a> TableStepper<'a> {
    pub fn new(
        section: &'a SectionLayout,
        section_id: SectionId,
        group_index: usize,
        table_keep: Keep,
        extras: BreakExtras,
    ) -> Self {
        let group = section.groups[group_index].clone();
        Self {
            section,
            section_id,
            group_index,
            active_row: group.start,
            group,
            table_keep,
            extras,
            active: Vec::new(),
            next_active: Vec::new(),
            previous_rows_length: 0,
            row_first_step: 0,
            row_finished: false,
            delaying: false,
            row_start: true,
            next_break_class: BreakClass::Auto,
        }
    }

    fn activate(&self, row: usize) -> Vec<ActiveCell<'a>> {
        self.section
            .cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.row == row)
            .map(|(i, c)| ActiveCell::new(i, c, self.previous_rows_length))
            .collect()
    }

    fn total_height(&self) -> Length {
        self.section.rows[self.group.clone()].iter().map(|r| r.height.opt()).sum()
    }

    /// The largest length any active cell still needs, plus the rows below.
    fn max_remaining_height(&self) -> Length {
        let rows = &self.section.rows;
        let mut max = 0;
        for cell in &self.active {
            let layout = &self.section.cells[cell.index()];
            let mut remain = cell.remaining_length();
            for row in rows.iter().take(layout.last_row() + 1).skip(self.active_row + 1) {
                remain -= row.height.opt();
            }
            max = max.max(remain);
        }
        max + rows[self.active_row + 1..self.group.end]
            .iter()
            .map(|r| r.height.opt())
            .sum::<Length>()
    }

    fn compute_min_step(&mut self) -> Option<Length> {
        self.active.iter_mut().filter_map(ActiveCell::next_step).min()
    }

    fn signal_row_first_step(&mut self) {
        let first = self.row_first_step;
        self.active.iter_mut().for_each(|c| c.signal_row_first_step(first));
    }

    fn signal_next_step(&mut self, step: Length) {
        for cell in self.active.iter_mut() {
            let class = cell.signal_next_step(step);
            self.next_break_class = self.next_break_class.max_priority(class);
        }
    }

    fn consider_row_last_step(&mut self, step: Length) {
        let row = self.active_row;
        self.row_finished = self
            .active
            .iter()
            .filter(|c| c.ends_on_row(row))
            .all(|c| c.finishes(step));
        if self.row_finished {
            let last_step = self
                .active
                .iter()
                .filter(|c| c.ends_on_row(row))
                .map(ActiveCell::last_step)
                .max()
                .unwrap_or(0);
            log::trace!("row {} finished at step {}, last step {}", row, step, last_step);
            for cell in self.active.iter_mut() {
                cell.end_row(row);
                if !cell.ends_on_row(row) {
                    cell.signal_row_last_step(last_step);
                }
            }
        }
    }

    fn prepare_next_row(&mut self) {
        self.previous_rows_length += self.section.rows[self.active_row].height.opt();
        self.next_active = self.activate(self.active_row + 1);
        self.row_first_step = self.next_active.iter().map(ActiveCell::first_step).max().unwrap_or(0);
    }

    fn switch_to_next_row(&mut self) {
        self.active_row += 1;
        self.row_start = true;
        self.active.iter_mut().for_each(ActiveCell::next_row_starts);
        self.active.append(&mut self.next_active);
    }

    fn first_step(&mut self) -> Length {
        self.active = self.activate(self.active_row);
        self.row_first_step = self.active.iter().map(ActiveCell::first_step).max().unwrap_or(0);
        self.signal_row_first_step();
        let step = self.compute_min_step().unwrap_or(0).max(self.row_first_step);
        self.signal_next_step(step);
        self.consider_row_last_step(step);
        step
    }

    fn next_step(&mut self) -> Option<Length> {
        self.next_break_class = BreakClass::Auto;
        if self.row_finished {
            if self.active_row + 1 >= self.group.end {
                return None;
            }
            self.row_finished = false;
            let row = self.active_row;
            self.active.retain(|c| !c.ends_on_row(row));
            self.delaying = true;
            self.prepare_next_row();
        }
        let mut min = self.compute_min_step();
        if self.delaying && min.is_none_or(|m| m >= self.row_first_step) {
            self.delaying = false;
            self.switch_to_next_row();
            self.signal_row_first_step();
            min = Some(self.compute_min_step().unwrap_or(0).max(self.row_first_step));
        }
        let Some(step) = min else {
            log::warn!("row {} cannot be finished; cells ran out of content", self.active_row);
            return None;
        };
        self.signal_next_step(step);
        self.consider_row_last_step(step);
        Some(step)
    }

    fn footnotes(&self, step: &TableStep) -> Vec<FootnoteRef> {
        step.parts
            .iter()
            .filter(|p| !p.is_empty())
            .flat_map(|p| {
                ElementRange::new(p.start, p.end).slice(&self.section.cells[p.cell].elements)
            })
            .flat_map(|el| el.footnotes().iter().cloned())
            .collect()
    }

    /// Steps the whole row group.
    pub fn run(mut self, limit: usize) -> Result<Vec<StepperItem>, LayoutError> {
        let total_height = self.total_height();
        let mut items = Vec::new();
        let mut cumulated = 0;
        let mut iterations = 0;
        let mut step = self.first_step();
        let mut first_in_group = true;

        loop {
            iterations += 1;
            if iterations > limit {
                return Err(LayoutError::StepExhaustion {
                    context: format!("table row group {}", self.group_index),
                    limit,
                });
            }
            let penalty_or_glue = step + self.max_remaining_height() - total_height;
            let mut box_length = step - cumulated - penalty_or_glue.max(0);
            if box_length < 0 {
                log::warn!("table step produced a negative box length {}; clamped to 0", box_length);
                box_length = 0;
            }
            cumulated += box_length + (-penalty_or_glue).max(0);

            let parts = self.active.iter_mut().map(ActiveCell::create_cell_part).collect();
            let table_step = TableStep {
                section: self.section_id,
                group: self.group_index,
                row: self.active_row,
                row_start: std::mem::take(&mut self.row_start),
                row_finished: self.row_finished,
                parts,
                first_in_group,
                last_in_group: false,
            };
            first_in_group = false;

            let mut keep = self.table_keep;
            let mut step_penalty = 0;
            for cell in &self.active {
                keep = keep.compare(cell.keep_with_next());
                step_penalty = step_penalty.max(cell.penalty_value());
            }
            let rows = &self.section.rows;
            let mut break_class = self.next_break_class;
            if !self.row_finished {
                keep = keep.compare(rows[self.active_row].keep_together);
            } else if self.active_row + 1 < self.group.end {
                let (current, next) = (&rows[self.active_row], &rows[self.active_row + 1]);
                keep = keep.compare(current.keep_with_next).compare(next.keep_with_previous);
                break_class = break_class
                    .max_priority(current.break_after)
                    .max_priority(next.break_before);
            }
            let (value, break_class) = if break_class.is_auto() {
                (keep.penalty().max(step_penalty), keep.break_class())
            } else {
                (-INFINITE, break_class)
            };
            let footnotes = self.footnotes(&table_step);
            log::trace!(
                "table step {}: box {} penalty {} value {}",
                step,
                box_length,
                penalty_or_glue,
                value
            );

            let next = self.next_step();
            let glue = (-penalty_or_glue).max(0);
            if next.is_none() {
                // The group ends here: what is left below the last break
                // belongs to the last box.
                box_length += glue;
            }
            items.push(StepperItem::Step {
                length: box_length,
                step: table_step,
                footnotes,
            });
            items.push(StepperItem::Break {
                width: penalty_or_glue.max(0) + self.extras.footer,
                leading_width: self.extras.header,
                value,
                break_class,
            });
            match next {
                Some(s) => {
                    if glue > 0 {
                        items.push(StepperItem::Glue(glue));
                    }
                    step = s;
                }
                None => break,
            }
        }

        if let Some(StepperItem::Step { step, .. }) =
            items.iter_mut().rev().find(|i| matches!(i, StepperItem::Step { .. }))
        {
            step.last_in_group = true;
        }
        Ok(items)
    }
}
