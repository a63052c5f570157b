//! Stepping state of one cell while its row group is broken into steps.
//!
//! A cell keeps three snapshots: the last step included in the table, the
//! step it offers next, and the one after that. The third lets the cell
//! grow its next step cheaply when the row is going to reach further anyway.

use super::CellLayout;
use super::cell_part::CellPart;
use crate::algorithms::step::scan_to_break;
use crate::element_list::content_length;
use crate::elements::KnuthElement;
use folio_style::{BreakClass, Keep};
use folio_types::Length;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Step {
    /// Last element included, `None` before the first element.
    end: Option<usize>,
    /// Index the following chunk starts at.
    resume: usize,
    /// Included length, counted from the top of the row group.
    content_length: Length,
    /// `content_length` plus the cell's border and padding and the penalty.
    total_length: Length,
    penalty_length: Length,
    penalty_value: i32,
    break_class: BreakClass,
    cond_before: Length,
}

impl Step {
    fn at(content_length: Length) -> Self {
        Self {
            content_length,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActiveCell<'a> {
    index: usize,
    elements: &'a [KnuthElement],
    last: Option<usize>,
    end_row: usize,
    cell_keep_with_next: Keep,
    keep_with_next: Keep,
    padding_before_normal: Length,
    padding_before_leading: Length,
    padding_after_normal: Length,
    padding_after_trailing: Length,
    before_leading_border: Length,
    before_rest_border: Length,
    after_rest_border: Length,
    after_trailing_border: Length,
    after_normal_border: Length,
    bp_before_normal: Length,
    bp_before_leading: Length,
    bp_after_normal: Length,
    bp_after_trailing: Length,
    previous: Step,
    next: Step,
    after_next: Step,
    /// The next step was taken by the last `signal_next_step`.
    included: bool,
    included_length: Length,
    total_length: Length,
    remaining_length: Length,
    span_index: usize,
    last_cell_part: bool,
}

impl<'a> ActiveCell<'a> {
    /// Starts stepping `cell` (index `index` in its section). Lengths are
    /// measured from the top of the row group; `previous_rows_length` is the
    /// height of the group's rows above the cell.
    pub fn new(index: usize, cell: &'a CellLayout, previous_rows_length: Length) -> Self {
        let b = &cell.borders;
        let padding_before_normal = cell.padding_before.resolve(false);
        let padding_before_leading = cell.padding_before.resolve(true);
        let padding_after_normal = cell.padding_after.resolve(false);
        let padding_after_trailing = cell.padding_after.resolve(true);
        let elements = cell.elements.as_slice();
        let total_length = previous_rows_length + content_length(elements);

        let mut active = Self {
            index,
            elements,
            last: elements.len().checked_sub(1),
            end_row: cell.last_row(),
            cell_keep_with_next: cell.keep_with_next,
            keep_with_next: Keep::AUTO,
            padding_before_normal,
            padding_before_leading,
            padding_after_normal,
            padding_after_trailing,
            before_leading_border: b.before_leading,
            before_rest_border: b.before_rest,
            after_rest_border: b.after_rest,
            after_trailing_border: b.after_trailing,
            after_normal_border: b.after_normal,
            bp_before_normal: padding_before_normal + b.before_normal,
            bp_before_leading: padding_before_leading + b.before_rest,
            bp_after_normal: padding_after_normal + b.after_normal,
            bp_after_trailing: padding_after_trailing + b.after_rest,
            previous: Step::at(previous_rows_length),
            next: Step::at(previous_rows_length),
            after_next: Step::at(previous_rows_length),
            included: false,
            included_length: 0,
            total_length,
            remaining_length: total_length - previous_rows_length,
            span_index: 0,
            last_cell_part: false,
        };
        active.goto_next_legal_break();
        active.next = active.after_next;
        if active.after_next.end != active.last {
            active.goto_next_legal_break();
        }
        active
    }

    /// Moves `after_next` on to the following legal break.
    fn goto_next_legal_break(&mut self) {
        let step = &mut self.after_next;
        step.penalty_length = 0;
        step.penalty_value = 0;
        step.cond_before = 0;
        step.break_class = BreakClass::Auto;
        if let Some(scan) = scan_to_break(self.elements, step.resume) {
            step.end = Some(scan.end);
            step.resume = scan.next_start();
            step.content_length += scan.content_length;
            step.cond_before = scan.cond_before;
            step.penalty_length = scan.penalty_length;
            step.penalty_value = scan.penalty_value;
            step.break_class = scan.break_class;
        }
        step.total_length =
            self.bp_before_normal + step.content_length + step.penalty_length + self.bp_after_trailing;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The smallest step at which the cell shows some content.
    pub fn first_step(&self) -> Length {
        self.next.total_length
    }

    /// The step at which the cell ends with its normal after border.
    pub fn last_step(&self) -> Length {
        self.bp_before_normal + self.total_length + self.padding_after_normal + self.after_normal_border
    }

    /// The step this cell offers next, `None` once all content is included.
    /// Calling it again before `signal_next_step` returns the same step.
    pub fn next_step(&mut self) -> Option<Length> {
        if self.included {
            self.previous = self.next;
            if self.next.end == self.last {
                return None;
            }
            self.next = self.after_next;
            self.included = false;
            if self.after_next.end != self.last {
                self.goto_next_legal_break();
            }
        }
        Some(self.next.total_length)
    }

    /// Grows the next step while the step after it still fits in `limit`.
    fn increase_current_step(&mut self, limit: Length) {
        if self.next.end == self.last {
            return;
        }
        while self.after_next.total_length <= limit && self.next.break_class.is_auto() {
            let cond_before = self.next.cond_before;
            if self.next != self.after_next {
                self.included = false;
            }
            self.next = self.after_next;
            self.next.cond_before = cond_before;
            if self.after_next.end == self.last {
                break;
            }
            self.goto_next_legal_break();
        }
    }

    /// The row's first step is `first_step`: no break happens before it, so
    /// the cell may include everything up to it.
    pub fn signal_row_first_step(&mut self, first_step: Length) {
        self.increase_current_step(first_step);
        log::trace!("cell {}: row first step {} -> next {}", self.index, first_step, self.next.total_length);
    }

    pub fn signal_row_last_step(&mut self, last_step: Length) {
        self.increase_current_step(last_step);
        log::trace!("cell {}: row last step {} -> next {}", self.index, last_step, self.next.total_length);
    }

    /// Tells the cell the step chosen for the row group. Returns the break
    /// class when the cell's included content ends on a forced break.
    pub fn signal_next_step(&mut self, min_step: Length) -> BreakClass {
        if self.next.total_length <= min_step {
            self.included = true;
            self.included_length = self.next.content_length;
            self.remaining_length = self.total_length - self.included_length - self.after_next.cond_before;
            self.next.break_class
        } else {
            BreakClass::Auto
        }
    }

    /// Length still needed by the cell after the included content, with
    /// the borders and padding of a continued part.
    pub fn remaining_length(&self) -> Length {
        if self.included && self.next.end == self.last {
            0
        } else {
            self.bp_before_leading + self.remaining_length + self.bp_after_normal
        }
    }

    pub fn penalty_value(&self) -> i32 {
        if self.included {
            self.next.penalty_value
        } else {
            self.previous.penalty_value
        }
    }

    pub fn keep_with_next(&self) -> Keep {
        self.keep_with_next
    }

    /// The cell runs on into the next row.
    pub fn next_row_starts(&mut self) {
        self.span_index += 1;
        self.next.total_length -= self.bp_after_trailing;
        self.after_next.total_length -= self.bp_after_trailing;
        self.bp_after_trailing = self.padding_after_trailing + self.after_rest_border;
        self.next.total_length += self.bp_after_trailing;
        self.after_next.total_length += self.bp_after_trailing;
    }

    /// The current row is finished.
    pub fn end_row(&mut self, row: usize) {
        if self.ends_on_row(row) {
            self.next.total_length -= self.bp_after_trailing;
            self.bp_after_trailing = self.padding_after_normal + self.after_trailing_border;
            self.next.total_length += self.bp_after_trailing;
            self.last_cell_part = true;
        } else {
            // A part continuing on the next page starts with the rest border.
            self.bp_before_leading = self.padding_before_leading + self.before_rest_border;
        }
    }

    pub fn ends_on_row(&self, row: usize) -> bool {
        row == self.end_row
    }

    /// True if the cell is complete once `step` is taken.
    pub fn finishes(&self, step: Length) -> bool {
        self.next.total_length <= step && self.next.end == self.last
    }

    pub fn is_finished(&self) -> bool {
        self.included && self.next.end == self.last
    }

    /// The content this cell adds in the current step.
    pub fn create_cell_part(&mut self) -> CellPart {
        if self.next.end == self.last {
            self.keep_with_next = self.cell_keep_with_next;
        }
        let start = self.previous.resume;
        let bp_before_first = if start == 0 {
            self.before_leading_border + self.padding_before_normal
        } else {
            self.bp_before_leading
        };
        let mut part = CellPart {
            cell: self.index,
            start,
            end: None,
            last_part: self.last_cell_part && self.previous.end == self.last,
            cond_before: 0,
            length: 0,
            penalty_length: self.previous.penalty_length,
            bp_before_normal: self.bp_before_normal,
            bp_before_first,
            bp_after_normal: self.bp_after_normal,
            bp_after_last: self.bp_after_trailing,
        };
        if self.included && start < self.elements.len() {
            part.end = self.next.end;
            part.last_part = self.last_cell_part && self.next.end == self.last;
            part.cond_before = self.next.cond_before;
            part.length = self.next.content_length - self.next.cond_before - self.previous.content_length;
            part.penalty_length = self.next.penalty_length;
        }
        part
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::table::collapse::CellBorders;
    use crate::position::Position;
    use folio_style::INFINITE;

    fn cell(elements: Vec<KnuthElement>) -> CellLayout {
        CellLayout {
            elements,
            ..CellLayout::default()
        }
    }

    fn boxes_with_breaks(heights: &[Length]) -> Vec<KnuthElement> {
        let mut out = Vec::new();
        for (i, h) in heights.iter().enumerate() {
            if i > 0 {
                out.push(KnuthElement::penalty(0, 0, BreakClass::Auto, Position::None));
            }
            out.push(KnuthElement::new_box(*h, Position::None));
        }
        out
    }

    #[test]
    fn test_first_step_and_lookahead() {
        let layout = cell(boxes_with_breaks(&[50, 70]));
        let mut active = ActiveCell::new(0, &layout, 0);
        assert_eq!(active.first_step(), 50);
        assert_eq!(active.next_step(), Some(50));
        // Re-asking without signalling does not move the cell.
        assert_eq!(active.next_step(), Some(50));
        assert_eq!(active.signal_next_step(50), BreakClass::Auto);
        assert_eq!(active.remaining_length(), 70);
        assert_eq!(active.next_step(), Some(120));
        active.signal_next_step(120);
        assert!(active.is_finished());
        assert_eq!(active.remaining_length(), 0);
        assert_eq!(active.next_step(), None);
    }

    #[test]
    fn test_row_first_step_absorbs_only_fitting_breaks() {
        // Breaks at 50 and 120; the row reaches 80.
        let layout = cell(boxes_with_breaks(&[50, 70]));
        let mut active = ActiveCell::new(0, &layout, 0);
        active.signal_row_first_step(80);
        assert_eq!(active.next_step(), Some(50));

        let layout = cell(boxes_with_breaks(&[50, 20, 40]));
        let mut active = ActiveCell::new(0, &layout, 0);
        active.signal_row_first_step(80);
        assert_eq!(active.next_step(), Some(70));
    }

    #[test]
    fn test_cell_parts_cover_content() {
        let layout = cell(boxes_with_breaks(&[10, 20, 30]));
        let mut active = ActiveCell::new(0, &layout, 0);
        let mut total = 0;
        let mut ends = Vec::new();
        while let Some(step) = active.next_step() {
            active.signal_next_step(step);
            let part = active.create_cell_part();
            total += part.length;
            ends.push(part.end);
        }
        assert_eq!(total, 60);
        assert_eq!(ends, vec![Some(1), Some(3), Some(4)]);
    }

    #[test]
    fn test_forced_break_is_reported() {
        let layout = cell(vec![
            KnuthElement::new_box(10, Position::None),
            KnuthElement::forced_break(BreakClass::Page, Position::None),
            KnuthElement::new_box(10, Position::None),
        ]);
        let mut active = ActiveCell::new(0, &layout, 0);
        let step = active.next_step().unwrap();
        assert_eq!(active.signal_next_step(step), BreakClass::Page);
        assert_eq!(active.penalty_value(), -INFINITE);
    }

    #[test]
    fn test_unclassed_forced_break_stops_the_cell() {
        let layout = cell(vec![
            KnuthElement::new_box(10, Position::None),
            KnuthElement::penalty(0, -INFINITE, BreakClass::Auto, Position::None),
            KnuthElement::new_box(10, Position::None),
            KnuthElement::penalty(0, 0, BreakClass::Auto, Position::None),
            KnuthElement::new_box(10, Position::None),
        ]);
        let mut active = ActiveCell::new(0, &layout, 0);
        active.signal_row_first_step(100);
        assert_eq!(active.next_step(), Some(10));
        assert_eq!(active.signal_next_step(10), BreakClass::Column);
        assert_eq!(active.penalty_value(), -INFINITE);
    }

    #[test]
    fn test_spanning_cell_switches_to_trailing_border_on_last_row() {
        let layout = CellLayout {
            row: 0,
            row_span: 2,
            borders: CellBorders {
                before_normal: 1_000,
                before_rest: 250,
                after_rest: 500,
                after_trailing: 2_000,
                ..CellBorders::default()
            },
            elements: vec![KnuthElement::new_box(10, Position::None)],
            ..CellLayout::default()
        };
        let mut active = ActiveCell::new(0, &layout, 0);
        assert_eq!(active.next_step(), Some(1_000 + 10 + 500));

        active.next_row_starts();
        assert_eq!(active.next_step(), Some(1_000 + 10 + 500));
        active.end_row(0);
        assert!(!active.ends_on_row(0));
        assert_eq!(active.next_step(), Some(1_000 + 10 + 500));
        assert_eq!(active.remaining_length(), 250 + 10);

        active.end_row(1);
        assert_eq!(active.next_step(), Some(1_000 + 10 + 2_000));
        assert!(active.finishes(3_010));
        active.signal_next_step(3_010);
        let part = active.create_cell_part();
        assert_eq!(part.bp_after_last, 2_000);
        assert!(part.is_last_part());
    }

    #[test]
    fn test_empty_cell_is_finished_at_once() {
        let layout = cell(Vec::new());
        let mut active = ActiveCell::new(0, &layout, 0);
        assert_eq!(active.first_step(), 0);
        assert!(active.finishes(0));
        active.signal_next_step(0);
        assert!(active.create_cell_part().is_empty());
        assert_eq!(active.next_step(), None);
    }
}
