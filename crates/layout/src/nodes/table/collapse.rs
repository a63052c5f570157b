//! Border widths of table cells under the separate and collapsing border
//! models.
//!
//! In the collapsing model two neighbouring cells share one border: the
//! wider border wins, ties go to the stronger style. Between two rows the
//! upper cell takes the larger half of the width. On the outer edges of the
//! table the cell border is collapsed with the table's own border.

use super::grid::SectionGrid;
use folio_style::{Border, BorderModel, BorderPadding, Conditionality};
use folio_types::Length;
use std::ops::Range;

/// The border widths a cell uses on each edge, in the situations the
/// stepper distinguishes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CellBorders {
    /// Before edge between two rows, or at the top of the table.
    pub before_normal: Length,
    /// Before edge at the top of a page where the cell starts.
    pub before_leading: Length,
    /// Before edge at the top of a page the cell continues onto.
    pub before_rest: Length,
    pub after_normal: Length,
    /// After edge at the bottom of the cell's last row.
    pub after_trailing: Length,
    /// After edge at the bottom of a page the cell continues past.
    pub after_rest: Length,
    pub start_width: Length,
    pub end_width: Length,
    /// Half the border separation, included in every width above.
    pub inset: Length,
    pub before: Border,
    pub after: Border,
    pub start: Border,
    pub end: Border,
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn retained(conditionality: Conditionality, width: Length) -> Length {
    match conditionality {
        Conditionality::Retain => width,
        Conditionality::Discard => 0,
    }
}

/// Resolves the borders of cell `index` of `grid`.
pub fn resolve_cell_borders(
    model: BorderModel,
    table: &BorderPadding,
    separation: Length,
    grid: &SectionGrid<'_>,
    column_count: usize,
    index: usize,
) -> CellBorders {
    let placed = &grid.cells[index];
    let own = &placed.cell.border_padding;
    match model {
        BorderModel::Separate => {
            let half = separation / 2;
            CellBorders {
                before_normal: own.border_before_width(false) + half,
                before_leading: own.border_before_width(false) + half,
                before_rest: own.border_before_width(true) + half,
                after_normal: own.border_after_width(false) + half,
                after_trailing: own.border_after_width(false) + half,
                after_rest: own.border_after_width(true) + half,
                start_width: own.border_start.effective_width() + half,
                end_width: own.border_end.effective_width() + half,
                inset: half,
                before: own.border_before,
                after: own.border_after,
                start: own.border_start,
                end: own.border_end,
            }
        }
        BorderModel::Collapse => {
            let cols = placed.columns();
            let rows = placed.row..placed.row + placed.row_span;

            let leading = own.border_before.collapse(table.border_before);
            let (before, before_normal) = if placed.row == 0 {
                (leading, leading.effective_width())
            } else {
                let b = grid
                    .cells
                    .iter()
                    .filter(|o| o.last_row() + 1 == placed.row && overlaps(&o.columns(), &cols))
                    .fold(own.border_before, |b, o| b.collapse(o.cell.border_padding.border_after));
                (b, b.effective_width() / 2)
            };

            let trailing = own.border_after.collapse(table.border_after);
            let (after, after_normal) = if placed.last_row() + 1 >= grid.row_count {
                (trailing, trailing.effective_width())
            } else {
                let b = grid
                    .cells
                    .iter()
                    .filter(|o| o.row == placed.last_row() + 1 && overlaps(&o.columns(), &cols))
                    .fold(own.border_after, |b, o| b.collapse(o.cell.border_padding.border_before));
                let w = b.effective_width();
                (b, w - w / 2)
            };

            let (start, start_width) = if placed.col == 0 {
                let b = own.border_start.collapse(table.border_start);
                (b, b.effective_width())
            } else {
                let b = grid
                    .cells
                    .iter()
                    .filter(|o| o.col + o.col_span == placed.col)
                    .filter(|o| overlaps(&(o.row..o.row + o.row_span), &rows))
                    .fold(own.border_start, |b, o| b.collapse(o.cell.border_padding.border_end));
                (b, b.effective_width() / 2)
            };

            let (end, end_width) = if placed.col + placed.col_span >= column_count {
                let b = own.border_end.collapse(table.border_end);
                (b, b.effective_width())
            } else {
                let b = grid
                    .cells
                    .iter()
                    .filter(|o| o.col == placed.col + placed.col_span)
                    .filter(|o| overlaps(&(o.row..o.row + o.row_span), &rows))
                    .fold(own.border_end, |b, o| b.collapse(o.cell.border_padding.border_start));
                let w = b.effective_width();
                (b, w - w / 2)
            };

            CellBorders {
                before_normal,
                before_leading: leading.effective_width(),
                before_rest: retained(own.border_before_conditionality, leading.effective_width()),
                after_normal,
                after_trailing: trailing.effective_width(),
                after_rest: retained(own.border_after_conditionality, trailing.effective_width()),
                start_width,
                end_width,
                inset: 0,
                before,
                after,
                start,
                end,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_fo::{TableCell, TableRow, TableSection};

    fn bordered(width: Length) -> TableCell {
        let mut c = TableCell::new(Vec::new());
        c.border_padding = BorderPadding::uniform(Border::solid(width), 0);
        c
    }

    #[test]
    fn test_interior_border_split_between_rows() {
        let section = TableSection {
            rows: vec![
                TableRow::new(vec![bordered(1_000)]),
                TableRow::new(vec![bordered(3_001)]),
            ],
        };
        let grid = SectionGrid::place(&section);
        let table = BorderPadding::default();
        let upper = resolve_cell_borders(BorderModel::Collapse, &table, 0, &grid, 1, 0);
        let lower = resolve_cell_borders(BorderModel::Collapse, &table, 0, &grid, 1, 1);
        assert_eq!(upper.after_normal, 1_501);
        assert_eq!(lower.before_normal, 1_500);
        assert_eq!(upper.after_normal + lower.before_normal, 3_001);
        assert_eq!(upper.before_normal, 1_000);
        assert_eq!(upper.after_trailing, 1_000);
    }

    #[test]
    fn test_table_border_wins_on_outer_edge() {
        let section = TableSection {
            rows: vec![TableRow::new(vec![bordered(500)])],
        };
        let grid = SectionGrid::place(&section);
        let table = BorderPadding::uniform(Border::solid(2_000), 0);
        let b = resolve_cell_borders(BorderModel::Collapse, &table, 0, &grid, 1, 0);
        assert_eq!(b.before_normal, 2_000);
        assert_eq!(b.start_width, 2_000);
        assert_eq!(b.before_rest, 0);
    }

    #[test]
    fn test_separate_model_adds_half_separation() {
        let section = TableSection {
            rows: vec![TableRow::new(vec![bordered(1_000)])],
        };
        let grid = SectionGrid::place(&section);
        let b = resolve_cell_borders(BorderModel::Separate, &BorderPadding::default(), 4_000, &grid, 1, 0);
        assert_eq!(b.before_normal, 3_000);
        assert_eq!(b.before_rest, 2_000);
        assert_eq!(b.end_width, 3_000);
        assert_eq!(b.inset, 2_000);
    }
}
