//! Placement of the cells of a table section on the row/column grid.

use folio_fo::{TableCell, TableSection};
use std::ops::Range;

/// A cell and the grid slots it covers.
#[derive(Debug, Clone, Copy)]
pub struct PlacedCell<'a> {
    pub cell: &'a TableCell,
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

impl PlacedCell<'_> {
    pub fn last_row(&self) -> usize {
        self.row + self.row_span - 1
    }

    pub fn columns(&self) -> Range<usize> {
        self.col..self.col + self.col_span
    }

    pub fn covers_row(&self, row: usize) -> bool {
        (self.row..self.row + self.row_span).contains(&row)
    }
}

#[derive(Debug, Default)]
pub struct SectionGrid<'a> {
    pub cells: Vec<PlacedCell<'a>>,
    pub row_count: usize,
    pub column_count: usize,
}

impl<'a> SectionGrid<'a> {
    /// Places every cell of `section`. Cells without a column number take
    /// the next free slot; row spans running past the section are cut.
    pub fn place(section: &'a TableSection) -> Self {
        let row_count = section.rows.len();
        let mut occupied: Vec<Vec<bool>> = vec![Vec::new(); row_count];
        let mut cells = Vec::new();
        let mut column_count = 0;

        for (r, row) in section.rows.iter().enumerate() {
            let mut cursor = 0;
            for cell in &row.cells {
                let col_span = cell.number_columns_spanned.max(1);
                let mut row_span = cell.number_rows_spanned.max(1);
                if r + row_span > row_count {
                    log::warn!(
                        "cell in row {} spans {} rows but only {} remain; span cut",
                        r,
                        row_span,
                        row_count - r
                    );
                    row_span = row_count - r;
                }
                let wanted = cell.column_number.map(|n| n.saturating_sub(1)).unwrap_or(cursor);
                let col = first_free(&occupied, r, row_span, wanted, col_span);
                if cell.column_number.is_some() && col != wanted {
                    log::warn!("cell at column {} overlaps another cell; moved to column {}", wanted + 1, col + 1);
                }
                for slots in occupied.iter_mut().skip(r).take(row_span) {
                    if slots.len() < col + col_span {
                        slots.resize(col + col_span, false);
                    }
                    slots[col..col + col_span].iter_mut().for_each(|s| *s = true);
                }
                column_count = column_count.max(col + col_span);
                cursor = col + col_span;
                cells.push(PlacedCell {
                    cell,
                    row: r,
                    col,
                    row_span,
                    col_span,
                });
            }
        }
        Self {
            cells,
            row_count,
            column_count,
        }
    }

    /// Consecutive rows tied together by row spans.
    pub fn row_groups(&self) -> Vec<Range<usize>> {
        let mut groups = Vec::new();
        let mut start = 0;
        let mut group_end = 0;
        for r in 0..self.row_count {
            group_end = self
                .cells
                .iter()
                .filter(|c| c.row == r)
                .map(|c| c.row + c.row_span)
                .fold(group_end.max(r + 1), usize::max);
            if r + 1 == group_end {
                groups.push(start..group_end);
                start = group_end;
            }
        }
        groups
    }
}

fn first_free(occupied: &[Vec<bool>], row: usize, row_span: usize, from: usize, span: usize) -> usize {
    let free = |col: usize| {
        occupied.iter().skip(row).take(row_span).all(|slots| {
            (col..col + span).all(|c| !slots.get(c).copied().unwrap_or(false))
        })
    };
    (from..).find(|&c| free(c)).unwrap_or(from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_fo::TableRow;

    fn cell(rows: usize, cols: usize) -> TableCell {
        let mut c = TableCell::new(Vec::new());
        c.number_rows_spanned = rows;
        c.number_columns_spanned = cols;
        c
    }

    #[test]
    fn test_row_span_pushes_cells_right() {
        let section = TableSection {
            rows: vec![
                TableRow::new(vec![cell(2, 1), cell(1, 1)]),
                TableRow::new(vec![cell(1, 1)]),
                TableRow::new(vec![cell(1, 2)]),
            ],
        };
        let grid = SectionGrid::place(&section);
        assert_eq!(grid.column_count, 2);
        assert_eq!(grid.cells[2].col, 1);
        assert_eq!(grid.row_groups(), vec![0..2, 2..3]);
    }

    #[test]
    fn test_span_past_section_is_cut() {
        let section = TableSection {
            rows: vec![TableRow::new(vec![cell(3, 1)])],
        };
        let grid = SectionGrid::place(&section);
        assert_eq!(grid.cells[0].row_span, 1);
        assert_eq!(grid.row_groups(), vec![0..1]);
    }

    #[test]
    fn test_explicit_column_number() {
        let mut c = cell(1, 1);
        c.column_number = Some(3);
        let section = TableSection {
            rows: vec![TableRow::new(vec![c, cell(1, 1)])],
        };
        let grid = SectionGrid::place(&section);
        assert_eq!(grid.cells[0].col, 2);
        assert_eq!(grid.cells[1].col, 3);
        assert_eq!(grid.column_count, 4);
    }
}
