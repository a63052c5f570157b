use folio_fo::{ColumnWidth, TableColumn};
use folio_types::Length;

/// Resolves table column widths.
///
/// Fixed columns take their width; the space left is shared out between
/// proportional columns by their factors. Columns used by cells but not
/// declared are proportional with factor 1.
pub struct TableSolver<'a> {
    columns: &'a [TableColumn],
}

impl<'a> TableSolver<'a> {
    pub fn new(columns: &'a [TableColumn]) -> Self {
        Self { columns }
    }

    /// Declared column widths with repeats expanded, padded to `min_count`.
    pub fn expanded(&self, min_count: usize) -> Vec<ColumnWidth> {
        let mut out: Vec<ColumnWidth> = self
            .columns
            .iter()
            .flat_map(|c| std::iter::repeat_n(c.column_width, c.number_columns_repeated.max(1)))
            .collect();
        if out.len() < min_count {
            out.resize(min_count, ColumnWidth::default());
        }
        out
    }

    pub fn resolve_widths(&self, available_width: Length, min_count: usize) -> Vec<Length> {
        let specs = self.expanded(min_count);
        let fixed: Length = specs
            .iter()
            .map(|w| match w {
                ColumnWidth::Fixed(l) => *l,
                ColumnWidth::Proportional(_) => 0,
            })
            .sum();
        let total_factor: f32 = specs
            .iter()
            .map(|w| match w {
                ColumnWidth::Proportional(f) => f.max(0.0),
                ColumnWidth::Fixed(_) => 0.0,
            })
            .sum();
        let remaining = (available_width - fixed).max(0);
        if fixed > available_width {
            log::warn!(
                "fixed column widths ({}) exceed the available width ({})",
                fixed,
                available_width
            );
        }

        let mut widths = Vec::with_capacity(specs.len());
        let mut handed_out = 0;
        let last_proportional = specs
            .iter()
            .rposition(|w| matches!(w, ColumnWidth::Proportional(_)));
        for (i, spec) in specs.iter().enumerate() {
            let width = match spec {
                ColumnWidth::Fixed(l) => *l,
                ColumnWidth::Proportional(_) if Some(i) == last_proportional => remaining - handed_out,
                ColumnWidth::Proportional(f) if total_factor > 0.0 => {
                    let w = (remaining as f64 * (f.max(0.0) / total_factor) as f64) as Length;
                    handed_out += w;
                    w
                }
                ColumnWidth::Proportional(_) => 0,
            };
            widths.push(width);
        }
        widths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(width: ColumnWidth) -> TableColumn {
        TableColumn {
            column_width: width,
            number_columns_repeated: 1,
        }
    }

    #[test]
    fn test_fixed_and_proportional() {
        let columns = vec![
            col(ColumnWidth::Fixed(100_000)),
            col(ColumnWidth::Proportional(1.0)),
            col(ColumnWidth::Proportional(3.0)),
        ];
        let widths = TableSolver::new(&columns).resolve_widths(500_000, 0);
        assert_eq!(widths, vec![100_000, 100_000, 300_000]);
    }

    #[test]
    fn test_undeclared_columns_share_rest() {
        let columns = vec![TableColumn {
            column_width: ColumnWidth::Fixed(50_000),
            number_columns_repeated: 2,
        }];
        let widths = TableSolver::new(&columns).resolve_widths(300_000, 4);
        assert_eq!(widths, vec![50_000, 50_000, 100_000, 100_000]);
        assert_eq!(widths.iter().sum::<Length>(), 300_000);
    }
}
