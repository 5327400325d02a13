use tracing::debug;

use crate::table::Table;

/// How a comparison column's cells are read by the verdict rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// At least one non-empty cell is text; verdicts use keyword matching.
    Text,
    /// Every non-empty cell is numeric (bools count); verdicts use the
    /// zero sentinel.
    Numeric,
}

/// Indices of the columns whose label contains `marker`, in table order.
/// The match is a case-sensitive substring test on the label.
pub fn comparison_columns(table: &Table, marker: &str) -> Vec<usize> {
    let found: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, label)| label.contains(marker))
        .map(|(idx, _)| idx)
        .collect();
    debug!(marker, count = found.len(), "comparison column scan");
    found
}

/// A column is numeric only if nothing in it reads as text. Columns with
/// no non-empty cells count as numeric; with nothing to match keywords
/// against, the distinction carries no weight.
pub fn column_kind(table: &Table, column: usize) -> ColumnKind {
    for cell in table.column(column) {
        if cell.is_empty() {
            continue;
        }
        if cell.as_number().is_none() {
            return ColumnKind::Text;
        }
    }
    ColumnKind::Numeric
}
