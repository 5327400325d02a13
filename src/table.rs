use std::fmt;

/// A single spreadsheet cell, reduced to the shapes the analyzer cares
/// about. Dates arrive as their serial number and error cells as text, so
/// four variants cover everything the verdict rules can see.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Numeric view: numbers as-is, bools as 0/1, everything else `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Canonical string form used for keyword matching, paired-value
    /// equality and reports. Empty cells have none. Integral floats render
    /// without a trailing `.0` so `5` and `5.0` compare equal.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(format!("{}", n))
                }
            }
            Cell::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text().unwrap_or_default())
    }
}

/// In-memory copy of the first sheet of a workbook: ordered rows under
/// named columns. Loaded once and never mutated; every derived figure is
/// computed against this copy.
#[derive(Debug, Clone)]
pub struct Table {
    /// Column labels from the header row. Blank labels are substituted
    /// with `column_<n>` (1-based) so every column stays addressable.
    pub headers: Vec<String>,
    /// Data rows, each exactly as wide as `headers`.
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Iterate the cells of one column, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |row| &row[idx])
    }

    /// Position of the column with the given label, if present.
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == label)
    }
}
