use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use tracing::{debug, info};

use crate::table::{Cell, Table};

/// Scan `dir` for Excel workbooks (`.xlsx`/`.xls`, case-insensitive).
/// Excel lock files (`~$...`) are skipped, and the result is sorted by
/// path so the selection prompt stays stable across runs.
pub fn discover_excel_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?
    {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => continue,
        };
        if name.starts_with("~$") {
            continue;
        }
        let is_excel = path.extension().and_then(|e| e.to_str()).map_or(false, |ext| {
            ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xls")
        });
        if is_excel {
            files.push(path);
        }
    }
    files.sort();
    debug!(count = files.len(), dir = %dir.display(), "workbook scan");
    Ok(files)
}

/// Load the first sheet of `path` into a [`Table`].
///
/// - the first row supplies the headers; blank header cells become
///   `column_<n>`
/// - blank strings load as empty cells
/// - dates keep their serial number and error cells their display text,
///   which is how the verdict rules will see them
#[tracing::instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn load_table(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("opening workbook {}", path.display()))?;
    let sheet_names = workbook.sheet_names();
    let first = sheet_names
        .first()
        .ok_or_else(|| anyhow!("workbook {} contains no sheets", path.display()))?
        .clone();
    let range = workbook
        .worksheet_range(&first)
        .with_context(|| format!("reading sheet {:?} of {}", first, path.display()))?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(header_row) => header_row
            .iter()
            .enumerate()
            .map(|(i, cell)| header_label(cell, i))
            .collect(),
        None => Vec::new(),
    };

    let mut rows = Vec::with_capacity(range.height().saturating_sub(1));
    for row in rows_iter {
        let mut cells: Vec<Cell> = row.iter().map(convert_cell).collect();
        cells.resize(headers.len(), Cell::Empty);
        rows.push(cells);
    }

    info!(
        rows = rows.len(),
        columns = headers.len(),
        sheet = %first,
        "loaded table"
    );
    Ok(Table { headers, rows })
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => {
            if s.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

fn header_label(cell: &Data, index: usize) -> String {
    let label = convert_cell(cell)
        .as_text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    if label.is_empty() {
        format!("column_{}", index + 1)
    } else {
        label
    }
}
