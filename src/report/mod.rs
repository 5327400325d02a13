pub mod text;
pub mod workbook;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::{
    analyze::{Analysis, Mode},
    table::Table,
};

/// Report container written next to the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Workbook,
    Text,
}

/// Report path for `input`: `<stem>_<mode>report.xlsx` for workbooks,
/// `<stem>_analysis_result.txt` for the text variant, in the input's
/// directory.
pub fn report_path(input: &Path, mode: Mode, format: ReportFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("analysis");
    let name = match format {
        ReportFormat::Workbook => format!("{}_{}report.xlsx", stem, mode.file_tag()),
        ReportFormat::Text => format!("{}_analysis_result.txt", stem),
    };
    match input.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Write the report in the requested format and return its path.
pub fn write_report(
    input: &Path,
    table: &Table,
    analysis: &Analysis,
    format: ReportFormat,
) -> Result<PathBuf> {
    let path = report_path(input, analysis.mode, format);
    match format {
        ReportFormat::Workbook => workbook::write_workbook(&path, table, analysis)?,
        ReportFormat::Text => text::write_text(&path, analysis)?,
    }
    Ok(path)
}
