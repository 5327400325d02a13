use thiserror::Error;

/// Terminal, user-facing failures. Each one ends the run with a message
/// the operator can act on; nothing here is retried.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("no Excel files (.xlsx/.xls) found in {dir}")]
    NoExcelFiles { dir: String },

    #[error("input file not found: {path}")]
    InputFileMissing { path: String },

    #[error("invalid selection {input:?}: expected a number between 1 and {max}")]
    InvalidSelection { input: String, max: usize },

    #[error(
        "no comparison columns found (marker {marker:?}); available columns: {}",
        .available.join(", ")
    )]
    NoComparisonColumns {
        marker: String,
        available: Vec<String>,
    },
}
