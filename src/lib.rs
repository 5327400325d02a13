//! Comparison-column analyzer for Excel workbooks.
//!
//! Loads the first sheet of a workbook, finds the columns whose label
//! marks them as comparison verdicts, scores every cell as pass or fail,
//! optionally explains each failing row from its paired new/old values,
//! and writes the results as a multi-sheet report next to the input.

pub mod analyze;
pub mod cli;
pub mod error;
pub mod ingest;
pub mod prompt;
pub mod report;
pub mod rules;
pub mod table;
