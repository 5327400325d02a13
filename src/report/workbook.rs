use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::info;

use crate::{
    analyze::{verdict::round2, Analysis},
    table::{Cell, Table},
};

pub const SHEET_RAW: &str = "Raw Data";
pub const SHEET_SUMMARY: &str = "Summary";
pub const SHEET_RANKING: &str = "Pass Rate Ranking";
pub const SHEET_REASONS: &str = "Fail Reasons";
pub const SHEET_FREQUENCY: &str = "Reason Frequency";

/// Cell written on a detailed sheet that has nothing to list.
pub const NO_FAILING_RECORDS: &str = "no failing records";

/// Assemble the report workbook and save it in one step. Basic runs get
/// three sheets; detailed runs add the two reason sheets.
pub fn write_workbook(path: &Path, table: &Table, analysis: &Analysis) -> Result<()> {
    let mut book = Workbook::new();
    let header = Format::new().set_bold();

    write_raw_data(book.add_worksheet(), table, &header)?;
    write_summary(book.add_worksheet(), analysis, &header)?;
    write_ranking(book.add_worksheet(), analysis, &header)?;

    if let Some(ledger) = &analysis.ledger {
        write_ledger(book.add_worksheet(), ledger, &header)?;
        let counts = analysis.reason_counts.as_deref().unwrap_or(&[]);
        write_frequency(book.add_worksheet(), counts, &header)?;
    }

    book.save(path)
        .with_context(|| format!("saving report workbook {}", path.display()))?;
    info!(file = %path.display(), "report workbook written");
    Ok(())
}

fn write_header_row(sheet: &mut Worksheet, labels: &[&str], header: &Format) -> Result<()> {
    for (col, label) in labels.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *label, header)?;
    }
    Ok(())
}

/// Verbatim copy of the analyzed table. Reloading this sheet and
/// re-running the analysis reproduces the same summaries.
fn write_raw_data(sheet: &mut Worksheet, table: &Table, header: &Format) -> Result<()> {
    sheet.set_name(SHEET_RAW)?;
    for (col, label) in table.headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, label.as_str(), header)?;
    }
    for (row, cells) in table.rows.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            write_cell(sheet, (row + 1) as u32, col as u16, cell)?;
        }
    }
    Ok(())
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> Result<()> {
    match cell {
        Cell::Empty => {}
        Cell::Text(s) => {
            sheet.write_string(row, col, s.as_str())?;
        }
        Cell::Number(n) => {
            sheet.write_number(row, col, *n)?;
        }
        Cell::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
    }
    Ok(())
}

fn write_summary(sheet: &mut Worksheet, analysis: &Analysis, header: &Format) -> Result<()> {
    sheet.set_name(SHEET_SUMMARY)?;
    write_header_row(
        sheet,
        &[
            "column",
            "fail_count",
            "pass_count",
            "total",
            "fail_rate_pct",
            "pass_rate_pct",
        ],
        header,
    )?;
    for (i, c) in analysis.columns.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, c.name.as_str())?;
        sheet.write_number(row, 1, c.fail_count as f64)?;
        sheet.write_number(row, 2, c.pass_count as f64)?;
        sheet.write_number(row, 3, c.non_empty_count as f64)?;
        sheet.write_number(row, 4, c.fail_rate)?;
        sheet.write_number(row, 5, c.pass_rate)?;
    }

    let overall = &analysis.overall;
    let row = (analysis.columns.len() + 1) as u32;
    let pass_rate = if overall.total_count > 0 {
        round2(100.0 - overall.fail_rate)
    } else {
        0.0
    };
    sheet.write_string_with_format(row, 0, "Overall", header)?;
    sheet.write_number(row, 1, overall.fail_count as f64)?;
    sheet.write_number(row, 2, (overall.total_count - overall.fail_count) as f64)?;
    sheet.write_number(row, 3, overall.total_count as f64)?;
    sheet.write_number(row, 4, overall.fail_rate)?;
    sheet.write_number(row, 5, pass_rate)?;
    Ok(())
}

fn write_ranking(sheet: &mut Worksheet, analysis: &Analysis, header: &Format) -> Result<()> {
    sheet.set_name(SHEET_RANKING)?;
    write_header_row(
        sheet,
        &["rank", "column", "pass_rate_pct", "fail_count", "total"],
        header,
    )?;
    for (i, entry) in analysis.ranking.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_number(row, 0, entry.rank as f64)?;
        sheet.write_string(row, 1, entry.name.as_str())?;
        sheet.write_number(row, 2, entry.pass_rate)?;
        sheet.write_number(row, 3, entry.fail_count as f64)?;
        sheet.write_number(row, 4, entry.non_empty_count as f64)?;
    }
    Ok(())
}

fn write_ledger(
    sheet: &mut Worksheet,
    ledger: &[crate::analyze::ReasonRecord],
    header: &Format,
) -> Result<()> {
    sheet.set_name(SHEET_REASONS)?;
    if ledger.is_empty() {
        sheet.write_string(0, 0, NO_FAILING_RECORDS)?;
        return Ok(());
    }
    write_header_row(
        sheet,
        &[
            "column",
            "row_index",
            "new_value",
            "old_value",
            "verdict",
            "reason",
        ],
        header,
    )?;
    for (i, record) in ledger.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, record.column.as_str())?;
        sheet.write_number(row, 1, record.row as f64)?;
        if let Some(new_value) = &record.new_value {
            sheet.write_string(row, 2, new_value.as_str())?;
        }
        if let Some(old_value) = &record.old_value {
            sheet.write_string(row, 3, old_value.as_str())?;
        }
        sheet.write_string(row, 4, record.verdict.as_str())?;
        sheet.write_string(row, 5, record.message().as_str())?;
    }
    Ok(())
}

fn write_frequency(
    sheet: &mut Worksheet,
    counts: &[crate::analyze::ReasonFrequency],
    header: &Format,
) -> Result<()> {
    sheet.set_name(SHEET_FREQUENCY)?;
    if counts.is_empty() {
        sheet.write_string(0, 0, NO_FAILING_RECORDS)?;
        return Ok(());
    }
    write_header_row(sheet, &["column", "reason", "count", "share_pct"], header)?;
    for (i, entry) in counts.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, entry.column.as_str())?;
        sheet.write_string(row, 1, entry.kind.label())?;
        sheet.write_number(row, 2, entry.count as f64)?;
        sheet.write_number(row, 3, entry.share)?;
    }
    Ok(())
}
