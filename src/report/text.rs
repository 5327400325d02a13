use std::{fs, path::Path};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;

use crate::analyze::Analysis;

/// Plain-text rendition of the analysis for environments without a
/// spreadsheet viewer. Mirrors the console summary, plus the reason
/// ledger in detailed mode.
pub fn write_text(path: &Path, analysis: &Analysis) -> Result<()> {
    let mut out = String::new();
    out.push_str("Comparison Field Analysis\n");
    out.push_str(&"=".repeat(50));
    out.push('\n');
    out.push_str(&format!(
        "generated: {}\n\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    for column in &analysis.columns {
        out.push_str(&format!("column: {}\n", column.name));
        out.push_str(&format!(
            "  failed: {}/{}\n",
            column.fail_count, column.non_empty_count
        ));
        out.push_str(&format!("  fail rate: {:.2}%\n", column.fail_rate));
        out.push_str(&format!("  pass rate: {:.2}%\n", column.pass_rate));
        out.push_str(&"-".repeat(40));
        out.push('\n');
    }

    out.push_str(&format!(
        "overall: {}/{} failed ({:.2}%)\n",
        analysis.overall.fail_count, analysis.overall.total_count, analysis.overall.fail_rate
    ));

    if let Some(ledger) = &analysis.ledger {
        out.push('\n');
        out.push_str("failing rows\n");
        out.push_str(&"=".repeat(50));
        out.push('\n');
        if ledger.is_empty() {
            out.push_str("no failing records\n");
        } else {
            for record in ledger {
                out.push_str(&format!(
                    "{} row {}: {} (verdict: {})\n",
                    record.column,
                    record.row,
                    record.message(),
                    record.verdict
                ));
            }
        }
    }

    fs::write(path, out).with_context(|| format!("writing text report {}", path.display()))?;
    info!(file = %path.display(), "text report written");
    Ok(())
}
