pub mod aggregate;
pub mod classify;
pub mod reason;
pub mod verdict;

pub use aggregate::{OverallSummary, RankEntry, ReasonFrequency};
pub use classify::ColumnKind;
pub use reason::{Pairing, ReasonKind, ReasonRecord};
pub use verdict::ColumnSummary;

use anyhow::Result;
use tracing::info;

use crate::{error::AnalyzerError, rules::RuleSet, table::Table};

/// Analysis depth chosen by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Per-column counts and rates only.
    Basic,
    /// Basic plus a reason for every failing row.
    Detailed,
}

impl Mode {
    /// Token used in the report file name.
    pub fn file_tag(&self) -> &'static str {
        match self {
            Mode::Basic => "basic",
            Mode::Detailed => "detailed",
        }
    }
}

/// Everything derived from one run over one table. Columns appear in
/// discovery order throughout.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub mode: Mode,
    pub columns: Vec<ColumnSummary>,
    pub overall: OverallSummary,
    pub ranking: Vec<RankEntry>,
    /// Reason ledger, one entry per failing (column, row). `Some` only in
    /// detailed mode.
    pub ledger: Option<Vec<ReasonRecord>>,
    /// Histogram over the ledger. `Some` only in detailed mode.
    pub reason_counts: Option<Vec<ReasonFrequency>>,
}

/// Run the analyzer over a loaded table.
///
/// Fails with [`AnalyzerError::NoComparisonColumns`] when the marker
/// matches no column label; every later step is plain bookkeeping and
/// cannot fail.
#[tracing::instrument(level = "info", skip_all, fields(rows = table.row_count(), mode = ?mode))]
pub fn analyze(table: &Table, rules: &RuleSet, mode: Mode) -> Result<Analysis> {
    // 1) find the comparison columns
    let columns = classify::comparison_columns(table, &rules.comparison_marker);
    if columns.is_empty() {
        return Err(AnalyzerError::NoComparisonColumns {
            marker: rules.comparison_marker.clone(),
            available: table.headers.clone(),
        }
        .into());
    }
    info!(count = columns.len(), "comparison columns found");

    // 2) evaluate verdicts column by column
    let verdicts: Vec<verdict::ColumnVerdicts> = columns
        .iter()
        .map(|&c| verdict::evaluate_column(table, c, rules))
        .collect();
    let summaries: Vec<ColumnSummary> = verdicts.iter().map(|v| v.summary.clone()).collect();

    // 3) detailed mode explains every failing row
    let ledger = match mode {
        Mode::Detailed => {
            let mut records = Vec::new();
            for v in &verdicts {
                records.extend(reason::infer_column_reasons(table, v, rules));
            }
            Some(records)
        }
        Mode::Basic => None,
    };

    // 4) aggregate
    let overall = aggregate::overall(&summaries);
    let ranking = aggregate::pass_rate_ranking(&summaries);
    let reason_counts = ledger
        .as_ref()
        .map(|l| aggregate::reason_frequency(l, &summaries));

    info!(
        fails = overall.fail_count,
        total = overall.total_count,
        "analysis complete"
    );
    Ok(Analysis {
        mode,
        columns: summaries,
        overall,
        ranking,
        ledger,
        reason_counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn sample_table() -> Table {
        Table {
            headers: vec![
                "id".to_string(),
                "x_comparison".to_string(),
                "new_x".to_string(),
                "old_x".to_string(),
                "count_comparison".to_string(),
            ],
            rows: vec![
                vec![
                    Cell::Number(1.0),
                    text("pass"),
                    Cell::Number(1.0),
                    Cell::Number(1.0),
                    Cell::Number(3.0),
                ],
                vec![
                    Cell::Number(2.0),
                    text("fail"),
                    Cell::Empty,
                    Cell::Number(5.0),
                    Cell::Number(0.0),
                ],
                vec![
                    Cell::Number(3.0),
                    text("pass"),
                    Cell::Number(2.0),
                    Cell::Number(2.0),
                    Cell::Empty,
                ],
            ],
        }
    }

    #[test]
    fn detailed_analysis_covers_every_failing_row() {
        let analysis =
            analyze(&sample_table(), &RuleSet::default(), Mode::Detailed).unwrap();

        assert_eq!(analysis.columns.len(), 2);
        assert_eq!(analysis.overall.fail_count, 2);
        assert_eq!(analysis.overall.total_count, 5);
        assert_eq!(analysis.overall.fail_rate, 40.0);

        let ledger = analysis.ledger.as_ref().unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger[0].column, "x_comparison");
        assert_eq!(ledger[0].kind, ReasonKind::NewEmptyOldPresent);
        // follows the convention but new_count/old_count do not exist
        assert_eq!(ledger[1].column, "count_comparison");
        assert_eq!(ledger[1].kind, ReasonKind::NoPairedFields);
        assert_eq!(ledger[1].verdict, "0");

        let counts = analysis.reason_counts.as_ref().unwrap();
        assert_eq!(counts.len(), 2);

        // worst pass rate ranks first: x 66.67 vs count 50.0
        assert_eq!(analysis.ranking[0].name, "count_comparison");
        assert_eq!(analysis.ranking[0].rank, 1);
    }

    #[test]
    fn basic_mode_skips_the_ledger() {
        let analysis = analyze(&sample_table(), &RuleSet::default(), Mode::Basic).unwrap();
        assert!(analysis.ledger.is_none());
        assert!(analysis.reason_counts.is_none());
        assert_eq!(analysis.columns.len(), 2);
    }

    #[test]
    fn no_marker_hit_is_a_typed_error() {
        let table = Table {
            headers: vec!["id".to_string(), "name".to_string()],
            rows: vec![],
        };
        let err = analyze(&table, &RuleSet::default(), Mode::Basic).unwrap_err();
        match err.downcast_ref::<AnalyzerError>() {
            Some(AnalyzerError::NoComparisonColumns { available, .. }) => {
                assert_eq!(available, &vec!["id".to_string(), "name".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
