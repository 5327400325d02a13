use tracing::trace;

use super::verdict::ColumnVerdicts;
use crate::{
    rules::{matches_any, NamingConvention, RuleSet},
    table::Table,
};

/// Outcome of paired-column resolution for one comparison column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pairing {
    /// Both paired value columns exist in the table.
    Columns { new: usize, old: usize },
    /// The label follows the convention but the table lacks the pair.
    /// Carries the labels that were looked for.
    MissingColumns { new: String, old: String },
    /// The label does not follow the convention.
    NoConvention,
}

/// Resolve the paired value columns for `label` against `headers`.
/// A pair counts as present only when both columns exist.
pub fn paired_value_columns(
    naming: &NamingConvention,
    headers: &[String],
    label: &str,
) -> Pairing {
    let field = match naming.field_of(label) {
        Some(f) => f,
        None => return Pairing::NoConvention,
    };
    let new_label = naming.new_label(field);
    let old_label = naming.old_label(field);
    let new = headers.iter().position(|h| h == &new_label);
    let old = headers.iter().position(|h| h == &old_label);
    match (new, old) {
        (Some(new), Some(old)) => Pairing::Columns { new, old },
        _ => Pairing::MissingColumns {
            new: new_label,
            old: old_label,
        },
    }
}

/// Why a failing row failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonKind {
    BothEmpty,
    NewEmptyOldPresent,
    OldEmptyNewPresent,
    ValuesDiffer,
    /// The verdict says fail but the paired values are equal, which
    /// points at an inconsistency in the source data.
    FlaggedFailButEqual,
    NoPairedFields,
    FailureMarker,
    NotPassMarker,
    MismatchMarker,
    Other,
}

impl ReasonKind {
    pub fn label(&self) -> &'static str {
        match self {
            ReasonKind::BothEmpty => "both values empty",
            ReasonKind::NewEmptyOldPresent => "new value empty, old value present",
            ReasonKind::OldEmptyNewPresent => "old value empty, new value present",
            ReasonKind::ValuesDiffer => "values differ",
            ReasonKind::FlaggedFailButEqual => "flagged fail but values equal",
            ReasonKind::NoPairedFields => "no paired value fields",
            ReasonKind::FailureMarker => "failure marker in verdict",
            ReasonKind::NotPassMarker => "not-pass marker in verdict",
            ReasonKind::MismatchMarker => "mismatch marker in verdict",
            ReasonKind::Other => "other reason",
        }
    }
}

/// One reason ledger entry: a failing (column, row) with the values
/// captured for audit.
#[derive(Debug, Clone, PartialEq)]
pub struct ReasonRecord {
    /// Label of the comparison column.
    pub column: String,
    /// 0-based index into the table's data rows.
    pub row: usize,
    pub new_value: Option<String>,
    pub old_value: Option<String>,
    /// Literal text of the failing verdict cell.
    pub verdict: String,
    pub kind: ReasonKind,
}

impl ReasonRecord {
    /// Human-readable reason, with the captured values folded in where
    /// they add information.
    pub fn message(&self) -> String {
        match self.kind {
            ReasonKind::ValuesDiffer => format!(
                "values differ: new={}, old={}",
                self.new_value.as_deref().unwrap_or(""),
                self.old_value.as_deref().unwrap_or(""),
            ),
            kind => kind.label().to_string(),
        }
    }
}

/// Build one ledger entry per failing row of one evaluated column.
///
/// Columns whose label pairs up via the naming convention are explained
/// from the paired values; columns that follow the convention but lack
/// their pair get a fixed category; everything else is explained from the
/// verdict text itself.
pub fn infer_column_reasons(
    table: &Table,
    verdicts: &ColumnVerdicts,
    rules: &RuleSet,
) -> Vec<ReasonRecord> {
    let name = &table.headers[verdicts.column];
    let pairing = paired_value_columns(&rules.naming, &table.headers, name);

    let mut records = Vec::with_capacity(verdicts.summary.fail_count as usize);
    for (row, failed) in verdicts.fail_mask.iter().enumerate() {
        if !failed {
            continue;
        }
        let verdict = table.rows[row][verdicts.column]
            .as_text()
            .unwrap_or_default();
        let record = match &pairing {
            Pairing::Columns { new, old } => {
                let new_value = table.rows[row][*new].as_text();
                let old_value = table.rows[row][*old].as_text();
                let kind = classify_pair(new_value.as_deref(), old_value.as_deref());
                ReasonRecord {
                    column: name.clone(),
                    row,
                    new_value,
                    old_value,
                    verdict,
                    kind,
                }
            }
            Pairing::MissingColumns { .. } => ReasonRecord {
                column: name.clone(),
                row,
                new_value: None,
                old_value: None,
                verdict,
                kind: ReasonKind::NoPairedFields,
            },
            Pairing::NoConvention => {
                let kind = classify_verdict_text(&verdict, rules);
                ReasonRecord {
                    column: name.clone(),
                    row,
                    new_value: None,
                    old_value: None,
                    verdict,
                    kind,
                }
            }
        };
        trace!(column = %record.column, row, kind = record.kind.label(), "reason inferred");
        records.push(record);
    }
    records
}

/// Five-way split over the paired values of one failing row. Values
/// compare in their canonical string form, so 5 equals 5.0.
fn classify_pair(new: Option<&str>, old: Option<&str>) -> ReasonKind {
    match (new, old) {
        (None, None) => ReasonKind::BothEmpty,
        (None, Some(_)) => ReasonKind::NewEmptyOldPresent,
        (Some(_), None) => ReasonKind::OldEmptyNewPresent,
        (Some(n), Some(o)) if n != o => ReasonKind::ValuesDiffer,
        _ => ReasonKind::FlaggedFailButEqual,
    }
}

/// Keyword-group classification for plain verdict columns, probed in a
/// fixed priority order so one verdict lands in exactly one bucket.
fn classify_verdict_text(text: &str, rules: &RuleSet) -> ReasonKind {
    if matches_any(text, &rules.failure_markers) {
        ReasonKind::FailureMarker
    } else if matches_any(text, &rules.not_pass_markers) {
        ReasonKind::NotPassMarker
    } else if matches_any(text, &rules.mismatch_markers) {
        ReasonKind::MismatchMarker
    } else {
        ReasonKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::verdict::evaluate_column;
    use crate::table::Cell;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn pairing_requires_both_columns() {
        let naming = NamingConvention::default();
        let headers: Vec<String> = ["x_comparison", "new_x", "old_x", "new_y", "y_comparison"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(
            paired_value_columns(&naming, &headers, "x_comparison"),
            Pairing::Columns { new: 1, old: 2 }
        );
        // only new_y exists
        assert_eq!(
            paired_value_columns(&naming, &headers, "y_comparison"),
            Pairing::MissingColumns {
                new: "new_y".to_string(),
                old: "old_y".to_string()
            }
        );
        assert_eq!(
            paired_value_columns(&naming, &headers, "result check"),
            Pairing::NoConvention
        );
    }

    #[test]
    fn paired_rows_split_five_ways() {
        assert_eq!(classify_pair(None, None), ReasonKind::BothEmpty);
        assert_eq!(classify_pair(None, Some("5")), ReasonKind::NewEmptyOldPresent);
        assert_eq!(classify_pair(Some("5"), None), ReasonKind::OldEmptyNewPresent);
        assert_eq!(classify_pair(Some("5"), Some("6")), ReasonKind::ValuesDiffer);
        assert_eq!(
            classify_pair(Some("5"), Some("5")),
            ReasonKind::FlaggedFailButEqual
        );
    }

    #[test]
    fn paired_comparison_column_is_explained_from_its_values() {
        let table = Table {
            headers: vec![
                "x_comparison".to_string(),
                "new_x".to_string(),
                "old_x".to_string(),
            ],
            rows: vec![
                vec![text("pass"), Cell::Number(1.0), Cell::Number(1.0)],
                vec![text("fail"), Cell::Empty, Cell::Number(5.0)],
                vec![text("pass"), Cell::Number(2.0), Cell::Number(2.0)],
            ],
        };
        let rules = RuleSet::default();
        let verdicts = evaluate_column(&table, 0, &rules);
        let records = infer_column_reasons(&table, &verdicts, &rules);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].row, 1);
        assert_eq!(records[0].kind, ReasonKind::NewEmptyOldPresent);
        assert_eq!(records[0].new_value, None);
        assert_eq!(records[0].old_value, Some("5".to_string()));
        assert_eq!(records[0].verdict, "fail");
    }

    #[test]
    fn integral_floats_compare_equal_across_the_pair() {
        let table = Table {
            headers: vec![
                "x_comparison".to_string(),
                "new_x".to_string(),
                "old_x".to_string(),
            ],
            rows: vec![vec![text("fail"), Cell::Number(5.0), text("5")]],
        };
        let rules = RuleSet::default();
        let verdicts = evaluate_column(&table, 0, &rules);
        let records = infer_column_reasons(&table, &verdicts, &rules);
        assert_eq!(records[0].kind, ReasonKind::FlaggedFailButEqual);
    }

    #[test]
    fn convention_without_pair_gets_the_fixed_category() {
        let table = Table {
            headers: vec!["y_comparison".to_string(), "new_y".to_string()],
            rows: vec![vec![text("fail"), Cell::Number(1.0)]],
        };
        let rules = RuleSet::default();
        let verdicts = evaluate_column(&table, 0, &rules);
        let records = infer_column_reasons(&table, &verdicts, &rules);
        assert_eq!(records[0].kind, ReasonKind::NoPairedFields);
    }

    #[test]
    fn plain_columns_bucket_by_keyword_priority() {
        let rules = RuleSet::default();
        // "rejected, values mismatch" holds markers from two groups; the
        // failure group is probed first and wins
        assert_eq!(
            classify_verdict_text("rejected, values mismatch", &rules),
            ReasonKind::FailureMarker
        );
        assert_eq!(
            classify_verdict_text("NOT PASS", &rules),
            ReasonKind::NotPassMarker
        );
        assert_eq!(
            classify_verdict_text("data inconsistent", &rules),
            ReasonKind::MismatchMarker
        );
        assert_eq!(classify_verdict_text("0", &rules), ReasonKind::Other);
    }

    #[test]
    fn ledger_length_matches_the_fail_count() {
        let table = Table {
            headers: vec!["result comparison".to_string()],
            rows: vec![
                vec![text("fail")],
                vec![text("pass")],
                vec![text("rejected")],
                vec![Cell::Empty],
            ],
        };
        let rules = RuleSet::default();
        let verdicts = evaluate_column(&table, 0, &rules);
        let records = infer_column_reasons(&table, &verdicts, &rules);
        assert_eq!(records.len() as u64, verdicts.summary.fail_count);
        assert_eq!(records.len(), 2);
        // 0-based row indices of the failing rows
        assert_eq!(records[0].row, 0);
        assert_eq!(records[1].row, 2);
    }

    #[test]
    fn values_differ_message_carries_both_sides() {
        let record = ReasonRecord {
            column: "x_comparison".to_string(),
            row: 3,
            new_value: Some("7".to_string()),
            old_value: Some("8".to_string()),
            verdict: "fail".to_string(),
            kind: ReasonKind::ValuesDiffer,
        };
        assert_eq!(record.message(), "values differ: new=7, old=8");
    }
}
