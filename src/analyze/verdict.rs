use tracing::debug;

use super::classify::{column_kind, ColumnKind};
use crate::{
    rules::{matches_any, RuleSet},
    table::Table,
};

/// Pass/fail statistics for one comparison column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub fail_count: u64,
    pub pass_count: u64,
    /// Cells with a value; empty cells count for neither side.
    pub non_empty_count: u64,
    /// Percentage of non-empty cells that fail, rounded to 2 decimals.
    pub fail_rate: f64,
    /// `100 - raw fail rate`, rounded to 2 decimals. Both rates are 0 for
    /// a column with no non-empty cells.
    pub pass_rate: f64,
}

/// One column's evaluated verdicts: the row-aligned fail mask plus its
/// summary. `fail_mask[i]` is true only for non-empty failing cells.
#[derive(Debug, Clone)]
pub struct ColumnVerdicts {
    pub column: usize,
    pub fail_mask: Vec<bool>,
    pub summary: ColumnSummary,
}

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Evaluate one comparison column. Text columns fail on any fail keyword
/// (case-insensitive containment); numeric columns fail on exactly 0.
pub fn evaluate_column(table: &Table, column: usize, rules: &RuleSet) -> ColumnVerdicts {
    let kind = column_kind(table, column);
    let mut fail_mask = vec![false; table.row_count()];
    let mut fail_count = 0u64;
    let mut non_empty = 0u64;

    for (row, cell) in table.column(column).enumerate() {
        if cell.is_empty() {
            continue;
        }
        non_empty += 1;
        let failed = match kind {
            ColumnKind::Text => cell
                .as_text()
                .map_or(false, |text| matches_any(&text, &rules.fail_keywords)),
            ColumnKind::Numeric => cell.as_number() == Some(0.0),
        };
        if failed {
            fail_mask[row] = true;
            fail_count += 1;
        }
    }

    // pass rate is derived from the unrounded fail rate, then rounded
    let (fail_rate, pass_rate) = if non_empty > 0 {
        let raw = fail_count as f64 / non_empty as f64 * 100.0;
        (round2(raw), round2(100.0 - raw))
    } else {
        (0.0, 0.0)
    };

    let summary = ColumnSummary {
        name: table.headers[column].clone(),
        kind,
        fail_count,
        pass_count: non_empty - fail_count,
        non_empty_count: non_empty,
        fail_rate,
        pass_rate,
    };
    debug!(
        column = %summary.name,
        fails = fail_count,
        total = non_empty,
        "evaluated column"
    );
    ColumnVerdicts {
        column,
        fail_mask,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn single_column(name: &str, cells: Vec<Cell>) -> Table {
        Table {
            headers: vec![name.to_string()],
            rows: cells.into_iter().map(|c| vec![c]).collect(),
        }
    }

    #[test]
    fn numeric_zero_fails_everything_else_passes() {
        let t = single_column(
            "count_comparison",
            vec![
                Cell::Number(0.0),
                Cell::Number(0.0),
                Cell::Number(1.0),
                Cell::Number(2.0),
            ],
        );
        let v = evaluate_column(&t, 0, &RuleSet::default());
        assert_eq!(v.summary.fail_count, 2);
        assert_eq!(v.summary.non_empty_count, 4);
        assert_eq!(v.summary.fail_rate, 50.0);
        assert_eq!(v.summary.pass_rate, 50.0);
        assert_eq!(v.fail_mask, vec![true, true, false, false]);
    }

    #[test]
    fn negative_and_fractional_numbers_pass() {
        let t = single_column(
            "delta_comparison",
            vec![Cell::Number(-1.0), Cell::Number(0.5), Cell::Number(-0.0)],
        );
        let v = evaluate_column(&t, 0, &RuleSet::default());
        // -0.0 compares equal to 0.0 and fails
        assert_eq!(v.summary.fail_count, 1);
        assert_eq!(v.fail_mask, vec![false, false, true]);
    }

    #[test]
    fn text_verdicts_fail_on_keyword_containment() {
        let t = single_column(
            "result_comparison",
            vec![
                Cell::Text("Pass".into()),
                Cell::Text("FAILED check".into()),
                Cell::Text("ok".into()),
                Cell::Text("values Mismatch".into()),
            ],
        );
        let v = evaluate_column(&t, 0, &RuleSet::default());
        assert_eq!(v.summary.fail_count, 2);
        assert_eq!(v.fail_mask, vec![false, true, false, true]);
    }

    #[test]
    fn empty_cells_count_for_neither_side() {
        let t = single_column(
            "result_comparison",
            vec![
                Cell::Text("fail".into()),
                Cell::Empty,
                Cell::Text("pass".into()),
            ],
        );
        let v = evaluate_column(&t, 0, &RuleSet::default());
        assert_eq!(v.summary.non_empty_count, 2);
        assert_eq!(v.summary.fail_count, 1);
        assert_eq!(v.summary.pass_count, 1);
        assert_eq!(v.summary.fail_rate, 50.0);
        assert!(!v.fail_mask[1]);
    }

    #[test]
    fn an_empty_column_reports_zero_rates() {
        let t = single_column("void_comparison", vec![Cell::Empty, Cell::Empty]);
        let v = evaluate_column(&t, 0, &RuleSet::default());
        assert_eq!(v.summary.fail_rate, 0.0);
        assert_eq!(v.summary.pass_rate, 0.0);
        assert_eq!(v.summary.non_empty_count, 0);
    }

    #[test]
    fn rates_round_to_two_decimals() {
        let t = single_column(
            "r_comparison",
            vec![Cell::Number(0.0), Cell::Number(1.0), Cell::Number(1.0)],
        );
        let v = evaluate_column(&t, 0, &RuleSet::default());
        assert_eq!(v.summary.fail_rate, 33.33);
        assert_eq!(v.summary.pass_rate, 66.67);
        assert_eq!(v.summary.fail_count + v.summary.pass_count, 3);
    }

    #[test]
    fn pass_rate_comes_from_the_raw_fail_rate() {
        // 1 fail in 800: fail 0.125% rounds to 0.13, pass 99.875% rounds
        // to 99.88. Subtracting the rounded fail rate would give 99.87.
        let mut cells = vec![Cell::Number(0.0)];
        cells.extend(std::iter::repeat(Cell::Number(1.0)).take(799));
        let t = single_column("r_comparison", cells);
        let v = evaluate_column(&t, 0, &RuleSet::default());
        assert_eq!(v.summary.fail_rate, 0.13);
        assert_eq!(v.summary.pass_rate, 99.88);
    }

    #[test]
    fn a_mixed_column_is_evaluated_as_text() {
        // the lone word makes the whole column textual, so 0 no longer
        // hits the zero sentinel
        let t = single_column(
            "mix_comparison",
            vec![Cell::Number(0.0), Cell::Text("fail".into())],
        );
        let v = evaluate_column(&t, 0, &RuleSet::default());
        assert_eq!(v.summary.kind, ColumnKind::Text);
        assert_eq!(v.summary.fail_count, 1);
        assert_eq!(v.fail_mask, vec![false, true]);
    }
}
