use std::collections::HashMap;

use super::{
    reason::{ReasonKind, ReasonRecord},
    verdict::{round2, ColumnSummary},
};

/// Grand totals across every comparison column.
#[derive(Debug, Clone, PartialEq)]
pub struct OverallSummary {
    pub fail_count: u64,
    pub total_count: u64,
    /// sum of fails over sum of totals, as a percentage rounded to 2
    /// decimals; 0 when there was nothing to count.
    pub fail_rate: f64,
}

pub fn overall(columns: &[ColumnSummary]) -> OverallSummary {
    let fail_count: u64 = columns.iter().map(|c| c.fail_count).sum();
    let total_count: u64 = columns.iter().map(|c| c.non_empty_count).sum();
    let fail_rate = if total_count > 0 {
        round2(fail_count as f64 / total_count as f64 * 100.0)
    } else {
        0.0
    };
    OverallSummary {
        fail_count,
        total_count,
        fail_rate,
    }
}

/// One row of the pass-rate ranking. Rank 1 is the worst performer.
#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    pub rank: usize,
    pub name: String,
    pub pass_rate: f64,
    pub fail_count: u64,
    pub non_empty_count: u64,
}

/// Comparison columns sorted ascending by pass rate; ties keep their
/// discovery order.
pub fn pass_rate_ranking(columns: &[ColumnSummary]) -> Vec<RankEntry> {
    let mut order: Vec<&ColumnSummary> = columns.iter().collect();
    order.sort_by(|a, b| a.pass_rate.total_cmp(&b.pass_rate));
    order
        .into_iter()
        .enumerate()
        .map(|(i, c)| RankEntry {
            rank: i + 1,
            name: c.name.clone(),
            pass_rate: c.pass_rate,
            fail_count: c.fail_count,
            non_empty_count: c.non_empty_count,
        })
        .collect()
}

/// Reason histogram entry for one (column, category) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ReasonFrequency {
    pub column: String,
    pub kind: ReasonKind,
    pub count: u64,
    /// Percentage of that column's failures, rounded to 2 decimals.
    pub share: f64,
}

/// Group the reason ledger by (column, category): columns in discovery
/// order, then larger buckets first, category label as the tiebreak.
pub fn reason_frequency(
    ledger: &[ReasonRecord],
    columns: &[ColumnSummary],
) -> Vec<ReasonFrequency> {
    let position: HashMap<&str, usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| (c.name.as_str(), i))
        .collect();

    let mut counts: HashMap<(usize, ReasonKind), u64> = HashMap::new();
    for record in ledger {
        if let Some(&pos) = position.get(record.column.as_str()) {
            *counts.entry((pos, record.kind)).or_insert(0) += 1;
        }
    }

    let mut rows: Vec<(usize, ReasonFrequency)> = counts
        .into_iter()
        .map(|((pos, kind), count)| {
            let column = &columns[pos];
            let share = if column.fail_count > 0 {
                round2(count as f64 / column.fail_count as f64 * 100.0)
            } else {
                0.0
            };
            (
                pos,
                ReasonFrequency {
                    column: column.name.clone(),
                    kind,
                    count,
                    share,
                },
            )
        })
        .collect();
    rows.sort_by(|(pa, fa), (pb, fb)| {
        pa.cmp(pb)
            .then(fb.count.cmp(&fa.count))
            .then(fa.kind.label().cmp(fb.kind.label()))
    });
    rows.into_iter().map(|(_, f)| f).collect()
}
