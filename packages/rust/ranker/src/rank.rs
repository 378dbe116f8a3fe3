//! End-to-end ranking of a batch of contributor records.

use serde::Serialize;
use tracing::{debug, warn};

use prospector_shared::{ContributorRecord, RankingRules, ScoredProspect};

use crate::dedupe::deduplicate;
use crate::focus::extract_technical_focus;
use crate::normalize::{NormalizedRecord, normalize};
use crate::scoring::score_record;

/// Counters describing one ranking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RankReport {
    /// Records received.
    pub input_count: usize,
    /// Records dropped for failing validation.
    pub dropped_count: usize,
    /// Records folded into another record with the same identity.
    pub merged_count: usize,
    /// Prospects produced.
    pub prospect_count: usize,
}

/// Ranked prospects plus the counters of the pass that produced them.
#[derive(Debug, Clone)]
pub struct Ranking {
    pub prospects: Vec<ScoredProspect>,
    pub report: RankReport,
}

/// Rank a batch of records, best prospect first.
pub fn rank(
    records: impl IntoIterator<Item = ContributorRecord>,
    rules: &RankingRules,
) -> Vec<ScoredProspect> {
    rank_with_report(records, rules).prospects
}

/// Rank a batch of records and report what happened to them.
///
/// Records without a usable name are dropped with a warning. The rest are
/// merged by identity, scored from scratch and sorted by score (descending),
/// then engagement (descending), then input order.
pub fn rank_with_report(
    records: impl IntoIterator<Item = ContributorRecord>,
    rules: &RankingRules,
) -> Ranking {
    let mut report = RankReport::default();
    let mut valid: Vec<NormalizedRecord> = Vec::new();

    for (index, record) in records.into_iter().enumerate() {
        report.input_count += 1;
        match normalize(record, index) {
            Ok(normalized) => valid.push(normalized),
            Err(e) => {
                report.dropped_count += 1;
                warn!(index, error = %e, "dropping contributor record");
            }
        }
    }

    let valid_count = valid.len();
    let merged = deduplicate(valid, rules);
    report.merged_count = valid_count - merged.len();

    let mut scored: Vec<(usize, ScoredProspect)> = merged
        .into_iter()
        .map(|n| (n.input_index, score_prospect(n, rules)))
        .collect();

    scored.sort_by(|(ia, a), (ib, b)| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.record.engagement_count.cmp(&a.record.engagement_count))
            .then_with(|| ia.cmp(ib))
    });

    let prospects: Vec<ScoredProspect> = scored.into_iter().map(|(_, p)| p).collect();
    report.prospect_count = prospects.len();

    debug!(
        input = report.input_count,
        dropped = report.dropped_count,
        merged = report.merged_count,
        prospects = report.prospect_count,
        "ranking complete"
    );

    Ranking { prospects, report }
}

fn score_prospect(normalized: NormalizedRecord, rules: &RankingRules) -> ScoredProspect {
    let breakdown = score_record(&normalized.record, rules);
    let technical_focus = extract_technical_focus(&normalized.record.body, rules);

    ScoredProspect {
        score: breakdown.total(),
        tier: breakdown.tier,
        position_rank: breakdown.position.map(|m| m.rank),
        technical_focus,
        merged_comment_count: normalized.merged_comment_count,
        record: normalized.record,
    }
}
