//! Position classification, score bonuses and tier assignment.
//!
//! Score and tier are computed independently: the score adds bonuses on top
//! of the position points and is used for ordering, while the tier comes from
//! the position rule alone.

use prospector_shared::{ContributorRecord, RankingRules, Tier};

/// The position rule a title matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionMatch {
    /// 1-based index into the position table.
    pub rank: usize,
    /// Points awarded by the rule.
    pub points: u32,
    /// Tier attached to the rule.
    pub tier: Tier,
}

/// Per-component score of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub position: Option<PositionMatch>,
    pub encryption_bonus: u32,
    pub engagement_bonus: u32,
    pub tier: Tier,
}

impl ScoreBreakdown {
    /// Position points.
    pub fn position_points(&self) -> u32 {
        self.position.map_or(0, |m| m.points)
    }

    /// Sortable total.
    pub fn total(&self) -> u32 {
        self.position_points()
            .saturating_add(self.encryption_bonus)
            .saturating_add(self.engagement_bonus)
    }
}

/// Classify a title against the ordered position table; first match wins.
pub fn score_position(title: &str, rules: &RankingRules) -> Option<PositionMatch> {
    let title = title.to_lowercase();

    rules
        .position_rules
        .iter()
        .enumerate()
        .find(|(_, rule)| rule.keywords.iter().any(|k| title.contains(k.as_str())))
        .map(|(i, rule)| PositionMatch {
            rank: i + 1,
            points: rule.points,
            tier: rule.tier,
        })
}

/// Bonus for bodies that mention encryption.
pub fn encryption_bonus(body: &str, rules: &RankingRules) -> u32 {
    let body = body.to_lowercase();
    if rules
        .encryption_terms
        .iter()
        .any(|term| body.contains(term.as_str()))
    {
        rules.encryption_bonus
    } else {
        0
    }
}

/// Bonus for highly engaged contributions.
pub fn engagement_bonus(engagement_count: u32, rules: &RankingRules) -> u32 {
    if engagement_count >= rules.engagement_threshold {
        rules.engagement_bonus
    } else {
        0
    }
}

/// Display tier for a position match.
///
/// A matched rule decides the tier on its own. Engagement is consulted only
/// when no rule matched, to lift engaged unknowns to [`Tier::Medium`].
pub fn assign_tier(
    position: Option<&PositionMatch>,
    engagement_count: u32,
    rules: &RankingRules,
) -> Tier {
    match position {
        Some(m) => m.tier,
        None if engagement_count >= rules.engagement_threshold => Tier::Medium,
        None => Tier::Low,
    }
}

/// Score a record from scratch.
pub fn score_record(record: &ContributorRecord, rules: &RankingRules) -> ScoreBreakdown {
    let position = score_position(&record.title, rules);
    ScoreBreakdown {
        position,
        encryption_bonus: encryption_bonus(&record.body, rules),
        engagement_bonus: engagement_bonus(record.engagement_count, rules),
        tier: assign_tier(position.as_ref(), record.engagement_count, rules),
    }
}
