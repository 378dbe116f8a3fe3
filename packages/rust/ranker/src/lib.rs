//! Prospect ranking: turns raw contributor records into a deduplicated,
//! score-ordered list of prospects.
//!
//! Pipeline: [`normalize`] → [`deduplicate`] → [`score_record`] → sort,
//! with tiers from [`assign_tier`] and tags from [`extract_technical_focus`].
//! Every function is pure and takes the keyword tables as a
//! [`RankingRules`](prospector_shared::RankingRules) reference.

pub mod dedupe;
pub mod focus;
pub mod normalize;
pub mod rank;
pub mod scoring;

pub use dedupe::deduplicate;
pub use focus::extract_technical_focus;
pub use normalize::{IdentityKey, NormalizedRecord, normalize, normalize_name, normalize_profile_url};
pub use rank::{RankReport, Ranking, rank, rank_with_report};
pub use scoring::{
    PositionMatch, ScoreBreakdown, assign_tier, encryption_bonus, engagement_bonus,
    score_position, score_record,
};
