//! Core domain types for prospect ranking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Current schema version for the exported prospects JSON.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one ranking run (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// Coarse priority bucket used for outreach triage.
///
/// Derived from the position rule alone; score bonuses never move a prospect
/// between tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    /// C-level, founders, VPs and directors.
    High,
    /// Partnerships, business development and sales.
    Business,
    /// Compliance, legal, product and marketing.
    MediumHigh,
    /// No recognizable position but a highly engaged contributor.
    Medium,
    /// Everyone else.
    Low,
}

impl Tier {
    /// All tiers, most important first.
    pub const ALL: [Tier; 5] = [
        Tier::High,
        Tier::Business,
        Tier::MediumHigh,
        Tier::Medium,
        Tier::Low,
    ];

    /// Stable machine label (matches the serialized form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::High => "HIGH",
            Tier::Business => "BUSINESS",
            Tier::MediumHigh => "MEDIUM_HIGH",
            Tier::Medium => "MEDIUM",
            Tier::Low => "LOW",
        }
    }

    /// Human-readable label for reports.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::High => "High priority",
            Tier::Business => "Business development",
            Tier::MediumHigh => "Medium-high priority",
            Tier::Medium => "Medium priority",
            Tier::Low => "Low priority",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ContributorRecord
// ---------------------------------------------------------------------------

/// A raw contributor as handed over by the extraction step.
///
/// Field aliases accept the scraper's legacy key names (`answer`, `likes`,
/// `linkedin_profile`). A missing or null name deserializes as empty so the
/// ranker can drop the record instead of failing the whole file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorRecord {
    /// Display name, as scraped.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: String,
    /// Free-text headline or job title.
    #[serde(default, deserialize_with = "deserialize_text")]
    pub title: String,
    /// Comment or answer content.
    #[serde(default, alias = "answer", deserialize_with = "deserialize_text")]
    pub body: String,
    /// Likes or reactions on the contribution.
    #[serde(
        default,
        alias = "likes",
        deserialize_with = "deserialize_engagement"
    )]
    pub engagement_count: u32,
    /// Profile link, if one was resolved.
    #[serde(
        default,
        alias = "linkedin_profile",
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_url: Option<String>,
}

impl ContributorRecord {
    /// Build a record without a profile URL.
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        engagement_count: u32,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            body: body.into(),
            engagement_count,
            profile_url: None,
        }
    }

    /// Attach a profile URL.
    pub fn with_profile_url(mut self, url: impl Into<String>) -> Self {
        self.profile_url = Some(url.into());
        self
    }
}

/// Accepts `47`, `"47"`, `"47 likes"`, `""` or `null`. Negative counts
/// clamp to zero.
fn deserialize_engagement<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Count(u64),
        Signed(i64),
        Text(String),
    }

    let count = match Option::<Raw>::deserialize(deserializer)? {
        None | Some(Raw::Signed(_)) => 0,
        Some(Raw::Count(n)) => n,
        Some(Raw::Text(s)) => {
            let digits: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse::<u64>().unwrap_or(0)
        }
    };

    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

/// Null reads as empty; the text itself is kept as scraped.
fn deserialize_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_optional_text<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

// ---------------------------------------------------------------------------
// ScoredProspect
// ---------------------------------------------------------------------------

/// A ranked, deduplicated prospect.
///
/// `score` drives ordering and includes bonuses; `tier` is computed
/// separately from the position rule only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredProspect {
    /// The (possibly merged) contributor.
    #[serde(flatten)]
    pub record: ContributorRecord,
    /// Position points plus encryption and engagement bonuses.
    pub score: u32,
    /// Display bucket.
    pub tier: Tier,
    /// 1-based index of the matching position rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_rank: Option<usize>,
    /// Up to three topic tags, in order of first mention.
    #[serde(default)]
    pub technical_focus: Vec<String>,
    /// Number of raw contributions folded into this prospect.
    pub merged_comment_count: u32,
}

impl ScoredProspect {
    /// Activity label derived from the number of merged contributions.
    pub fn activity_level(&self) -> &'static str {
        match self.merged_comment_count {
            n if n >= 3 => "Very Active",
            2 => "Active",
            _ => "Single Comment",
        }
    }
}

// ---------------------------------------------------------------------------
// ProspectExport
// ---------------------------------------------------------------------------

/// The `prospects_<ts>.json` document written for each run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProspectExport {
    /// Schema version for forward compatibility.
    pub schema_version: u32,
    /// Run that produced this export.
    pub run_id: RunId,
    /// Where the contributors came from (free text).
    pub source: String,
    /// Tool version that produced the export.
    pub tool_version: String,
    /// When the export was generated.
    pub generated_at: DateTime<Utc>,
    /// Raw records read from the input.
    pub input_count: usize,
    /// Records dropped during validation.
    pub dropped_count: usize,
    /// Ranked prospects, best first.
    pub prospects: Vec<ScoredProspect>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_roundtrip() {
        let id = RunId::new();
        let parsed: RunId = id.to_string().parse().expect("parse RunId");
        assert_eq!(id, parsed);
    }

    #[test]
    fn tier_serializes_screaming_snake() {
        let json = serde_json::to_string(&Tier::MediumHigh).expect("serialize");
        assert_eq!(json, "\"MEDIUM_HIGH\"");
        let parsed: Tier = serde_json::from_str("\"BUSINESS\"").expect("deserialize");
        assert_eq!(parsed, Tier::Business);
        assert_eq!(Tier::MediumHigh.to_string(), "MEDIUM_HIGH");
    }

    #[test]
    fn record_accepts_legacy_scraper_keys() {
        let json = r#"{
            "name": "Nebojsha Antic",
            "title": "Senior Data Analyst",
            "answer": "Conduct thorough vendor audits.",
            "likes": "47",
            "linkedin_profile": "https://mk.linkedin.com/in/nebojsha-antic-24aaab223"
        }"#;
        let record: ContributorRecord = serde_json::from_str(json).expect("deserialize");
        assert_eq!(record.body, "Conduct thorough vendor audits.");
        assert_eq!(record.engagement_count, 47);
        assert!(record.profile_url.is_some());
    }

    #[test]
    fn record_engagement_variants() {
        let cases = [
            (r#"{"name":"a","engagement_count":12}"#, 12),
            (r#"{"name":"a","engagement_count":"12 likes"}"#, 12),
            (r#"{"name":"a","engagement_count":""}"#, 0),
            (r#"{"name":"a","engagement_count":null}"#, 0),
            (r#"{"name":"a","likes":-1}"#, 0),
            (r#"{"name":"a"}"#, 0),
        ];
        for (json, expected) in cases {
            let record: ContributorRecord = serde_json::from_str(json).expect(json);
            assert_eq!(record.engagement_count, expected, "{json}");
        }
    }

    #[test]
    fn record_blank_profile_is_absent_and_missing_name_is_empty() {
        let record: ContributorRecord =
            serde_json::from_str(r#"{"title":"CTO","profile_url":"  "}"#).expect("deserialize");
        assert_eq!(record.name, "");
        assert_eq!(record.profile_url, None);
    }

    #[test]
    fn record_null_text_fields_read_as_empty() {
        let record: ContributorRecord =
            serde_json::from_str(r#"{"name":null,"title":null,"answer":null,"likes":3}"#)
                .expect("deserialize");
        assert_eq!(record.name, "");
        assert_eq!(record.title, "");
        assert_eq!(record.body, "");
        assert_eq!(record.engagement_count, 3);
    }

    #[test]
    fn prospect_flattens_record_fields() {
        let prospect = ScoredProspect {
            record: ContributorRecord::new("A. Smith", "VP of Security", "encryption", 5),
            score: 110,
            tier: Tier::High,
            position_rank: Some(3),
            technical_focus: vec!["encryption".into()],
            merged_comment_count: 1,
        };
        let value = serde_json::to_value(&prospect).expect("serialize");
        assert_eq!(value["name"], "A. Smith");
        assert_eq!(value["tier"], "HIGH");
        assert!(value.get("profile_url").is_none());

        let parsed: ScoredProspect = serde_json::from_value(value).expect("deserialize");
        assert_eq!(parsed, prospect);
    }

    #[test]
    fn activity_level_thresholds() {
        let mut prospect = ScoredProspect {
            record: ContributorRecord::new("x", "", "", 0),
            score: 0,
            tier: Tier::Low,
            position_rank: None,
            technical_focus: vec![],
            merged_comment_count: 1,
        };
        assert_eq!(prospect.activity_level(), "Single Comment");
        prospect.merged_comment_count = 2;
        assert_eq!(prospect.activity_level(), "Active");
        prospect.merged_comment_count = 5;
        assert_eq!(prospect.activity_level(), "Very Active");
    }
}
