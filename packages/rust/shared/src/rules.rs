//! Keyword tables that drive prospect scoring.
//!
//! The tables are plain data: the ranker receives a `&RankingRules` and never
//! mutates it. [`RankingRules::default`] carries the stock tables; a
//! `[ranking]` config section or a standalone rules file may replace them.
//!
//! All keywords are matched as lower-case substrings, so every keyword in a
//! table must itself be lower-case (checked by [`RankingRules::validate`]).

use serde::{Deserialize, Serialize};

use crate::error::{ProspectorError, Result};
use crate::types::Tier;

/// One row of the ordered position table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRule {
    /// Short name for logs and reports (e.g. `"c-level"`).
    pub label: String,
    /// Any of these substrings in a title selects the rule.
    pub keywords: Vec<String>,
    /// Points contributed to the score.
    pub points: u32,
    /// Display bucket for titles matching this rule.
    pub tier: Tier,
}

impl PositionRule {
    fn new(label: &str, keywords: &[&str], points: u32, tier: Tier) -> Self {
        Self {
            label: label.into(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            points,
            tier,
        }
    }
}

/// A technical-focus tag and the phrases that trigger it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusTopic {
    /// Tag emitted when any phrase matches.
    pub tag: String,
    /// Trigger phrases.
    pub phrases: Vec<String>,
}

impl FocusTopic {
    fn new(tag: &str, phrases: &[&str]) -> Self {
        Self {
            tag: tag.into(),
            phrases: phrases.iter().map(|p| (*p).to_string()).collect(),
        }
    }
}

/// Immutable scoring configuration.
///
/// Scalar fields come before the table arrays so the struct serializes to
/// valid TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingRules {
    /// Substrings in a body that earn the encryption bonus.
    #[serde(default = "default_encryption_terms")]
    pub encryption_terms: Vec<String>,

    /// Points for mentioning encryption.
    #[serde(default = "default_encryption_bonus")]
    pub encryption_bonus: u32,

    /// Engagement count at or above which the engagement bonus applies.
    #[serde(default = "default_engagement_threshold")]
    pub engagement_threshold: u32,

    /// Points for high engagement.
    #[serde(default = "default_engagement_bonus")]
    pub engagement_bonus: u32,

    /// Maximum number of technical-focus tags per prospect.
    #[serde(default = "default_max_focus_tags")]
    pub max_focus_tags: usize,

    /// Separator placed between merged bodies.
    #[serde(default = "default_merge_separator")]
    pub merge_separator: String,

    /// Ordered position table; first match wins.
    #[serde(default = "default_position_rules")]
    pub position_rules: Vec<PositionRule>,

    /// Technical-focus vocabulary.
    #[serde(default = "default_focus_topics")]
    pub focus_topics: Vec<FocusTopic>,
}

impl Default for RankingRules {
    fn default() -> Self {
        Self {
            encryption_terms: default_encryption_terms(),
            encryption_bonus: default_encryption_bonus(),
            engagement_threshold: default_engagement_threshold(),
            engagement_bonus: default_engagement_bonus(),
            max_focus_tags: default_max_focus_tags(),
            merge_separator: default_merge_separator(),
            position_rules: default_position_rules(),
            focus_topics: default_focus_topics(),
        }
    }
}

impl RankingRules {
    /// Reject tables the matcher cannot honour: empty keyword lists, blank or
    /// non-lower-case keywords.
    pub fn validate(&self) -> Result<()> {
        for (i, rule) in self.position_rules.iter().enumerate() {
            if rule.keywords.is_empty() {
                return Err(ProspectorError::validation(format!(
                    "position rule {} ({}) has no keywords",
                    i + 1,
                    rule.label
                )));
            }
            check_terms(&format!("position rule {}", rule.label), &rule.keywords)?;
        }

        check_terms("encryption_terms", &self.encryption_terms)?;

        for topic in &self.focus_topics {
            if topic.phrases.is_empty() {
                return Err(ProspectorError::validation(format!(
                    "focus topic '{}' has no phrases",
                    topic.tag
                )));
            }
            check_terms(&format!("focus topic {}", topic.tag), &topic.phrases)?;
        }

        Ok(())
    }
}

fn check_terms(context: &str, terms: &[String]) -> Result<()> {
    for term in terms {
        if term.trim().is_empty() {
            return Err(ProspectorError::validation(format!(
                "{context}: blank keyword"
            )));
        }
        if term.to_lowercase() != *term {
            return Err(ProspectorError::validation(format!(
                "{context}: keyword '{term}' must be lower-case"
            )));
        }
    }
    Ok(())
}

fn default_encryption_terms() -> Vec<String> {
    ["encryption", "encrypt", "homomorphic", "end-to-end encrypted"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_encryption_bonus() -> u32 {
    20
}
fn default_engagement_threshold() -> u32 {
    20
}
fn default_engagement_bonus() -> u32 {
    45
}
fn default_max_focus_tags() -> usize {
    3
}
fn default_merge_separator() -> String {
    "\n\n---\n\n".into()
}

fn default_position_rules() -> Vec<PositionRule> {
    vec![
        PositionRule::new("c-level", &["ceo", "cto", "cfo", "chief"], 100, Tier::High),
        PositionRule::new("founder", &["founder", "co-founder"], 95, Tier::High),
        PositionRule::new(
            "vp-director",
            &["vp", "vice president", "director", "head of"],
            90,
            Tier::High,
        ),
        PositionRule::new(
            "business",
            &["partnership", "business development", "sales"],
            85,
            Tier::Business,
        ),
        PositionRule::new(
            "compliance-legal",
            &["compliance", "legal", "counsel"],
            85,
            Tier::MediumHigh,
        ),
        PositionRule::new(
            "product-marketing",
            &["product", "marketing"],
            80,
            Tier::MediumHigh,
        ),
        PositionRule::new(
            "research",
            &["professor", "researcher", "research scientist"],
            70,
            Tier::Low,
        ),
        PositionRule::new(
            "public-sector",
            &["government", "defense", "policy"],
            65,
            Tier::Low,
        ),
        PositionRule::new("startup", &["startup", "entrepreneur"], 60, Tier::Low),
        PositionRule::new("senior", &["senior", "lead", "principal"], 50, Tier::Low),
        PositionRule::new(
            "technical",
            &["engineer", "developer", "analyst"],
            30,
            Tier::Low,
        ),
    ]
}

fn default_focus_topics() -> Vec<FocusTopic> {
    vec![
        FocusTopic::new(
            "encryption",
            &["encrypt", "data at rest", "at-rest", "in transit", "in-transit"],
        ),
        FocusTopic::new("vendor audits", &["vendor audit", "audit", "due diligence"]),
        FocusTopic::new(
            "access controls",
            &["access control", "authentication", "authorization", "least privilege"],
        ),
        FocusTopic::new(
            "data anonymization",
            &[
                "anonymiz",
                "anonymis",
                "pseudonymiz",
                "data masking",
                "differential privacy",
            ],
        ),
        FocusTopic::new("continuous monitoring", &["monitor", "real-time", "threat detection"]),
        FocusTopic::new("contractual clauses", &["contract", "clause", "agreement"]),
        FocusTopic::new(
            "API security",
            &["api security", "api key", "api gateway", "apis", "endpoint"],
        ),
        FocusTopic::new(
            "incident response",
            &["incident", "breach", "response plan"],
        ),
        FocusTopic::new("zero-trust architecture", &["zero-trust", "zero trust"]),
        FocusTopic::new("federated learning", &["federated"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_validate() {
        RankingRules::default().validate().expect("stock tables are valid");
    }

    #[test]
    fn default_position_table_shape() {
        let rules = RankingRules::default();
        assert_eq!(rules.position_rules.len(), 11);
        assert_eq!(rules.position_rules[0].points, 100);
        assert_eq!(rules.position_rules[2].tier, Tier::High);
        assert_eq!(rules.position_rules[3].tier, Tier::Business);
        assert_eq!(rules.position_rules[10].points, 30);
    }

    #[test]
    fn uppercase_keyword_rejected() {
        let mut rules = RankingRules::default();
        rules.position_rules[0].keywords.push("CEO".into());
        let err = rules.validate().unwrap_err();
        assert!(err.to_string().contains("must be lower-case"));
    }

    #[test]
    fn empty_keyword_list_rejected() {
        let mut rules = RankingRules::default();
        rules.focus_topics[0].phrases.clear();
        assert!(rules.validate().is_err());
    }

    #[test]
    fn rules_toml_roundtrip() {
        let rules = RankingRules::default();
        let text = toml::to_string_pretty(&rules).expect("serialize rules");
        assert!(text.contains("[[position_rules]]"));
        let parsed: RankingRules = toml::from_str(&text).expect("deserialize rules");
        assert_eq!(parsed, rules);
    }

    #[test]
    fn partial_rules_fill_defaults() {
        let parsed: RankingRules =
            toml::from_str("engagement_bonus = 10\n").expect("deserialize partial");
        assert_eq!(parsed.engagement_bonus, 10);
        assert_eq!(parsed.position_rules.len(), 11);
        assert_eq!(parsed.encryption_bonus, 20);
    }
}
