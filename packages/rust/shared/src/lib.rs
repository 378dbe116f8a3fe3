//! Shared types, error model, and configuration for Prospector.
//!
//! This crate is the foundation depended on by all other Prospector crates.
//! It provides:
//! - [`ProspectorError`]: the unified error type
//! - Domain types ([`ContributorRecord`], [`ScoredProspect`], [`Tier`], [`RunId`])
//! - Ranking tables ([`RankingRules`], [`PositionRule`], [`FocusTopic`])
//! - Configuration ([`AppConfig`], [`OutreachConfig`], config loading)

pub mod config;
pub mod error;
pub mod rules;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, OutreachConfig, config_dir, config_file_path, init_config,
    init_config_at, load_config, load_config_from, load_rules_from,
};
pub use error::{ProspectorError, Result};
pub use rules::{FocusTopic, PositionRule, RankingRules};
pub use types::{
    CURRENT_SCHEMA_VERSION, ContributorRecord, ProspectExport, RunId, ScoredProspect, Tier,
};
