//! Application configuration for Prospector.
//!
//! User config lives at `~/.prospector/prospector.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ProspectorError, Result};
use crate::rules::RankingRules;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "prospector.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".prospector";

// ---------------------------------------------------------------------------
// Config structs (matching prospector.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Outreach message template fields.
    #[serde(default)]
    pub outreach: OutreachConfig,

    /// Scoring tables.
    #[serde(default)]
    pub ranking: RankingRules,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Root directory for date-partitioned run outputs.
    #[serde(default = "default_results_dir")]
    pub results_dir: String,

    /// Free-text description of where contributors were collected.
    #[serde(default = "default_source_label")]
    pub source_label: String,

    /// Days of results kept before `results archive` moves them away.
    #[serde(default = "default_days_to_keep")]
    pub days_to_keep: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            source_label: default_source_label(),
            days_to_keep: default_days_to_keep(),
        }
    }
}

fn default_results_dir() -> String {
    "results".into()
}
fn default_source_label() -> String {
    "AI security discussion contributors".into()
}
fn default_days_to_keep() -> u32 {
    30
}

/// `[outreach]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutreachConfig {
    /// Signature on every message.
    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    /// Sender's role at the company (e.g. "founder").
    #[serde(default = "default_sender_role")]
    pub sender_role: String,

    /// Company name.
    #[serde(default = "default_company")]
    pub company: String,

    /// One-line company description used in connection requests.
    #[serde(default = "default_company_blurb")]
    pub company_blurb: String,

    /// Paragraph used in follow-ups after the focus bullets.
    #[serde(default = "default_pitch")]
    pub pitch: String,

    /// The discussion the prospect contributed to, quoted in full.
    #[serde(default = "default_topic")]
    pub topic: String,

    /// Short form of `topic` used when the full message would be too long.
    #[serde(default = "default_short_topic")]
    pub short_topic: String,
}

impl Default for OutreachConfig {
    fn default() -> Self {
        Self {
            sender_name: default_sender_name(),
            sender_role: default_sender_role(),
            company: default_company(),
            company_blurb: default_company_blurb(),
            pitch: default_pitch(),
            topic: default_topic(),
            short_topic: default_short_topic(),
        }
    }
}

fn default_sender_name() -> String {
    "Alex".into()
}
fn default_sender_role() -> String {
    "founder".into()
}
fn default_company() -> String {
    "our company".into()
}
fn default_company_blurb() -> String {
    "a startup focused on AI data security".into()
}
fn default_pitch() -> String {
    "Your insights align closely with what we are building: end-to-end encryption \
     for AI data shared with external vendors."
        .into()
}
fn default_topic() -> String {
    "Your AI models face data privacy risks from external vendors. \
     How can you protect their integrity?"
        .into()
}
fn default_short_topic() -> String {
    "the AI data privacy question".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.prospector/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ProspectorError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.prospector/prospector.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ProspectorError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        ProspectorError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.ranking.validate()?;

    Ok(config)
}

/// Load a standalone ranking rules file (same schema as `[ranking]`).
pub fn load_rules_from(path: &Path) -> Result<RankingRules> {
    let content = std::fs::read_to_string(path).map_err(|e| ProspectorError::io(path, e))?;

    let rules: RankingRules = toml::from_str(&content).map_err(|e| {
        ProspectorError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    rules.validate()?;

    Ok(rules)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    init_config_at(&config_file_path()?)
}

/// Write a default config file to `path`, creating parent directories.
pub fn init_config_at(path: &Path) -> Result<PathBuf> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ProspectorError::io(dir, e))?;
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ProspectorError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ProspectorError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path.to_path_buf())
}
