//! Record validation and identity keys.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use prospector_shared::{ContributorRecord, ProspectorError, Result};

/// Deduplication key: normalized name plus normalized profile, if any.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    /// Lower-cased name with all whitespace removed.
    pub name: String,
    /// Normalized profile reference.
    pub profile: Option<String>,
}

impl std::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.profile {
            Some(profile) => write!(f, "{}@{}", self.name, profile),
            None => f.write_str(&self.name),
        }
    }
}

/// A validated record carrying its identity and merge bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    /// The record as supplied (display name untouched).
    pub record: ContributorRecord,
    /// Identity used for deduplication.
    pub identity: IdentityKey,
    /// Raw contributions represented by this record.
    pub merged_comment_count: u32,
    /// Position of the (first) source record in the input.
    pub input_index: usize,
}

/// Validate a record and compute its identity key.
///
/// Fails with a validation error when the name is blank; callers drop such
/// records and keep going.
pub fn normalize(record: ContributorRecord, input_index: usize) -> Result<NormalizedRecord> {
    let name = normalize_name(&record.name);
    if name.is_empty() {
        return Err(ProspectorError::validation(format!(
            "contributor #{} has an empty name",
            input_index + 1
        )));
    }

    let profile = record
        .profile_url
        .as_deref()
        .and_then(normalize_profile_url);

    Ok(NormalizedRecord {
        record,
        identity: IdentityKey { name, profile },
        merged_comment_count: 1,
        input_index,
    })
}

/// Lower-case a name and drop all whitespace, so `" J. Doe "` and `"j.doe"`
/// compare equal.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<String>().to_lowercase()
}

/// Reduce a profile URL to a stable reference.
///
/// LinkedIn `/in/<slug>` links become `linkedin:<slug>` regardless of the
/// regional subdomain or tracking parameters. Other URLs become lower-cased
/// host + path without query or fragment. Anything unparseable is trimmed and
/// lower-cased. Returns `None` for blank input.
pub fn normalize_profile_url(raw: &str) -> Option<String> {
    static LINKEDIN_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)linkedin\.com/in/([a-z0-9\-_%]+)").expect("valid regex")
    });

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(caps) = LINKEDIN_SLUG_RE.captures(trimmed) {
        return Some(format!("linkedin:{}", caps[1].to_lowercase()));
    }

    match Url::parse(trimmed) {
        Ok(url) => {
            let host = url.host_str().unwrap_or_default().to_lowercase();
            let path = url.path().trim_end_matches('/').to_lowercase();
            Some(format!("{host}{path}"))
        }
        Err(_) => Some(trimmed.to_lowercase()),
    }
}
