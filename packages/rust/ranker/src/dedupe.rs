//! Merge records that share an identity key.

use std::collections::HashMap;

use tracing::debug;

use prospector_shared::RankingRules;

use crate::normalize::{IdentityKey, NormalizedRecord};
use crate::scoring::score_position;

/// Collapse records with the same identity into one, in first-seen order.
///
/// For each group:
/// - distinct non-empty bodies are joined with `rules.merge_separator`,
/// - `engagement_count` is the group maximum,
/// - `merged_comment_count` is the sum of the members' counts,
/// - the title comes from the member with the most position points
///   (ties go to the earliest member),
/// - name, profile URL and input index come from the first member.
///
/// Running this on its own output returns it unchanged.
pub fn deduplicate(records: Vec<NormalizedRecord>, rules: &RankingRules) -> Vec<NormalizedRecord> {
    let mut order: Vec<IdentityKey> = Vec::new();
    let mut groups: HashMap<IdentityKey, Vec<NormalizedRecord>> = HashMap::new();

    for record in records {
        let key = record.identity.clone();
        groups
            .entry(key)
            .or_insert_with_key(|k| {
                order.push(k.clone());
                Vec::new()
            })
            .push(record);
    }

    order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .map(|group| merge_group(group, rules))
        .collect()
}

fn merge_group(mut group: Vec<NormalizedRecord>, rules: &RankingRules) -> NormalizedRecord {
    if group.len() == 1 {
        return group.remove(0);
    }

    let best_title = group
        .iter()
        .map(|member| {
            let points = score_position(&member.record.title, rules).map_or(0, |m| m.points);
            (points, member.record.title.as_str())
        })
        .fold(None::<(u32, &str)>, |best, candidate| match best {
            Some(b) if b.0 >= candidate.0 => Some(b),
            _ => Some(candidate),
        })
        .map(|(_, title)| title.to_string())
        .unwrap_or_default();

    let mut bodies: Vec<&str> = Vec::new();
    for member in &group {
        let body = member.record.body.as_str();
        if !body.trim().is_empty() && !bodies.contains(&body) {
            bodies.push(body);
        }
    }
    let body = bodies.join(&rules.merge_separator);

    let engagement_count = group
        .iter()
        .map(|m| m.record.engagement_count)
        .max()
        .unwrap_or(0);
    let merged_comment_count = group
        .iter()
        .map(|m| m.merged_comment_count)
        .fold(0u32, u32::saturating_add);
    let input_index = group.iter().map(|m| m.input_index).min().unwrap_or(0);

    debug!(
        identity = %group[0].identity,
        members = group.len(),
        merged_comment_count,
        "merged duplicate contributors"
    );

    let mut merged = group.swap_remove(0);
    merged.record.title = best_title;
    merged.record.body = body;
    merged.record.engagement_count = engagement_count;
    merged.merged_comment_count = merged_comment_count;
    merged.input_index = input_index;
    merged
}
