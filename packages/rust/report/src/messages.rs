//! Templated outreach messages.

use prospector_shared::{OutreachConfig, ScoredProspect};

/// Hard limit for connection-request notes.
pub const CONNECTION_MESSAGE_LIMIT: usize = 300;

/// Greeting name: the first token of the display name.
///
/// Scraped names sometimes carry a glued-on "Follow" button label, which is
/// removed. Falls back to `"there"`.
pub fn first_name(name: &str) -> String {
    let token = name.split_whitespace().next().unwrap_or_default();
    let token = token.strip_suffix("Follow").unwrap_or(token).trim();
    if token.is_empty() {
        "there".to_string()
    } else {
        token.to_string()
    }
}

/// Short note sent with a connection request.
///
/// Uses the full topic when it fits in [`CONNECTION_MESSAGE_LIMIT`]
/// characters, otherwise the short topic; the result is cut to the limit as a
/// last resort.
pub fn connection_message(prospect: &ScoredProspect, outreach: &OutreachConfig) -> String {
    let first = first_name(&prospect.record.name);
    let full = connection_text(&first, &format!("'{}'", outreach.topic), outreach);
    if full.chars().count() <= CONNECTION_MESSAGE_LIMIT {
        return full;
    }

    let short = connection_text(&first, &outreach.short_topic, outreach);
    if short.chars().count() <= CONNECTION_MESSAGE_LIMIT {
        return short;
    }
    short.chars().take(CONNECTION_MESSAGE_LIMIT).collect()
}

fn connection_text(first: &str, topic: &str, outreach: &OutreachConfig) -> String {
    format!(
        "Dear {first}, I read your response to {topic} - your insights resonated with me. \
         I'm {role} of {company}, {blurb}. Would love to connect. Best, {sender}",
        role = outreach.sender_role,
        company = outreach.company,
        blurb = outreach.company_blurb,
        sender = outreach.sender_name,
    )
}

/// Longer message for after the connection is accepted, built around the
/// prospect's technical focus.
pub fn follow_up_message(prospect: &ScoredProspect, outreach: &OutreachConfig) -> String {
    let first = first_name(&prospect.record.name);

    let mut message = format!("Dear {first},\n\n");
    message.push_str(&format!(
        "Thanks for connecting! Your response to {} really resonated with me.\n\n",
        outreach.short_topic
    ));

    if !prospect.technical_focus.is_empty() {
        message.push_str("What particularly caught my attention was your emphasis on:\n");
        for tag in prospect.technical_focus.iter().take(3) {
            message.push_str(&format!("• {tag}\n"));
        }
        message.push('\n');
    }

    message.push_str(&outreach.pitch);
    message.push_str("\n\n");
    message.push_str("I'd love to hear how you approach this in practice.\n\n");
    message.push_str("Would you be open to a 15-minute call?\n\n");
    message.push_str(&format!("Best,\n{}", outreach.sender_name));

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use prospector_shared::{ContributorRecord, Tier};

    fn prospect(name: &str, focus: &[&str]) -> ScoredProspect {
        ScoredProspect {
            record: ContributorRecord::new(name, "CTO", "", 0),
            score: 100,
            tier: Tier::High,
            position_rank: Some(1),
            technical_focus: focus.iter().map(|s| (*s).to_string()).collect(),
            merged_comment_count: 1,
        }
    }

    #[test]
    fn first_name_cleanup() {
        assert_eq!(first_name("Nebojsha Antic"), "Nebojsha");
        assert_eq!(first_name("  M.R.K. Krishna Rao"), "M.R.K.");
        assert_eq!(first_name("AnnaFollow"), "Anna");
        assert_eq!(first_name("Follow"), "there");
        assert_eq!(first_name(""), "there");
    }

    #[test]
    fn connection_message_uses_full_topic_when_it_fits() {
        let outreach = OutreachConfig {
            topic: "Securing AI vendors".into(),
            ..OutreachConfig::default()
        };
        let msg = connection_message(&prospect("Ann Lee", &[]), &outreach);
        assert!(msg.starts_with("Dear Ann, I read your response to 'Securing AI vendors'"));
        assert!(msg.ends_with(&format!("Best, {}", outreach.sender_name)));
    }

    #[test]
    fn connection_message_falls_back_to_short_topic() {
        let outreach = OutreachConfig {
            topic: "x".repeat(400),
            ..OutreachConfig::default()
        };
        let msg = connection_message(&prospect("Ann", &[]), &outreach);
        assert!(msg.contains(&outreach.short_topic));
        assert!(msg.chars().count() <= CONNECTION_MESSAGE_LIMIT);
    }

    #[test]
    fn connection_message_never_exceeds_limit() {
        let outreach = OutreachConfig {
            topic: "é".repeat(400),
            short_topic: "ü".repeat(400),
            ..OutreachConfig::default()
        };
        let msg = connection_message(&prospect("Ann", &[]), &outreach);
        assert_eq!(msg.chars().count(), CONNECTION_MESSAGE_LIMIT);
    }

    #[test]
    fn follow_up_lists_focus_bullets() {
        let outreach = OutreachConfig::default();
        let msg = follow_up_message(
            &prospect("Ann Lee", &["encryption", "vendor audits"]),
            &outreach,
        );
        assert!(msg.starts_with("Dear Ann,\n\n"));
        assert!(msg.contains("• encryption\n• vendor audits\n"));
        assert!(msg.contains(&outreach.pitch));
        assert!(msg.ends_with(&outreach.sender_name));
    }

    #[test]
    fn follow_up_without_focus_omits_section() {
        let msg = follow_up_message(&prospect("Ann", &[]), &OutreachConfig::default());
        assert!(!msg.contains("caught my attention"));
        assert!(!msg.contains('•'));
    }
}
