//! CSV tracking sheet for outreach status.

use prospector_shared::ScoredProspect;

/// Column names, in order. The last four are left blank for manual tracking.
pub const CSV_HEADER: [&str; 13] = [
    "Priority",
    "Name",
    "Title",
    "Profile",
    "Score",
    "Engagement",
    "Technical Focus",
    "Activity Level",
    "Comment Count",
    "Connection Status",
    "Follow-up Status",
    "Notes",
    "Last Contact Date",
];

/// Render the tracking sheet, one row per prospect in rank order.
pub fn render_csv(prospects: &[ScoredProspect]) -> String {
    let mut out = CSV_HEADER.join(",");
    out.push('\n');

    for prospect in prospects {
        let record = &prospect.record;
        let row = [
            prospect.tier.as_str().to_string(),
            record.name.trim().to_string(),
            record.title.trim().to_string(),
            record.profile_url.clone().unwrap_or_default(),
            prospect.score.to_string(),
            record.engagement_count.to_string(),
            prospect.technical_focus.join("; "),
            prospect.activity_level().to_string(),
            prospect.merged_comment_count.to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ];
        let fields: Vec<String> = row.iter().map(|f| quote(f)).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }

    out
}

/// RFC 4180 quoting: always wrap, double embedded quotes.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
