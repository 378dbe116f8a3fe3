//! Markdown prospect report.

use std::fmt::Write as _;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use prospector_shared::{OutreachConfig, ScoredProspect, Tier};

use crate::messages::{connection_message, follow_up_message};

/// Run-level facts shown in the report header.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    /// Where the contributors came from.
    pub source: String,
    /// Records read from the input.
    pub input_count: usize,
    /// Records dropped during validation.
    pub dropped_count: usize,
    /// Generation time.
    pub generated_at: DateTime<Utc>,
}

/// Render the full report: header, priority summary, one section per
/// prospect, engagement summary.
pub fn render_markdown(
    prospects: &[ScoredProspect],
    meta: &ReportMeta,
    outreach: &OutreachConfig,
) -> String {
    let mut out = String::new();

    render_header(&mut out, prospects, meta, outreach);
    render_priority_summary(&mut out, prospects);

    for (i, prospect) in prospects.iter().enumerate() {
        render_prospect(&mut out, i + 1, prospect, outreach);
    }

    render_engagement_summary(&mut out, prospects);
    out
}

// Writing to a String cannot fail; the `let _ =` below discards fmt::Result.

fn render_header(
    out: &mut String,
    prospects: &[ScoredProspect],
    meta: &ReportMeta,
    outreach: &OutreachConfig,
) {
    let _ = writeln!(out, "# Outreach Prospects (Sorted by Relevance)\n");
    let _ = writeln!(out, "**Source:** {}", meta.source);
    let _ = writeln!(out, "**Question:** {}", outreach.topic);
    let _ = writeln!(
        out,
        "**Total Prospects:** {} (from {} contributions, {} dropped)",
        prospects.len(),
        meta.input_count,
        meta.dropped_count
    );
    let _ = writeln!(
        out,
        "**Generated:** {}\n",
        meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    out.push_str("---\n\n");
}

fn render_priority_summary(out: &mut String, prospects: &[ScoredProspect]) {
    out.push_str("## Priority Summary\n\n");
    out.push_str("| Tier | Prospects |\n|---|---|\n");
    for tier in Tier::ALL {
        let count = prospects.iter().filter(|p| p.tier == tier).count();
        let _ = writeln!(out, "| {} | {count} |", tier.label());
    }

    let encryption = prospects
        .iter()
        .filter(|p| p.technical_focus.iter().any(|t| t == "encryption"))
        .count();
    let _ = writeln!(out, "\n**Prospects focused on encryption:** {encryption}\n");
    out.push_str("---\n\n");
}

fn render_prospect(
    out: &mut String,
    position: usize,
    prospect: &ScoredProspect,
    outreach: &OutreachConfig,
) {
    let record = &prospect.record;

    let _ = writeln!(
        out,
        "## {position}. {} [{}]\n",
        record.name.trim(),
        prospect.tier.label()
    );
    let _ = writeln!(
        out,
        "**Profile:** {}\n",
        record.profile_url.as_deref().unwrap_or("not found")
    );
    let title = if record.title.trim().is_empty() {
        "unknown"
    } else {
        record.title.trim()
    };
    let _ = writeln!(out, "**Title:** {title}\n");
    let _ = writeln!(out, "**Score:** {}\n", prospect.score);
    let _ = writeln!(out, "**Engagement:** {} likes\n", record.engagement_count);
    let _ = writeln!(
        out,
        "**Activity Level:** {} ({} comments)\n",
        prospect.activity_level(),
        prospect.merged_comment_count
    );
    if !prospect.technical_focus.is_empty() {
        let _ = writeln!(
            out,
            "**Technical Focus:** {}\n",
            prospect.technical_focus.join(", ")
        );
    }

    out.push_str("### Their Answer\n\n");
    out.push_str(&blockquote(&record.body));
    out.push_str("\n\n");

    out.push_str("### Connection Message\n\n```\n");
    out.push_str(&connection_message(prospect, outreach));
    out.push_str("\n```\n\n");

    out.push_str("### Follow-up Message\n\n```\n");
    out.push_str(&follow_up_message(prospect, outreach));
    out.push_str("\n```\n\n---\n\n");
}

fn render_engagement_summary(out: &mut String, prospects: &[ScoredProspect]) {
    let count = |pred: fn(u32) -> bool| {
        prospects
            .iter()
            .filter(|p| pred(p.record.engagement_count))
            .count()
    };

    out.push_str("## Engagement Summary\n\n");
    let _ = writeln!(out, "**High engagement (20+ likes):** {}", count(|n| n >= 20));
    let _ = writeln!(
        out,
        "**Medium engagement (10-19 likes):** {}",
        count(|n| (10..20).contains(&n))
    );
    let _ = writeln!(out, "**Lower engagement (0-9 likes):** {}", count(|n| n < 10));
}

/// Quote a scraped answer: HTML tags stripped, runs of spaces collapsed,
/// every line prefixed with `>`.
fn blockquote(body: &str) -> String {
    static TAG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
    static SPACE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid regex"));

    let stripped = TAG_RE.replace_all(body, "");
    if stripped.trim().is_empty() {
        return "> (no answer text captured)".to_string();
    }

    stripped
        .trim()
        .lines()
        .map(|line| {
            let line = SPACE_RE.replace_all(line.trim(), " ");
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
