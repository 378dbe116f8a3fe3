//! End-to-end `rank` pipeline: contributors JSON → rank → report files.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use tracing::{info, instrument, warn};

use prospector_ranker::{RankReport, rank_with_report};
use prospector_shared::{
    ContributorRecord, OutreachConfig, ProspectorError, RankingRules, Result, RunId, Tier,
};

use crate::assembler::{self, AssembleConfig, RunOutputs};

/// Configuration for the `rank_file` pipeline.
#[derive(Debug, Clone)]
pub struct RankRunConfig {
    /// JSON file holding an array of contributor records.
    pub input: PathBuf,
    /// Root of the results tree.
    pub results_root: PathBuf,
    /// Free-text description of the input's origin.
    pub source: String,
    /// Tool version string.
    pub tool_version: String,
    /// Scoring tables.
    pub rules: RankingRules,
    /// Message template fields.
    pub outreach: OutreachConfig,
}

/// Result of the `rank_file` pipeline.
#[derive(Debug)]
pub struct RankRunResult {
    /// Run identifier.
    pub run_id: RunId,
    /// Ranking counters.
    pub report: RankReport,
    /// Prospects per tier, most important tier first.
    pub tier_counts: Vec<(Tier, usize)>,
    /// Files written.
    pub outputs: RunOutputs,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when the pipeline completes.
    fn done(&self, result: &RankRunResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _result: &RankRunResult) {}
}

/// Run the full `rank` pipeline.
///
/// 1. Load contributor records
/// 2. Rank (normalize, dedupe, score, sort)
/// 3. Write Markdown, CSV and JSON outputs
#[instrument(skip_all, fields(input = %config.input.display()))]
pub fn rank_file(config: &RankRunConfig, progress: &dyn ProgressReporter) -> Result<RankRunResult> {
    let start = Instant::now();
    let started_at = Local::now();
    let run_id = RunId::new();

    info!(%run_id, "starting rank pipeline");

    // --- Phase 1: Load ---
    progress.phase("Loading contributors");
    let loaded = load_contributors(&config.input)?;
    info!(
        records = loaded.records.len(),
        rejected = loaded.rejected,
        "contributors loaded"
    );

    // --- Phase 2: Rank ---
    progress.phase("Ranking prospects");
    let mut ranking = rank_with_report(loaded.records, &config.rules);
    ranking.report.input_count += loaded.rejected;
    ranking.report.dropped_count += loaded.rejected;
    let tier_counts = Tier::ALL
        .iter()
        .map(|tier| {
            let n = ranking.prospects.iter().filter(|p| p.tier == *tier).count();
            (*tier, n)
        })
        .collect();

    info!(
        input = ranking.report.input_count,
        dropped = ranking.report.dropped_count,
        merged = ranking.report.merged_count,
        prospects = ranking.report.prospect_count,
        "ranking complete"
    );

    // --- Phase 3: Write outputs ---
    progress.phase("Writing reports");
    let assemble_config = AssembleConfig {
        run_id: run_id.clone(),
        results_root: config.results_root.clone(),
        source: config.source.clone(),
        tool_version: config.tool_version.clone(),
        started_at,
    };
    let outputs = assembler::assemble(
        &assemble_config,
        &ranking.prospects,
        &ranking.report,
        &config.outreach,
    )?;

    let result = RankRunResult {
        run_id,
        report: ranking.report,
        tier_counts,
        outputs,
        elapsed: start.elapsed(),
    };

    info!(
        run_id = %result.run_id,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "rank pipeline complete"
    );

    progress.done(&result);
    Ok(result)
}

/// Contributor records read from an input file.
#[derive(Debug, Default)]
pub struct LoadedContributors {
    /// Elements that converted into records, in file order.
    pub records: Vec<ContributorRecord>,
    /// Elements that could not be read as a record and were skipped.
    pub rejected: usize,
}

/// Read a JSON array of contributor records.
///
/// The file must be an array; elements that do not convert into a record are
/// logged and counted as rejected without failing the batch.
pub fn load_contributors(path: &Path) -> Result<LoadedContributors> {
    let content = std::fs::read_to_string(path).map_err(|e| ProspectorError::io(path, e))?;
    let elements: Vec<serde_json::Value> = serde_json::from_str(&content).map_err(|e| {
        ProspectorError::parse(format!(
            "{} is not a JSON array of contributor records: {e}",
            path.display()
        ))
    })?;

    let mut loaded = LoadedContributors::default();
    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<ContributorRecord>(element) {
            Ok(record) => loaded.records.push(record),
            Err(e) => {
                loaded.rejected += 1;
                warn!(index, error = %e, "skipping unreadable contributor record");
            }
        }
    }

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const FIXTURE: &str = r#"[
        {
            "name": "Nebojsha Antic",
            "title": "Senior Data Analyst & TL @Valtech",
            "linkedin_profile": "https://mk.linkedin.com/in/nebojsha-antic-24aaab223?trk=article",
            "answer": "Conduct thorough vendor audits. Implement strong encryption for data in transit and at rest.",
            "likes": "47"
        },
        {
            "name": "nebojsha antic",
            "title": "Senior Data Analyst",
            "linkedin_profile": "https://www.linkedin.com/in/nebojsha-antic-24aaab223",
            "answer": "Also set up access controls.",
            "likes": "12"
        },
        {
            "name": "Dana Wu",
            "title": "Chief Information Security Officer",
            "answer": "Zero trust is the baseline.",
            "likes": 3
        },
        {
            "name": "",
            "title": "CEO",
            "answer": "orphan comment",
            "likes": 99
        }
    ]"#;

    fn make_config(dir: &Path) -> RankRunConfig {
        let input = dir.join("contributors.json");
        std::fs::write(&input, FIXTURE).unwrap();
        RankRunConfig {
            input,
            results_root: dir.join("results"),
            source: "fixture".into(),
            tool_version: "0.1.0-test".into(),
            rules: RankingRules::default(),
            outreach: OutreachConfig::default(),
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        phases: Mutex<Vec<String>>,
    }

    impl ProgressReporter for RecordingProgress {
        fn phase(&self, name: &str) {
            self.phases.lock().unwrap().push(name.to_string());
        }
        fn done(&self, _result: &RankRunResult) {
            self.phases.lock().unwrap().push("done".to_string());
        }
    }

    #[test]
    fn rank_file_end_to_end() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let config = make_config(tmp.path());
        let progress = RecordingProgress::default();

        let result = rank_file(&config, &progress).expect("pipeline");

        assert_eq!(
            result.report,
            RankReport {
                input_count: 4,
                dropped_count: 1,
                merged_count: 1,
                prospect_count: 2,
            }
        );
        assert_eq!(result.tier_counts[0], (Tier::High, 1));
        assert_eq!(result.tier_counts[4], (Tier::Low, 1));
        assert!(result.outputs.markdown.exists());
        assert!(result.outputs.csv.exists());

        let export = assembler::load_export(&result.outputs.json).expect("export");
        let top = &export.prospects[0];
        // Senior 50 + encryption 20 + engagement 45 (max of 47, 12).
        assert_eq!(top.record.name, "Nebojsha Antic");
        assert_eq!(top.score, 115);
        assert_eq!(top.merged_comment_count, 2);
        assert_eq!(top.record.engagement_count, 47);
        assert_eq!(
            top.technical_focus,
            vec!["vendor audits", "encryption", "access controls"]
        );
        assert_eq!(export.prospects[1].record.name, "Dana Wu");
        assert_eq!(export.prospects[1].score, 100);

        let phases = progress.phases.lock().unwrap();
        assert_eq!(
            *phases,
            vec![
                "Loading contributors",
                "Ranking prospects",
                "Writing reports",
                "done"
            ]
        );
    }

    #[test]
    fn unreadable_records_are_dropped_not_fatal() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let mut config = make_config(tmp.path());
        std::fs::write(
            &config.input,
            r#"[
                {"name": null, "title": "CEO", "answer": "encryption", "likes": 50},
                {"name": "Bo", "title": null, "likes": -1},
                {"name": "Ann", "title": "CTO", "answer": "Access control.", "likes": 5},
                {"name": ["not", "text"], "title": "VP"},
                "not an object"
            ]"#,
        )
        .unwrap();
        config.results_root = tmp.path().join("out");

        let loaded = load_contributors(&config.input).expect("load");
        assert_eq!(loaded.records.len(), 3);
        assert_eq!(loaded.rejected, 2);
        assert_eq!(loaded.records[0].name, "");
        assert_eq!(loaded.records[1].title, "");
        assert_eq!(loaded.records[1].engagement_count, 0);

        let result = rank_file(&config, &SilentProgress).expect("pipeline");
        // Null name and the two unreadable elements are dropped.
        assert_eq!(result.report.input_count, 5);
        assert_eq!(result.report.dropped_count, 3);
        assert_eq!(result.report.prospect_count, 2);

        let export = assembler::load_export(&result.outputs.json).expect("export");
        assert_eq!(export.dropped_count, 3);
        assert_eq!(export.prospects[0].record.name, "Ann");
        assert_eq!(export.prospects[1].record.name, "Bo");
    }

    #[test]
    fn non_array_input_is_parse_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("bad.json");
        std::fs::write(&path, r#"{"name": "not an array"}"#).unwrap();

        let err = load_contributors(&path).unwrap_err();
        assert!(matches!(err, ProspectorError::Parse { .. }));
    }

    #[test]
    fn missing_input_is_io_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let err = load_contributors(&tmp.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ProspectorError::Io { .. }));
    }
}
