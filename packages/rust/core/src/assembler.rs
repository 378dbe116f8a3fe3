//! Run output assembler.
//!
//! Takes ranked prospects and run metadata, renders the report formats and
//! writes them into the date directory of the results root.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use tracing::{debug, info, instrument};

use prospector_ranker::RankReport;
use prospector_report::{ReportMeta, render_csv, render_markdown};
use prospector_shared::{
    CURRENT_SCHEMA_VERSION, OutreachConfig, ProspectExport, ProspectorError, Result, RunId,
    ScoredProspect,
};

/// File name prefix of the Markdown report.
pub const REPORT_PREFIX: &str = "prospects_";
/// File name prefix of the CSV tracking sheet.
pub const TRACKING_PREFIX: &str = "tracking_";

/// Configuration for writing one run's outputs.
#[derive(Debug, Clone)]
pub struct AssembleConfig {
    /// Run identifier recorded in the JSON export.
    pub run_id: RunId,
    /// Root of the results tree (e.g. `results/`).
    pub results_root: PathBuf,
    /// Where the contributors came from.
    pub source: String,
    /// Tool version string.
    pub tool_version: String,
    /// Local time the run started; picks the date directory and file stamps.
    pub started_at: DateTime<Local>,
}

/// Paths of the files written for a run.
#[derive(Debug, Clone)]
pub struct RunOutputs {
    /// `<results_root>/<YYYY-MM-DD>/`
    pub dir: PathBuf,
    pub markdown: PathBuf,
    pub csv: PathBuf,
    pub json: PathBuf,
}

/// Write the Markdown report, CSV tracking sheet and JSON export.
///
/// Creates the following layout:
/// ```text
/// <results_root>/<YYYY-MM-DD>/
/// ├── prospects_<YYYYMMDD_HHMMSS>.md
/// ├── tracking_<YYYYMMDD_HHMMSS>.csv
/// └── prospects_<YYYYMMDD_HHMMSS>.json
/// ```
#[instrument(skip_all, fields(run_id = %config.run_id, prospects = prospects.len()))]
pub fn assemble(
    config: &AssembleConfig,
    prospects: &[ScoredProspect],
    report: &RankReport,
    outreach: &OutreachConfig,
) -> Result<RunOutputs> {
    let dir = config
        .results_root
        .join(config.started_at.format("%Y-%m-%d").to_string());
    std::fs::create_dir_all(&dir).map_err(|e| ProspectorError::io(&dir, e))?;

    let stamp = config.started_at.format("%Y%m%d_%H%M%S").to_string();
    let generated_at = config.started_at.with_timezone(&Utc);

    info!(path = %dir.display(), "writing run outputs");

    let meta = ReportMeta {
        source: config.source.clone(),
        input_count: report.input_count,
        dropped_count: report.dropped_count,
        generated_at,
    };
    let markdown = dir.join(format!("{REPORT_PREFIX}{stamp}.md"));
    write_text(&markdown, &render_markdown(prospects, &meta, outreach))?;

    let csv = dir.join(format!("{TRACKING_PREFIX}{stamp}.csv"));
    write_text(&csv, &render_csv(prospects))?;

    let export = ProspectExport {
        schema_version: CURRENT_SCHEMA_VERSION,
        run_id: config.run_id.clone(),
        source: config.source.clone(),
        tool_version: config.tool_version.clone(),
        generated_at,
        input_count: report.input_count,
        dropped_count: report.dropped_count,
        prospects: prospects.to_vec(),
    };
    let json = dir.join(format!("{REPORT_PREFIX}{stamp}.json"));
    write_json(&json, &export)?;

    info!(
        markdown = %markdown.display(),
        csv = %csv.display(),
        json = %json.display(),
        "run outputs written"
    );

    Ok(RunOutputs {
        dir,
        markdown,
        csv,
        json,
    })
}

/// Read back a JSON export, checking its schema version.
pub fn load_export(path: &Path) -> Result<ProspectExport> {
    let content = std::fs::read_to_string(path).map_err(|e| ProspectorError::io(path, e))?;
    let export: ProspectExport = serde_json::from_str(&content).map_err(|e| {
        ProspectorError::parse(format!("invalid export {}: {e}", path.display()))
    })?;

    if export.schema_version != CURRENT_SCHEMA_VERSION {
        return Err(ProspectorError::validation(format!(
            "unsupported schema_version: {} (expected {})",
            export.schema_version, CURRENT_SCHEMA_VERSION
        )));
    }

    Ok(export)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Write a text file atomically (temp file, then rename).
fn write_text(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| ProspectorError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| ProspectorError::io(path, e))?;

    debug!(path = %path.display(), size = content.len(), "wrote file");
    Ok(())
}

/// Write a JSON file (pretty-printed).
fn write_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data).map_err(|e| {
        ProspectorError::validation(format!("JSON serialization failed: {e}"))
    })?;
    write_text(path, &json)
}
