//! Results-directory housekeeping.
//!
//! A results root holds one `YYYY-MM-DD/` directory per day of runs plus an
//! `archives/` directory for old days. Files dropped at the top level by
//! older tooling can be sorted into date directories with [`organize`].

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::SystemTime;

use chrono::{Days, NaiveDate};
use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use prospector_shared::{ProspectorError, Result};

use crate::assembler::REPORT_PREFIX;

/// Name of the archive directory under the results root.
pub const ARCHIVE_DIR: &str = "archives";

/// Per-day listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateDirSummary {
    pub date: NaiveDate,
    pub path: PathBuf,
    pub json_files: usize,
    pub csv_files: usize,
    pub md_files: usize,
    /// Most recently modified file in the directory.
    pub latest_file: Option<String>,
}

/// Totals across the whole results root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultsSummary {
    pub date_dirs: usize,
    pub latest_date: Option<NaiveDate>,
    pub json_files: usize,
    pub csv_files: usize,
    pub md_files: usize,
    /// Size of every file under the root, archives included.
    pub total_bytes: u64,
}

/// Move top-level files whose name carries a `YYYYMMDD` stamp into the
/// matching `YYYY-MM-DD/` directory. Returns how many files moved.
pub fn organize(root: &Path) -> Result<usize> {
    static STAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?:^|_)(\d{8})(?:_|\.|$)").expect("valid regex")
    });

    if !root.is_dir() {
        warn!(root = %root.display(), "results directory not found");
        return Ok(0);
    }

    let mut moved = 0;
    for entry in read_dir(root)? {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();

        let Some(date) = STAMP_RE
            .captures(&name)
            .and_then(|caps| NaiveDate::parse_from_str(&caps[1], "%Y%m%d").ok())
        else {
            continue;
        };

        let dir = root.join(date.format("%Y-%m-%d").to_string());
        std::fs::create_dir_all(&dir).map_err(|e| ProspectorError::io(&dir, e))?;
        let target = dir.join(&name);
        std::fs::rename(&path, &target).map_err(|e| ProspectorError::io(&target, e))?;

        info!(file = %name, date = %date, "organized result file");
        moved += 1;
    }

    Ok(moved)
}

/// Date directories, most recent first.
pub fn list(root: &Path) -> Result<Vec<DateDirSummary>> {
    let mut summaries = Vec::new();

    for (date, path) in date_dirs(root)? {
        let files = files_in(&path)?;
        let count = |ext: &str| files.iter().filter(|(p, _)| has_extension(p, ext)).count();

        let latest_file = files
            .iter()
            .max_by_key(|(_, modified)| *modified)
            .and_then(|(p, _)| p.file_name())
            .map(|n| n.to_string_lossy().to_string());

        summaries.push(DateDirSummary {
            date,
            json_files: count("json"),
            csv_files: count("csv"),
            md_files: count("md"),
            latest_file,
            path,
        });
    }

    Ok(summaries)
}

/// The most recently written prospects report, if any.
pub fn latest_report(root: &Path) -> Result<Option<PathBuf>> {
    let mut best: Option<(SystemTime, PathBuf)> = None;

    for (_, dir) in date_dirs(root)? {
        for (path, modified) in files_in(&dir)? {
            let is_report = has_extension(&path, "md")
                && path
                    .file_name()
                    .is_some_and(|n| n.to_string_lossy().starts_with(REPORT_PREFIX));
            if !is_report {
                continue;
            }
            if best.as_ref().is_none_or(|(t, _)| modified > *t) {
                best = Some((modified, path));
            }
        }
    }

    Ok(best.map(|(_, path)| path))
}

/// Move date directories older than `days_to_keep` days before `today` into
/// `archives/`. Returns how many directories moved.
pub fn archive(root: &Path, days_to_keep: u32, today: NaiveDate) -> Result<usize> {
    if !root.is_dir() {
        warn!(root = %root.display(), "results directory not found");
        return Ok(0);
    }

    let Some(cutoff) = today.checked_sub_days(Days::new(u64::from(days_to_keep))) else {
        warn!(days_to_keep, "retention reaches past the earliest date, nothing to archive");
        return Ok(0);
    };
    let archive_dir = root.join(ARCHIVE_DIR);
    let mut moved = 0;

    for (date, path) in date_dirs(root)? {
        if date >= cutoff {
            continue;
        }
        std::fs::create_dir_all(&archive_dir).map_err(|e| ProspectorError::io(&archive_dir, e))?;
        let target = archive_dir.join(date.format("%Y-%m-%d").to_string());
        if target.exists() {
            warn!(target = %target.display(), "archive already holds this date, skipping");
            continue;
        }
        std::fs::rename(&path, &target).map_err(|e| ProspectorError::io(&target, e))?;
        info!(date = %date, "archived result directory");
        moved += 1;
    }

    Ok(moved)
}

/// Counts and sizes across the results root.
pub fn summary(root: &Path) -> Result<ResultsSummary> {
    if !root.is_dir() {
        return Ok(ResultsSummary::default());
    }

    let dirs = date_dirs(root)?;
    let mut summary = ResultsSummary {
        date_dirs: dirs.len(),
        latest_date: dirs.first().map(|(d, _)| *d),
        ..ResultsSummary::default()
    };

    for (_, dir) in &dirs {
        for (path, _) in files_in(dir)? {
            if has_extension(&path, "json") {
                summary.json_files += 1;
            } else if has_extension(&path, "csv") {
                summary.csv_files += 1;
            } else if has_extension(&path, "md") {
                summary.md_files += 1;
            }
        }
    }

    summary.total_bytes = tree_size(root)?;
    Ok(summary)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_dir(dir: &Path) -> Result<Vec<std::fs::DirEntry>> {
    let entries = std::fs::read_dir(dir).map_err(|e| ProspectorError::io(dir, e))?;
    entries
        .map(|entry| entry.map_err(|e| ProspectorError::io(dir, e)))
        .collect()
}

/// `YYYY-MM-DD` subdirectories of `root`, newest first. Other directories
/// are ignored; a missing root yields nothing.
fn date_dirs(root: &Path) -> Result<Vec<(NaiveDate, PathBuf)>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut dirs = Vec::new();
    for entry in read_dir(root)? {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name == ARCHIVE_DIR {
            continue;
        }
        match NaiveDate::parse_from_str(&name, "%Y-%m-%d") {
            Ok(date) => dirs.push((date, path)),
            Err(_) => warn!(dir = %name, "skipping non-date directory"),
        }
    }

    dirs.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(dirs)
}

/// Regular files directly inside `dir`, with modification times.
fn files_in(dir: &Path) -> Result<Vec<(PathBuf, SystemTime)>> {
    let mut files = Vec::new();
    for entry in read_dir(dir)? {
        let meta = entry.metadata().map_err(|e| ProspectorError::io(entry.path(), e))?;
        if meta.is_file() {
            let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            files.push((entry.path(), modified));
        }
    }
    Ok(files)
}

fn tree_size(dir: &Path) -> Result<u64> {
    let mut total = 0;
    for entry in read_dir(dir)? {
        let meta = entry.metadata().map_err(|e| ProspectorError::io(entry.path(), e))?;
        if meta.is_dir() {
            total += tree_size(&entry.path())?;
        } else {
            total += meta.len();
        }
    }
    Ok(total)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn organize_moves_stamped_files() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        touch(&root.join("ai_security_analysis_20250921_101500.json"), "{}");
        touch(&root.join("linkedin_prospects_20250920_090000.md"), "#");
        touch(&root.join("notes.txt"), "keep me");
        touch(&root.join("bad_20251399_000000.csv"), "not a date");

        let moved = organize(root).unwrap();
        assert_eq!(moved, 2);
        assert!(root
            .join("2025-09-21")
            .join("ai_security_analysis_20250921_101500.json")
            .exists());
        assert!(root
            .join("2025-09-20")
            .join("linkedin_prospects_20250920_090000.md")
            .exists());
        assert!(root.join("notes.txt").exists());
        assert!(root.join("bad_20251399_000000.csv").exists());
    }

    #[test]
    fn missing_root_is_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("nope");
        assert_eq!(organize(&root).unwrap(), 0);
        assert!(list(&root).unwrap().is_empty());
        assert_eq!(latest_report(&root).unwrap(), None);
        assert_eq!(archive(&root, 30, date("2025-10-01")).unwrap(), 0);
        assert_eq!(summary(&root).unwrap(), ResultsSummary::default());
    }

    #[test]
    fn list_counts_by_extension_newest_first() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        touch(&root.join("2025-09-20/prospects_20250920_090000.md"), "#");
        touch(&root.join("2025-09-21/prospects_20250921_090000.md"), "#");
        touch(&root.join("2025-09-21/prospects_20250921_090000.json"), "{}");
        touch(&root.join("2025-09-21/tracking_20250921_090000.csv"), "a");
        touch(&root.join("scratch/ignored.md"), "#");

        let listing = list(root).unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].date, date("2025-09-21"));
        assert_eq!(
            (listing[0].json_files, listing[0].csv_files, listing[0].md_files),
            (1, 1, 1)
        );
        assert!(listing[0].latest_file.is_some());
        assert_eq!(listing[1].md_files, 1);
    }

    #[test]
    fn latest_report_picks_newest_prospects_markdown() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let older = root.join("2025-09-20/prospects_20250920_090000.md");
        let newer = root.join("2025-09-21/prospects_20250921_090000.md");
        touch(&older, "#");
        touch(&root.join("2025-09-21/notes.md"), "#");
        touch(&newer, "#");

        let old_time = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000);
        std::fs::File::options()
            .write(true)
            .open(&older)
            .unwrap()
            .set_modified(old_time)
            .unwrap();

        assert_eq!(latest_report(root).unwrap(), Some(newer));
    }

    #[test]
    fn archive_moves_only_old_days() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        touch(&root.join("2025-08-01/prospects_20250801_000000.md"), "#");
        touch(&root.join("2025-09-15/prospects_20250915_000000.md"), "#");
        touch(&root.join("misc/readme.md"), "#");

        let moved = archive(root, 30, date("2025-10-01")).unwrap();
        assert_eq!(moved, 1);
        assert!(root.join(ARCHIVE_DIR).join("2025-08-01").is_dir());
        assert!(root.join("2025-09-15").is_dir());
        assert!(root.join("misc").is_dir());

        // Archived days no longer count as active.
        assert_eq!(list(root).unwrap().len(), 1);
    }

    #[test]
    fn archive_with_huge_retention_keeps_everything() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        touch(&root.join("2025-08-01/prospects_20250801_000000.md"), "#");

        assert_eq!(archive(root, u32::MAX, date("2025-10-01")).unwrap(), 0);
        assert_eq!(archive(root, 200_000_000, date("2025-10-01")).unwrap(), 0);
        assert!(root.join("2025-08-01").is_dir());
        assert!(!root.join(ARCHIVE_DIR).exists());
    }

    #[test]
    fn summary_totals() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        touch(&root.join("2025-09-21/prospects_20250921_090000.md"), "12345");
        touch(&root.join("2025-09-21/prospects_20250921_090000.json"), "{}");
        touch(&root.join("2025-09-20/tracking_20250920_090000.csv"), "abc");
        touch(&root.join("archives/2025-01-01/old.md"), "xx");

        let s = summary(root).unwrap();
        assert_eq!(s.date_dirs, 2);
        assert_eq!(s.latest_date, Some(date("2025-09-21")));
        assert_eq!((s.json_files, s.csv_files, s.md_files), (1, 1, 1));
        assert_eq!(s.total_bytes, 5 + 2 + 3 + 2);
    }
}
