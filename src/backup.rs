//! One-day retention of the previous report.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use log::{debug, info, warn};
use thiserror::Error;

use crate::report::REPORT_FILE_PREFIX;

/// Errors that stop the backup step as a whole.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("failed to list report directory {}", .path.display())]
    ListOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create backup directory {}", .path.display())]
    CreateBackupDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Copies every Markdown report in `output_dir` dated the day before `today` into `backup_dir`.
///
/// Files keep their name, so a repeated run simply overwrites the same copy. Reports from
/// earlier days are ignored. A failure on one file is logged and does not stop the others.
/// Returns the paths of the copies that were written.
pub fn rotate(
    output_dir: &Path,
    backup_dir: &Path,
    today: NaiveDate,
) -> Result<Vec<PathBuf>, BackupError> {
    let Some(yesterday) = today.checked_sub_days(Days::new(1)) else {
        return Ok(Vec::new());
    };
    let stamp = yesterday.format("%Y-%m-%d").to_string();

    let entries = fs::read_dir(output_dir).map_err(|source| BackupError::ListOutput {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(err) => {
                warn!("Skipping unreadable entry in {}: {err}", output_dir.display());
                None
            }
        })
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map_or(false, |name| is_report_from(name, &stamp))
        })
        .collect();
    candidates.sort();

    if candidates.is_empty() {
        debug!("No report from {stamp} to back up");
        return Ok(Vec::new());
    }

    fs::create_dir_all(backup_dir).map_err(|source| BackupError::CreateBackupDir {
        path: backup_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(candidates.len());
    for source in candidates {
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = backup_dir.join(name);
        match fs::copy(&source, &target) {
            Ok(_) => {
                info!("Backed up {} to {}", source.display(), target.display());
                written.push(target);
            }
            Err(err) => warn!(
                "Failed to back up {} to {}: {err}",
                source.display(),
                target.display()
            ),
        }
    }

    Ok(written)
}

fn is_report_from(name: &str, stamp: &str) -> bool {
    name.starts_with(REPORT_FILE_PREFIX) && name.ends_with(".md") && name.contains(stamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date")
    }

    #[test]
    fn matches_only_markdown_reports_with_the_stamp() {
        assert!(is_report_from("Counter_Report_2026-02-28.md", "2026-02-28"));
        assert!(!is_report_from("Counter_Report_2026-02-28.pdf", "2026-02-28"));
        assert!(!is_report_from("Counter_Report_2026-02-27.md", "2026-02-28"));
        assert!(!is_report_from("notes_2026-02-28.md", "2026-02-28"));
    }

    #[test]
    fn copies_yesterday_and_ignores_older_reports() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("output");
        let backup = dir.path().join("backup");
        fs::create_dir_all(&output).expect("output dir");

        let yesterday = output.join("Counter_Report_2026-02-28.md");
        let older = output.join("Counter_Report_2026-02-27.md");
        let pdf = output.join("Counter_Report_2026-02-28.pdf");
        fs::write(&yesterday, "ယနေ့ report\n").expect("write yesterday");
        fs::write(&older, "older\n").expect("write older");
        fs::write(&pdf, b"%PDF").expect("write pdf");

        let written = rotate(&output, &backup, today()).expect("rotate");

        assert_eq!(written, vec![backup.join("Counter_Report_2026-02-28.md")]);
        assert_eq!(
            fs::read(&written[0]).expect("read backup"),
            fs::read(&yesterday).expect("read source")
        );
        assert!(!backup.join("Counter_Report_2026-02-27.md").exists());
        assert!(!backup.join("Counter_Report_2026-02-28.pdf").exists());
        assert!(older.exists());
    }

    #[test]
    fn rerun_overwrites_the_same_backup() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("output");
        let backup = dir.path().join("backup");
        fs::create_dir_all(&output).expect("output dir");
        let report = output.join("Counter_Report_2026-02-28.md");

        fs::write(&report, "first").expect("write");
        rotate(&output, &backup, today()).expect("first rotate");
        fs::write(&report, "second").expect("rewrite");
        let written = rotate(&output, &backup, today()).expect("second rotate");

        assert_eq!(written.len(), 1);
        assert_eq!(fs::read_to_string(&written[0]).expect("read"), "second");
    }

    #[test]
    fn nothing_to_back_up_leaves_backup_dir_alone() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("output");
        let backup = dir.path().join("backup");
        fs::create_dir_all(&output).expect("output dir");
        fs::write(output.join("Counter_Report_2026-03-01.md"), "today").expect("write");

        assert!(rotate(&output, &backup, today()).expect("rotate").is_empty());
        assert!(!backup.exists());
    }

    #[test]
    fn missing_output_dir_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = rotate(&dir.path().join("absent"), dir.path(), today()).unwrap_err();
        assert!(matches!(err, BackupError::ListOutput { .. }));
    }
}
