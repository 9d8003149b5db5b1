//! Timestamped, never-overwritten copies of the report

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};

use crate::error::AppError;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `bash_history_v<version>_<YYYYMMDD_HHMMSS>.md`, with `_<n>` before the
/// extension for the n-th entry captured within the same second.
pub(crate) fn archive_name(version: &str, at: DateTime<FixedOffset>, attempt: u32) -> String {
    let stamp = at.format(TIMESTAMP_FORMAT);
    if attempt <= 1 {
        format!("bash_history_v{version}_{stamp}.md")
    } else {
        format!("bash_history_v{version}_{stamp}_{attempt}.md")
    }
}

/// Copy `report` into `archive_dir` and return the new entry's path.
///
/// Entries are created with `create_new`, so an existing one is never
/// replaced. A failed write removes the partial file.
pub(crate) fn archive_report(
    report: &Path,
    archive_dir: &Path,
    version: &str,
    at: DateTime<FixedOffset>,
) -> Result<PathBuf, AppError> {
    if !report.is_file() {
        return Err(AppError::MissingReport {
            path: report.to_path_buf(),
        });
    }
    let content = fs::read(report).map_err(|e| AppError::io("read report", report, e))?;

    fs::create_dir_all(archive_dir).map_err(|e| AppError::io("create", archive_dir, e))?;

    for attempt in 1..=u32::MAX {
        let target = archive_dir.join(archive_name(version, at, attempt));
        let file = match OpenOptions::new().write(true).create_new(true).open(&target) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(AppError::io("create archive entry", &target, e)),
        };
        fill_entry(&target, file, &content, |f| f.sync_all())?;
        return Ok(target);
    }

    Err(AppError::io(
        "find a free archive name in",
        archive_dir,
        io::Error::from(io::ErrorKind::AlreadyExists),
    ))
}

/// Write `content` into a freshly created entry; on failure the entry is
/// closed and removed so no partial copy is left behind.
fn fill_entry<W: Write>(
    target: &Path,
    mut out: W,
    content: &[u8],
    finish: impl FnOnce(&mut W) -> io::Result<()>,
) -> Result<(), AppError> {
    let written = out.write_all(content).and_then(|()| finish(&mut out));
    drop(out);
    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(target) {
            log::warn!(
                "archive: could not remove partial entry {}: {cleanup}",
                target.display()
            );
        }
        return Err(AppError::io("copy report to", target, e));
    }
    Ok(())
}
