use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::archive::archive_report;
use crate::config::Settings;
use crate::consts::VERSION;
use crate::error::AppError;
use crate::history::{HistoryBuffer, count_lines, read_history_file, strip_ordinal};
use crate::output::{ReportMeta, render_report};

#[derive(Debug, Clone)]
pub(crate) struct DumpSummary {
    pub(crate) report: PathBuf,
    pub(crate) commands: usize,
}

/// Sync the buffer with the history file, then write the Markdown report.
pub(crate) fn dump(
    settings: &Settings,
    history: &mut dyn HistoryBuffer,
) -> Result<DumpSummary, AppError> {
    let hist_path = history.path().to_path_buf();
    log::info!(
        "dump: {} has {} lines before sync",
        hist_path.display(),
        count_lines(&hist_path)
    );

    if history.entries().is_empty() {
        // Writing an empty buffer would erase the file
        log::debug!("dump: in-memory buffer empty, skipping write");
    } else {
        history.append()?;
        history.write()?;
    }
    history.reload()?;

    let mut raw = history.entries().to_vec();
    if raw.is_empty() {
        log::debug!("dump: buffer empty after reload, reading file directly");
        raw = read_history_file(&hist_path)?;
    }
    let commands: Vec<String> = raw
        .iter()
        .map(|entry| strip_ordinal(entry).to_string())
        .filter(|entry| !entry.is_empty())
        .collect();

    log::info!(
        "dump: {} has {} lines after sync, captured {} commands",
        hist_path.display(),
        count_lines(&hist_path),
        commands.len()
    );

    let meta = ReportMeta {
        version: VERSION,
        output_dir: &settings.base_dir,
        history_file: &hist_path,
        description: &settings.description,
        date: settings
            .timezone
            .now()
            .format("%Y-%m-%d %H:%M:%S %z")
            .to_string(),
        user: &settings.user,
    };
    let report = settings.report_path();
    write_report(&report, &render_report(&meta, &commands))?;
    log::info!("dump: wrote {}", report.display());

    Ok(DumpSummary {
        report,
        commands: commands.len(),
    })
}

fn write_report(path: &Path, content: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AppError::io("create", parent, e))?;
    }
    fs::write(path, content).map_err(|e| AppError::io("write report", path, e))
}

/// Empty both the in-memory buffer and the history file.
pub(crate) fn clear(history: &mut dyn HistoryBuffer) -> Result<(), AppError> {
    let hist_path = history.path().to_path_buf();
    log::info!(
        "clear: {} has {} lines, buffer holds {} entries",
        hist_path.display(),
        count_lines(&hist_path),
        history.entries().len()
    );

    history.clear();
    if let Err(e) = File::create(&hist_path) {
        log::warn!(
            "clear: could not truncate {}: {e}; recreating it",
            hist_path.display()
        );
        eprintln!("Warning: could not truncate {}: {e}", hist_path.display());
        if let Some(parent) = hist_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| AppError::io("create", parent, e))?;
        }
        File::create(&hist_path).map_err(|e| AppError::io("create history file", &hist_path, e))?;
    }
    history.reload()?;

    log::info!(
        "clear: {} now has {} lines, buffer holds {} entries",
        hist_path.display(),
        count_lines(&hist_path),
        history.entries().len()
    );
    Ok(())
}

/// Copy the current report into the archive directory.
pub(crate) fn archive(settings: &Settings) -> Result<PathBuf, AppError> {
    let report = settings.report_path();
    let entry = archive_report(
        &report,
        &settings.archive_dir(),
        VERSION,
        settings.timezone.now(),
    )?;
    log::info!("archive: copied {} to {}", report.display(), entry.display());
    Ok(entry)
}

/// Run `dump` then `clear` against the real history, checking each.
///
/// Any failure, including one raised inside an operation, is reported as
/// `AppError::SelfTest` naming the stage it happened in.
pub(crate) fn self_test(
    settings: &Settings,
    history: &mut dyn HistoryBuffer,
) -> Result<(), AppError> {
    log::info!("test: starting");

    let stage = "dump";
    let summary = dump(settings, history).map_err(|e| stage_failed(stage, e.to_string()))?;
    if !summary.report.is_file() {
        return Err(stage_failed(
            stage,
            format!("{} was not produced", summary.report.display()),
        ));
    }
    println!("PASS {stage}: {} ({} commands)", summary.report.display(), summary.commands);

    let stage = "clear";
    clear(history).map_err(|e| stage_failed(stage, e.to_string()))?;
    let hist_path = history.path().to_path_buf();
    let file_len = fs::metadata(&hist_path).map(|m| m.len()).ok();
    if !history.entries().is_empty() || file_len != Some(0) {
        return Err(stage_failed(
            stage,
            format!(
                "{} buffer entries left, history file size {:?}",
                history.entries().len(),
                file_len
            ),
        ));
    }
    println!("PASS {stage}: {} is empty", hist_path.display());

    log::info!("test: all stages passed");
    Ok(())
}

fn stage_failed(stage: &'static str, reason: String) -> AppError {
    log::error!("test: {stage} failed: {reason}");
    AppError::SelfTest { stage, reason }
}
