//! File backend for the `log` facade
//!
//! Every record is appended to the diagnostic log under the base directory.
//! The file is never truncated or rotated.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};

use crate::error::AppError;

pub(crate) struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
    echo: bool,
}

impl FileLogger {
    pub(crate) fn open(path: &Path, level: LevelFilter, echo: bool) -> Result<Self, AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::io("create", parent, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AppError::io("open log file", path, e))?;
        Ok(FileLogger {
            file: Mutex::new(file),
            level,
            echo,
        })
    }
}

pub(crate) fn format_record(record: &Record) -> String {
    format!(
        "[{}] {:<5} {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        record.level(),
        record.args()
    )
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record);
        if self.echo {
            eprintln!("{line}");
        }
        // A poisoned lock only means another record panicked mid-write
        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(file, "{line}");
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Install the file logger as the global `log` backend.
pub(crate) fn init(path: &Path, debug: bool) -> Result<(), AppError> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let logger = FileLogger::open(path, level, debug)?;
    // Only fails when a logger is already installed, which leaves that one in place
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn records_are_appended_not_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("histdump.log");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "earlier line\n").unwrap();

        let logger = FileLogger::open(&path, LevelFilter::Info, false).unwrap();
        logger.log(
            &Record::builder()
                .level(Level::Info)
                .args(format_args!("dump: captured 3 commands"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .args(format_args!("filtered out"))
                .build(),
        );
        logger.flush();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "earlier line");
        assert!(lines[1].ends_with("INFO  dump: captured 3 commands"));
        assert!(lines[1].starts_with('['));
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("histdump.log");
        FileLogger::open(&path, LevelFilter::Info, false).unwrap();
        assert!(path.exists());
    }
}
