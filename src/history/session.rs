//! File-backed stand-in for a shell's in-memory history
//!
//! A separate process cannot reach into the invoking shell, so the
//! in-memory list starts empty unless it is handed over explicitly,
//! e.g. `history | histdump local --buffer -`. An empty list never
//! rewrites the history file; `reload` only reads it.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

use super::{HistoryBuffer, read_history_file, strip_ordinal};

#[derive(Debug)]
pub(crate) struct SessionHistory {
    path: PathBuf,
    buffer: Vec<String>,
    /// Leading buffer entries already present in the history file
    persisted: usize,
}

impl SessionHistory {
    /// Attach to the history file with nothing in memory yet.
    pub(crate) fn new(path: &Path) -> Self {
        SessionHistory {
            path: path.to_path_buf(),
            buffer: Vec::new(),
            persisted: 0,
        }
    }

    /// Use `lines` (typically `history` output) as the in-memory list.
    ///
    /// The longest prefix that already matches the history file counts as
    /// persisted, so `append` only adds what the file is missing.
    pub(crate) fn with_buffer(path: &Path, lines: Vec<String>) -> Self {
        let on_disk = read_history_file(path).unwrap_or_default();
        let persisted = lines
            .iter()
            .zip(on_disk.iter())
            .take_while(|(entry, disk)| strip_ordinal(entry) == disk.as_str())
            .count();
        SessionHistory {
            path: path.to_path_buf(),
            buffer: lines,
            persisted,
        }
    }

    /// Read buffer lines from any reader; blank lines are dropped.
    pub(crate) fn read_buffer(reader: impl BufRead, origin: &str) -> Result<Vec<String>, AppError> {
        let mut lines = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|source| AppError::BufferRead {
                origin: origin.to_string(),
                source,
            })?;
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }
        Ok(lines)
    }

    fn ensure_parent(&self) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| AppError::io("create", parent, e))?;
        }
        Ok(())
    }
}

fn render_lines(entries: &[String]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(strip_ordinal(entry));
        out.push('\n');
    }
    out
}

impl HistoryBuffer for SessionHistory {
    fn path(&self) -> &Path {
        &self.path
    }

    fn append(&mut self) -> Result<(), AppError> {
        let pending = &self.buffer[self.persisted.min(self.buffer.len())..];
        if pending.is_empty() {
            return Ok(());
        }
        self.ensure_parent()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AppError::io("open history file", &self.path, e))?;
        file.write_all(render_lines(pending).as_bytes())
            .map_err(|e| AppError::io("append to", &self.path, e))?;
        self.persisted = self.buffer.len();
        Ok(())
    }

    fn write(&mut self) -> Result<(), AppError> {
        self.ensure_parent()?;
        fs::write(&self.path, render_lines(&self.buffer))
            .map_err(|e| AppError::io("write history file", &self.path, e))?;
        self.persisted = self.buffer.len();
        Ok(())
    }

    fn reload(&mut self) -> Result<(), AppError> {
        self.buffer = read_history_file(&self.path)?;
        self.persisted = self.buffer.len();
        Ok(())
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.persisted = 0;
    }

    fn entries(&self) -> &[String] {
        &self.buffer
    }
}
