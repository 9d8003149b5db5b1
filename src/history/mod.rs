//! Host history abstraction
//!
//! The shell owns two copies of its history: the in-memory list of the
//! running session and the persisted history file. `HistoryBuffer` is the
//! contract the operations need from whatever stands in for the shell.

pub(crate) mod session;

use std::fs;
use std::io;
use std::path::Path;

use crate::error::AppError;

pub(crate) use session::SessionHistory;

/// The five history primitives a shell provides
/// (`history -a`, `-w`, `-r`, `-c`, and plain `history`).
pub(crate) trait HistoryBuffer {
    /// Persisted history file this buffer syncs with
    fn path(&self) -> &Path;

    /// Append entries not yet on disk to the history file
    fn append(&mut self) -> Result<(), AppError>;

    /// Overwrite the history file with the whole in-memory list
    fn write(&mut self) -> Result<(), AppError>;

    /// Replace the in-memory list with the history file's content
    fn reload(&mut self) -> Result<(), AppError>;

    /// Drop every in-memory entry
    fn clear(&mut self);

    /// In-memory entries, oldest first
    fn entries(&self) -> &[String];
}

/// Remove the ordinal that `history` prints in front of each entry.
///
/// `"  12  ls -la"` and `"  12* ls -la"` both become `"ls -la"`; entries
/// without a leading number are returned unchanged.
pub(crate) fn strip_ordinal(entry: &str) -> &str {
    let trimmed = entry.trim_start();
    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return entry;
    }
    let rest = &trimmed[digits..];
    let rest = rest.strip_prefix('*').unwrap_or(rest);
    if rest.is_empty() {
        // A bare number is a command, not an ordinal
        return entry;
    }
    if !rest.starts_with(char::is_whitespace) {
        return entry;
    }
    rest.trim_start()
}

/// Split history file content into commands.
///
/// Bash writes `#<epoch>` lines ahead of each entry when `HISTTIMEFORMAT`
/// is set; those are metadata, not commands.
pub(crate) fn parse_history(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !is_timestamp_line(line))
        .map(str::to_string)
        .collect()
}

fn is_timestamp_line(line: &str) -> bool {
    line.strip_prefix('#')
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

/// Read the history file; a missing file reads as empty.
pub(crate) fn read_history_file(path: &Path) -> Result<Vec<String>, AppError> {
    match fs::read(path) {
        Ok(bytes) => Ok(parse_history(&String::from_utf8_lossy(&bytes))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(AppError::io("read history file", path, e)),
    }
}

/// Count lines in the history file, treating a missing file as empty.
pub(crate) fn count_lines(path: &Path) -> usize {
    fs::read(path)
        .map(|bytes| bytes.split(|b| *b == b'\n').filter(|l| !l.is_empty()).count())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_ordinal_removes_history_numbers() {
        assert_eq!(strip_ordinal("    1  ls -la"), "ls -la");
        assert_eq!(strip_ordinal("  512  git status"), "git status");
        assert_eq!(strip_ordinal("12* vim notes.md"), "vim notes.md");
        assert_eq!(strip_ordinal("3\tmake test"), "make test");
    }

    #[test]
    fn strip_ordinal_keeps_commands_without_prefix() {
        assert_eq!(strip_ordinal("ls -la"), "ls -la");
        assert_eq!(strip_ordinal("7z x archive.7z"), "7z x archive.7z");
        assert_eq!(strip_ordinal("42"), "42");
        assert_eq!(strip_ordinal(""), "");
    }

    #[test]
    fn parse_history_drops_timestamps_and_blanks() {
        let content = "#1700000000\nls -la\n\n#1700000005\ngit status\n# real comment\n";
        assert_eq!(
            parse_history(content),
            vec!["ls -la", "git status", "# real comment"]
        );
    }

    #[test]
    fn read_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let lines = read_history_file(&dir.path().join("absent")).unwrap();
        assert!(lines.is_empty());
        assert_eq!(count_lines(&dir.path().join("absent")), 0);
    }

    #[test]
    fn count_lines_ignores_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist");
        fs::write(&path, "a\nb\nc\n").unwrap();
        assert_eq!(count_lines(&path), 3);
    }
}
