use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("No report at {} (run `histdump local` first)", path.display())]
    MissingReport { path: PathBuf },

    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Failed to parse config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Failed to read history buffer from {origin}: {source}")]
    BufferRead {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Declined(String),

    #[error("Self-test failed at stage {stage}: {reason}")]
    SelfTest { stage: &'static str, reason: String },
}

impl AppError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_report_mentions_path_and_hint() {
        let e = AppError::MissingReport {
            path: PathBuf::from("/tmp/h/bash_history.md"),
        };
        assert_eq!(
            e.to_string(),
            "No report at /tmp/h/bash_history.md (run `histdump local` first)"
        );
    }

    #[test]
    fn io_error_display() {
        let e = AppError::io(
            "copy report to",
            "/tmp/archive/x.md",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(e.to_string(), "Failed to copy report to /tmp/archive/x.md: denied");
    }

    #[test]
    fn invalid_timezone_display() {
        let e = AppError::InvalidTimezone {
            input: "Mars/Olympus".to_string(),
        };
        assert_eq!(e.to_string(), "Invalid timezone: Mars/Olympus");
    }

    #[test]
    fn self_test_names_stage() {
        let e = AppError::SelfTest {
            stage: "clear",
            reason: "history file still has 3 bytes".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Self-test failed at stage clear: history file still has 3 bytes"
        );
    }
}
