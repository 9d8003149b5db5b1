/// Tool version, stamped into reports and archive names
pub(crate) const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Markdown report written by `local`, relative to the base directory
pub(crate) const REPORT_FILE: &str = "bash_history.md";

/// Append-only diagnostic log, relative to the base directory
pub(crate) const LOG_FILE: &str = "histdump.log";

/// Archive directory, relative to the base directory
pub(crate) const ARCHIVE_DIR: &str = "archive";

/// Emitted inside the history fence when there is nothing to list
pub(crate) const EMPTY_PLACEHOLDER: &str = "(no history)";

pub(crate) const DEFAULT_DESCRIPTION: &str = "Dump, clear and archive bash session history";

/// Fallback when the user name cannot be determined
pub(crate) const UNKNOWN: &str = "unknown";
