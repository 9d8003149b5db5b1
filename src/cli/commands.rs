//! CLI subcommand definitions

use clap::Subcommand;

/// The single operation token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub(crate) enum Commands {
    /// Dump the session history to the Markdown report
    #[command(alias = "dump")]
    Local,
    /// Clear the in-memory buffer and truncate the history file
    Clear,
    /// Copy the current report into the archive directory
    Archive,
    /// Smoke test: run `local`, then `clear`, checking each (mutates real history)
    Test,
    /// Show this help
    Help,
}

impl Commands {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Commands::Local => "local",
            Commands::Clear => "clear",
            Commands::Archive => "archive",
            Commands::Test => "test",
            Commands::Help => "help",
        }
    }

    /// Erases history, so it must be confirmed first
    pub(crate) fn is_destructive(self) -> bool {
        matches!(self, Commands::Clear | Commands::Test)
    }

    /// Needs the history buffer (archive only reads the report)
    pub(crate) fn needs_history(self) -> bool {
        matches!(self, Commands::Local | Commands::Clear | Commands::Test)
    }
}
