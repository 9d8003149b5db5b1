//! CLI argument definitions
//!
//! Global options and their mapping onto configuration overrides.

use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use crate::config::Overrides;

use super::commands::Commands;

#[derive(Debug, Parser)]
#[command(name = "histdump")]
#[command(about = "Dump, clear and archive bash session history as Markdown", version)]
#[command(disable_help_subcommand = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Base output directory (report, log, archive/)
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) dir: Option<PathBuf>,

    /// History file to read and clear
    #[arg(long, global = true, value_name = "FILE")]
    pub(crate) histfile: Option<PathBuf>,

    /// In-memory history to sync, as printed by `history` ("-" for stdin)
    #[arg(long, global = true, value_name = "FILE")]
    pub(crate) buffer: Option<PathBuf>,

    /// Timezone for report dates and archive names (e.g. "UTC", "Europe/Berlin")
    #[arg(long, global = true, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Do not ask before clearing history
    #[arg(short = 'y', long, global = true)]
    pub(crate) yes: bool,

    /// Echo diagnostic log records to stderr
    #[arg(long, global = true)]
    pub(crate) debug: bool,
}

impl Cli {
    pub(crate) fn overrides(&self) -> Overrides {
        Overrides {
            dir: self.dir.clone(),
            histfile: self.histfile.clone(),
            timezone: self.timezone.clone(),
            debug: self.debug,
        }
    }

    /// `--buffer -` means the buffer arrives on stdin
    pub(crate) fn buffer_from_stdin(&self) -> bool {
        self.buffer.as_deref().is_some_and(|p| p.as_os_str() == "-")
    }

    pub(crate) fn help_text() -> String {
        Cli::command().render_long_help().to_string()
    }
}
