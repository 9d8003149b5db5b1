mod app;
mod archive;
mod cli;
mod config;
mod consts;
mod error;
mod history;
mod output;
mod utils;

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::process;

use clap::Parser;
use clap::error::ErrorKind;

use cli::{Cli, Commands, confirm};
use config::{Config, Settings};
use consts::VERSION;
use error::AppError;
use history::SessionHistory;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprintln!("error: {}", e.kind());
            eprint!("{}", Cli::help_text());
            process::exit(1);
        }
    };

    let command = match cli.command {
        Some(Commands::Help) => {
            print!("{}", Cli::help_text());
            return;
        }
        Some(command) => command,
        None => {
            eprint!("{}", Cli::help_text());
            process::exit(1);
        }
    };

    if let Err(e) = run(&cli, command) {
        log::error!("{}: {e}", command.name());
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli, command: Commands) -> Result<(), AppError> {
    let env = |key: &str| std::env::var(key).ok();
    let config = Config::load(&env)?;
    let settings = Settings::resolve(&cli.overrides(), &config, &env, dirs::home_dir().as_deref())?;

    utils::logging::init(&settings.log_path(), settings.debug)?;
    log::info!("{} (v{VERSION}, user {})", command.name(), settings.user);

    if command.is_destructive() {
        let interactive = io::stdin().is_terminal() && !cli.buffer_from_stdin();
        let prompt = format!("Clear all history in {}?", settings.history_file.display());
        if let Err(e) = confirm(
            &prompt,
            cli.yes,
            interactive,
            &mut io::stdin().lock(),
            &mut io::stderr(),
        ) {
            log::info!("{}: not confirmed", command.name());
            return Err(e);
        }
    }

    let mut history = if command.needs_history() {
        Some(open_history(cli, &settings)?)
    } else {
        None
    };

    match (command, history.as_mut()) {
        (Commands::Local, Some(history)) => {
            let summary = app::dump(&settings, history)?;
            println!(
                "✓ Dumped {} commands to {}",
                summary.commands,
                summary.report.display()
            );
        }
        (Commands::Clear, Some(history)) => {
            app::clear(history)?;
            println!("✓ History cleared ({})", settings.history_file.display());
        }
        (Commands::Test, Some(history)) => {
            app::self_test(&settings, history)?;
            println!("✓ All checks passed");
        }
        (Commands::Archive, _) => {
            let entry = app::archive(&settings)?;
            println!("✓ Archived to {}", entry.display());
        }
        _ => unreachable!("help is handled before run"),
    }

    Ok(())
}

fn open_history(cli: &Cli, settings: &Settings) -> Result<SessionHistory, AppError> {
    let Some(source) = cli.buffer.as_deref() else {
        return Ok(SessionHistory::new(&settings.history_file));
    };

    let lines = if cli.buffer_from_stdin() {
        SessionHistory::read_buffer(io::stdin().lock(), "stdin")?
    } else {
        let origin = source.display().to_string();
        let file = File::open(source).map_err(|source| AppError::BufferRead {
            origin: origin.clone(),
            source,
        })?;
        SessionHistory::read_buffer(BufReader::new(file), &origin)?
    };
    log::debug!("buffer: {} entries supplied", lines.len());

    Ok(SessionHistory::with_buffer(&settings.history_file, lines))
}
