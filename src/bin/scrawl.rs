//! Interactive shell for scrawl.
//!
//! ```bash
//! # Start the shell on ./data and ./storage/db_meta.json
//! scrawl
//!
//! # Run one command and exit
//! scrawl -c "list_tables"
//!
//! # Keep data somewhere else and time every command
//! scrawl --data-dir /tmp/scrawl/data --metadata /tmp/scrawl/meta.json --timing
//! ```

use std::{
    io::{stdin, stdout},
    path::PathBuf,
};

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

use scrawl_db::{
    Config, Database,
    config::{DEFAULT_DATA_DIR, DEFAULT_METADATA_FILE},
    shell::Shell,
};

/// A small file-backed table store with a command shell.
#[derive(Parser, Debug)]
#[command(name = "scrawl", version, about)]
struct Args {
    /// Directory holding one JSON file of rows per table
    #[arg(long, default_value = DEFAULT_DATA_DIR, env = "SCRAWL_DATA_DIR")]
    data_dir: PathBuf,

    /// Catalog file
    #[arg(long, default_value = DEFAULT_METADATA_FILE, env = "SCRAWL_METADATA")]
    metadata: PathBuf,

    /// Print how long each command took
    #[arg(long)]
    timing: bool,

    /// Do not ask before dropping tables or deleting records
    #[arg(short = 'y', long)]
    yes: bool,

    /// Log filter, e.g. `debug` or `scrawl_db=info`
    #[arg(long, default_value = "warn", env = "SCRAWL_LOG")]
    log_level: String,

    /// Run a single command and exit
    #[arg(short = 'c', long)]
    command: Option<String>,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            data_dir: self.data_dir.clone(),
            metadata_file: self.metadata.clone(),
            timing: self.timing,
            assume_yes: self.yes,
        }
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(&args.log_level);

    let config = args.config();
    let db = Database::open(&config)?;

    let mut shell = Shell::new(db, config, stdin().lock(), stdout().lock());
    match &args.command {
        Some(command) => {
            shell.run_line(command).into_diagnostic()?;
        }
        None => shell.run().into_diagnostic()?,
    }

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
