use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;
use structured_logger::json::new_writer;
use structured_logger::Builder;

use osm_to_csv::{load_user_config, run, Result};

#[derive(Parser, Debug)]
#[command(about = "Convert an OpenStreetMap XML extract into relational CSV tables")]
struct Cli {
    /// JSON config naming the input extract and the output directory.
    #[arg(default_value = "config/osm_to_csv.json")]
    config: PathBuf,

    /// Validate every record against the table schema before writing it.
    #[arg(long)]
    validate: bool,

    /// Rewrite the tables even if they already exist.
    #[arg(long)]
    force: bool,

    /// Show a progress bar over the processed elements.
    #[arg(long)]
    progress: bool,

    #[arg(long, default_value = "info")]
    log_level: String,
}

fn setup_logging(level: &str) {
    Builder::with_level(level)
        .with_target_writer("*", new_writer(io::stdout()))
        .init();
}

fn export(cli: &Cli) -> Result<()> {
    let mut user_config = load_user_config(&cli.config)?;
    user_config.validate |= cli.validate;
    user_config.force |= cli.force;
    user_config.progress |= cli.progress;
    run(&user_config)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    match export(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = err.to_string();
            error!(err = message.as_str(); "Export aborted, discard any written tables");
            ExitCode::FAILURE
        }
    }
}
