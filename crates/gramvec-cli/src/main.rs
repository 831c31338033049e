mod app;
mod cli;
mod commands;
mod types;
mod util;

use clap::{CommandFactory, FromArgMatches};
use tracing_subscriber::EnvFilter;

/// Entry point for the `gramvec` CLI.
///
/// Parses arguments, installs the log subscriber and dispatches the command.
fn main() -> anyhow::Result<()> {
    let matches = cli::Cli::command().get_matches();
    let mut cli = cli::Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    if let (Some(input), Some((_, sub))) = (cli.cmd.input_mut(), matches.subcommand()) {
        input.record_order(sub);
    }
    init_logging(&cli.log_level)?;
    app::run(cli)
}

fn init_logging(level: &str) -> anyhow::Result<()> {
    // RUST_LOG takes full control when set.
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::try_from_default_env()?,
        Err(_) => EnvFilter::try_new(format!(
            "gramvec={level},gramvec_vectorize={level},gramvec_core={level}"
        ))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("install log subscriber: {e}"))
}
