use anyhow::Result;
use clap::Parser;

use admlink::cli::{Cli, Commands};
use admlink::commands::resolve;

#[cfg(feature = "download")]
use admlink::commands::fetch;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match &cli.command {
        #[cfg(feature = "download")]
        Commands::Fetch(args) => fetch::run(&cli, args),
        Commands::Resolve(args) => resolve::run(&cli, args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
