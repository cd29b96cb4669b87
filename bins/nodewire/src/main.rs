mod cmd;
mod config;
mod error;

use clap::Parser;
use config::{Cli, Commands, NodewireConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = NodewireConfig::resolve(cli.config.as_deref()).and_then(|cfg| {
        tracing::debug!(version = %cfg.default_version, framed = cfg.framed, "configuration loaded");
        match cli.command {
            Commands::Encode(args) => cmd::encode::run(args, &cfg),
            Commands::Decode(args) => cmd::decode::run(args, &cfg),
            Commands::Inspect(args) => cmd::inspect::run(args, &cfg),
            Commands::Compat(args) => cmd::compat::run(args, &cfg),
        }
    });
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
