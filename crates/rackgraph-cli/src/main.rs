//! rackgraph CLI - render audio files through declarative effect chains.

mod commands;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rackgraph")]
#[command(author, version, about = "Declarative audio effect graph host", long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a WAV file through a chain configuration
    Process(commands::process::ProcessArgs),

    /// Check that configuration files parse and build
    Validate(commands::validate::ValidateArgs),

    /// Print the configuration tree and graph of a file
    Tree(commands::tree::TreeArgs),

    /// List available effects and their parameters
    Effects(commands::effects::EffectsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Process(args) => commands::process::run(args),
        Commands::Validate(args) => commands::validate::run(args),
        Commands::Tree(args) => commands::tree::run(args),
        Commands::Effects(args) => commands::effects::run(args),
    }
}
