//! Rulegen scaffolds AI coding-assistant rule files for your project.

use color_eyre::Result;
use tracing::{instrument, level_filters::LevelFilter};

mod cmd;

use clap::{Parser, Subcommand};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Rulegen generates IDE rule files from a curated catalog.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Generation options, used when no subcommand is given.
    #[command(flatten)]
    generate: cmd::generate::Config,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate rule files (the default when no subcommand is given).
    Generate(cmd::generate::Config),

    /// Rebuild the catalog data file from an upstream rule index.
    Update(cmd::update::Config),
}

#[instrument]
fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // This binary talks to the user through its prompts, so logging stays
    // quiet by default; tracing here exists for manual debugging with
    // `RULEGEN_LOG` directives.
    //
    // Examples:
    // - `RULEGEN_LOG=trace` to log all messages
    // - `RULEGEN_LOG=debug` to log debug, info, warn, and error messages
    // - `RULEGEN_LOG=info` to log info, warn, and error messages
    // - `RULEGEN_LOG=warn` to log warn and error messages (this is the default)
    // - `RULEGEN_LOG=error` to log only error messages
    tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(
            fmt::layer()
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .pretty(),
        )
        .with(
            EnvFilter::builder()
                .with_env_var("RULEGEN_LOG")
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    match cli.command {
        Some(Commands::Generate(config)) => cmd::generate::main(config),
        Some(Commands::Update(config)) => cmd::update::main(config),
        None => cmd::generate::main(cli.generate),
    }
}
