//! CLI application for receipt OCR.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{config, extract, models, recognize};

/// Receipt OCR - recognize receipt text and extract receipt fields
#[derive(Parser)]
#[command(name = "rcpt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output on stderr (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Defaults to `recognize`
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize text in an image request read from stdin
    Recognize(recognize::RecognizeArgs),

    /// Extract receipt fields from OCR text
    Extract(extract::ExtractArgs),

    /// Inspect OCR models
    Models(models::ModelsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        None => return recognize::run(recognize::RecognizeArgs::default(), config_path),
        Some(Commands::Recognize(args)) => return recognize::run(args, config_path),
        Some(Commands::Extract(args)) => extract::run(args, config_path),
        Some(Commands::Models(args)) => models::run(args, config_path),
        Some(Commands::Config(args)) => config::run(args, config_path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr. Silent unless `-v` or `RUST_LOG` asks for output, so a
/// failed request writes exactly one diagnostic line.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Only fails if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
