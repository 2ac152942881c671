//! Models command - inspect the OCR model files.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

/// Arguments for the models command.
#[derive(Args)]
pub struct ModelsArgs {
    #[command(subcommand)]
    command: ModelsCommand,
}

#[derive(Subcommand)]
enum ModelsCommand {
    /// Check which model files are present
    Status(StatusArgs),
}

#[derive(Args)]
struct StatusArgs {
    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

pub fn run(args: ModelsArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    match args.command {
        ModelsCommand::Status(status_args) => check_status(status_args, config_path),
    }
}

fn check_status(args: StatusArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let model_dir = args
        .model_dir
        .unwrap_or_else(|| config.models.model_dir.clone());

    println!("{}", style("Model Status").bold());
    println!("Model directory: {}", style(model_dir.display()).cyan());
    println!();

    let mut all_present = true;
    let mut total_size: u64 = 0;

    for filename in config.models.required_files() {
        let path = model_dir.join(filename);
        let (status, size_str) = if path.is_file() {
            let size = fs::metadata(&path)?.len();
            total_size += size;
            if size > 0 {
                (style("✓").green(), format_size(size))
            } else {
                all_present = false;
                (style("⚠").yellow(), "empty".to_string())
            }
        } else {
            all_present = false;
            (style("✗").red(), "missing".to_string())
        };

        println!("    {} {:<25} {:>10}", status, filename, size_str);
    }

    println!();
    if all_present {
        println!(
            "{} All models present ({})",
            style("✓").green(),
            format_size(total_size)
        );
    } else {
        println!(
            "{} Models incomplete. Use --observations with 'rcpt recognize' to run without them.",
            style("⚠").yellow()
        );
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1_000_000_000 {
        format!("{:.1}GB", bytes as f64 / 1_000_000_000.0)
    } else if bytes >= 1_000_000 {
        format!("{:.1}MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.1}KB", bytes as f64 / 1_000.0)
    } else {
        format!("{}B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512B");
        assert_eq!(format_size(4_500_000), "4.5MB");
        assert_eq!(format_size(2_000), "2.0KB");
    }
}
