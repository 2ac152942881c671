//! Recognize command - one request on stdin, one response on stdout.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Args;
use tracing::info;

use rcpt_core::service;
use rcpt_core::{
    PureOcrEngine, RcptConfig, RecognitionError, ReplayRecognizer, ServiceError, TextRecognizer,
};

/// Exit code for faults outside the request taxonomy.
const UNEXPECTED_EXIT: i32 = 4;

/// Arguments for the recognize command.
#[derive(Args, Default)]
pub struct RecognizeArgs {
    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Replay recognized lines from a JSON file instead of running the models
    #[arg(long)]
    observations: Option<PathBuf>,
}

pub fn run(args: RecognizeArgs, config_path: Option<&Path>) -> ExitCode {
    std::panic::set_hook(Box::new(|panic| {
        let message = panic
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic".to_string());
        eprintln!("unexpected_error: {}", single_line(&message));
        std::process::exit(UNEXPECTED_EXIT);
    }));

    let config = match super::load_config(config_path) {
        Ok(config) => config,
        Err(e) => return fail(&ServiceError::Internal(format!("{:#}", e))),
    };

    let stdin = io::stdin().lock();
    let response = service::handle(stdin, &config.recognition, |_| create_engine(&args, &config));

    match response {
        Ok(body) => {
            let mut stdout = io::stdout().lock();
            match writeln!(stdout, "{}", body).and_then(|_| stdout.flush()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => fail(&ServiceError::Internal(format!("unable to write response: {}", e))),
            }
        }
        Err(err) => fail(&err),
    }
}

fn create_engine(
    args: &RecognizeArgs,
    config: &RcptConfig,
) -> Result<Box<dyn TextRecognizer>, RecognitionError> {
    if let Some(path) = &args.observations {
        info!("Using recorded observations from {}", path.display());
        return Ok(Box::new(ReplayRecognizer::new(path)));
    }

    let model_dir = args
        .model_dir
        .clone()
        .unwrap_or_else(|| config.models.model_dir.clone());
    let engine = PureOcrEngine::from_dir(&model_dir, &config.models, &config.recognition)?;
    Ok(Box::new(engine))
}

fn fail(err: &ServiceError) -> ExitCode {
    eprintln!("{}", single_line(&err.to_string()));
    ExitCode::from(err.exit_code() as u8)
}

fn single_line(message: &str) -> String {
    message.split_whitespace().collect::<Vec<_>>().join(" ")
}
