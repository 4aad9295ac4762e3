use super::commands::CliArgs;
use super::output::{OutputFormat, OutputFormatter};
use crate::config::PolyrunConfig;
use crate::dispatch::DispatchError;
use crate::progress::LoggingHandler;
use crate::toolchain::ExecutionStatus;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_EXECUTION_FAILED: i32 = 1;
pub const EXIT_DETECTION_FAILED: i32 = 2;
pub const EXIT_TOOL_MISSING: i32 = 3;
pub const EXIT_IO_OR_CONFIG: i32 = 4;

pub fn exit_code_for_status(status: ExecutionStatus) -> i32 {
    match status {
        ExecutionStatus::Success => EXIT_SUCCESS,
        ExecutionStatus::CompileError | ExecutionStatus::RuntimeError => EXIT_EXECUTION_FAILED,
        ExecutionStatus::ToolMissing => EXIT_TOOL_MISSING,
    }
}

pub fn exit_code_for_error(err: &DispatchError) -> i32 {
    match err {
        DispatchError::Detection(_) | DispatchError::Semantic(_) | DispatchError::NoAdapter(_) => {
            EXIT_DETECTION_FAILED
        }
        DispatchError::TaskFailed(_) => EXIT_EXECUTION_FAILED,
    }
}

/// Applies CLI overrides on top of the environment configuration
pub fn build_config(args: &CliArgs) -> PolyrunConfig {
    let defaults = PolyrunConfig::default();
    let config = PolyrunConfig {
        provider: args.backend.unwrap_or(defaults.provider),
        model: args.model.clone().unwrap_or_else(|| defaults.model.clone()),
        exec_timeout_secs: args.timeout.unwrap_or(defaults.exec_timeout_secs),
        recovery_enabled: defaults.recovery_enabled && !args.no_recovery,
        ..defaults
    };

    if args.backend.is_some() {
        debug!("Provider explicitly set to: {:?}", config.provider);
    }
    if args.no_recovery {
        debug!("Recovery disabled");
    }
    config
}

async fn read_snippet(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Runs the file named on the command line and returns the process exit code
pub async fn handle_run(args: &CliArgs) -> i32 {
    let config = build_config(args);
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        eprintln!("Error: {}", e);
        return EXIT_IO_OR_CONFIG;
    }
    debug!("Configuration: {:?}", config.to_display_map());

    let snippet = match read_snippet(&args.file).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return EXIT_IO_OR_CONFIG;
        }
    };

    let format = OutputFormat::from(args.format);
    let dispatcher = config
        .create_dispatcher()
        .with_progress_handler(Arc::new(LoggingHandler));

    let result = dispatcher
        .run_observed(&snippet, |detection| {
            let banner = format!("Detected language: {}", detection.language);
            if format.is_machine_readable() {
                eprintln!("{}", banner);
            } else {
                println!("{}", banner);
            }
        })
        .await;

    let report = match result {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e.help_message());
            return exit_code_for_error(&e);
        }
    };

    match OutputFormatter::new(format).format(&report) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return EXIT_EXECUTION_FAILED;
        }
    }

    exit_code_for_status(report.status())
}
