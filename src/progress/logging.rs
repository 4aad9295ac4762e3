//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use crate::toolchain::ExecutionStatus;
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { run_id } => {
                info!(run_id = %run_id, "Starting run");
            }
            ProgressEvent::LanguageDetected {
                language,
                matched_signatures,
            } => {
                info!(
                    language = %language,
                    signatures = matched_signatures,
                    "Language detected"
                );
            }
            ProgressEvent::PhaseStarted { phase } => {
                debug!(phase = %phase, "Starting phase");
            }
            ProgressEvent::PhaseComplete { phase, duration } => {
                debug!(
                    phase = %phase,
                    duration_us = duration.as_micros(),
                    "Phase complete"
                );
            }
            ProgressEvent::ExecutionStarted { language, adapter } => {
                info!(language = %language, adapter = %adapter, "Executing snippet");
            }
            ProgressEvent::ExecutionComplete { status, duration } => match status {
                ExecutionStatus::Success => {
                    info!(
                        status = %status,
                        duration_ms = duration.as_millis(),
                        "Execution complete"
                    );
                }
                _ => {
                    warn!(
                        status = %status,
                        duration_ms = duration.as_millis(),
                        "Execution failed"
                    );
                }
            },
            ProgressEvent::RecoveryRequested => {
                info!("Requesting repair suggestion");
            }
            ProgressEvent::RecoveryComplete {
                has_suggestion,
                duration,
            } => {
                if *has_suggestion {
                    info!(
                        duration_ms = duration.as_millis(),
                        "Repair suggestion received"
                    );
                } else {
                    warn!(
                        duration_ms = duration.as_millis(),
                        "No repair suggestion available"
                    );
                }
            }
            ProgressEvent::Completed { total_time } => {
                info!(total_time_ms = total_time.as_millis(), "Run complete");
            }
            ProgressEvent::Failed { error } => {
                warn!(error = %error, "Run aborted");
            }
        }
    }
}
