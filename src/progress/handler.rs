//! Progress handler trait and events

use crate::language::LanguageTag;
use crate::toolchain::{AdapterVariant, ExecutionStatus};
use std::time::Duration;

/// Events emitted while a snippet moves through the dispatcher
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started
    Started { run_id: String },

    /// Detector resolved a language
    LanguageDetected {
        language: LanguageTag,
        matched_signatures: usize,
    },

    /// Pipeline phase started
    PhaseStarted { phase: &'static str },

    /// Pipeline phase finished
    PhaseComplete {
        phase: &'static str,
        duration: Duration,
    },

    /// Adapter invocation started
    ExecutionStarted {
        language: LanguageTag,
        adapter: AdapterVariant,
    },

    /// Adapter invocation finished
    ExecutionComplete {
        status: ExecutionStatus,
        duration: Duration,
    },

    /// Recovery advisor was asked for a fix
    RecoveryRequested,

    /// Recovery advisor answered
    RecoveryComplete {
        has_suggestion: bool,
        duration: Duration,
    },

    /// Run finished (whatever the execution status)
    Completed { total_time: Duration },

    /// Run aborted before or instead of execution
    Failed { error: String },
}

/// Trait for handling progress events during a run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ProgressHandler for CountingHandler {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_noop_handler() {
        let handler = NoOpHandler;
        handler.on_progress(&ProgressEvent::Started {
            run_id: "run-1".to_string(),
        });
    }

    #[test]
    fn test_progress_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.on_progress(&ProgressEvent::Started {
            run_id: "run-1".to_string(),
        });
        handler.on_progress(&ProgressEvent::LanguageDetected {
            language: LanguageTag::Python,
            matched_signatures: 1,
        });
        handler.on_progress(&ProgressEvent::Completed {
            total_time: Duration::from_secs(1),
        });

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_event_debug() {
        let event = ProgressEvent::PhaseStarted { phase: "tokenize" };
        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("PhaseStarted"));
        assert!(debug_str.contains("tokenize"));
    }
}
