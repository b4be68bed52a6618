//! Progress observer injected into pipeline runs.
//!
//! Phases report user-facing progress through this seam instead of calling
//! a process-wide logger directly; hosts pick the handler.

use std::time::Duration;

/// Events emitted while a request runs.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A run started for the given project root.
    PipelineStarted { project_root: String },

    PhaseStarted { phase: String },

    /// A guarded phase or group whose condition evaluated false.
    PhaseSkipped { phase: String },

    PhaseCompleted { phase: String, duration: Duration },

    /// Discovery admitted new files into the working set.
    FilesDiscovered { count: usize },

    /// The generation service proposed a change set.
    ChangesGenerated { count: usize },

    PipelineCompleted { duration: Duration },

    PipelineFailed { phase: String, error: String },
}

/// Receiver for progress events during a run.
pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

/// Handler that ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

/// Handler that forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        use tracing::{debug, error, info};

        match event {
            ProgressEvent::PipelineStarted { project_root } => {
                info!(root = %project_root, "Starting request pipeline");
            }
            ProgressEvent::PhaseStarted { phase } => {
                info!(phase = %phase, "Starting phase");
            }
            ProgressEvent::PhaseSkipped { phase } => {
                debug!(phase = %phase, "Skipping phase");
            }
            ProgressEvent::PhaseCompleted { phase, duration } => {
                info!(phase = %phase, duration_ms = duration.as_millis() as u64, "Phase complete");
            }
            ProgressEvent::FilesDiscovered { count } => {
                info!(count = count, "Discovered files");
            }
            ProgressEvent::ChangesGenerated { count } => {
                info!(count = count, "Generated changes");
            }
            ProgressEvent::PipelineCompleted { duration } => {
                info!(duration_ms = duration.as_millis() as u64, "Pipeline complete");
            }
            ProgressEvent::PipelineFailed { phase, error } => {
                error!(phase = %phase, error = %error, "Pipeline failed");
            }
        }
    }
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
        NoOpHandler.on_progress(&ProgressEvent::PhaseStarted {
            phase: "ReadFilesPhase".to_string(),
        });
    }

    #[test]
    fn test_events_reach_handler() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.on_progress(&ProgressEvent::PipelineStarted {
            project_root: "/repo".to_string(),
        });
        handler.on_progress(&ProgressEvent::FilesDiscovered { count: 3 });
        handler.on_progress(&ProgressEvent::PipelineCompleted {
            duration: Duration::from_secs(2),
        });

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
