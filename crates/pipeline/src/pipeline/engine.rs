//! The staged execution engine.
//!
//! A pipeline is an ordered list of phase definitions run over one mutable
//! context. Guard conditions are pure synchronous predicates evaluated
//! against the current context, exactly once per definition; a false guard
//! skips its phase (or its whole group) without any side effect. A phase
//! error aborts the run with no retry and no rollback.

use super::context::PipelineContext;
use super::phase_trait::Phase;
use anyhow::{Context, Result};
use spindle_core::ProgressEvent;
use std::time::Instant;
use tracing::{debug, info};

/// Guard predicate over the current context.
pub type Condition = fn(&PipelineContext) -> bool;

/// A phase definition: unconditional, guarded, or a guarded group whose
/// condition is evaluated once for all members.
pub enum PhaseDef {
    Plain(Box<dyn Phase>),
    Guarded(Condition, Box<dyn Phase>),
    GuardedGroup(Condition, Vec<Box<dyn Phase>>),
}

impl PhaseDef {
    pub fn plain(phase: impl Phase + 'static) -> Self {
        PhaseDef::Plain(Box::new(phase))
    }

    pub fn guarded(condition: Condition, phase: impl Phase + 'static) -> Self {
        PhaseDef::Guarded(condition, Box::new(phase))
    }

    pub fn group(condition: Condition, phases: Vec<Box<dyn Phase>>) -> Self {
        PhaseDef::GuardedGroup(condition, phases)
    }
}

pub struct Pipeline {
    defs: Vec<PhaseDef>,
}

impl Pipeline {
    pub fn new(defs: Vec<PhaseDef>) -> Self {
        Self { defs }
    }

    /// Runs every definition in declaration order, threading `context`
    /// through. Each phase observes the cumulative effect of everything
    /// that ran before it, including conditionally-run phases.
    pub async fn run(&self, context: &mut PipelineContext) -> Result<()> {
        let start = Instant::now();
        context
            .progress
            .on_progress(&ProgressEvent::PipelineStarted {
                project_root: context.project_root.display().to_string(),
            });

        for def in &self.defs {
            match def {
                PhaseDef::Plain(phase) => {
                    self.run_phase(phase.as_ref(), context).await?;
                }
                PhaseDef::Guarded(condition, phase) => {
                    if condition(context) {
                        self.run_phase(phase.as_ref(), context).await?;
                    } else {
                        self.skip_phase(phase.as_ref(), context);
                    }
                }
                PhaseDef::GuardedGroup(condition, phases) => {
                    if condition(context) {
                        for phase in phases {
                            self.run_phase(phase.as_ref(), context).await?;
                        }
                    } else {
                        for phase in phases {
                            self.skip_phase(phase.as_ref(), context);
                        }
                    }
                }
            }
        }

        context
            .progress
            .on_progress(&ProgressEvent::PipelineCompleted {
                duration: start.elapsed(),
            });
        Ok(())
    }

    async fn run_phase(&self, phase: &dyn Phase, context: &mut PipelineContext) -> Result<()> {
        let name = phase.name();
        info!(phase = %name, "Starting phase");
        context.progress.on_progress(&ProgressEvent::PhaseStarted {
            phase: name.to_string(),
        });

        let phase_start = Instant::now();
        match phase.execute(context).await {
            Ok(()) => {
                context
                    .progress
                    .on_progress(&ProgressEvent::PhaseCompleted {
                        phase: name.to_string(),
                        duration: phase_start.elapsed(),
                    });
                debug!(
                    phase = %name,
                    duration_ms = phase_start.elapsed().as_millis() as u64,
                    "Phase complete"
                );
                Ok(())
            }
            Err(error) => {
                context.progress.on_progress(&ProgressEvent::PipelineFailed {
                    phase: name.to_string(),
                    error: error.to_string(),
                });
                Err(error).with_context(|| format!("Phase {} failed", name))
            }
        }
    }

    fn skip_phase(&self, phase: &dyn Phase, context: &PipelineContext) {
        debug!(phase = %phase.name(), "Skipping phase");
        context.progress.on_progress(&ProgressEvent::PhaseSkipped {
            phase: phase.name().to_string(),
        });
    }
}
