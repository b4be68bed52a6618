//! Assembly and entry point for the standard request pipeline.

use super::conditions;
use super::config::PipelineLimits;
use super::context::{PipelineContext, PipelineServices};
use super::engine::{PhaseDef, Pipeline};
use super::phase_trait::Phase;
use super::phases::{
    AnswerPhase, ApplyChangesPhase, DiscoverFilesPhase, GenerateChangesPhase, IntentPhase,
    ProjectTreePhase, ReadFilesPhase, SemanticParsePhase, WriteReportPhase,
};
use anyhow::{ensure, Result};
use spindle_core::model::{ApplyResult, Intent};
use std::path::PathBuf;

/// How an edit-mode run realizes its change set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Apply changes to the files directly.
    Direct,
    /// Render the change set into a Markdown report for manual review.
    ReportOnly,
}

/// What a completed run hands back to the host.
#[derive(Debug)]
pub struct RequestOutcome {
    pub intent: Intent,
    pub result: ApplyResult,
    pub answer: Option<String>,
}

/// The fixed pipeline shape: analyze, expand once if asked to, then either
/// edit or answer.
pub fn standard_pipeline(apply_mode: ApplyMode) -> Pipeline {
    let realize: Box<dyn Phase> = match apply_mode {
        ApplyMode::Direct => Box::new(ApplyChangesPhase),
        ApplyMode::ReportOnly => Box::new(WriteReportPhase),
    };

    Pipeline::new(vec![
        PhaseDef::plain(ProjectTreePhase),
        PhaseDef::plain(ReadFilesPhase),
        PhaseDef::plain(SemanticParsePhase),
        PhaseDef::plain(IntentPhase),
        PhaseDef::group(
            conditions::needs_more_context,
            vec![
                Box::new(DiscoverFilesPhase),
                Box::new(ReadFilesPhase),
                Box::new(SemanticParsePhase),
            ],
        ),
        PhaseDef::group(
            conditions::wants_edit,
            vec![Box::new(GenerateChangesPhase), realize],
        ),
        PhaseDef::guarded(conditions::is_ask, AnswerPhase),
    ])
}

/// Runs one request end to end and returns the analyzed intent, the audit
/// trail, and the answer when the run took the ask branch.
pub async fn process_request(
    user_prompt: &str,
    initial_file_paths: Vec<String>,
    project_root: PathBuf,
    apply_mode: ApplyMode,
    services: PipelineServices,
    limits: PipelineLimits,
) -> Result<RequestOutcome> {
    ensure!(!user_prompt.trim().is_empty(), "Prompt must not be empty");

    let mut context = PipelineContext::new(
        user_prompt,
        initial_file_paths,
        project_root,
        services,
        limits,
    );

    standard_pipeline(apply_mode).run(&mut context).await?;

    Ok(RequestOutcome {
        intent: context.intent,
        result: context.result,
        answer: context.answer,
    })
}
