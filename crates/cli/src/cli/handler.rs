//! Wires configuration, the LLM backend, and the pipeline together for one
//! CLI invocation.

use super::commands::CliArgs;
use super::output;
use spindle_core::{LoggingHandler, RealFileSystem, SpindleConfig};
use spindle_llm::{AssistantOptions, CodeAssistant, GenAIClient};
use spindle_pipeline::{
    process_request, ApplyMode, ContentSearch, PipelineLimits, PipelineServices, SemanticParser,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Runs the request described by `args` and returns the process exit code.
pub async fn handle_request(args: &CliArgs) -> i32 {
    let prompt = match args.prompt.as_deref().map(str::trim) {
        Some(prompt) if !prompt.is_empty() => prompt.to_string(),
        _ => {
            eprintln!("Error: Please provide a prompt.");
            eprintln!("Use 'spindle --help' for usage information.");
            return 1;
        }
    };

    let mut config = SpindleConfig::default();
    if let Some(provider) = args.provider {
        config.provider = provider;
    }
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }

    if let Err(error) = config.validate() {
        eprintln!("Error: {}", error);
        return 1;
    }

    let project_root = match resolve_project_root(args.root.clone()) {
        Ok(root) => root,
        Err(message) => {
            eprintln!("Error: {}", message);
            return 1;
        }
    };

    debug!(
        provider = config.provider.as_str(),
        model = %config.model,
        root = %project_root.display(),
        "Configuration resolved"
    );

    let client = GenAIClient::new(
        config.provider,
        config.model.clone(),
        Duration::from_secs(config.request_timeout_secs),
    );

    let assistant = CodeAssistant::with_options(
        Arc::new(client),
        AssistantOptions {
            max_preview_lines: config.max_preview_lines,
            ..AssistantOptions::default()
        },
    );

    let services = PipelineServices {
        assistant: Arc::new(assistant),
        fs: Arc::new(RealFileSystem::new()),
        search: Arc::new(ContentSearch::new(
            Duration::from_secs(config.search_timeout_secs),
            PipelineLimits::default().max_search_files,
        )),
        parser: Arc::new(SemanticParser::new()),
        progress: Arc::new(LoggingHandler),
    };

    let apply_mode = if args.write_only {
        ApplyMode::ReportOnly
    } else {
        ApplyMode::Direct
    };

    match process_request(
        &prompt,
        args.files.clone(),
        project_root,
        apply_mode,
        services,
        PipelineLimits::from_config(&config),
    )
    .await
    {
        Ok(outcome) => {
            println!("{}", output::render_outcome(&outcome, args.write_only));
            0
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            1
        }
    }
}

fn resolve_project_root(root: Option<PathBuf>) -> Result<PathBuf, String> {
    let root = match root {
        Some(root) => root,
        None => std::env::current_dir()
            .map_err(|e| format!("Cannot determine current directory: {}", e))?,
    };

    if !root.is_dir() {
        return Err(format!(
            "Project root is not a directory: {}",
            root.display()
        ));
    }

    root.canonicalize()
        .map_err(|e| format!("Cannot resolve project root {}: {}", root.display(), e))
}
