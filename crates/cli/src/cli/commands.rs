use clap::Parser;
use genai::adapter::AdapterKind;
use std::path::PathBuf;

/// AI-assisted request-to-code-change pipeline
#[derive(Parser, Debug)]
#[command(
    name = "spindle",
    about = "AI-assisted request-to-code-change pipeline",
    version,
    long_about = "spindle takes a natural-language request and a set of seed files, works out \
                  what you want, gathers the minimum additional source context it needs, and \
                  applies the resulting edits to your project (or writes them to a reviewable \
                  CHANGES.md with --write-only). Supports multiple AI backends through genai \
                  (Ollama, OpenAI, Claude, Gemini, Grok, Groq)."
)]
pub struct CliArgs {
    #[arg(value_name = "PROMPT", help = "The request for the assistant")]
    pub prompt: Option<String>,

    #[arg(
        short = 'f',
        long = "files",
        value_name = "FILE",
        num_args = 1..,
        help = "Seed files to include in the analysis"
    )]
    pub files: Vec<String>,

    #[arg(
        short = 'r',
        long = "root",
        value_name = "PATH",
        help = "Project root directory (defaults to current directory)"
    )]
    pub root: Option<PathBuf>,

    #[arg(
        short = 'w',
        long = "write-only",
        help = "Write changes to CHANGES.md for review instead of applying them"
    )]
    pub write_only: bool,

    #[arg(
        short = 'b',
        long,
        value_parser = parse_adapter_kind,
        help = "AI backend provider (overrides SPINDLE_PROVIDER)"
    )]
    pub provider: Option<AdapterKind>,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        help = "Model name to use (provider-specific, overrides SPINDLE_MODEL)"
    )]
    pub model: Option<String>,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "LLM request timeout in seconds (overrides SPINDLE_REQUEST_TIMEOUT)"
    )]
    pub timeout: Option<u64>,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Increase verbosity")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    spindle_core::parse_provider(s).map_err(|e| e.to_string())
}
