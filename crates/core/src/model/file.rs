use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Source dialects the assistant understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    TypeScript,
    Tsx,
    JavaScript,
    Jsx,
}

impl Language {
    /// Detects the language from a file extension. Anything unrecognized is
    /// treated as plain JavaScript.
    pub fn from_path(path: &Path) -> Language {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts") => Language::TypeScript,
            Some("tsx") => Language::Tsx,
            Some("jsx") => Language::Jsx,
            _ => Language::JavaScript,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
            Language::JavaScript => "javascript",
            Language::Jsx => "jsx",
        }
    }
}

/// A single import statement: where it came from and what it pulled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    pub source: String,
    pub specifiers: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    Named,
    Default,
    Function,
    Class,
    Variable,
    Type,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Export {
    pub name: String,
    pub kind: ExportKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub params: Vec<String>,
    /// 1-based line of the declaration.
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub methods: Vec<String>,
    /// 1-based line of the declaration.
    pub line: usize,
}

/// Structural summary of one source file, produced by the semantic
/// extraction service. An empty summary is a valid result; extraction never
/// fails a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticSummary {
    pub imports: Vec<Import>,
    pub exports: Vec<Export>,
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    /// Relative import sources (`./`, `../`) this file depends on.
    pub dependencies: BTreeSet<String>,
}

impl SemanticSummary {
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
            && self.exports.is_empty()
            && self.functions.is_empty()
            && self.classes.is_empty()
            && self.dependencies.is_empty()
    }
}

/// One entry in the pipeline's working file set.
///
/// Invariant: once `content` is set it is never overwritten by a later
/// read. The read phase treats a populated record as a no-op, which is what
/// makes re-entry after a discovery expansion idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub language: Option<Language>,
    pub content: Option<String>,
    pub semantics: Option<SemanticSummary>,
}

impl FileRecord {
    /// A path-only record, as produced by seeding and discovery.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            language: None,
            content: None,
            semantics: None,
        }
    }

    /// A record with content already loaded.
    pub fn with_content(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let language = Some(Language::from_path(Path::new(&path)));
        Self {
            path,
            language,
            content: Some(content.into()),
            semantics: None,
        }
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }
}
