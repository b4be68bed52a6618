//! Syntax summary extraction for TypeScript/JavaScript sources.
//!
//! A line-oriented approximation of what a real parser would produce:
//! imports with their specifiers, exports, top-level functions and classes,
//! and relative-import dependencies. Extraction never fails; input it
//! cannot make sense of just contributes nothing to the summary.

use regex::Regex;
use spindle_core::model::{
    ClassInfo, Export, ExportKind, FileRecord, FunctionInfo, Import, SemanticSummary,
};

const METHOD_NAME_BLOCKLIST: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "constructor", "function", "new", "else",
    "do", "try", "typeof", "await",
];

pub struct SemanticParser {
    import_re: Regex,
    export_default_re: Regex,
    export_named_re: Regex,
    export_type_re: Regex,
    function_re: Regex,
    arrow_re: Regex,
    class_re: Regex,
    variable_export_re: Regex,
    method_re: Regex,
}

impl SemanticParser {
    pub fn new() -> Self {
        Self {
            import_re: Regex::new(r#"^\s*import\s+(?:(.+?)\s+from\s+)?["']([^"']+)["']"#).unwrap(),
            export_default_re: Regex::new(r"^\s*export\s+default\b").unwrap(),
            export_named_re: Regex::new(r"^\s*export\s*\{([^}]*)\}").unwrap(),
            export_type_re: Regex::new(r"^\s*export\s+(?:interface|type|enum)\s+(\w+)").unwrap(),
            function_re: Regex::new(
                r"^\s*(?:export\s+)?(?:async\s+)?function\s+(\w+)\s*\(([^)]*)\)",
            )
            .unwrap(),
            arrow_re: Regex::new(
                r"^\s*(?:export\s+)?const\s+(\w+)\s*=\s*(?:async\s+)?\(([^)]*)\)\s*(?::[^=]+)?=>",
            )
            .unwrap(),
            class_re: Regex::new(r"^\s*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?class\s+(\w+)")
                .unwrap(),
            variable_export_re: Regex::new(r"^\s*export\s+(?:const|let|var)\s+(\w+)").unwrap(),
            method_re: Regex::new(
                r"^\s*(?:public\s+|private\s+|protected\s+|static\s+|async\s+|readonly\s+|get\s+|set\s+)*(\w+)\s*\(",
            )
            .unwrap(),
        }
    }

    /// Summarizes a file record. A record without content yields an empty
    /// summary.
    pub fn parse(&self, file: &FileRecord) -> SemanticSummary {
        match file.content.as_deref() {
            Some(content) => self.parse_content(content),
            None => SemanticSummary::default(),
        }
    }

    pub fn parse_content(&self, content: &str) -> SemanticSummary {
        let mut summary = SemanticSummary::default();
        let lines: Vec<&str> = content.lines().collect();

        for (index, line) in lines.iter().enumerate() {
            let line_number = index + 1;
            let exported = line.trim_start().starts_with("export ");

            if let Some(captures) = self.import_re.captures(line) {
                let source = captures[2].to_string();
                let specifiers = captures
                    .get(1)
                    .map(|clause| split_specifiers(clause.as_str()))
                    .unwrap_or_default();

                if source.starts_with("./") || source.starts_with("../") {
                    summary.dependencies.insert(source.clone());
                }
                summary.imports.push(Import { source, specifiers });
                continue;
            }

            if let Some(captures) = self.function_re.captures(line) {
                let name = captures[1].to_string();
                summary.functions.push(FunctionInfo {
                    name: name.clone(),
                    params: split_params(&captures[2]),
                    line: line_number,
                });
                if exported {
                    summary.exports.push(Export {
                        name,
                        kind: ExportKind::Function,
                    });
                }
                continue;
            }

            if let Some(captures) = self.arrow_re.captures(line) {
                let name = captures[1].to_string();
                summary.functions.push(FunctionInfo {
                    name: name.clone(),
                    params: split_params(&captures[2]),
                    line: line_number,
                });
                if exported {
                    summary.exports.push(Export {
                        name,
                        kind: ExportKind::Function,
                    });
                }
                continue;
            }

            if let Some(captures) = self.class_re.captures(line) {
                let name = captures[1].to_string();
                summary.classes.push(ClassInfo {
                    name: name.clone(),
                    methods: self.collect_methods(&lines, index),
                    line: line_number,
                });
                if exported {
                    summary.exports.push(Export {
                        name,
                        kind: ExportKind::Class,
                    });
                }
                continue;
            }

            if self.export_default_re.is_match(line) {
                summary.exports.push(Export {
                    name: "default".to_string(),
                    kind: ExportKind::Default,
                });
                continue;
            }

            if let Some(captures) = self.export_type_re.captures(line) {
                summary.exports.push(Export {
                    name: captures[1].to_string(),
                    kind: ExportKind::Type,
                });
                continue;
            }

            if let Some(captures) = self.variable_export_re.captures(line) {
                summary.exports.push(Export {
                    name: captures[1].to_string(),
                    kind: ExportKind::Variable,
                });
                continue;
            }

            if let Some(captures) = self.export_named_re.captures(line) {
                for entry in captures[1].split(',') {
                    let entry = entry.trim();
                    if entry.is_empty() {
                        continue;
                    }
                    let name = entry.split_whitespace().next().unwrap_or(entry);
                    summary.exports.push(Export {
                        name: name.to_string(),
                        kind: ExportKind::Named,
                    });
                }
            }
        }

        summary
    }

    /// Scans a class body for method names, tracking brace depth from the
    /// declaration line.
    fn collect_methods(&self, lines: &[&str], class_line: usize) -> Vec<String> {
        let mut methods = Vec::new();
        let mut depth = 0i32;
        let mut entered = false;

        for line in lines.iter().skip(class_line) {
            let opens = line.matches('{').count() as i32;
            let closes = line.matches('}').count() as i32;

            if entered && depth == 1 {
                if let Some(captures) = self.method_re.captures(line) {
                    let name = captures[1].to_string();
                    if !METHOD_NAME_BLOCKLIST.contains(&name.as_str()) {
                        methods.push(name);
                    }
                }
            }

            depth += opens - closes;
            if opens > 0 {
                entered = true;
            }
            if entered && depth <= 0 {
                break;
            }
        }

        methods
    }
}

impl Default for SemanticParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits an import clause into its specifiers, mirroring how a syntax tree
/// would report them: `Foo` becomes `default as Foo`, `* as ns` and named
/// entries stay verbatim.
fn split_specifiers(clause: &str) -> Vec<String> {
    let mut specifiers = Vec::new();
    let clause = clause.trim().trim_start_matches("type ").trim();

    let (outside, named) = match (clause.find('{'), clause.rfind('}')) {
        (Some(open), Some(close)) if open < close => (
            format!("{}{}", &clause[..open], &clause[close + 1..]),
            Some(clause[open + 1..close].to_string()),
        ),
        _ => (clause.to_string(), None),
    };

    for entry in outside.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        if entry.starts_with('*') {
            specifiers.push(entry.to_string());
        } else {
            specifiers.push(format!("default as {}", entry));
        }
    }

    if let Some(named) = named {
        for entry in named.split(',') {
            let entry = entry.trim();
            if !entry.is_empty() {
                specifiers.push(entry.to_string());
            }
        }
    }

    specifiers
}

/// Parameter names without type annotations or defaults.
fn split_params(params: &str) -> Vec<String> {
    params
        .split(',')
        .map(|param| {
            param
                .split([':', '='])
                .next()
                .unwrap_or("")
                .trim()
                .to_string()
        })
        .filter(|param| !param.is_empty())
        .collect()
}
