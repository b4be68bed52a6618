//! ASCII project tree generation.
//!
//! Renders a capped, sorted view of the project's source-like files for the
//! intent and generation prompts. Failure here is never fatal; the caller
//! simply proceeds without a tree.

use crate::walk::{has_extension, source_walker};
use anyhow::{Context, Result};
use spindle_core::paths;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

const TREE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "json", "md", "yaml", "yml"];

pub struct TreeBuilder {
    max_files: usize,
}

#[derive(Default)]
struct TreeNode {
    dirs: BTreeMap<String, TreeNode>,
    files: BTreeSet<String>,
}

impl TreeBuilder {
    pub fn new(max_files: usize) -> Self {
        Self { max_files }
    }

    /// Walks `root` and renders the tree. The walk runs on the blocking
    /// pool.
    pub async fn build(&self, root: &Path) -> Result<String> {
        let root = root.to_path_buf();
        let max_files = self.max_files;

        let files = tokio::task::spawn_blocking(move || collect_files(&root, max_files))
            .await
            .context("Tree walk task failed")?;

        Ok(render_tree(&files))
    }
}

fn collect_files(root: &Path, max_files: usize) -> Vec<String> {
    let mut files: Vec<String> = source_walker(root)
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter(|entry| has_extension(entry.path(), TREE_EXTENSIONS))
        .map(|entry| {
            paths::relative_to(root, entry.path())
                .display()
                .to_string()
        })
        .collect();

    files.sort();
    files.truncate(max_files);
    files
}

fn render_tree(files: &[String]) -> String {
    let mut root = TreeNode::default();

    for file in files {
        let mut node = &mut root;
        let parts: Vec<&str> = file.split('/').collect();
        for (i, part) in parts.iter().enumerate() {
            if i == parts.len() - 1 {
                node.files.insert(part.to_string());
            } else {
                node = node.dirs.entry(part.to_string()).or_default();
            }
        }
    }

    let mut lines = Vec::new();
    render_node(&root, "", &mut lines);
    lines.join("\n")
}

fn render_node(node: &TreeNode, prefix: &str, lines: &mut Vec<String>) {
    let total = node.dirs.len() + node.files.len();
    let mut index = 0;

    for (name, child) in &node.dirs {
        index += 1;
        let is_last = index == total;
        let connector = if is_last { "└── " } else { "├── " };
        let child_prefix = if is_last { "    " } else { "│   " };

        lines.push(format!("{prefix}{connector}{name}/"));
        render_node(child, &format!("{prefix}{child_prefix}"), lines);
    }

    for name in &node.files {
        index += 1;
        let connector = if index == total { "└── " } else { "├── " };
        lines.push(format!("{prefix}{connector}{name}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_tree_rendering() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("src/models")).unwrap();
        fs::write(temp.path().join("src/models/user.ts"), "x").unwrap();
        fs::write(temp.path().join("src/index.ts"), "x").unwrap();
        fs::write(temp.path().join("README.md"), "x").unwrap();
        fs::write(temp.path().join("binary.png"), "x").unwrap();

        let tree = TreeBuilder::new(100).build(temp.path()).await.unwrap();

        assert!(tree.contains("├── src/"));
        assert!(tree.contains("│   ├── models/"));
        assert!(tree.contains("│   │   └── user.ts"));
        assert!(tree.contains("│   └── index.ts"));
        assert!(tree.contains("└── README.md"));
        assert!(!tree.contains("binary.png"));
    }

    #[tokio::test]
    async fn test_tree_caps_file_count() {
        let temp = TempDir::new().unwrap();
        for i in 0..20 {
            fs::write(temp.path().join(format!("f{i:02}.ts")), "x").unwrap();
        }

        let tree = TreeBuilder::new(5).build(temp.path()).await.unwrap();
        assert_eq!(tree.lines().count(), 5);
    }

    #[tokio::test]
    async fn test_empty_project_renders_empty_tree() {
        let temp = TempDir::new().unwrap();
        let tree = TreeBuilder::new(100).build(temp.path()).await.unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_render_nested_ordering_dirs_before_files() {
        let files = vec![
            "zz.ts".to_string(),
            "app/a.ts".to_string(),
            "app/b.ts".to_string(),
        ];
        let tree = render_tree(&files);
        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(lines[0], "├── app/");
        assert_eq!(lines[1], "│   ├── a.ts");
        assert_eq!(lines[2], "│   └── b.ts");
        assert_eq!(lines[3], "└── zz.ts");
    }
}
