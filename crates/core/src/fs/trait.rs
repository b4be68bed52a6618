use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// File-system operations the pipeline performs, behind a seam so tests can
/// run against an in-memory tree.
#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;

    async fn is_file(&self, path: &Path) -> bool;

    async fn read_to_string(&self, path: &Path) -> Result<String>;

    async fn write(&self, path: &Path, contents: &str) -> Result<()>;

    async fn remove_file(&self, path: &Path) -> Result<()>;

    async fn create_dir_all(&self, path: &Path) -> Result<()>;
}
