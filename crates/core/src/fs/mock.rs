use super::FileSystem;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
enum MockEntry {
    File(String),
    Directory,
}

/// In-memory `FileSystem` for tests. Relative paths are rooted at `/mock`
/// unless another root is given. Individual paths can be marked to fail on
/// write, which is how partial-application scenarios are exercised.
pub struct MockFileSystem {
    entries: RwLock<HashMap<PathBuf, MockEntry>>,
    failing_writes: RwLock<HashSet<PathBuf>>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            failing_writes: RwLock::new(HashSet::new()),
            root,
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = self.normalize(path.as_ref());
        let mut entries = self.entries.write().unwrap();
        if let Some(parent) = path.parent() {
            Self::ensure_parents(&mut entries, parent);
        }
        entries.insert(path, MockEntry::File(content.to_string()));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.normalize(path.as_ref());
        let mut entries = self.entries.write().unwrap();
        Self::ensure_parents(&mut entries, &path);
        entries.insert(path, MockEntry::Directory);
    }

    /// Makes every subsequent write to `path` fail.
    pub fn fail_writes_to(&self, path: impl AsRef<Path>) {
        let path = self.normalize(path.as_ref());
        self.failing_writes.write().unwrap().insert(path);
    }

    /// Number of files currently present.
    pub fn file_count(&self) -> usize {
        self.entries
            .read()
            .unwrap()
            .values()
            .filter(|e| matches!(e, MockEntry::File(_)))
            .count()
    }

    fn normalize(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn ensure_parents(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            entries
                .entry(current.clone())
                .or_insert(MockEntry::Directory);
        }
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileSystem for MockFileSystem {
    async fn exists(&self, path: &Path) -> bool {
        let path = self.normalize(path);
        self.entries.read().unwrap().contains_key(&path)
    }

    async fn is_file(&self, path: &Path) -> bool {
        let path = self.normalize(path);
        matches!(
            self.entries.read().unwrap().get(&path),
            Some(MockEntry::File(_))
        )
    }

    async fn read_to_string(&self, path: &Path) -> Result<String> {
        let path = self.normalize(path);
        match self.entries.read().unwrap().get(&path) {
            Some(MockEntry::File(content)) => Ok(content.clone()),
            Some(MockEntry::Directory) => Err(anyhow!("Not a file: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    async fn write(&self, path: &Path, contents: &str) -> Result<()> {
        let path = self.normalize(path);
        if self.failing_writes.read().unwrap().contains(&path) {
            return Err(anyhow!("Write failed: {:?}", path));
        }
        let mut entries = self.entries.write().unwrap();
        if let Some(parent) = path.parent() {
            Self::ensure_parents(&mut entries, parent);
        }
        entries.insert(path, MockEntry::File(contents.to_string()));
        Ok(())
    }

    async fn remove_file(&self, path: &Path) -> Result<()> {
        let path = self.normalize(path);
        let mut entries = self.entries.write().unwrap();
        match entries.get(&path) {
            Some(MockEntry::File(_)) => {
                entries.remove(&path);
                Ok(())
            }
            Some(MockEntry::Directory) => Err(anyhow!("Not a file: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        let path = self.normalize(path);
        let mut entries = self.entries.write().unwrap();
        Self::ensure_parents(&mut entries, &path);
        Ok(())
    }
}
