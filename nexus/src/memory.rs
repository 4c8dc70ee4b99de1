//! In-memory containers for fixtures and tests.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use crate::Container;
use crate::ContainerBackend;
use crate::ContainerError;
use crate::Dataset;

#[derive(Debug, Clone, Default)]
pub struct MemoryContainer {
    datasets: BTreeMap<String, Dataset>,
    failing: BTreeSet<String>,
}

impl MemoryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, key: impl Into<String>, dataset: Dataset) -> Self {
        self.insert(key, dataset);
        self
    }

    /// Makes `key` exist but fail to read.
    pub fn with_read_failure(mut self, key: impl Into<String>) -> Self {
        self.failing.insert(key.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, dataset: Dataset) {
        self.datasets.insert(key.into(), dataset);
    }
}

impl Container for MemoryContainer {
    fn dataset(&self, key: &str) -> Result<Option<Dataset>, ContainerError> {
        if self.failing.contains(key) {
            return Err(ContainerError::Read {
                key: key.to_string(),
                message: "simulated read failure".to_string(),
            });
        }
        Ok(self.datasets.get(key).cloned())
    }
}

/// Serves [`MemoryContainer`]s keyed by path; any other path fails to open.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    files: BTreeMap<PathBuf, MemoryContainer>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, container: MemoryContainer) -> Self {
        self.files.insert(path.into(), container);
        self
    }
}

impl ContainerBackend for MemoryBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn Container>, ContainerError> {
        match self.files.get(path) {
            Some(container) => Ok(Box::new(container.clone())),
            None => Err(ContainerError::Open {
                path: path.to_path_buf(),
                message: "not a readable container".to_string(),
            }),
        }
    }
}
