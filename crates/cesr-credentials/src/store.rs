//! Schema stores: where versioned schema documents come from.

use crate::errors::StoreError;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Source of schema documents laid out as `<version>/<file>`.
pub trait SchemaStore: Send + Sync {
    /// Returns true if the store has a directory for `version`.
    fn has_version(&self, version: &str) -> bool;

    /// Reads one schema document.
    ///
    /// Returns `Ok(None)` when the version does not contain `file`.
    fn read_schema(&self, version: &str, file: &str) -> Result<Option<Vec<u8>>, StoreError>;
}

/// Schema store backed by a directory tree.
#[derive(Debug, Clone)]
pub struct DirSchemaStore {
    root: PathBuf,
}

impl DirSchemaStore {
    /// Creates a store rooted at `root` (e.g. `schema/acdc`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SchemaStore for DirSchemaStore {
    fn has_version(&self, version: &str) -> bool {
        self.root.join(version).is_dir()
    }

    fn read_schema(&self, version: &str, file: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.root.join(version).join(file);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

/// In-memory schema store, for schemas compiled into a binary or built in tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySchemaStore {
    versions: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
}

impl MemorySchemaStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty version directory.
    pub fn add_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.versions.entry(version.into()).or_default();
        self
    }

    /// Adds a schema document, creating its version if needed.
    pub fn insert(
        &mut self,
        version: impl Into<String>,
        file: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) -> &mut Self {
        self.versions
            .entry(version.into())
            .or_default()
            .insert(file.into(), contents.into());
        self
    }

    /// Builder form of [`MemorySchemaStore::insert`].
    pub fn with_schema(
        mut self,
        version: impl Into<String>,
        file: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        self.insert(version, file, contents);
        self
    }
}

impl SchemaStore for MemorySchemaStore {
    fn has_version(&self, version: &str) -> bool {
        self.versions.contains_key(version)
    }

    fn read_schema(&self, version: &str, file: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .versions
            .get(version)
            .and_then(|files| files.get(file))
            .cloned())
    }
}
