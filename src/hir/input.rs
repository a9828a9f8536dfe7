//! Source file registry shared by every entity of a run.

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::FileId;

/// One parsed source file: its path and the import lines it declares.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceFile {
    /// Path for display and for output bookkeeping.
    pub path: Arc<str>,
    /// Raw import statements, in file order (e.g. `import Foundation`).
    pub imports: Vec<SmolStr>,
}

/// The set of all source files the entities of a run were parsed from.
///
/// Built by the parsing collaborator; read-only during resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceFiles {
    files: IndexMap<FileId, SourceFile>,
}

impl SourceFiles {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, returning its id.
    ///
    /// Ids are assigned sequentially in insertion order.
    pub fn add<I, S>(&mut self, path: impl Into<Arc<str>>, imports: I) -> FileId
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        let id = FileId::new(self.files.len() as u32);
        self.files.insert(
            id,
            SourceFile {
                path: path.into(),
                imports: imports.into_iter().map(Into::into).collect(),
            },
        );
        id
    }

    /// Get a file by id.
    pub fn get(&self, file: FileId) -> Option<&SourceFile> {
        self.files.get(&file)
    }

    /// Get the path for a file.
    pub fn path(&self, file: FileId) -> Option<&str> {
        self.files.get(&file).map(|f| f.path.as_ref())
    }

    /// Get the import lines of a file (empty for unknown files).
    pub fn imports(&self, file: FileId) -> &[SmolStr] {
        self.files
            .get(&file)
            .map(|f| f.imports.as_slice())
            .unwrap_or_default()
    }

    /// Iterate over all files.
    pub fn iter(&self) -> impl Iterator<Item = (FileId, &SourceFile)> + '_ {
        self.files.iter().map(|(&id, file)| (id, file))
    }

    /// Get the number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
