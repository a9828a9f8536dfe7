//! Generator configuration.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::error::{GenError, Result};
use crate::hir::{DEFAULT_SUBSTITUTE_SUFFIX, ResolveOptions};

/// Marker a doc comment carries to opt a type in.
pub const DEFAULT_ANNOTATION: &str = "@mockable";

/// Everything one generation run needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Source files or directories to scan.
    pub sources: Vec<PathBuf>,
    /// Newline-separated list of source paths; replaces `sources`.
    pub file_list: Option<PathBuf>,
    /// Previously generated substitutes of dependency modules.
    pub dependency_files: Vec<PathBuf>,
    /// Newline-separated list of dependency paths; replaces
    /// `dependency_files`.
    pub dependency_file_list: Option<PathBuf>,
    pub annotation: String,
    pub output: PathBuf,
    /// Worker count; host parallelism when unset.
    pub concurrency_limit: Option<NonZeroUsize>,
    /// Files whose stem ends with one of these are not scanned.
    pub exclusion_suffixes: Vec<String>,
    /// Text placed before everything else in the output.
    pub header: Option<String>,
    /// Wraps the output in `#if NAME` / `#endif`.
    pub macro_guard: Option<String>,
    /// Suffix naming generated substitutes (`Bar` → `BarMock`).
    pub substitute_suffix: String,
    pub warn_unknown_ancestors: bool,
}

impl GeneratorConfig {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            sources: Vec::new(),
            file_list: None,
            dependency_files: Vec::new(),
            dependency_file_list: None,
            annotation: DEFAULT_ANNOTATION.to_string(),
            output: output.into(),
            concurrency_limit: None,
            exclusion_suffixes: Vec::new(),
            header: None,
            macro_guard: None,
            substitute_suffix: DEFAULT_SUBSTITUTE_SUFFIX.to_string(),
            warn_unknown_ancestors: false,
        }
    }

    pub fn with_sources<I, P>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_file_list(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_list = Some(path.into());
        self
    }

    pub fn with_dependency_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.dependency_files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dependency_file_list(mut self, path: impl Into<PathBuf>) -> Self {
        self.dependency_file_list = Some(path.into());
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = annotation.into();
        self
    }

    /// A limit of 0 means host parallelism.
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = NonZeroUsize::new(limit);
        self
    }

    pub fn with_exclusion_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusion_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_macro_guard(mut self, name: impl Into<String>) -> Self {
        self.macro_guard = Some(name.into());
        self
    }

    pub fn with_substitute_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.substitute_suffix = suffix.into();
        self
    }

    pub fn with_warn_unknown_ancestors(mut self, warn: bool) -> Self {
        self.warn_unknown_ancestors = warn;
        self
    }

    /// Check the configuration before any work starts.
    pub fn validate(&self) -> Result<()> {
        if self.annotation.trim().is_empty() {
            return Err(GenError::EmptyMarker);
        }
        if self.sources.is_empty() && self.file_list.is_none() {
            return Err(GenError::NoSources);
        }
        Ok(())
    }

    /// Number of workers to resolve with.
    pub fn concurrency(&self) -> usize {
        self.concurrency_limit
            .or_else(|| std::thread::available_parallelism().ok())
            .map_or(1, NonZeroUsize::get)
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            warn_unknown_ancestors: self.warn_unknown_ancestors,
        }
    }

    /// Source paths to scan, read from the file list when one is set.
    pub fn source_paths(&self) -> Result<Vec<PathBuf>> {
        let paths = match &self.file_list {
            Some(list) => read_file_list(list)?,
            None => self.sources.clone(),
        };
        Ok(paths.into_iter().filter(|p| !self.is_excluded(p)).collect())
    }

    /// Dependency paths, read from the dependency file list when one is set.
    pub fn dependency_paths(&self) -> Result<Vec<PathBuf>> {
        match &self.dependency_file_list {
            Some(list) => read_file_list(list),
            None => Ok(self.dependency_files.clone()),
        }
    }

    /// Whether a file is excluded by its stem.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            return false;
        };
        path.extension().is_some()
            && self
                .exclusion_suffixes
                .iter()
                .any(|suffix| !suffix.is_empty() && stem.ends_with(suffix.as_str()))
    }
}

fn read_file_list(list: &Path) -> Result<Vec<PathBuf>> {
    let text = fs::read_to_string(list).map_err(|source| GenError::UnreadableFileList {
        path: list.to_path_buf(),
        source,
    })?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}
