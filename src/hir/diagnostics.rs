//! Diagnostics: locally recovered resolution conditions.
//!
//! Nothing here aborts a run. An unknown ancestor or a cyclic edge is
//! skipped by the resolver and reported as a diagnostic attached to the
//! resolved entity, so callers can surface it or ignore it.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{FileId, TextSize};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

/// A diagnostic message about one type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// The type whose resolution produced this diagnostic.
    pub entity: SmolStr,
    /// The file declaring that type, if known.
    pub file: Option<FileId>,
    /// Offset of the declaration the diagnostic points at.
    pub offset: TextSize,
    pub severity: Severity,
    /// Diagnostic code (e.g., "W0101").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
}

impl Diagnostic {
    /// Create a new warning diagnostic.
    pub fn warning(entity: impl Into<SmolStr>, message: impl Into<Arc<str>>) -> Self {
        Self {
            entity: entity.into(),
            file: None,
            offset: TextSize::default(),
            severity: Severity::Warning,
            code: None,
            message: message.into(),
        }
    }

    /// Create a new info diagnostic.
    pub fn info(entity: impl Into<SmolStr>, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Info,
            ..Self::warning(entity, message)
        }
    }

    /// Point the diagnostic at a location.
    pub fn at(mut self, file: Option<FileId>, offset: TextSize) -> Self {
        self.file = file;
        self.offset = offset;
        self
    }

    /// Set the diagnostic code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Stable codes for resolution diagnostics.
pub mod codes {
    /// Inheritance edge to a type found in neither map.
    pub const UNKNOWN_ANCESTOR: &str = "W0101";
    /// Inheritance edge back onto the current walk.
    pub const CYCLIC_INHERITANCE: &str = "W0102";
    /// A declaration shape the model does not represent was dropped.
    pub const UNRECOGNIZED_DECLARATION: &str = "W0103";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics while one type is resolved.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// An inheritance edge names a type that is neither parsed nor generated.
    pub fn unknown_ancestor(&mut self, entity: &str, file: Option<FileId>, offset: TextSize, ancestor: &str) {
        self.add(
            Diagnostic::info(entity, format!("unknown ancestor '{}' contributes no members", ancestor))
                .at(file, offset)
                .with_code(codes::UNKNOWN_ANCESTOR),
        );
    }

    /// An inheritance edge leads back onto the current path.
    pub fn cyclic_inheritance(&mut self, entity: &str, file: Option<FileId>, offset: TextSize, path: &[SmolStr]) {
        self.add(
            Diagnostic::warning(
                entity,
                format!("cyclic inheritance: {}", path.join(" -> ")),
            )
            .at(file, offset)
            .with_code(codes::CYCLIC_INHERITANCE),
        );
    }

    /// A collaborator dropped a member it could not model.
    pub fn unrecognized_declaration(&mut self, entity: &str, file: Option<FileId>, offset: TextSize, what: &str) {
        self.add(
            Diagnostic::info(entity, format!("omitted unrecognized declaration: {}", what))
                .at(file, offset)
                .with_code(codes::UNRECOGNIZED_DECLARATION),
        );
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning).count()
    }

    /// Check if there are any diagnostics.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
