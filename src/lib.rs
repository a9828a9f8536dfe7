//! # mockforge
//!
//! Inheritance resolution and member deduplication for test-double
//! generation.
//!
//! Given every type a parser found (plus substitutes generated earlier for
//! dependency modules), computes for each annotated type the ordered,
//! uniquely keyed member set its substitute needs, with synthesized
//! initializers and merged alias bounds.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project → config, orchestrator (rayon), driver, renderer interface
//!   ↓
//! syntax  → annotation arguments
//!   ↓
//! hir     → declaration model, entity graph, resolution
//!   ↓
//! base    → primitives (FileId, TextRange, bracket-aware splitting)
//! ```

/// Foundation types: FileId, text ranges, type-text splitting
pub mod base;

/// Fatal errors
pub mod error;

/// Declaration model, entity graph, resolution engine
pub mod hir;

/// Generation runs
pub mod project;

/// Annotation argument parsing
pub mod syntax;

pub use base::{FileId, TextRange, TextSize};
pub use error::{GenError, Result};
pub use hir::{
    Declaration, EntityGraph, EntityGraphBuilder, ResolveOptions, ResolvedEntity, TypeEntity,
    resolve_entity,
};
pub use project::{GeneratorConfig, OutlineRenderer, Renderer, generate, resolve_all};
