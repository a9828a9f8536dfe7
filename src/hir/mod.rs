//! High-level IR: the declaration model and the resolution engine.
//!
//! ## Architecture
//!
//! ```text
//! TypeEntity / Declaration (parsed by a collaborator)
//!        ↓
//! EntityGraph (arena + name maps, built once, read-only)
//!        ↓
//! resolve_entity (collect → dedup → init → alias)
//!        ↓
//! ResolvedEntity (one per annotated type)
//! ```
//!
//! Nothing in this module touches the filesystem.

mod decl;
mod defaults;
mod diagnostics;
mod entity;
mod graph;
mod ids;
mod input;
pub mod resolve;

pub use decl::{
    DeclKind, Declaration, Origin, Param, Role, UNKNOWN_TYPE, is_optional, normalize_type,
};
pub use defaults::{TypeKeys, default_value};
pub use diagnostics::{Diagnostic, DiagnosticCollector, Severity, codes};
pub use entity::{Access, AnnotationMetadata, TypeEntity, TypeKind};
pub use graph::{DEFAULT_SUBSTITUTE_SUFFIX, Edge, EntityGraph, EntityGraphBuilder};
pub use ids::EntityId;
pub use input::{SourceFile, SourceFiles};
pub use resolve::{
    DEFAULT_STREAM_KIND, InitParam, ResolveOptions, ResolvedEntity, ResolvedMember,
    SynthesizedInits, resolve_by_name, resolve_entity,
};
