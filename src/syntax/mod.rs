//! Source-text helpers shared by parsing collaborators.
//!
//! Turning source files into entities is left to an
//! [`EntitySource`](crate::project::EntitySource); this module only holds
//! the pieces every such source needs to agree on.

pub mod annotation;

pub use annotation::{has_marker, parse_metadata};
