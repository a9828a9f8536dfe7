//! Run-level plumbing: configuration, orchestration, the driver, and the
//! collaborator interfaces it calls.

mod config;
#[cfg(feature = "interchange")]
pub mod export;
mod generate;
mod orchestrator;
mod render;
mod type_keys;

pub use config::{DEFAULT_ANNOTATION, GeneratorConfig};
pub use generate::{EntitySource, GenerateReport, ScanRequest, Scanned, assemble, generate};
pub use orchestrator::{Resolution, resolve_all};
pub use render::{OutlineRenderer, Renderer};
pub use type_keys::compute_type_keys;
