//! Resolution orchestrator.
//!
//! One task per annotated type over a bounded rayon pool. Results land in a
//! single mutex-guarded sink in completion order and are re-sorted by source
//! position once every task has finished, so the output never depends on
//! scheduling.

use std::time::Instant;

use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::Result;
use crate::hir::{EntityGraph, ResolveOptions, ResolvedEntity, TypeKeys, resolve_entity};

use super::type_keys::compute_type_keys;

/// Every resolved entity of a run, plus the final type keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Ordered by file, then offset, then name.
    pub entities: Vec<ResolvedEntity>,
    pub type_keys: TypeKeys,
}

impl Resolution {
    pub fn get(&self, name: &str) -> Option<&ResolvedEntity> {
        self.entities.iter().find(|e| e.name() == name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn diagnostic_count(&self) -> usize {
        self.entities.iter().map(|e| e.diagnostics().len()).sum()
    }
}

/// Resolve every annotated type of the graph.
///
/// A concurrency of 1 runs strictly sequentially on the calling thread.
pub fn resolve_all(graph: &EntityGraph, concurrency: usize, options: &ResolveOptions) -> Result<Resolution> {
    let start = Instant::now();
    let tasks = graph.annotated_types();

    let mut entities: Vec<ResolvedEntity> = if concurrency <= 1 {
        tasks
            .iter()
            .map(|&id| resolve_entity(graph, id, options))
            .collect()
    } else {
        let sink = Mutex::new(Vec::with_capacity(tasks.len()));
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(concurrency)
            .build()?;

        pool.install(|| {
            tasks.par_iter().for_each(|&id| {
                let resolved = resolve_entity(graph, id, options);
                sink.lock().push(resolved);
            });
        });

        sink.into_inner()
    };

    entities.sort_by(|a, b| {
        a.file()
            .cmp(&b.file())
            .then_with(|| a.offset().cmp(&b.offset()))
            .then_with(|| a.name().cmp(b.name()))
    });

    let type_keys = compute_type_keys(
        graph.seed_type_keys(),
        &entities,
        graph.substitute_suffix(),
    );

    debug!(type_keys = type_keys.len(), "computed type keys");
    info!(
        resolved = entities.len(),
        workers = concurrency,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "resolution finished"
    );

    Ok(Resolution {
        entities,
        type_keys,
    })
}
