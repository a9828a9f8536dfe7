//! Inheritance collector.
//!
//! Depth-first walk from the target: own members first, then each edge in
//! declaration order. Fresh ancestors are recursed into; generated
//! substitutes are leaves since they already carry every member they
//! inherited when they were generated. Each entity is walked at most once,
//! so shared ancestors of a diamond contribute a single time.

use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::{debug, warn};

use crate::base::FileId;
use crate::hir::decl::Declaration;
use crate::hir::diagnostics::DiagnosticCollector;
use crate::hir::entity::TypeEntity;
use crate::hir::graph::EntityGraph;
use crate::hir::ids::EntityId;

use super::ResolveOptions;

/// Ancestors that carry no members and are never looked up.
pub const IGNORED_ANCESTORS: &[&str] = &["Any", "AnyObject", "class"];

/// One member as reached by the walk.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Contribution<'g> {
    pub decl: &'g Declaration,
    pub owner: EntityId,
}

/// Everything the walk gathered for one target.
#[derive(Debug, Default)]
pub(crate) struct Collected<'g> {
    /// Members in traversal order; fresh and processed intermixed.
    pub contributions: Vec<Contribution<'g>>,
    pub attributes: IndexSet<SmolStr>,
    pub files: IndexSet<FileId>,
    pub imports: IndexSet<SmolStr>,
}

struct Walker<'g, 'd> {
    graph: &'g EntityGraph,
    target: &'g TypeEntity,
    /// Generated substitutes only stand in for interface ancestors.
    include_processed: bool,
    options: ResolveOptions,
    path: Vec<EntityId>,
    /// Entities whose walk has finished.
    done: FxHashSet<EntityId>,
    reported: FxHashSet<SmolStr>,
    diagnostics: &'d mut DiagnosticCollector,
    out: Collected<'g>,
}

pub(crate) fn collect<'g>(
    graph: &'g EntityGraph,
    target: EntityId,
    options: &ResolveOptions,
    diagnostics: &mut DiagnosticCollector,
) -> Collected<'g> {
    let entity = graph.entity(target);
    let mut walker = Walker {
        graph,
        target: entity,
        include_processed: entity.kind.is_interface(),
        options: *options,
        path: Vec::new(),
        done: FxHashSet::default(),
        reported: FxHashSet::default(),
        diagnostics,
        out: Collected::default(),
    };
    walker.visit(target);
    walker.out
}

impl<'g> Walker<'g, '_> {
    fn visit(&mut self, id: EntityId) {
        let graph = self.graph;
        let entity = graph.entity(id);
        self.take_members(id, entity);

        if entity.origin.is_processed() {
            self.done.insert(id);
            return;
        }

        self.path.push(id);
        for edge in graph.edges(id) {
            if IGNORED_ANCESTORS.contains(&edge.name.as_str()) {
                continue;
            }
            let processed = edge.processed.filter(|_| self.include_processed);
            if edge.fresh.is_none() && processed.is_none() {
                self.unknown_ancestor(entity, &edge.name);
                continue;
            }
            if let Some(fresh) = edge.fresh {
                if self.path.contains(&fresh) {
                    self.cycle(entity, &edge.name);
                } else if !self.done.contains(&fresh) {
                    self.visit(fresh);
                }
            }
            if let Some(processed) = processed.filter(|p| !self.done.contains(p)) {
                self.visit(processed);
            }
        }
        self.path.pop();
        self.done.insert(id);
    }

    fn take_members(&mut self, id: EntityId, entity: &'g TypeEntity) {
        for decl in &entity.members {
            if let Some(attributes) = &decl.attributes {
                self.out.attributes.insert(attributes.clone());
            }
            self.out.contributions.push(Contribution { decl, owner: id });
        }
        if let Some(file) = entity.file {
            if self.out.files.insert(file) {
                self.out
                    .imports
                    .extend(self.graph.files().imports(file).iter().cloned());
            }
        }
    }

    fn unknown_ancestor(&mut self, from: &TypeEntity, ancestor: &SmolStr) {
        if !self.reported.insert(ancestor.clone()) {
            return;
        }
        if self.options.warn_unknown_ancestors {
            warn!(target_type = %self.target.name, from = %from.name, %ancestor, "unknown ancestor");
        } else {
            debug!(target_type = %self.target.name, from = %from.name, %ancestor, "unknown ancestor");
        }
        self.diagnostics
            .unknown_ancestor(&self.target.name, from.file, from.offset, ancestor);
    }

    fn cycle(&mut self, from: &TypeEntity, ancestor: &SmolStr) {
        let mut path: Vec<SmolStr> = self
            .path
            .iter()
            .map(|&id| self.graph.entity(id).name.clone())
            .collect();
        path.push(ancestor.clone());
        warn!(target_type = %self.target.name, path = %path.join(" -> "), "cyclic inheritance edge skipped");
        self.diagnostics
            .cyclic_inheritance(&self.target.name, from.file, from.offset, &path);
    }
}
