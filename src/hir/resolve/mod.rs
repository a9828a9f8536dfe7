//! Resolution: one annotated type in, one [`ResolvedEntity`] out.
//!
//! ```text
//! collect   → members of the type and every reachable ancestor
//!   ↓
//! dedup     → processed/fresh merge, unique keys, presentation order
//!   ↓
//! init      → initializer parameters and synthesized initializers
//!   ↓
//! alias     → merged alias bounds, stream-wrapper kinds
//! ```
//!
//! Every stage is a pure function of the graph and the target. Resolving
//! one type never depends on another's result, so the orchestrator can run
//! them in any order.

mod alias;
mod collect;
mod dedup;
mod init;
mod merge;
mod overrides;
mod resolved;

use tracing::debug;

use crate::hir::diagnostics::DiagnosticCollector;
use crate::hir::graph::EntityGraph;
use crate::hir::ids::EntityId;

pub use collect::IGNORED_ANCESTORS;
pub use overrides::{DEFAULT_STREAM_KIND, is_stream_type};
pub use resolved::{InitParam, ResolvedEntity, ResolvedMember, SynthesizedInits};

/// Knobs of a single resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Log unknown ancestors at `warn` instead of `debug`.
    pub warn_unknown_ancestors: bool,
}

/// Resolve one type of the graph.
pub fn resolve_entity(graph: &EntityGraph, id: EntityId, options: &ResolveOptions) -> ResolvedEntity {
    let target = graph.entity(id);
    let mut diagnostics = DiagnosticCollector::new();

    let collected = collect::collect(graph, id, options, &mut diagnostics);
    let alias_bindings = alias::merge_aliases(&collected.contributions, target.metadata());
    let keyed = dedup::deduplicate(&collected.contributions);
    let stream_kinds = overrides::stream_kinds(graph, target, &keyed);

    let members: Vec<ResolvedMember> = keyed
        .into_iter()
        .map(|entry| ResolvedMember {
            key: entry.key,
            decl: entry.candidate.decl.clone(),
            owner: graph.entity(entry.candidate.owner).name.clone(),
        })
        .collect();

    let declared_inits: Vec<_> = members
        .iter()
        .filter(|m| m.decl.is_initializer)
        .map(|m| m.decl.clone())
        .collect();
    let init_params = init::init_params(&init::init_candidates(&members), graph.seed_type_keys());
    let synthesized = init::decide(target.kind, &declared_inits, &init_params);

    debug!(
        entity = %target.name,
        members = members.len(),
        init_params = init_params.len(),
        diagnostics = diagnostics.diagnostics().len(),
        "resolved"
    );

    ResolvedEntity {
        name: target.name.clone(),
        kind: target.kind,
        access: target.access,
        file: target.file,
        offset: target.offset,
        members,
        attributes: collected.attributes.into_iter().collect(),
        alias_bindings,
        declared_inits,
        init_params,
        synthesized,
        stream_kinds,
        files: collected.files.into_iter().collect(),
        imports: collected.imports.into_iter().collect(),
        diagnostics: diagnostics.take(),
    }
}

/// Resolve a type by name.
pub fn resolve_by_name(graph: &EntityGraph, name: &str, options: &ResolveOptions) -> Option<ResolvedEntity> {
    graph.lookup(name).map(|id| resolve_entity(graph, id, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::decl::{Declaration, Param};
    use crate::hir::entity::{AnnotationMetadata, TypeEntity};
    use smol_str::SmolStr;

    fn rx(entries: &[(&str, &str)]) -> AnnotationMetadata {
        let mut metadata = AnnotationMetadata::default();
        for (key, kind) in entries {
            metadata
                .stream_overrides
                .insert(SmolStr::new(key), SmolStr::new(kind));
        }
        metadata
    }

    #[test]
    fn test_resolve_overloads_across_inheritance() {
        let mut builder = EntityGraph::builder();
        builder.add_entity(
            TypeEntity::interface("Foo")
                .inherits(["Bar"])
                .member(
                    Declaration::method("tell")
                        .param(Param::new("status", "Int"))
                        .param(Param::new("msg", "String"))
                        .returns("Double")
                        .at(40, 10),
                )
                .annotated(AnnotationMetadata::default()),
        );
        builder.add_entity(
            TypeEntity::interface("Bar").member(
                Declaration::method("tell")
                    .param(Param::new("data", "[String: String]"))
                    .param(Param::labeled("for", "client", "ClientProtocol"))
                    .returns("Observable<EncryptedData>")
                    .at(10, 10),
            ),
        );
        let graph = builder.build();

        let resolved = resolve_by_name(&graph, "Foo", &ResolveOptions::default()).unwrap();
        let keys: Vec<_> = resolved.keys().collect();
        assert_eq!(keys, vec!["tellData", "tell"]);
        assert_eq!(resolved.member("tellData").unwrap().owner, "Bar");
        assert!(resolved.synthesized().zero_arg);
    }

    #[test]
    fn test_target_stream_override_beats_ancestors() {
        let mut builder = EntityGraph::builder();
        builder.add_entity(
            TypeEntity::interface("X")
                .inherits(["A", "B"])
                .annotated(rx(&[("tasks", "BehaviorSubject")])),
        );
        builder.add_entity(
            TypeEntity::interface("A")
                .member(Declaration::property("tasks", "Observable<[Task]>"))
                .annotated(rx(&[("tasks", "ReplaySubject")])),
        );
        builder.add_entity(
            TypeEntity::interface("B")
                .member(Declaration::property("events", "Observable<Event>"))
                .member(Declaration::property("count", "Int"))
                .annotated(rx(&[("all", "ReplaySubject")])),
        );
        let graph = builder.build();

        let resolved = resolve_by_name(&graph, "X", &ResolveOptions::default()).unwrap();
        let kinds = resolved.stream_kinds();
        assert_eq!(kinds.len(), 2);
        assert_eq!(kinds["tasks"], "BehaviorSubject");
        assert_eq!(kinds["events"], "ReplaySubject");
    }

    #[test]
    fn test_default_stream_kind() {
        let mut builder = EntityGraph::builder();
        builder.add_entity(
            TypeEntity::interface("X")
                .member(Declaration::property("updates", "Observable<Int>"))
                .annotated(AnnotationMetadata::default()),
        );
        let graph = builder.build();

        let resolved = resolve_by_name(&graph, "X", &ResolveOptions::default()).unwrap();
        assert_eq!(resolved.stream_kinds()["updates"], DEFAULT_STREAM_KIND);
    }
}
