//! Type keys fixed point.

use tracing::trace;

use crate::hir::{ResolvedEntity, TypeKeys};

/// Extend `seed` with every resolved entity whose substitute can be built
/// with no arguments.
///
/// Constructibility depends on the keys themselves: a substitute whose
/// initializer takes a `Service` becomes constructible once `Service` is
/// known. Iterates until nothing new joins.
pub fn compute_type_keys(seed: &TypeKeys, entities: &[ResolvedEntity], suffix: &str) -> TypeKeys {
    let mut keys = seed.clone();
    let mut rounds = 0;
    loop {
        rounds += 1;
        let mut changed = false;
        for entity in entities {
            if !keys.contains(entity.name()) && entity.constructible_with(&keys) {
                keys.insert_substitute(entity.name(), suffix);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    trace!(rounds, keys = keys.len(), "type keys settled");
    keys.sort();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::{
        AnnotationMetadata, Declaration, EntityGraph, ResolveOptions, TypeEntity, resolve_entity,
    };

    #[test]
    fn test_fixed_point_chains_through_dependencies() {
        let mut builder = EntityGraph::builder();
        builder.add_entity(
            TypeEntity::interface("Client")
                .member(Declaration::property("session", "Session"))
                .annotated(AnnotationMetadata::default()),
        );
        builder.add_entity(
            TypeEntity::interface("Session")
                .member(Declaration::property("store", "Store"))
                .annotated(AnnotationMetadata::default()),
        );
        builder.add_entity(
            TypeEntity::interface("Store")
                .member(Declaration::property("count", "Int"))
                .annotated(AnnotationMetadata::default()),
        );
        builder.add_entity(
            TypeEntity::interface("Orphan")
                .member(Declaration::property("missing", "Unknown"))
                .annotated(AnnotationMetadata::default()),
        );
        let graph = builder.build();

        let entities: Vec<_> = graph
            .annotated_types()
            .iter()
            .map(|&id| resolve_entity(&graph, id, &ResolveOptions::default()))
            .collect();
        let keys = compute_type_keys(graph.seed_type_keys(), &entities, "Mock");

        let names: Vec<_> = keys.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["Client", "Session", "Store"]);
    }
}
