//! Property-based tests over random acyclic inheritance graphs.
//!
//! Members are drawn from a small pool of names, parameter names and types,
//! so overloads, shadowing and diamond duplicates show up often.
#![cfg(feature = "proptest")]

use std::collections::{BTreeSet, HashSet};

use mockforge::hir::{
    AnnotationMetadata, Declaration, EntityGraph, Param, ResolveOptions, TypeEntity, is_optional,
    resolve_entity,
};
use mockforge::project::resolve_all;
use proptest::prelude::*;

const NAMES: &[&str] = &["tell", "tellStatus", "reset", "value", "fetch"];
const PARAMS: &[&str] = &["status", "key", "msg", "id"];
const TYPES: &[&str] = &["Int", "String", "Bool?", "[Int]", "Observable<Int>"];

// ============================================================================
// PROPTEST STRATEGIES
// ============================================================================

#[derive(Clone, Debug)]
enum MemberSpec {
    Property {
        name: usize,
        ty: usize,
        is_static: bool,
    },
    Method {
        name: usize,
        params: Vec<(usize, usize)>,
        ret: Option<usize>,
    },
}

#[derive(Clone, Debug)]
struct EntitySpec {
    members: Vec<MemberSpec>,
    parents: Vec<prop::sample::Index>,
}

fn arb_member() -> impl Strategy<Value = MemberSpec> {
    prop_oneof![
        (0..NAMES.len(), 0..TYPES.len(), any::<bool>())
            .prop_map(|(name, ty, is_static)| MemberSpec::Property { name, ty, is_static }),
        (
            0..NAMES.len(),
            prop::collection::vec((0..PARAMS.len(), 0..TYPES.len()), 0..3),
            prop::option::of(0..TYPES.len()),
        )
            .prop_map(|(name, params, ret)| MemberSpec::Method { name, params, ret }),
    ]
}

fn arb_entities() -> impl Strategy<Value = Vec<EntitySpec>> {
    prop::collection::vec(
        (
            prop::collection::vec(arb_member(), 0..5),
            prop::collection::vec(any::<prop::sample::Index>(), 0..3),
        )
            .prop_map(|(members, parents)| EntitySpec { members, parents }),
        1..7,
    )
}

fn declaration(spec: &MemberSpec) -> Declaration {
    match spec {
        MemberSpec::Property {
            name,
            ty,
            is_static,
        } => {
            let decl = Declaration::property(NAMES[*name], TYPES[*ty]);
            if *is_static { decl.into_static() } else { decl }
        }
        MemberSpec::Method { name, params, ret } => {
            let mut decl = Declaration::method(NAMES[*name]);
            for (param, ty) in params {
                decl = decl.param(Param::new(PARAMS[*param], TYPES[*ty]));
            }
            if let Some(ret) = ret {
                decl = decl.returns(TYPES[*ret]);
            }
            decl
        }
    }
}

/// Entity `i` only inherits from entities before it, so the graph is acyclic.
fn parents_of(specs: &[EntitySpec], i: usize) -> Vec<usize> {
    if i == 0 {
        return Vec::new();
    }
    specs[i].parents.iter().map(|idx| idx.index(i)).collect()
}

fn build(specs: &[EntitySpec]) -> EntityGraph {
    let mut builder = EntityGraph::builder();
    for (i, spec) in specs.iter().enumerate() {
        let parents: Vec<String> = parents_of(specs, i)
            .into_iter()
            .map(|p| format!("T{}", p))
            .collect();
        builder.add_entity(
            TypeEntity::interface(&format!("T{}", i))
                .at(i as u32 * 100)
                .inherits(parents)
                .members(spec.members.iter().map(declaration))
                .annotated(AnnotationMetadata::default()),
        );
    }
    builder.build()
}

/// Distinct full signatures over the entity and everything it reaches.
fn expected_signatures(specs: &[EntitySpec], root: usize) -> BTreeSet<String> {
    let mut seen = HashSet::new();
    let mut stack = vec![root];
    let mut signatures = BTreeSet::new();
    while let Some(i) = stack.pop() {
        if !seen.insert(i) {
            continue;
        }
        for member in &specs[i].members {
            signatures.insert(declaration(member).full_signature());
        }
        stack.extend(parents_of(specs, i));
    }
    signatures
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_one_member_per_distinct_signature(specs in arb_entities()) {
        let graph = build(&specs);
        for i in 0..specs.len() {
            let id = graph.lookup(&format!("T{}", i)).unwrap();
            let resolved = resolve_entity(&graph, id, &ResolveOptions::default());

            let got: BTreeSet<String> = resolved
                .members()
                .iter()
                .map(|m| m.decl.full_signature())
                .collect();
            prop_assert_eq!(resolved.members().len(), got.len());
            prop_assert_eq!(got, expected_signatures(&specs, i));
        }
    }

    #[test]
    fn prop_keys_are_unique(specs in arb_entities()) {
        let graph = build(&specs);
        for &id in graph.annotated_types() {
            let resolved = resolve_entity(&graph, id, &ResolveOptions::default());
            let keys: HashSet<&str> = resolved.keys().collect();
            prop_assert_eq!(keys.len(), resolved.members().len());
        }
    }

    #[test]
    fn prop_no_optional_init_params(specs in arb_entities()) {
        let graph = build(&specs);
        for &id in graph.annotated_types() {
            let resolved = resolve_entity(&graph, id, &ResolveOptions::default());
            prop_assert!(resolved.init_params().iter().all(|p| !is_optional(&p.ty)));
        }
    }

    #[test]
    fn prop_concurrency_is_deterministic(specs in arb_entities()) {
        let graph = build(&specs);
        let sequential = resolve_all(&graph, 1, &ResolveOptions::default()).unwrap();
        let parallel = resolve_all(&graph, 3, &ResolveOptions::default()).unwrap();
        prop_assert_eq!(sequential, parallel);
    }
}
