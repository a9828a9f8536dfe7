//! Entity graph: the arena of parsed and generated types.
//!
//! Built once per run, before any resolution starts, and read-only
//! afterwards. Every [`TypeEntity`] lives in a single arena addressed by
//! [`EntityId`]; the three name maps of a run (`allTypes`, `annotatedTypes`,
//! `dependencyTypes`) index into it. Inheritance edges are resolved to ids at
//! build time, so a missing ancestor is an explicit `None` instead of a failed
//! lookup deep inside a walk.

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::decl::{Declaration, Origin};
use super::defaults::TypeKeys;
use super::entity::TypeEntity;
use super::ids::EntityId;
use super::input::SourceFiles;

/// Conventional suffix of generated substitute types.
pub const DEFAULT_SUBSTITUTE_SUFFIX: &str = "Mock";

/// One inheritance edge, resolved against both maps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub name: SmolStr,
    /// The type as parsed in this run.
    pub fresh: Option<EntityId>,
    /// The substitute already generated for it in a dependency.
    pub processed: Option<EntityId>,
}

impl Edge {
    /// Resolves in neither map.
    pub fn is_unknown(&self) -> bool {
        self.fresh.is_none() && self.processed.is_none()
    }
}

/// Immutable graph of all types known to a run.
#[derive(Clone, Debug, Default)]
pub struct EntityGraph {
    arena: Vec<TypeEntity>,
    edges: Vec<Vec<Edge>>,
    all_types: IndexMap<SmolStr, EntityId>,
    dependency_types: IndexMap<SmolStr, EntityId>,
    /// Annotated fresh types, ordered by name.
    annotated: Vec<EntityId>,
    files: SourceFiles,
    seed_keys: TypeKeys,
    substitute_suffix: SmolStr,
}

impl EntityGraph {
    pub fn builder() -> EntityGraphBuilder {
        EntityGraphBuilder::new()
    }

    pub fn entity(&self, id: EntityId) -> &TypeEntity {
        &self.arena[id.index()]
    }

    pub fn edges(&self, id: EntityId) -> &[Edge] {
        &self.edges[id.index()]
    }

    /// Look up a fresh type by name.
    pub fn lookup(&self, name: &str) -> Option<EntityId> {
        self.all_types.get(name).copied()
    }

    /// Look up a generated dependency type by the name of the type it
    /// substitutes.
    pub fn lookup_dependency(&self, name: &str) -> Option<EntityId> {
        self.dependency_types.get(name).copied()
    }

    /// Every fresh type, in insertion order.
    pub fn all_types(&self) -> impl Iterator<Item = (&SmolStr, EntityId)> + '_ {
        self.all_types.iter().map(|(name, &id)| (name, id))
    }

    /// Every generated dependency type, keyed by substituted name.
    pub fn dependency_types(&self) -> impl Iterator<Item = (&SmolStr, EntityId)> + '_ {
        self.dependency_types.iter().map(|(name, &id)| (name, id))
    }

    /// Annotated types, ordered by name.
    pub fn annotated_types(&self) -> &[EntityId] {
        &self.annotated
    }

    pub fn files(&self) -> &SourceFiles {
        &self.files
    }

    /// Type keys known before resolution: dependency substitutes that can be
    /// built with no arguments.
    pub fn seed_type_keys(&self) -> &TypeKeys {
        &self.seed_keys
    }

    pub fn substitute_suffix(&self) -> &str {
        &self.substitute_suffix
    }

    pub fn type_count(&self) -> usize {
        self.all_types.len()
    }

    pub fn dependency_count(&self) -> usize {
        self.dependency_types.len()
    }
}

/// Assembles an [`EntityGraph`].
///
/// Adding a second type under an existing name replaces the first.
#[derive(Debug)]
pub struct EntityGraphBuilder {
    arena: Vec<TypeEntity>,
    all_types: IndexMap<SmolStr, EntityId>,
    dependency_types: IndexMap<SmolStr, EntityId>,
    files: SourceFiles,
    substitute_suffix: SmolStr,
}

impl Default for EntityGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityGraphBuilder {
    pub fn new() -> Self {
        Self {
            arena: Vec::new(),
            all_types: IndexMap::new(),
            dependency_types: IndexMap::new(),
            files: SourceFiles::new(),
            substitute_suffix: SmolStr::new_static(DEFAULT_SUBSTITUTE_SUFFIX),
        }
    }

    pub fn with_files(mut self, files: SourceFiles) -> Self {
        self.files = files;
        self
    }

    pub fn with_substitute_suffix(mut self, suffix: &str) -> Self {
        self.substitute_suffix = SmolStr::new(suffix);
        self
    }

    fn push(&mut self, entity: TypeEntity) -> EntityId {
        let id = EntityId::new(self.arena.len() as u32);
        self.arena.push(entity);
        id
    }

    /// Add a type parsed in this run.
    pub fn add_entity(&mut self, entity: TypeEntity) -> EntityId {
        let entity = entity.with_origin(Origin::Fresh);
        let name = entity.name.clone();
        let id = self.push(entity);
        self.all_types.insert(name, id);
        id
    }

    /// Add a substitute generated for a dependency module.
    ///
    /// It is keyed by the name of the type it substitutes: `BarMock` is found
    /// as `Bar`. Members without a role get the one their name implies, so
    /// bookkeeping state is recognized even when the parser only saw names.
    pub fn add_dependency(&mut self, entity: TypeEntity) -> EntityId {
        let mut entity = entity.with_origin(Origin::Processed);
        entity.members = entity
            .members
            .into_iter()
            .map(Declaration::with_inferred_role)
            .collect();
        let key = entity
            .name
            .strip_suffix(self.substitute_suffix.as_str())
            .filter(|rest| !rest.is_empty() && !self.substitute_suffix.is_empty())
            .map(SmolStr::new)
            .unwrap_or_else(|| entity.name.clone());
        let id = self.push(entity);
        self.dependency_types.insert(key, id);
        id
    }

    pub fn extend_entities<I: IntoIterator<Item = TypeEntity>>(&mut self, entities: I) {
        for entity in entities {
            self.add_entity(entity);
        }
    }

    pub fn extend_dependencies<I: IntoIterator<Item = TypeEntity>>(&mut self, entities: I) {
        for entity in entities {
            self.add_dependency(entity);
        }
    }

    pub fn build(self) -> EntityGraph {
        let edges = self
            .arena
            .iter()
            .map(|entity| {
                entity
                    .inherits
                    .iter()
                    .map(|name| Edge {
                        name: name.clone(),
                        fresh: self.all_types.get(name).copied(),
                        processed: self.dependency_types.get(name).copied(),
                    })
                    .collect()
            })
            .collect();

        let mut annotated: Vec<EntityId> = self
            .all_types
            .values()
            .copied()
            .filter(|&id| self.arena[id.index()].is_annotated())
            .collect();
        annotated.sort_by(|&a, &b| self.arena[a.index()].name.cmp(&self.arena[b.index()].name));

        let mut seed_keys = TypeKeys::new();
        for (key, &id) in &self.dependency_types {
            if self.arena[id.index()].has_blank_init {
                seed_keys.insert_substitute(key, &self.substitute_suffix);
            }
        }
        seed_keys.sort();

        EntityGraph {
            arena: self.arena,
            edges,
            all_types: self.all_types,
            dependency_types: self.dependency_types,
            annotated,
            files: self.files,
            seed_keys,
            substitute_suffix: self.substitute_suffix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::{AnnotationMetadata, Declaration};

    fn sample_graph() -> EntityGraph {
        let mut builder = EntityGraph::builder();
        builder.add_entity(
            TypeEntity::interface("Foo")
                .inherits(["Bar", "Missing"])
                .annotated(AnnotationMetadata::default()),
        );
        builder.add_entity(TypeEntity::interface("Bar"));
        builder.add_entity(
            TypeEntity::interface("Alpha").annotated(AnnotationMetadata::default()),
        );
        builder.add_dependency(
            TypeEntity::concrete("BarMock")
                .member(Declaration::property("tellCallCount", "Int"))
                .with_blank_init(true),
        );
        builder.build()
    }

    #[test]
    fn test_dependency_keyed_without_suffix() {
        let graph = sample_graph();
        let id = graph.lookup_dependency("Bar").unwrap();
        assert_eq!(graph.entity(id).name, "BarMock");
        assert!(graph.entity(id).origin.is_processed());
        assert!(graph.entity(id).members[0].origin.is_processed());
        assert!(graph.lookup_dependency("BarMock").is_none());
    }

    #[test]
    fn test_edges_resolve_against_both_maps() {
        let graph = sample_graph();
        let foo = graph.lookup("Foo").unwrap();
        let edges = graph.edges(foo);

        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].fresh, graph.lookup("Bar"));
        assert_eq!(edges[0].processed, graph.lookup_dependency("Bar"));
        assert!(edges[1].is_unknown());
    }

    #[test]
    fn test_annotated_sorted_by_name() {
        let graph = sample_graph();
        let names: Vec<_> = graph
            .annotated_types()
            .iter()
            .map(|&id| graph.entity(id).name.as_str())
            .collect();
        assert_eq!(names, vec!["Alpha", "Foo"]);
    }

    #[test]
    fn test_seed_type_keys_from_blank_init_dependencies() {
        let graph = sample_graph();
        assert_eq!(graph.seed_type_keys().get("Bar").map(|s| s.as_str()), Some("BarMock()"));
    }

    #[test]
    fn test_dependency_members_get_inferred_roles() {
        let graph = sample_graph();
        let id = graph.lookup_dependency("Bar").unwrap();
        assert_eq!(graph.entity(id).members[0].role.counted_key().map(|k| k.as_str()), Some("tell"));

        // fresh types keep plain names as they are
        let mut builder = EntityGraph::builder();
        let fresh = builder.add_entity(
            TypeEntity::interface("Counter").member(Declaration::property("tellCallCount", "Int")),
        );
        let graph = builder.build();
        assert!(graph.entity(fresh).members[0].role.is_ordinary());
    }

    #[test]
    fn test_later_entity_replaces_earlier() {
        let mut builder = EntityGraph::builder();
        builder.add_entity(TypeEntity::interface("Foo").member(Declaration::method("a")));
        builder.add_entity(TypeEntity::interface("Foo").member(Declaration::method("b")));
        let graph = builder.build();

        assert_eq!(graph.type_count(), 1);
        let foo = graph.lookup("Foo").unwrap();
        assert_eq!(graph.entity(foo).members[0].name, "b");
    }
}
