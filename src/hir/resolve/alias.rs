//! Type-alias merge.

use indexmap::{IndexMap, IndexSet};
use smol_str::SmolStr;

use crate::base::split_top_level;
use crate::hir::entity::AnnotationMetadata;

use super::collect::Contribution;

/// Alias names declared with more than one distinct bound text across the
/// gathered members, with every distinct component bound. A single
/// composed bound (`Codable & Hashable`) is not a conflict. Explicit
/// overrides replace the inferred set for their name.
pub(crate) fn merge_aliases(
    contributions: &[Contribution<'_>],
    metadata: Option<&AnnotationMetadata>,
) -> IndexMap<SmolStr, Vec<SmolStr>> {
    let mut declared: IndexMap<SmolStr, IndexSet<&str>> = IndexMap::new();
    for contribution in contributions.iter().filter(|c| c.decl.kind.is_alias()) {
        let ty = contribution.decl.ty.as_str();
        if !ty.is_empty() {
            declared
                .entry(contribution.decl.name.clone())
                .or_default()
                .insert(ty);
        }
    }

    let mut merged: IndexMap<SmolStr, Vec<SmolStr>> = declared
        .into_iter()
        .filter(|(_, texts)| texts.len() > 1)
        .map(|(name, texts)| (name, component_bounds(&texts)))
        .collect();

    if let Some(metadata) = metadata {
        for (name, ty) in &metadata.alias_overrides {
            merged.insert(name.clone(), vec![ty.clone()]);
        }
    }
    merged
}

fn component_bounds(texts: &IndexSet<&str>) -> Vec<SmolStr> {
    let mut bounds: IndexSet<SmolStr> = IndexSet::new();
    for text in texts {
        for part in split_top_level(text, '&') {
            for bound in split_top_level(part, ',') {
                if !bound.is_empty() {
                    bounds.insert(SmolStr::new(bound));
                }
            }
        }
    }
    bounds.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::decl::Declaration;
    use crate::hir::ids::EntityId;

    fn contributions(decls: &[Declaration]) -> Vec<Contribution<'_>> {
        decls
            .iter()
            .map(|decl| Contribution {
                decl,
                owner: EntityId::new(0),
            })
            .collect()
    }

    #[test]
    fn test_conflicting_bounds_merge() {
        let decls = vec![
            Declaration::associated_type("Key", "Hashable"),
            Declaration::associated_type("Key", "Codable & Hashable"),
            Declaration::associated_type("Value", "Equatable"),
            Declaration::associated_type("Value", "Equatable"),
            Declaration::property("Key", "Int"),
        ];
        let merged = merge_aliases(&contributions(&decls), None);

        assert_eq!(merged.len(), 1);
        let key: Vec<_> = merged["Key"].iter().map(|s| s.as_str()).collect();
        assert_eq!(key, vec!["Hashable", "Codable"]);
    }

    #[test]
    fn test_single_composed_bound_is_not_merged() {
        let decls = vec![
            Declaration::associated_type("Key", "Codable & Hashable"),
            Declaration::associated_type("Key", "Codable & Hashable"),
        ];
        let merged = merge_aliases(&contributions(&decls), None);
        assert!(merged.is_empty());
    }

    #[test]
    fn test_override_replaces_inferred_set() {
        let decls = vec![
            Declaration::associated_type("Key", "Hashable"),
            Declaration::type_alias("Key", "String"),
        ];
        let mut metadata = AnnotationMetadata::default();
        metadata
            .alias_overrides
            .insert(SmolStr::new("Key"), SmolStr::new("Int"));
        metadata
            .alias_overrides
            .insert(SmolStr::new("Extra"), SmolStr::new("Any"));

        let merged = merge_aliases(&contributions(&decls), Some(&metadata));
        assert_eq!(merged["Key"], vec![SmolStr::new("Int")]);
        assert_eq!(merged["Extra"], vec![SmolStr::new("Any")]);
    }
}
