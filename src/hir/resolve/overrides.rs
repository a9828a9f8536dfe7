//! Stream-wrapper kinds for observable properties.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::hir::entity::TypeEntity;
use crate::hir::graph::EntityGraph;

use super::dedup::Keyed;

/// Wrapper used when no annotation names one.
pub const DEFAULT_STREAM_KIND: &str = "PublishSubject";

/// Whether a property type is a stream the substitute must back with a
/// subject.
pub fn is_stream_type(ty: &str) -> bool {
    ty.starts_with("Observable<")
}

/// Wrapper kind per observable property key.
///
/// The target's own arguments win over the declaring ancestor's; within
/// each, a per-property entry wins over `all`.
pub(crate) fn stream_kinds(
    graph: &EntityGraph,
    target: &TypeEntity,
    keyed: &[Keyed<'_>],
) -> IndexMap<SmolStr, SmolStr> {
    let mut kinds = IndexMap::new();
    for entry in keyed {
        let decl = entry.candidate.decl;
        if !decl.is_property() || !is_stream_type(&decl.ty) {
            continue;
        }
        let owner = graph.entity(entry.candidate.owner);
        let kind = target
            .metadata()
            .and_then(|m| m.stream_override(&decl.name))
            .or_else(|| owner.metadata().and_then(|m| m.stream_override(&decl.name)))
            .cloned()
            .unwrap_or_else(|| SmolStr::new_static(DEFAULT_STREAM_KIND));
        kinds.insert(entry.key.clone(), kind);
    }
    kinds
}
