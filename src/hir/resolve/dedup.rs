//! Deduplicator: unique output keys for gathered members.
//!
//! Members are grouped by their level-0 key (the bare name). A group of one
//! keeps its key unless something else already holds it; a larger group
//! keeps its first member and regroups the rest one level deeper. Members
//! whose full signature was already emitted are dropped on the way.
//!
//! Each recursion level builds its own [`Uniquified`] and hands it back to
//! the caller, which absorbs it. Lookups go through a [`Scope`] chain, so a
//! nested level sees every key its callers hold without sharing a mutable
//! accumulator.

use std::cmp::Ordering;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::trace;

use crate::hir::decl::{Declaration, key_at};
use crate::hir::ids::EntityId;

use super::collect::Contribution;
use super::merge::{Seed, Split, split_processed};

// ============================================================================
// CANDIDATES
// ============================================================================

/// A gathered member with its full signature and key fragments precomputed.
#[derive(Clone, Debug)]
pub(crate) struct Candidate<'g> {
    pub decl: &'g Declaration,
    pub owner: EntityId,
    pub signature: String,
    fragments: Vec<SmolStr>,
}

impl<'g> Candidate<'g> {
    pub fn new(decl: &'g Declaration, owner: EntityId) -> Self {
        Self {
            decl,
            owner,
            signature: decl.full_signature(),
            fragments: decl.signature_fragments(),
        }
    }

    fn key(&self, level: usize) -> SmolStr {
        key_at(&self.decl.name, &self.fragments, level)
    }
}

/// A candidate under its final key.
#[derive(Clone, Debug)]
pub(crate) struct Keyed<'g> {
    pub key: SmolStr,
    pub candidate: Candidate<'g>,
}

// ============================================================================
// RECURSION STATE
// ============================================================================

/// Result of one recursion level.
#[derive(Debug, Default)]
struct Uniquified<'g> {
    entries: IndexMap<SmolStr, Candidate<'g>>,
    signatures: FxHashSet<String>,
}

impl<'g> Uniquified<'g> {
    fn emit(&mut self, key: SmolStr, candidate: Candidate<'g>) {
        self.signatures.insert(candidate.signature.clone());
        self.entries.insert(key, candidate);
    }

    fn absorb(&mut self, other: Uniquified<'g>) {
        self.signatures.extend(other.signatures);
        self.entries.extend(other.entries);
    }
}

/// Keys and signatures visible at one level: its own result so far, then
/// each caller's, then the seed.
#[derive(Clone, Copy)]
struct Scope<'s, 'g> {
    seed: &'s Seed,
    local: &'s Uniquified<'g>,
    parent: Option<&'s Scope<'s, 'g>>,
}

impl Scope<'_, '_> {
    fn has_key(&self, key: &str) -> bool {
        if self.local.entries.contains_key(key) {
            return true;
        }
        match self.parent {
            Some(parent) => parent.has_key(key),
            None => self.seed.keys.contains(key),
        }
    }

    fn has_signature(&self, signature: &str) -> bool {
        if self.local.signatures.contains(signature) {
            return true;
        }
        match self.parent {
            Some(parent) => parent.has_signature(signature),
            None => self.seed.signatures.contains(signature),
        }
    }
}

// ============================================================================
// DEDUPLICATION
// ============================================================================

/// Assign every gathered member a unique key.
///
/// Fresh members come first in presentation order, then the processed
/// members (one per full signature), keyed by their full signature.
pub(crate) fn deduplicate<'g>(contributions: &[Contribution<'g>]) -> Vec<Keyed<'g>> {
    let candidates = contributions
        .iter()
        .map(|c| Candidate::new(c.decl, c.owner))
        .collect();
    let Split {
        fresh,
        processed,
        seed,
    } = split_processed(candidates);

    // Properties and aliases claim their names before methods do.
    let (mut ordered, methods): (Vec<_>, Vec<_>) = fresh
        .into_iter()
        .partition(|c| !c.decl.kind.is_method_like());
    ordered.extend(methods);

    let root_result = Uniquified::default();
    let root = Scope {
        seed: &seed,
        local: &root_result,
        parent: None,
    };
    let resolved = uniquify(regroup(ordered, 0), 0, &root);

    let mut keyed: Vec<Keyed<'g>> = resolved
        .entries
        .into_iter()
        .map(|(key, candidate)| Keyed { key, candidate })
        .collect();
    keyed.sort_by(presentation_order);

    let mut processed: Vec<Keyed<'g>> = processed
        .into_iter()
        .map(|candidate| Keyed {
            key: SmolStr::new(&candidate.signature),
            candidate,
        })
        .collect();
    processed.sort_by(presentation_order);

    keyed.extend(processed);
    keyed
}

fn uniquify<'g>(
    groups: IndexMap<SmolStr, Vec<Candidate<'g>>>,
    level: usize,
    outer: &Scope<'_, 'g>,
) -> Uniquified<'g> {
    let mut result = Uniquified::default();

    for (key, members) in groups {
        let scope = Scope {
            seed: outer.seed,
            local: &result,
            parent: Some(outer),
        };

        let mut unvisited: Vec<Candidate<'g>> = Vec::with_capacity(members.len());
        for member in members {
            let seen = scope.has_signature(&member.signature)
                || unvisited.iter().any(|u| u.signature == member.signature);
            if !seen {
                unvisited.push(member);
            }
        }
        if unvisited.is_empty() {
            continue;
        }

        if scope.has_key(&key) {
            trace!(%key, level, count = unvisited.len(), "key taken, escalating");
            let nested = uniquify(regroup(unvisited, level + 1), level + 1, &scope);
            result.absorb(nested);
            continue;
        }

        let mut members = unvisited.into_iter();
        let Some(first) = members.next() else {
            continue;
        };
        let rest: Vec<_> = members.collect();
        result.emit(key, first);

        if !rest.is_empty() {
            trace!(level, count = rest.len(), "overloads, escalating");
            let scope = Scope {
                seed: outer.seed,
                local: &result,
                parent: Some(outer),
            };
            let nested = uniquify(regroup(rest, level + 1), level + 1, &scope);
            result.absorb(nested);
        }
    }

    result
}

fn regroup<'g>(members: Vec<Candidate<'g>>, level: usize) -> IndexMap<SmolStr, Vec<Candidate<'g>>> {
    let mut groups: IndexMap<SmolStr, Vec<Candidate<'g>>> = IndexMap::new();
    for member in members {
        groups.entry(member.key(level)).or_default().push(member);
    }
    groups
}

/// Source offset, then non-methods before methods, then name.
fn presentation_order(a: &Keyed<'_>, b: &Keyed<'_>) -> Ordering {
    let (da, db) = (a.candidate.decl, b.candidate.decl);
    da.offset()
        .cmp(&db.offset())
        .then_with(|| da.kind.is_method_like().cmp(&db.kind.is_method_like()))
        .then_with(|| da.name.cmp(&db.name))
        .then_with(|| a.key.cmp(&b.key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::decl::{Origin, Param, Role};

    fn contributions(decls: &[Declaration]) -> Vec<Contribution<'_>> {
        decls
            .iter()
            .map(|decl| Contribution {
                decl,
                owner: EntityId::new(0),
            })
            .collect()
    }

    fn keys(keyed: &[Keyed<'_>]) -> Vec<String> {
        keyed.iter().map(|k| k.key.to_string()).collect()
    }

    fn tell_status() -> Declaration {
        Declaration::method("tell")
            .param(Param::new("status", "Int"))
            .param(Param::new("msg", "String"))
            .returns("Double")
    }

    fn tell_data() -> Declaration {
        Declaration::method("tell")
            .param(Param::new("data", "[String: String]"))
            .param(Param::labeled("for", "client", "ClientProtocol"))
            .returns("Observable<EncryptedData>")
    }

    #[test]
    fn test_overloads_get_distinct_keys() {
        let decls = vec![tell_status(), tell_data()];
        let keyed = deduplicate(&contributions(&decls));
        assert_eq!(keys(&keyed), vec!["tell", "tellData"]);
    }

    #[test]
    fn test_true_duplicates_collapse() {
        let decls = vec![tell_status(), tell_data(), tell_status()];
        let keyed = deduplicate(&contributions(&decls));
        assert_eq!(keyed.len(), 2);
    }

    #[test]
    fn test_single_member_escalates_when_key_taken() {
        // `tellStatus` is produced by escalating the second `tell`, so the
        // method literally named `tellStatus` must move on.
        let decls = vec![
            Declaration::method("tell").param(Param::new("key", "Int")),
            Declaration::method("tell").param(Param::new("status", "Int")),
            Declaration::method("tellStatus"),
        ];
        let keyed = deduplicate(&contributions(&decls));
        let mut got = keys(&keyed);
        got.sort();
        assert_eq!(got, vec!["tell", "tellStatus", "tellStatus1"]);
    }

    #[test]
    fn test_property_claims_name_before_method() {
        let decls = vec![
            Declaration::method("title").returns("String"),
            Declaration::property("title", "String"),
        ];
        let keyed = deduplicate(&contributions(&decls));
        let property = keyed.iter().find(|k| k.candidate.decl.is_property()).unwrap();
        let method = keyed.iter().find(|k| !k.candidate.decl.is_property()).unwrap();
        assert_eq!(property.key, "title");
        assert_eq!(method.key, "titleString");
    }

    #[test]
    fn test_overloads_without_fragments_use_overflow_index() {
        let decls = vec![
            Declaration::method("reset"),
            Declaration::method("reset").into_static(),
            Declaration::method("reset").throwing(),
        ];
        let keyed = deduplicate(&contributions(&decls));
        let mut got = keys(&keyed);
        got.sort();
        assert_eq!(got, vec!["reset", "reset1", "resetStatic"]);
    }

    #[test]
    fn test_processed_counter_reserves_key() {
        let processed = vec![
            Declaration::property("tellCallCount", "Int")
                .with_role(Role::classify("tellCallCount"))
                .with_origin(Origin::Processed),
            Declaration::method("tell")
                .param(Param::new("key", "Int"))
                .with_origin(Origin::Processed),
        ];
        let mut decls = vec![tell_status()];
        decls.extend(processed);
        // fresh re-parse of the processed member
        decls.push(Declaration::method("tell").param(Param::new("key", "Int")));

        let keyed = deduplicate(&contributions(&decls));

        assert_eq!(keyed.len(), 3);
        assert_eq!(keyed[0].key, "tellStatus");
        assert!(!keyed[0].candidate.decl.origin.is_processed());
        assert!(keyed[1..].iter().all(|k| k.candidate.decl.origin.is_processed()));
        let tell_key = keyed
            .iter()
            .filter(|k| k.candidate.signature == "func tell(key: Int)")
            .count();
        assert_eq!(tell_key, 1);
    }

    #[test]
    fn test_presentation_order_by_offset() {
        let decls = vec![
            Declaration::method("b").at(30, 5),
            Declaration::property("a", "Int").at(10, 5),
            Declaration::property("z", "Int").at(30, 5),
        ];
        let keyed = deduplicate(&contributions(&decls));
        assert_eq!(keys(&keyed), vec!["a", "z", "b"]);
    }
}
