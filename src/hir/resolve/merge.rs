//! Processed/fresh merge.
//!
//! Members of generated substitutes are authoritative. They are split off
//! before deduplication and seed it: their full signatures suppress fresh
//! copies of the same member, and the keys their counters track are taken.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::dedup::Candidate;

/// State the deduplicator starts from.
#[derive(Debug, Default)]
pub(crate) struct Seed {
    /// Keys already claimed by processed members.
    pub keys: FxHashSet<SmolStr>,
    /// Full signatures already emitted by processed members.
    pub signatures: FxHashSet<String>,
}

#[derive(Debug, Default)]
pub(crate) struct Split<'g> {
    pub fresh: Vec<Candidate<'g>>,
    /// One per distinct full signature, first occurrence wins.
    pub processed: Vec<Candidate<'g>>,
    pub seed: Seed,
}

pub(crate) fn split_processed(candidates: Vec<Candidate<'_>>) -> Split<'_> {
    let mut fresh = Vec::new();
    let mut processed: IndexMap<String, Candidate<'_>> = IndexMap::new();
    let mut seed = Seed::default();

    for candidate in candidates {
        if !candidate.decl.origin.is_processed() {
            fresh.push(candidate);
            continue;
        }
        if let Some(of) = candidate.decl.role.counted_key() {
            seed.keys.insert(of.clone());
        }
        seed.signatures.insert(candidate.signature.clone());
        processed
            .entry(candidate.signature.clone())
            .or_insert(candidate);
    }

    Split {
        fresh,
        processed: processed.into_values().collect(),
        seed,
    }
}
