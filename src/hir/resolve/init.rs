//! Initializer synthesis.
//!
//! Picks the properties a generated initializer takes, then decides which
//! initializers the substitute needs on top of the ones already declared.

use std::cmp::Ordering;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::base::contains_top_level;
use crate::hir::decl::Declaration;
use crate::hir::defaults::{TypeKeys, default_value};
use crate::hir::entity::TypeKind;

use super::resolved::{InitParam, ResolvedMember, SynthesizedInits};

/// Properties that become initializer parameters, in parameter order.
///
/// Fresh candidates come first, ordered by offset then name. Processed
/// candidates follow in the same order, minus any whose name a fresh
/// candidate already uses.
pub(crate) fn init_candidates<'a>(members: &'a [ResolvedMember]) -> Vec<&'a Declaration> {
    let by_position = |a: &&Declaration, b: &&Declaration| -> Ordering {
        a.offset().cmp(&b.offset()).then_with(|| a.name.cmp(&b.name))
    };

    let mut fresh: Vec<&Declaration> = members
        .iter()
        .filter(|m| !m.decl.origin.is_processed() && m.decl.can_be_init_param())
        .map(|m| &m.decl)
        .collect();
    fresh.sort_by(by_position);

    let mut processed: Vec<&Declaration> = members
        .iter()
        .filter(|m| m.decl.origin.is_processed() && m.decl.can_be_init_param())
        .map(|m| &m.decl)
        .collect();
    processed.sort_by(by_position);

    let mut names: FxHashSet<SmolStr> = fresh.iter().map(|d| d.name.clone()).collect();
    for decl in processed {
        if names.insert(decl.name.clone()) {
            fresh.push(decl);
        }
    }
    fresh
}

/// Turn candidate properties into initializer parameters.
pub(crate) fn init_params(candidates: &[&Declaration], keys: &TypeKeys) -> Vec<InitParam> {
    candidates
        .iter()
        .map(|decl| InitParam {
            name: decl.name.clone(),
            ty: decl.ty.clone(),
            default: default_value(&decl.ty, keys),
            escaping: contains_top_level(&decl.ty, '-'),
        })
        .collect()
}

/// Decide which initializers to add.
pub(crate) fn decide(kind: TypeKind, declared: &[Declaration], params: &[InitParam]) -> SynthesizedInits {
    let has_zero_param_init = declared.iter().any(|d| d.params.is_empty());

    if declared.is_empty() && params.is_empty() {
        return SynthesizedInits::zero_arg_only();
    }

    if !kind.is_interface() {
        // Existing construction contracts of concrete types stay as they are.
        return if declared.is_empty() {
            SynthesizedInits::zero_arg_only()
        } else {
            SynthesizedInits::default()
        };
    }

    if declared.iter().any(|d| matches_params(d, params)) {
        return SynthesizedInits::default();
    }
    if params.is_empty() {
        return SynthesizedInits {
            zero_arg: !has_zero_param_init,
            parameterized: None,
        };
    }

    let all_defaulted = params.iter().all(|p| p.default.is_some());
    SynthesizedInits {
        zero_arg: all_defaulted && !has_zero_param_init,
        parameterized: Some(params.to_vec()),
    }
}

/// Same parameter names and types, in any order.
fn matches_params(init: &Declaration, params: &[InitParam]) -> bool {
    if init.params.len() != params.len() {
        return false;
    }
    let declared: FxHashSet<(&str, &str)> = init
        .params
        .iter()
        .map(|p| (p.name.as_str(), p.ty.as_str()))
        .collect();
    params
        .iter()
        .all(|p| declared.contains(&(p.name.as_str(), p.ty.as_str())))
}
