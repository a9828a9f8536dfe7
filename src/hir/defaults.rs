//! Default values for initializer parameters.
//!
//! A synthesized initializer can be called without arguments only when every
//! parameter has a default. Defaults are derived from the type text alone,
//! plus [`TypeKeys`]: the types whose substitutes are known to be
//! constructible with no arguments.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::{contains_top_level, split_top_level};

use super::decl::{UNKNOWN_TYPE, is_optional};

const INTEGER_TYPES: &[&str] = &[
    "Int", "Int8", "Int16", "Int32", "Int64", "UInt", "UInt8", "UInt16", "UInt32", "UInt64",
];
const FLOAT_TYPES: &[&str] = &["Double", "Float", "Float80", "CGFloat", "TimeInterval"];
const STRING_TYPES: &[&str] = &["String", "Substring"];

/// Type name → zero-argument constructor expression of its substitute.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeKeys {
    keys: IndexMap<SmolStr, SmolStr>,
}

impl TypeKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the substitute of `type_name` (named with `suffix`) can be
    /// built with no arguments. Returns false if it was already known.
    pub fn insert_substitute(&mut self, type_name: &str, suffix: &str) -> bool {
        if self.keys.contains_key(type_name) {
            return false;
        }
        self.keys.insert(
            SmolStr::new(type_name),
            SmolStr::new(format!("{}{}()", type_name, suffix)),
        );
        true
    }

    pub fn get(&self, type_name: &str) -> Option<&SmolStr> {
        self.keys.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.keys.contains_key(type_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &SmolStr)> + '_ {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Order entries by type name.
    pub fn sort(&mut self) {
        self.keys.sort_keys();
    }
}

/// Derive a default value expression for a type, if one exists.
pub fn default_value(ty: &str, keys: &TypeKeys) -> Option<SmolStr> {
    let ty = ty.trim();
    if ty.is_empty() || ty == UNKNOWN_TYPE {
        return None;
    }
    if is_optional(ty) || ty.ends_with('!') {
        return Some(SmolStr::new_static("nil"));
    }
    if ty == "Bool" {
        return Some(SmolStr::new_static("false"));
    }
    if INTEGER_TYPES.contains(&ty) {
        return Some(SmolStr::new_static("0"));
    }
    if FLOAT_TYPES.contains(&ty) {
        return Some(SmolStr::new_static("0.0"));
    }
    if STRING_TYPES.contains(&ty) {
        return Some(SmolStr::new_static("\"\""));
    }
    if ty == "Data" {
        return Some(SmolStr::new_static("Data()"));
    }
    if let Some(inner) = ty.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        return Some(if contains_top_level(inner, ':') {
            SmolStr::new_static("[:]")
        } else {
            SmolStr::new_static("[]")
        });
    }
    if ty.starts_with("Array<") {
        return Some(SmolStr::new_static("[]"));
    }
    if ty.starts_with("Dictionary<") {
        return Some(SmolStr::new_static("[:]"));
    }
    if ty.starts_with("Set<") {
        return Some(SmolStr::new_static("Set()"));
    }
    if ty.starts_with("Observable<") {
        return Some(SmolStr::new_static("Observable.empty()"));
    }
    if contains_top_level(ty, '-') {
        // closure types have no default
        return None;
    }
    if let Some(inner) = ty.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        return tuple_default(inner, keys);
    }
    keys.get(ty).cloned()
}

fn tuple_default(inner: &str, keys: &TypeKeys) -> Option<SmolStr> {
    if inner.trim().is_empty() {
        return Some(SmolStr::new_static("()"));
    }
    let mut values = Vec::new();
    for element in split_top_level(inner, ',') {
        // drop an element label (`name: Type`)
        let element_ty = match split_top_level(element, ':').as_slice() {
            [_, ty] => *ty,
            _ => element,
        };
        values.push(default_value(element_ty, keys)?);
    }
    Some(SmolStr::new(format!("({})", values.join(", "))))
}
