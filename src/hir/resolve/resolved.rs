//! The result of resolving one annotated type.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::{FileId, TextSize};
use crate::hir::decl::Declaration;
use crate::hir::defaults::{TypeKeys, default_value};
use crate::hir::diagnostics::Diagnostic;
use crate::hir::entity::{Access, TypeKind};

/// One surviving member under its unique key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedMember {
    pub key: SmolStr,
    pub decl: Declaration,
    /// Name of the type that declared it.
    pub owner: SmolStr,
}

/// A parameter of a synthesized initializer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitParam {
    pub name: SmolStr,
    pub ty: SmolStr,
    /// Default derived when the entity was resolved.
    pub default: Option<SmolStr>,
    /// Closure-typed; stored past the call.
    pub escaping: bool,
}

/// Initializers the substitute needs beyond the declared ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SynthesizedInits {
    pub zero_arg: bool,
    /// Takes every candidate property, in candidate order.
    pub parameterized: Option<Vec<InitParam>>,
}

impl SynthesizedInits {
    pub fn zero_arg_only() -> Self {
        Self {
            zero_arg: true,
            parameterized: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.zero_arg && self.parameterized.is_none()
    }
}

/// Final, deduplicated, ordered member set of one annotated type.
///
/// Built once by the resolver and never modified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedEntity {
    pub(crate) name: SmolStr,
    pub(crate) kind: TypeKind,
    pub(crate) access: Access,
    pub(crate) file: Option<FileId>,
    pub(crate) offset: TextSize,
    pub(crate) members: Vec<ResolvedMember>,
    pub(crate) attributes: Vec<SmolStr>,
    pub(crate) alias_bindings: IndexMap<SmolStr, Vec<SmolStr>>,
    pub(crate) declared_inits: Vec<Declaration>,
    pub(crate) init_params: Vec<InitParam>,
    pub(crate) synthesized: SynthesizedInits,
    pub(crate) stream_kinds: IndexMap<SmolStr, SmolStr>,
    pub(crate) files: Vec<FileId>,
    pub(crate) imports: Vec<SmolStr>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl ResolvedEntity {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn file(&self) -> Option<FileId> {
        self.file
    }

    pub fn offset(&self) -> TextSize {
        self.offset
    }

    /// Members in presentation order.
    pub fn members(&self) -> &[ResolvedMember] {
        &self.members
    }

    pub fn member(&self, key: &str) -> Option<&ResolvedMember> {
        self.members.iter().find(|m| m.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.iter().map(|m| m.key.as_str())
    }

    /// Attribute strings of every contributing member, deduplicated.
    pub fn attributes(&self) -> &[SmolStr] {
        &self.attributes
    }

    /// Alias name → bound types to render as one intersection.
    pub fn alias_bindings(&self) -> &IndexMap<SmolStr, Vec<SmolStr>> {
        &self.alias_bindings
    }

    pub fn declared_inits(&self) -> &[Declaration] {
        &self.declared_inits
    }

    /// Candidate initializer parameters, in parameter order.
    pub fn init_params(&self) -> &[InitParam] {
        &self.init_params
    }

    pub fn synthesized(&self) -> &SynthesizedInits {
        &self.synthesized
    }

    /// Observable property key → subject kind.
    pub fn stream_kinds(&self) -> &IndexMap<SmolStr, SmolStr> {
        &self.stream_kinds
    }

    pub fn files(&self) -> &[FileId] {
        &self.files
    }

    pub fn imports(&self) -> &[SmolStr] {
        &self.imports
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether the substitute can be built with no arguments once `keys`
    /// are known: a zero-argument initializer is declared or synthesized,
    /// or every parameter of the synthesized one now has a default.
    pub fn constructible_with(&self, keys: &TypeKeys) -> bool {
        if self.synthesized.zero_arg {
            return true;
        }
        if self.declared_inits.iter().any(|d| d.params.is_empty()) {
            return true;
        }
        match &self.synthesized.parameterized {
            Some(params) => params
                .iter()
                .all(|p| default_value(&p.ty, keys).is_some()),
            None => false,
        }
    }
}
