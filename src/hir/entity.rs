//! Type entities: the nodes of the inheritance graph.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::{FileId, TextSize};

use super::decl::{Declaration, Origin};

/// Abstract contract vs. instantiable type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    InterfaceType,
    ConcreteType,
}

impl TypeKind {
    pub fn is_interface(self) -> bool {
        self == TypeKind::InterfaceType
    }
}

/// Declared access level of a type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Access {
    Private,
    FilePrivate,
    #[default]
    Internal,
    Public,
    Open,
}

impl Access {
    /// Parse an access keyword; anything unrecognized is `Internal`.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.trim() {
            "private" => Access::Private,
            "fileprivate" => Access::FilePrivate,
            "public" => Access::Public,
            "open" => Access::Open,
            _ => Access::Internal,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Access::Private => "private",
            Access::FilePrivate => "fileprivate",
            Access::Internal => "",
            Access::Public => "public",
            Access::Open => "open",
        }
    }
}

/// Arguments given to the opt-in annotation.
///
/// `@mockable(typealias: T = Any; rx: all = BehaviorSubject)` yields one
/// alias override (`T → Any`) and one stream override (`all → BehaviorSubject`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnnotationMetadata {
    /// Explicit associated-type bindings, by alias name.
    pub alias_overrides: IndexMap<SmolStr, SmolStr>,
    /// Stream-wrapper kinds, by property name or [`Self::ALL`].
    pub stream_overrides: IndexMap<SmolStr, SmolStr>,
}

impl AnnotationMetadata {
    /// Stream-override key applying to every observable property.
    pub const ALL: &'static str = "all";

    pub fn is_empty(&self) -> bool {
        self.alias_overrides.is_empty() && self.stream_overrides.is_empty()
    }

    pub fn alias_override(&self, name: &str) -> Option<&SmolStr> {
        self.alias_overrides.get(name)
    }

    /// The stream kind for a property: its own entry, else the `all` entry.
    pub fn stream_override(&self, property: &str) -> Option<&SmolStr> {
        self.stream_overrides
            .get(property)
            .or_else(|| self.stream_overrides.get(Self::ALL))
    }
}

/// A parsed type declaration.
///
/// Created once by the parsing collaborator and never mutated afterwards.
/// Inheritance edges are names; the graph resolves them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeEntity {
    pub name: SmolStr,
    pub kind: TypeKind,
    pub access: Access,
    /// Directly inherited type names, in declaration order.
    pub inherits: Vec<SmolStr>,
    pub offset: TextSize,
    /// Present when the type carries the opt-in annotation.
    pub annotation: Option<AnnotationMetadata>,
    pub origin: Origin,
    pub file: Option<FileId>,
    pub members: Vec<Declaration>,
    /// For processed entities: the substitute can be constructed with no
    /// arguments.
    pub has_blank_init: bool,
}

impl TypeEntity {
    pub fn new(name: &str, kind: TypeKind) -> Self {
        Self {
            name: SmolStr::new(name.trim()),
            kind,
            access: Access::Internal,
            inherits: Vec::new(),
            offset: TextSize::default(),
            annotation: None,
            origin: Origin::Fresh,
            file: None,
            members: Vec::new(),
            has_blank_init: false,
        }
    }

    pub fn interface(name: &str) -> Self {
        Self::new(name, TypeKind::InterfaceType)
    }

    pub fn concrete(name: &str) -> Self {
        Self::new(name, TypeKind::ConcreteType)
    }

    pub fn inherits<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.inherits
            .extend(parents.into_iter().map(|p| SmolStr::new(p.as_ref().trim())));
        self
    }

    pub fn member(mut self, decl: Declaration) -> Self {
        self.members.push(decl);
        self
    }

    pub fn members<I: IntoIterator<Item = Declaration>>(mut self, decls: I) -> Self {
        self.members.extend(decls);
        self
    }

    pub fn annotated(mut self, metadata: AnnotationMetadata) -> Self {
        self.annotation = Some(metadata);
        self
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn at(mut self, offset: u32) -> Self {
        self.offset = TextSize::from(offset);
        self
    }

    pub fn in_file(mut self, file: FileId) -> Self {
        self.file = Some(file);
        self
    }

    pub fn with_blank_init(mut self, has_blank_init: bool) -> Self {
        self.has_blank_init = has_blank_init;
        self
    }

    /// Tag the entity and all its members with an origin.
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self.members = self
            .members
            .into_iter()
            .map(|m| m.with_origin(origin))
            .collect();
        self
    }

    pub fn is_annotated(&self) -> bool {
        self.annotation.is_some()
    }

    pub fn metadata(&self) -> Option<&AnnotationMetadata> {
        self.annotation.as_ref()
    }
}
