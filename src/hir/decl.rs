//! Declaration model: normalized members and parameters.
//!
//! A [`Declaration`] is one member contributed by a type: a property, a
//! method (initializers included), a subscript, a type alias, an associated
//! type, or a conditional-compilation group wrapping other members. Types are
//! kept as normalized strings; the resolver only ever compares them textually.
//!
//! Declarations are immutable once built. The builder-style constructors
//! consume `self` so a parsing collaborator can assemble one in a single
//! expression.

use std::fmt::Write as _;

use smol_str::SmolStr;

use crate::base::{TextRange, TextSize, range_at};

/// Placeholder a parser emits when it could not determine a type.
pub const UNKNOWN_TYPE: &str = "_";

/// Longest return-type fragment used when building a disambiguation key.
const MAX_RETURN_FRAGMENT: usize = 32;

// ============================================================================
// KINDS & TAGS
// ============================================================================

/// The shape of a declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Property,
    /// Functions and initializers.
    Method,
    Subscript,
    TypeAlias,
    AssociatedType,
    /// `#if COND ... #endif` wrapping other members; the name is the condition.
    ConditionalGroup,
}

impl DeclKind {
    /// Methods and subscripts are grouped by bare name and disambiguated by
    /// their parameters.
    pub fn is_method_like(self) -> bool {
        matches!(self, DeclKind::Method | DeclKind::Subscript)
    }

    /// Type aliases and associated types take part in alias merging.
    pub fn is_alias(self) -> bool {
        matches!(self, DeclKind::TypeAlias | DeclKind::AssociatedType)
    }
}

/// Where a declaration came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Parsed from annotated (or ancestor) source in this run.
    #[default]
    Fresh,
    /// Taken from a substitute already generated for a dependency module.
    Processed,
}

impl Origin {
    pub fn is_processed(self) -> bool {
        self == Origin::Processed
    }
}

/// What a member is for.
///
/// Generated substitutes carry bookkeeping state next to the members they
/// stand in for. The tag names the member it tracks (`of`), which is the key
/// that member was emitted under.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Role {
    #[default]
    Ordinary,
    /// Storage behind a tracked property (`underlyingFoo`).
    BackingField { of: SmolStr },
    /// Closure invoked by a stubbed method (`fooHandler`).
    Handler { of: SmolStr },
    /// Invocation counter of a method (`fooCallCount`).
    CallCounter { of: SmolStr },
    /// Setter counter of a property (`fooSetCallCount`).
    SetterCounter { of: SmolStr },
    /// Stream subject backing an observable property (`fooSubject`).
    Subject { of: SmolStr },
}

impl Role {
    pub const BACKING_PREFIX: &'static str = "underlying";
    pub const HANDLER_SUFFIX: &'static str = "Handler";
    pub const CALL_COUNT_SUFFIX: &'static str = "CallCount";
    pub const SET_CALL_COUNT_SUFFIX: &'static str = "SetCallCount";
    pub const SUBJECT_SUFFIX: &'static str = "Subject";

    /// Infer a role from the naming conventions of generated substitutes.
    ///
    /// For collaborators that only see member names. Names that merely equal
    /// a suffix (e.g. `Handler`) stay ordinary.
    pub fn classify(name: &str) -> Role {
        let stripped = |suffix: &str| {
            name.strip_suffix(suffix)
                .filter(|rest| !rest.is_empty())
                .map(SmolStr::new)
        };

        if let Some(of) = stripped(Self::SET_CALL_COUNT_SUFFIX) {
            return Role::SetterCounter { of };
        }
        if let Some(of) = stripped(Self::CALL_COUNT_SUFFIX) {
            return Role::CallCounter { of };
        }
        if let Some(of) = stripped(Self::HANDLER_SUFFIX) {
            return Role::Handler { of };
        }
        if let Some(rest) = stripped(Self::SUBJECT_SUFFIX) {
            let of = ["Behavior", "Replay", "Publish"]
                .iter()
                .find_map(|kind| rest.strip_suffix(kind).filter(|r| !r.is_empty()))
                .unwrap_or(rest.as_str());
            return Role::Subject { of: SmolStr::new(of) };
        }
        if let Some(rest) = name.strip_prefix(Self::BACKING_PREFIX) {
            let mut chars = rest.chars();
            if let Some(first) = chars.next().filter(|c| c.is_uppercase()) {
                let of: String = first.to_lowercase().chain(chars).collect();
                return Role::BackingField { of: SmolStr::new(of) };
            }
        }
        Role::Ordinary
    }

    pub fn is_ordinary(&self) -> bool {
        matches!(self, Role::Ordinary)
    }

    /// The key of the member this counter tracks, if this is a counter.
    pub fn counted_key(&self) -> Option<&SmolStr> {
        match self {
            Role::CallCounter { of } | Role::SetterCounter { of } => Some(of),
            _ => None,
        }
    }
}

// ============================================================================
// PARAMETERS
// ============================================================================

/// A method, subscript, or initializer parameter, or a generic parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Param {
    /// External label; `_` when explicitly unlabeled. A label equal to the
    /// name is dropped.
    pub label: Option<SmolStr>,
    pub name: SmolStr,
    /// For generic parameters, the bound (possibly empty).
    pub ty: SmolStr,
    pub is_generic: bool,
    pub range: TextRange,
}

impl Param {
    pub fn new(name: &str, ty: &str) -> Self {
        Self {
            label: None,
            name: SmolStr::new(name.trim()),
            ty: normalize_type(ty),
            is_generic: false,
            range: TextRange::default(),
        }
    }

    pub fn labeled(label: &str, name: &str, ty: &str) -> Self {
        let label = label.trim();
        let mut param = Self::new(name, ty);
        if !label.is_empty() && label != param.name {
            param.label = Some(SmolStr::new(label));
        }
        param
    }

    /// A generic type parameter such as `T: Hashable`.
    pub fn generic(name: &str, bound: &str) -> Self {
        Self {
            is_generic: true,
            ..Self::new(name, bound)
        }
    }

    pub fn at(mut self, offset: u32, len: u32) -> Self {
        self.range = range_at(offset, len);
        self
    }

    /// The word a call site uses for this argument: the label, or the name
    /// when unlabeled.
    pub fn call_word(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if label != "_" => label,
            _ => &self.name,
        }
    }

    fn write_signature(&self, out: &mut String) {
        if let Some(label) = &self.label {
            let _ = write!(out, "{} ", label);
        }
        let _ = write!(out, "{}: {}", self.name, self.ty);
    }
}

// ============================================================================
// DECLARATIONS
// ============================================================================

/// A normalized member declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Declaration {
    pub kind: DeclKind,
    pub name: SmolStr,
    /// Property type, return type, alias target/bound, or empty.
    pub ty: SmolStr,
    pub params: Vec<Param>,
    pub generic_params: Vec<Param>,
    pub is_static: bool,
    pub throws: bool,
    pub is_initializer: bool,
    pub required_init: bool,
    pub role: Role,
    pub origin: Origin,
    /// Byte range in the owning file; used for ordering and text patching.
    pub range: TextRange,
    /// Attribute text attached to the member (e.g. `@available(iOS 13, *)`).
    pub attributes: Option<SmolStr>,
    /// Members of a conditional group.
    pub members: Vec<Declaration>,
}

impl Declaration {
    fn bare(kind: DeclKind, name: &str, ty: &str) -> Self {
        Self {
            kind,
            name: SmolStr::new(name.trim()),
            ty: normalize_type(ty),
            params: Vec::new(),
            generic_params: Vec::new(),
            is_static: false,
            throws: false,
            is_initializer: false,
            required_init: false,
            role: Role::Ordinary,
            origin: Origin::Fresh,
            range: TextRange::default(),
            attributes: None,
            members: Vec::new(),
        }
    }

    pub fn property(name: &str, ty: &str) -> Self {
        Self::bare(DeclKind::Property, name, ty)
    }

    pub fn method(name: &str) -> Self {
        Self::bare(DeclKind::Method, name, "")
    }

    pub fn subscript() -> Self {
        Self::bare(DeclKind::Subscript, "subscript", "")
    }

    pub fn initializer() -> Self {
        Self {
            is_initializer: true,
            ..Self::bare(DeclKind::Method, "init", "")
        }
    }

    pub fn type_alias(name: &str, target: &str) -> Self {
        Self::bare(DeclKind::TypeAlias, name, target)
    }

    pub fn associated_type(name: &str, bound: &str) -> Self {
        Self::bare(DeclKind::AssociatedType, name, bound)
    }

    pub fn conditional(condition: &str, members: Vec<Declaration>) -> Self {
        Self {
            members,
            ..Self::bare(DeclKind::ConditionalGroup, condition, "")
        }
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn generic(mut self, name: &str, bound: &str) -> Self {
        self.generic_params.push(Param::generic(name, bound));
        self
    }

    pub fn returns(mut self, ty: &str) -> Self {
        self.ty = normalize_type(ty);
        self
    }

    pub fn at(mut self, offset: u32, len: u32) -> Self {
        self.range = range_at(offset, len);
        self
    }

    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn throwing(mut self) -> Self {
        self.throws = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required_init = true;
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Tag untagged properties (and those of grouped members) with the role
    /// their name implies. Roles set by the parser are kept.
    pub fn with_inferred_role(mut self) -> Self {
        if self.kind == DeclKind::Property && self.role.is_ordinary() {
            self.role = Role::classify(&self.name);
        }
        self.members = self
            .members
            .into_iter()
            .map(Declaration::with_inferred_role)
            .collect();
        self
    }

    /// Tag the declaration (and any grouped members) with an origin.
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self.members = self
            .members
            .into_iter()
            .map(|m| m.with_origin(origin))
            .collect();
        self
    }

    pub fn with_attributes(mut self, attributes: &str) -> Self {
        let attributes = attributes.trim();
        if !attributes.is_empty() {
            self.attributes = Some(SmolStr::new(attributes));
        }
        self
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn offset(&self) -> TextSize {
        self.range.start()
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_params.is_empty()
    }

    pub fn is_property(&self) -> bool {
        self.kind == DeclKind::Property
    }

    pub fn is_optional_type(&self) -> bool {
        is_optional(&self.ty)
    }

    /// Whether this member may become a parameter of a synthesized
    /// initializer: a non-static, non-optional, ordinary property whose type
    /// is known.
    pub fn can_be_init_param(&self) -> bool {
        self.kind == DeclKind::Property
            && !self.is_static
            && self.role.is_ordinary()
            && !self.is_optional_type()
            && !self.ty.is_empty()
            && self.ty != UNKNOWN_TYPE
    }

    /// Text identifying the member exactly: kind, name, labels, parameter
    /// names and types, and return type. Two declarations with the same full
    /// signature are the same member.
    pub fn full_signature(&self) -> String {
        let mut out = String::new();
        if self.is_static {
            out.push_str("static ");
        }
        match self.kind {
            DeclKind::Property => {
                let _ = write!(out, "var {}: {}", self.name, self.ty);
            }
            DeclKind::Method | DeclKind::Subscript => {
                if self.kind == DeclKind::Method && !self.is_initializer {
                    out.push_str("func ");
                }
                out.push_str(&self.name);
                if !self.generic_params.is_empty() {
                    out.push('<');
                    for (i, g) in self.generic_params.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        out.push_str(&g.name);
                        if !g.ty.is_empty() {
                            let _ = write!(out, ": {}", g.ty);
                        }
                    }
                    out.push('>');
                }
                out.push('(');
                for (i, p) in self.params.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    p.write_signature(&mut out);
                }
                out.push(')');
                if self.throws {
                    out.push_str(" throws");
                }
                if !self.ty.is_empty() {
                    let _ = write!(out, " -> {}", self.ty);
                }
            }
            DeclKind::TypeAlias => {
                let _ = write!(out, "typealias {} = {}", self.name, self.ty);
            }
            DeclKind::AssociatedType => {
                let _ = write!(out, "associatedtype {}", self.name);
                if !self.ty.is_empty() {
                    let _ = write!(out, ": {}", self.ty);
                }
            }
            DeclKind::ConditionalGroup => {
                let _ = write!(out, "#if {} {{", self.name);
                for (i, m) in self.members.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    out.push_str(&m.full_signature());
                }
                out.push('}');
            }
        }
        out
    }

    /// Ordered fragments appended to the name, one per disambiguation level.
    pub fn signature_fragments(&self) -> Vec<SmolStr> {
        let mut fragments = Vec::new();
        let lowered_name = self.name.to_lowercase();

        for p in &self.params {
            let word = p.call_word();
            if word.len() < 2 || !lowered_name.ends_with(&word.to_lowercase()) {
                fragments.push(capitalize(word));
            }
        }
        for g in &self.generic_params {
            fragments.push(SmolStr::new(format!(
                "{}{}",
                capitalize(&g.name),
                display_name(&g.ty)
            )));
        }
        for p in &self.params {
            fragments.push(display_name(&p.ty));
        }
        let mut ret = display_name(&self.ty).to_string();
        if ret.len() > MAX_RETURN_FRAGMENT {
            let mut cut = MAX_RETURN_FRAGMENT;
            while !ret.is_char_boundary(cut) {
                cut -= 1;
            }
            ret.truncate(cut);
        }
        fragments.push(SmolStr::new(ret));
        if self.is_static {
            fragments.push(SmolStr::new_static("Static"));
        }

        fragments.retain(|f| !f.is_empty());
        fragments
    }

    /// The level-`level` key: the name plus the first `level` fragments.
    /// Past the last fragment, the overflow index is appended per level.
    pub fn level_key(&self, level: usize) -> SmolStr {
        key_at(&self.name, &self.signature_fragments(), level)
    }
}

/// Build the level key from precomputed fragments.
pub(crate) fn key_at(name: &str, fragments: &[SmolStr], level: usize) -> SmolStr {
    if level == 0 {
        return SmolStr::new(name);
    }
    let mut key = String::from(name);
    for i in 1..=level {
        match fragments.get(i - 1) {
            Some(fragment) => key.push_str(fragment),
            None => {
                let _ = write!(key, "{}", i - fragments.len());
            }
        }
    }
    SmolStr::new(key)
}

/// Trim and collapse internal whitespace runs.
pub fn normalize_type(ty: &str) -> SmolStr {
    let mut out = String::with_capacity(ty.len());
    for word in ty.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    SmolStr::new(out)
}

pub fn is_optional(ty: &str) -> bool {
    let ty = ty.trim();
    ty.ends_with('?') || ty.starts_with("Optional<")
}

fn capitalize(word: &str) -> SmolStr {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => SmolStr::new(first.to_uppercase().chain(chars).collect::<String>()),
        None => SmolStr::default(),
    }
}

/// Identifier-safe rendering of a type: alphanumeric runs, each capitalized.
fn display_name(ty: &str) -> SmolStr {
    let joined: String = ty
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|part| !part.is_empty())
        .map(|part| capitalize(part).to_string())
        .collect();
    SmolStr::new(joined)
}
