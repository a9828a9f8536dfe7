//! Rendering collaborator interface and a plain outline renderer.

use std::fmt::Write as _;

use smol_str::SmolStr;

use crate::hir::{
    DEFAULT_SUBSTITUTE_SUFFIX, DeclKind, ResolvedEntity, ResolvedMember, TypeKeys, default_value,
};

/// Turns one resolved entity into output text.
///
/// Implementations must be pure: the same entity and keys always render to
/// the same text.
pub trait Renderer: Sync {
    fn render(&self, entity: &ResolvedEntity, keys: &TypeKeys) -> String;
}

/// Line-per-member outline of a substitute.
///
/// ```text
/// class FooMock: Foo {
///     init()
///     init(count: Int = 0)
///     typealias Key = Codable & Hashable
///     count => var count: Int
///     tellStatus => func tell(status: Int) -> Double
///     var tellCallCount: Int  // Bar
/// }
/// ```
#[derive(Clone, Debug)]
pub struct OutlineRenderer {
    suffix: SmolStr,
}

impl Default for OutlineRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSTITUTE_SUFFIX)
    }
}

impl OutlineRenderer {
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: SmolStr::new(suffix),
        }
    }

    fn render_inits(&self, entity: &ResolvedEntity, keys: &TypeKeys, out: &mut String) {
        let synthesized = entity.synthesized();
        let declares_zero_arg = entity.declared_inits().iter().any(|d| d.params.is_empty());

        let zero_arg = synthesized.zero_arg
            || (!declares_zero_arg
                && synthesized.parameterized.is_some()
                && entity.constructible_with(keys));
        if zero_arg {
            out.push_str("    init()\n");
        }

        if let Some(params) = &synthesized.parameterized {
            let rendered: Vec<String> = params
                .iter()
                .map(|p| {
                    let mut param = format!("{}: ", p.name);
                    if p.escaping {
                        param.push_str("@escaping ");
                    }
                    param.push_str(&p.ty);
                    if let Some(default) = default_value(&p.ty, keys) {
                        let _ = write!(param, " = {}", default);
                    }
                    param
                })
                .collect();
            let _ = writeln!(out, "    init({})", rendered.join(", "));
        }
    }

    fn render_member(&self, entity: &ResolvedEntity, member: &ResolvedMember, out: &mut String) {
        let decl = &member.decl;
        if decl.kind.is_alias() && entity.alias_bindings().contains_key(&decl.name) {
            return;
        }
        if member.decl.origin.is_processed() {
            let _ = writeln!(out, "    {}  // {}", decl.full_signature(), member.owner);
            return;
        }
        let _ = write!(out, "    {} => {}", member.key, decl.full_signature());
        if decl.kind == DeclKind::Property {
            if let Some(kind) = entity.stream_kinds().get(&member.key) {
                let _ = write!(out, " [{}]", kind);
            }
        }
        out.push('\n');
    }
}

impl Renderer for OutlineRenderer {
    fn render(&self, entity: &ResolvedEntity, keys: &TypeKeys) -> String {
        let mut out = String::new();

        for attribute in entity.attributes() {
            let _ = writeln!(out, "{}", attribute);
        }
        let access = entity.access().keyword();
        if !access.is_empty() {
            let _ = write!(out, "{} ", access);
        }
        let _ = writeln!(out, "class {}{}: {} {{", entity.name(), self.suffix, entity.name());

        self.render_inits(entity, keys, &mut out);
        for (name, types) in entity.alias_bindings() {
            let _ = writeln!(out, "    typealias {} = {}", name, types.join(" & "));
        }
        for member in entity.members() {
            self.render_member(entity, member, &mut out);
        }

        out.push('}');
        out
    }
}
