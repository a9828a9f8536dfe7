//! JSON export of a resolution, for tools that render outside Rust.

use serde::Serialize;

use crate::hir::{ResolvedEntity, Severity, TypeKind};

use super::orchestrator::Resolution;

#[derive(Debug, Serialize)]
struct ExportedResolution<'a> {
    entities: Vec<ExportedEntity<'a>>,
    type_keys: Vec<(&'a str, &'a str)>,
}

#[derive(Debug, Serialize)]
struct ExportedEntity<'a> {
    name: &'a str,
    kind: &'static str,
    members: Vec<ExportedMember<'a>>,
    alias_bindings: Vec<(&'a str, Vec<&'a str>)>,
    init_params: Vec<ExportedParam<'a>>,
    zero_arg_init: bool,
    parameterized_init: bool,
    stream_kinds: Vec<(&'a str, &'a str)>,
    imports: Vec<&'a str>,
    diagnostics: Vec<ExportedDiagnostic<'a>>,
}

#[derive(Debug, Serialize)]
struct ExportedMember<'a> {
    key: &'a str,
    signature: String,
    owner: &'a str,
    processed: bool,
}

#[derive(Debug, Serialize)]
struct ExportedParam<'a> {
    name: &'a str,
    ty: &'a str,
    default: Option<&'a str>,
    escaping: bool,
}

#[derive(Debug, Serialize)]
struct ExportedDiagnostic<'a> {
    code: Option<&'a str>,
    severity: &'static str,
    message: &'a str,
}

fn export_entity(entity: &ResolvedEntity) -> ExportedEntity<'_> {
    ExportedEntity {
        name: entity.name(),
        kind: match entity.kind() {
            TypeKind::InterfaceType => "interface",
            TypeKind::ConcreteType => "concrete",
        },
        members: entity
            .members()
            .iter()
            .map(|m| ExportedMember {
                key: &m.key,
                signature: m.decl.full_signature(),
                owner: &m.owner,
                processed: m.decl.origin.is_processed(),
            })
            .collect(),
        alias_bindings: entity
            .alias_bindings()
            .iter()
            .map(|(name, types)| (name.as_str(), types.iter().map(|t| t.as_str()).collect()))
            .collect(),
        init_params: entity
            .init_params()
            .iter()
            .map(|p| ExportedParam {
                name: &p.name,
                ty: &p.ty,
                default: p.default.as_deref(),
                escaping: p.escaping,
            })
            .collect(),
        zero_arg_init: entity.synthesized().zero_arg,
        parameterized_init: entity.synthesized().parameterized.is_some(),
        stream_kinds: entity
            .stream_kinds()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect(),
        imports: entity.imports().iter().map(|i| i.as_str()).collect(),
        diagnostics: entity
            .diagnostics()
            .iter()
            .map(|d| ExportedDiagnostic {
                code: d.code.as_deref(),
                severity: match d.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                    Severity::Info => "info",
                    Severity::Hint => "hint",
                },
                message: &d.message,
            })
            .collect(),
    }
}

/// Pretty-printed JSON of every resolved entity and the type keys.
pub fn to_json(resolution: &Resolution) -> serde_json::Result<String> {
    let exported = ExportedResolution {
        entities: resolution.entities.iter().map(export_entity).collect(),
        type_keys: resolution
            .type_keys
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect(),
    };
    serde_json::to_string_pretty(&exported)
}
