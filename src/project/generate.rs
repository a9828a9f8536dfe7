//! Generation driver.
//!
//! validate → scan → build graph → resolve → render → write. Any fatal
//! condition aborts the run with a [`GenError`]; recovered conditions travel
//! back as diagnostics in the report.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use indexmap::IndexSet;
use smol_str::SmolStr;
use tracing::{info, info_span};

use crate::error::{GenError, Result};
use crate::hir::{Diagnostic, DiagnosticCollector, EntityGraph, SourceFiles, TypeEntity};

use super::config::GeneratorConfig;
use super::orchestrator::{Resolution, resolve_all};
use super::render::Renderer;

/// What a parsing collaborator is asked to scan.
#[derive(Clone, Copy, Debug)]
pub struct ScanRequest<'a> {
    /// Files or directories, already filtered by exclusion suffix.
    pub paths: &'a [PathBuf],
    pub annotation: &'a str,
    pub config: &'a GeneratorConfig,
}

impl ScanRequest<'_> {
    /// Whether a file found while walking a directory should be skipped.
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.config.is_excluded(path)
    }
}

/// Output of a scan: fresh entities and the files they came from.
#[derive(Clone, Debug, Default)]
pub struct Scanned {
    pub entities: Vec<TypeEntity>,
    pub files: SourceFiles,
    /// Members the parser dropped, recorded with
    /// [`DiagnosticCollector::unrecognized_declaration`].
    pub diagnostics: DiagnosticCollector,
}

/// Parsing collaborator.
pub trait EntitySource {
    /// Parse the requested sources into fresh entities, annotated ones
    /// carrying their metadata. Member shapes the model cannot represent are
    /// left out and reported through [`Scanned::diagnostics`].
    fn scan(&self, request: &ScanRequest<'_>) -> Result<Scanned>;

    /// Parse previously generated substitutes. Roles may be left untagged;
    /// they are inferred from member names when the graph is built.
    fn scan_dependencies(&self, paths: &[PathBuf]) -> Result<Vec<TypeEntity>>;
}

/// Summary of a finished run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub types: usize,
    pub annotated: usize,
    pub dependencies: usize,
    pub resolved: usize,
    pub bytes: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub output: PathBuf,
}

/// Run a whole generation.
pub fn generate<S, R>(config: &GeneratorConfig, source: &S, renderer: &R) -> Result<GenerateReport>
where
    S: EntitySource + ?Sized,
    R: Renderer + ?Sized,
{
    let start = Instant::now();
    config.validate()?;

    let paths = config.source_paths()?;
    let dependency_paths = config.dependency_paths()?;
    check_readable(&paths)?;
    check_readable(&dependency_paths)?;

    let (scanned, dependencies) = {
        let _span = info_span!("scan", sources = paths.len()).entered();
        let request = ScanRequest {
            paths: &paths,
            annotation: config.annotation.trim(),
            config,
        };
        let scanned = source.scan(&request)?;
        let dependencies = source.scan_dependencies(&dependency_paths)?;
        info!(
            entities = scanned.entities.len(),
            dependencies = dependencies.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scanned"
        );
        (scanned, dependencies)
    };

    let mut scan_diagnostics = scanned.diagnostics;
    let graph = {
        let mut builder = EntityGraph::builder()
            .with_files(scanned.files)
            .with_substitute_suffix(&config.substitute_suffix);
        builder.extend_entities(scanned.entities);
        builder.extend_dependencies(dependencies);
        builder.build()
    };

    let resolution = {
        let _span = info_span!("resolve", annotated = graph.annotated_types().len()).entered();
        resolve_all(&graph, config.concurrency(), &config.resolve_options())?
    };

    let output = {
        let _span = info_span!("render").entered();
        let output = assemble(config, &resolution, renderer);
        info!(bytes = output.len(), elapsed_ms = start.elapsed().as_millis() as u64, "rendered");
        output
    };

    {
        let _span = info_span!("write", path = %config.output.display()).entered();
        write_output(&config.output, &output)?;
        info!(elapsed_ms = start.elapsed().as_millis() as u64, "written");
    }

    Ok(GenerateReport {
        types: graph.type_count(),
        annotated: graph.annotated_types().len(),
        dependencies: graph.dependency_count(),
        resolved: resolution.len(),
        bytes: output.len(),
        diagnostics: scan_diagnostics
            .take()
            .into_iter()
            .chain(resolution.entities.iter().flat_map(|e| e.diagnostics().iter().cloned()))
            .collect(),
        output: config.output.clone(),
    })
}

/// Header, guard, imports, then every entity in source order.
pub fn assemble<R: Renderer + ?Sized>(config: &GeneratorConfig, resolution: &Resolution, renderer: &R) -> String {
    let mut out = String::new();

    if let Some(header) = &config.header {
        out.push_str(header.trim_end());
        out.push_str("\n\n");
    }
    if let Some(guard) = &config.macro_guard {
        out.push_str("#if ");
        out.push_str(guard);
        out.push('\n');
    }

    let mut imports: IndexSet<SmolStr> = resolution
        .entities
        .iter()
        .flat_map(|e| e.imports().iter().cloned())
        .collect();
    imports.sort();
    if !imports.is_empty() {
        for import in &imports {
            out.push_str(import);
            out.push('\n');
        }
        out.push('\n');
    }

    let rendered: Vec<String> = resolution
        .entities
        .iter()
        .map(|entity| renderer.render(entity, &resolution.type_keys))
        .collect();
    out.push_str(&rendered.join("\n\n"));
    out.push('\n');

    if config.macro_guard.is_some() {
        out.push_str("#endif\n");
    }
    out
}

fn check_readable(paths: &[PathBuf]) -> Result<()> {
    for path in paths {
        let readable = fs::metadata(path).and_then(|meta| {
            if meta.is_dir() {
                fs::read_dir(path).map(|_| ())
            } else {
                fs::File::open(path).map(|_| ())
            }
        });
        readable.map_err(|source| GenError::UnreadablePath {
            path: path.clone(),
            source,
        })?;
    }
    Ok(())
}

fn write_output(path: &Path, text: &str) -> Result<()> {
    let to_error = |source| GenError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_error)?;
    }
    fs::write(path, text).map_err(to_error)
}
