use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use rayon::prelude::*;

use dlc_compiler::{
    build_full_tree, build_geosite, flatten_all, parse_export_lists, parse_list,
    render_plaintext, Directive, ExclusionPolicy, FlattenStats, ListStore, PlaintextFile,
};
use dlc_core::geosite;
use dlc_core::types::ListName;

#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub data_path: PathBuf,
    pub dat_name: String,
    pub output_path: PathBuf,
    pub export_lists: String,
    pub exclude_attrs: String,
}

#[derive(Debug, Clone)]
pub struct CompileReport {
    pub source_files: usize,
    pub lists: usize,
    pub domains: usize,
    pub flatten: FlattenStats,
    pub rule_set_path: PathBuf,
    pub rule_set_bytes: usize,
    pub plaintext_paths: Vec<PathBuf>,
    pub total_ms: f64,
}

/// Run the whole pipeline. Nothing is written unless every phase succeeds.
pub fn run(options: &CompileOptions) -> Result<CompileReport> {
    let start = Instant::now();

    let sources = collect_sources(&options.data_path)?;
    if sources.is_empty() {
        bail!("No source files found in '{}'", options.data_path.display());
    }

    let mut store = load_store(&sources)?;
    let flatten = flatten_all(&mut store)?;

    let policy = ExclusionPolicy::parse(&options.exclude_attrs);
    let tree = build_full_tree(&store, &policy)?;
    let rule_set = build_geosite(&tree);
    geosite::load(&rule_set).context("Generated rule set failed validation")?;

    let export_lists = parse_export_lists(&options.export_lists);
    let plaintext = render_plaintext(&store, &export_lists)?;

    let rule_set_path = options.output_path.join(&options.dat_name);
    write_artifact(&rule_set_path, &rule_set)?;
    let plaintext_paths = write_plaintext(&options.output_path, &plaintext)?;

    Ok(CompileReport {
        source_files: sources.len(),
        lists: store.len(),
        domains: tree.domain_count(),
        flatten,
        rule_set_path,
        rule_set_bytes: rule_set.len(),
        plaintext_paths,
        total_ms: start.elapsed().as_secs_f64() * 1000.0,
    })
}

/// Every regular file under `dir`, recursively, in sorted path order.
pub fn collect_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = fs::read_dir(&current)
            .with_context(|| format!("Failed to read directory '{}'", current.display()))?;
        for entry in entries {
            let entry = entry
                .with_context(|| format!("Failed to read directory '{}'", current.display()))?;
            let path = entry.path();
            let file_type = entry
                .file_type()
                .with_context(|| format!("Failed to stat '{}'", path.display()))?;

            if file_type.is_dir() {
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Read and parse sources in parallel, then register them in path order.
pub fn load_store(paths: &[PathBuf]) -> Result<ListStore> {
    let parsed: Vec<(ListName, Vec<Directive>)> = paths
        .par_iter()
        .map(|path| -> Result<(ListName, Vec<Directive>)> {
            let name = list_name_for(path)?;
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read '{}'", path.display()))?;
            let directives = parse_list(&name, &text)
                .with_context(|| format!("Failed to parse '{}'", path.display()))?;
            Ok((name, directives))
        })
        .collect::<Result<_>>()?;

    let mut store = ListStore::new();
    for (name, directives) in parsed {
        tracing::debug!(list = %name, directives = directives.len(), "parsed source");
        store.register(&name, directives)?;
    }

    tracing::info!("loaded {} lists from {} files", store.len(), paths.len());
    Ok(store)
}

fn list_name_for(path: &Path) -> Result<ListName> {
    let file_name = path
        .file_name()
        .with_context(|| format!("'{}' has no file name", path.display()))?;
    Ok(ListName::new(file_name.to_string_lossy()))
}

fn write_artifact(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create '{}'", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write '{}'", path.display()))
}

fn write_plaintext(output_path: &Path, files: &[PlaintextFile]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = output_path.join(&file.file_name);
        write_artifact(&path, file.contents.as_bytes())?;
        written.push(path);
    }
    Ok(written)
}
