//! Domain List Compiler CLI
//!
//! Compiles a directory of domain list sources into a rule-set file and
//! plaintext exports, and inspects existing rule-set files.

mod compile;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use dlc_compiler::{DEFAULT_EXCLUDE_ATTRS, DEFAULT_EXPORT_LISTS};
use dlc_core::geosite::{self, GeoSiteList};

use crate::compile::CompileOptions;

#[derive(Parser)]
#[command(name = "dlc")]
#[command(about = "Domain list compiler and rule-set tools")]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a data directory into a rule set and plaintext lists
    Compile {
        /// Path to the 'data' directory
        #[arg(long = "datapath", default_value = "./data")]
        data_path: PathBuf,

        /// Name of the generated rule-set file
        #[arg(long = "datname", default_value = "geosite.dat")]
        dat_name: String,

        /// Output directory for generated files
        #[arg(long = "outputpath", default_value = "./publish")]
        output_path: PathBuf,

        /// Lists exported as plaintext, separated by ','
        #[arg(long = "exportlists", default_value = DEFAULT_EXPORT_LISTS)]
        export_lists: String,

        /// Attributes excluded per list: list@attr1@attr2,list2@attr
        #[arg(long = "excludeattrs", default_value = DEFAULT_EXCLUDE_ATTRS)]
        exclude_attrs: String,
    },

    /// Validate a rule-set file
    Validate {
        /// Rule-set file to validate
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Dump rule-set info
    Info {
        /// Rule-set file to inspect
        #[arg(short, long)]
        input: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compile {
            data_path,
            dat_name,
            output_path,
            export_lists,
            exclude_attrs,
        } => cmd_compile(CompileOptions {
            data_path,
            dat_name,
            output_path,
            export_lists,
            exclude_attrs,
        }),
        Commands::Validate { input } => cmd_validate(&input),
        Commands::Info { input, json } => cmd_info(&input, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn setup_logging(verbose: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if verbose { "debug" } else { "info" })
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_compile(options: CompileOptions) -> Result<()> {
    let report = compile::run(&options)?;

    let output = options.output_path.display();
    println!(
        "{} has been generated successfully in '{}'.",
        options.dat_name, output
    );
    for path in &report.plaintext_paths {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        println!("{} has been generated successfully in '{}'.", name, output);
    }

    println!("  Sources:  {}", report.source_files);
    println!("  Lists:    {}", report.lists);
    println!(
        "  Domains:  {} (includes expanded: {})",
        report.domains, report.flatten.includes_expanded
    );
    println!(
        "  Size:     {} bytes ({:.1} KB)",
        report.rule_set_bytes,
        report.rule_set_bytes as f64 / 1024.0
    );
    println!("  Time:     {:.1}ms", report.total_ms);
    tracing::debug!(path = %report.rule_set_path.display(), "rule set written");

    Ok(())
}

fn read_rule_set(input: &Path) -> Result<(usize, GeoSiteList)> {
    let bytes = fs::read(input).with_context(|| format!("Failed to read '{}'", input.display()))?;
    let list = geosite::load(&bytes).context("Invalid rule set")?;
    Ok((bytes.len(), list))
}

fn cmd_validate(input: &Path) -> Result<()> {
    let (size, list) = read_rule_set(input)?;

    println!("Rule set '{}' is valid", input.display());
    println!("  Lists:       {}", list.len());
    println!("  Domains:     {}", list.domain_count());
    println!("  Size:        {} bytes", size);

    Ok(())
}

#[derive(Serialize)]
struct ListSummary {
    name: String,
    domains: usize,
    by_type: BTreeMap<&'static str, usize>,
}

#[derive(Serialize)]
struct RuleSetSummary {
    size: usize,
    domains: usize,
    lists: Vec<ListSummary>,
}

fn summarize(size: usize, list: &GeoSiteList) -> RuleSetSummary {
    let lists = list
        .entries
        .iter()
        .map(|site| {
            let mut by_type = BTreeMap::new();
            for domain in &site.domains {
                *by_type.entry(domain.match_type.prefix()).or_insert(0) += 1;
            }
            ListSummary {
                name: site.country_code.clone(),
                domains: site.domains.len(),
                by_type,
            }
        })
        .collect();

    RuleSetSummary {
        size,
        domains: list.domain_count(),
        lists,
    }
}

fn cmd_info(input: &Path, json: bool) -> Result<()> {
    let (size, list) = read_rule_set(input)?;
    let summary = summarize(size, &list);

    if json {
        let text = serde_json::to_string_pretty(&summary).context("Failed to encode summary")?;
        println!("{text}");
        return Ok(());
    }

    println!("Rule set: {}", input.display());
    println!("  Total size:  {} bytes ({:.1} KB)", size, size as f64 / 1024.0);
    println!("  Domains:     {}", summary.domains);
    println!();
    println!("Lists:");
    for entry in &summary.lists {
        let types: Vec<String> = entry
            .by_type
            .iter()
            .map(|(kind, count)| format!("{kind}={count}"))
            .collect();
        println!("  {:<24} {:>7}  {}", entry.name, entry.domains, types.join(" "));
    }

    Ok(())
}
