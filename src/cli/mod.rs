//! CLI for codemap.
//!
//! Commands:
//! - Build: scan
//! - Output: format, stats, list
//! - Maintenance: update, remove

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::Config;
use crate::index::{self, ProjectIndex};
use crate::render::{self, RenderFormat};
use crate::{scan, storage};

#[derive(Parser)]
#[command(name = "codemap")]
#[command(about = "Compact structural maps of JS/TS projects", long_about = None)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    // ─── Build ────────────────────────────────────────────────────
    /// Scan the project and write the index
    Scan,

    // ─── Output ───────────────────────────────────────────────────
    /// Render the index in a given format
    Format {
        /// One of: dsl, graph, tree, report, json, auto
        #[arg(default_value = "auto")]
        format: String,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print compression statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Show index statistics
    Stats,

    /// List indexed files
    List,

    // ─── Maintenance ──────────────────────────────────────────────
    /// Re-extract one file and patch the index
    Update {
        /// Project-relative path
        path: String,
    },

    /// Remove one file from the index
    Remove {
        /// Project-relative path
        path: String,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let root = cli.root.canonicalize().unwrap_or(cli.root);
    let config = Config::load(&root)?;

    match cli.command {
        Commands::Scan => {
            let outcome = scan::scan_root(&root, &config.extensions, &config.safety_policy());
            storage::save(&outcome.index, &root)?;

            println!("✓ Index built");
            println!("  Files: {}", outcome.index.metadata.total_files);
            println!("  Edges: {}", outcome.index.edges.len());
            let degraded = outcome.diagnostics.total_degraded_files();
            if degraded > 0 {
                println!("  Degraded files: {degraded}");
            }
            if outcome.diagnostics.unresolved_imports > 0 {
                println!(
                    "  Unresolved imports: {}",
                    outcome.diagnostics.unresolved_imports
                );
            }
        }

        Commands::Format {
            format,
            output,
            stats,
        } => {
            let index = load_index(&root)?;
            let mut chosen = RenderFormat::from_str(&format)?;
            if chosen == RenderFormat::Auto {
                chosen = RenderFormat::auto_for(
                    index.metadata.total_files,
                    config.auto_dsl_threshold,
                );
            }
            let rendered = render::render(&index, chosen);

            if stats {
                let figures = render::compression_stats(&index, &rendered)?;
                eprintln!(
                    "{} -> {} bytes ({:.1}% reduction, ~{} tokens)",
                    figures.original_size,
                    figures.compressed_size,
                    figures.reduction_percent,
                    figures.estimated_token_count
                );
            }

            match output {
                Some(path) => {
                    fs::write(&path, rendered)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("✓ Wrote {}", path.display());
                }
                None => print!("{rendered}"),
            }
        }

        Commands::Stats => {
            let index = load_index(&root)?;
            let figures = index::stats(&index);
            println!("{}", serde_json::to_string_pretty(&figures)?);
        }

        Commands::List => {
            let index = load_index(&root)?;
            for node in &index.nodes {
                println!("{node}");
            }
        }

        Commands::Update { path } => {
            let mut index = load_index(&root)?;
            let outcome = index::update_from_disk(&mut index, &path, &config.safety_policy());
            storage::save(&index, &root)?;

            if outcome.added {
                println!("✓ Added {path}");
            } else {
                println!("✓ Updated {path}");
            }
            if let Some(reason) = outcome.degraded {
                println!("  Degraded extraction: {reason}");
            }
        }

        Commands::Remove { path } => {
            let mut index = load_index(&root)?;
            if !index::remove(&mut index, &path) {
                bail!("{path} is not in the index");
            }
            storage::save(&index, &root)?;
            println!("✓ Removed {path}");
        }
    }

    Ok(())
}

fn load_index(root: &std::path::Path) -> anyhow::Result<ProjectIndex> {
    storage::load(root).with_context(|| {
        format!(
            "no usable index under {}; run `codemap scan` first",
            root.display()
        )
    })
}
