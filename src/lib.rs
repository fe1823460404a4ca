//! Purview: nearest-ancestor policy resolution for agent instruction files
//!
//! **Purview answers one question: which policy file governs this path?**
//!
//! Repositories accumulate `AGENTS.md`-style instruction files at many
//! depths. The deepest file above a path wins; a symlinked policy file is a
//! pointer to its target's content, not a separate policy; and an explicit
//! live instruction always outranks whatever is standing on disk.
//!
//! # Core Model
//!
//! - **Snapshot index**: one directory scan produces one immutable
//!   [`core::index::PolicyIndex`]; rebuilds swap whole values
//! - **Precedence walk**: [`core::resolve`] climbs from the query's
//!   immediate parent toward the root; first policy wins
//! - **Override gate**: [`core::gate`] applies an optional live instruction
//!   on top of the resolution, pure and total
//!
//! # Examples
//!
//! ```bash
//! # Scaffold a starter policy file
//! purview init --template django
//!
//! # Which policy governs this file?
//! purview resolve django/app/views.py --explain
//!
//! # Same, with a live instruction that outranks it
//! purview effective django/app/views.py --instruction "use tabs"
//!
//! # Tree diagnostics (cycles, dangling links, blank policies)
//! purview check
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: snapshot index, precedence walk, override gate, and the
//!   ambient surfaces around them (config, diagnostics, graph, scaffold)

pub mod core;

use core::{check, config, envelope, error, gate, graph, index, output, resolve, scaffold};

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[clap(
    name = "purview",
    version = env!("CARGO_PKG_VERSION"),
    about = "Ancestor-wins policy resolution for agent instruction files"
)]
struct Cli {
    /// Repository root (defaults to walking up from the current directory to
    /// a '.git' marker).
    #[clap(long, global = true)]
    root: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct InitCli {
    /// Template variant: 'generic', 'django', or 'react'.
    #[clap(long, default_value = "generic")]
    template: String,
    /// Directory to scaffold (defaults to the resolved root).
    #[clap(short, long)]
    dir: Option<PathBuf>,
    /// Overwrite an existing policy file.
    #[clap(long)]
    force: bool,
    /// Show what would change without writing files.
    #[clap(long)]
    dry_run: bool,
}

#[derive(clap::Args, Debug)]
struct ScanCli {
    /// Output format: 'text' or 'json'.
    #[clap(long, default_value = "text")]
    format: String,
}

#[derive(clap::Args, Debug)]
struct ResolveCli {
    /// File path to resolve (absolute, or relative to the root).
    path: PathBuf,
    /// Show every ancestor directory considered during the walk.
    #[clap(long)]
    explain: bool,
    /// Output format: 'text' or 'json'.
    #[clap(long, default_value = "text")]
    format: String,
}

#[derive(clap::Args, Debug)]
struct EffectiveCli {
    /// File path to resolve (absolute, or relative to the root).
    path: PathBuf,
    /// Live instruction that outranks the standing policy for this query.
    #[clap(long)]
    instruction: Option<String>,
    /// Output format: 'text' or 'json'.
    #[clap(long, default_value = "text")]
    format: String,
}

#[derive(clap::Args, Debug)]
struct CheckCli {
    /// Output format: 'text' or 'json'.
    #[clap(long, default_value = "text")]
    format: String,
}

#[derive(clap::Args, Debug)]
struct SchemaCli {
    /// Optional: filter by subsystem name
    #[clap(long)]
    subsystem: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scaffold a starter policy file
    #[clap(name = "init", visible_alias = "i")]
    Init(InitCli),

    /// Build the policy index and show every entry
    #[clap(name = "scan", visible_alias = "s")]
    Scan(ScanCli),

    /// List directories carrying a policy file
    #[clap(name = "list", visible_alias = "l")]
    List,

    /// Resolve the governing policy for a path
    #[clap(name = "resolve", visible_alias = "r")]
    Resolve(ResolveCli),

    /// Combine a resolution with a live instruction
    #[clap(name = "effective", visible_alias = "e")]
    Effective(EffectiveCli),

    /// Run read-only tree diagnostics
    #[clap(name = "check")]
    Check(CheckCli),

    /// Render the policy cross-reference graph (Mermaid)
    #[clap(name = "graph")]
    Graph,

    /// Subsystem schemas and discovery
    #[clap(name = "schema")]
    Schema(SchemaCli),

    /// Show version information
    #[clap(name = "version")]
    Version,
}

fn find_repository_root(start_dir: &Path) -> Result<PathBuf, error::PurviewError> {
    let mut current_dir = PathBuf::from(start_dir);
    loop {
        if current_dir.join(".git").exists() {
            return Ok(current_dir);
        }
        if !current_dir.pop() {
            return Err(error::PurviewError::NotFound(
                "no '.git' directory found in current or parent directories; pass --root explicitly"
                    .to_string(),
            ));
        }
    }
}

fn resolve_root(
    flag: &Option<PathBuf>,
    current_dir: &Path,
) -> Result<PathBuf, error::PurviewError> {
    match flag {
        Some(r) => match fs::canonicalize(r) {
            Ok(p) => Ok(p),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(
                error::PurviewError::NotFound(format!("--root does not exist: {}", r.display())),
            ),
            Err(e) => Err(error::PurviewError::IoError(e)),
        },
        None => find_repository_root(current_dir),
    }
}

fn build_index(root: &Path) -> Result<index::PolicyIndex, error::PurviewError> {
    let config = config::load_scan_config(root)?;
    index::PolicyIndex::build(root, &config)
}

fn print_pretty(value: &impl serde::Serialize) -> Result<(), error::PurviewError> {
    println!(
        "{}",
        serde_json::to_string_pretty(value)
            .map_err(|e| error::PurviewError::ValidationError(e.to_string()))?
    );
    Ok(())
}

pub fn run() -> Result<(), error::PurviewError> {
    let cli = Cli::parse();
    let current_dir = std::env::current_dir()?;

    match cli.command {
        Command::Version => {
            // Version command - simple output for scripts/parsing
            println!("v{}", env!("CARGO_PKG_VERSION"));
        }
        Command::Init(init_cli) => {
            use colored::Colorize;

            let raw_dir = match init_cli.dir {
                Some(d) => d,
                None => match &cli.root {
                    Some(r) => r.clone(),
                    None => current_dir,
                },
            };
            println!(
                "Scaffolding starter policy into {}",
                raw_dir.display().to_string().bright_white()
            );

            // The target's own purview.toml decides the policy filename.
            let scan_config = config::load_scan_config(&raw_dir)?;
            let opts = scaffold::ScaffoldOptions {
                target_dir: raw_dir,
                template: init_cli.template,
                force: init_cli.force,
                dry_run: init_cli.dry_run,
            };
            scaffold::scaffold_policy_file(&opts, &scan_config)?;

            if !opts.dry_run {
                println!(
                    "{} initialized; run {} to inspect the tree",
                    "✓".bright_green(),
                    "purview scan".bright_cyan()
                );
            }
        }
        _ => {
            let root = resolve_root(&cli.root, &current_dir)?;

            match cli.command {
                Command::Scan(scan_cli) => {
                    let idx = build_index(&root)?;
                    if scan_cli.format == "json" {
                        print_pretty(&idx.scan_report())?;
                    } else {
                        use colored::Colorize;
                        println!(
                            "Indexed {} policy file(s) under {}",
                            idx.len(),
                            root.display()
                        );
                        for policy in idx.policies() {
                            let marker = if policy.symlink_target.is_some() {
                                "↪"
                            } else {
                                "●"
                            };
                            println!(
                                "  {} {} [{}] {}",
                                marker.bright_green(),
                                output::rel_display(&root, &policy.dir).bright_white(),
                                output::short_digest(&policy.digest),
                                output::compact_line(&policy.content, 48).bright_black()
                            );
                        }
                        println!(
                            "Fingerprint: {}",
                            output::short_digest(&idx.fingerprint()).bright_cyan()
                        );
                    }
                }
                Command::List => {
                    let idx = build_index(&root)?;
                    for dir in idx.directories() {
                        println!("{}", output::rel_display(&root, dir));
                    }
                }
                Command::Resolve(resolve_cli) => {
                    let idx = build_index(&root)?;
                    let result = resolve::resolve(&idx, &resolve_cli.path)?;
                    if resolve_cli.format == "json" {
                        let envelope = envelope::command_envelope("resolve", "ok", &result)?;
                        print_pretty(&envelope)?;
                    } else {
                        use colored::Colorize;
                        match &result.policy {
                            Some(policy) => {
                                println!(
                                    "{} {}",
                                    "Governing policy:".bright_white(),
                                    output::rel_display(&root, &policy.file_path).bright_green()
                                );
                                if let Some(target) = &policy.symlink_target {
                                    println!("  content from symlink target {}", target.display());
                                }
                                println!(
                                    "  governs subtree {}",
                                    output::rel_display(&root, &policy.dir)
                                );
                            }
                            None => {
                                println!(
                                    "{} no governing policy for {}",
                                    "unpoliced:".bright_yellow(),
                                    output::rel_display(&root, &result.query)
                                );
                            }
                        }
                        if resolve_cli.explain {
                            println!("Considered, nearest first:");
                            for dir in &result.considered {
                                let icon = if idx.get(dir).is_some() { "●" } else { "·" };
                                println!("  {} {}", icon, output::rel_display(&root, dir));
                            }
                        }
                    }
                }
                Command::Effective(effective_cli) => {
                    let idx = build_index(&root)?;
                    let result = resolve::resolve(&idx, &effective_cli.path)?;
                    let effective =
                        gate::effective_policy(&result, effective_cli.instruction.as_deref());
                    if effective_cli.format == "json" {
                        let envelope = envelope::command_envelope("effective", "ok", &effective)?;
                        print_pretty(&envelope)?;
                    } else {
                        use colored::Colorize;
                        let label = match &effective.source {
                            gate::PolicySource::Instruction => "live instruction".to_string(),
                            gate::PolicySource::Policy { dir } => {
                                format!("policy {}", output::rel_display(&root, dir))
                            }
                            gate::PolicySource::Unpoliced => {
                                "unpoliced (no effective policy)".to_string()
                            }
                        };
                        println!("{} {}", "Source:".bright_white(), label.bright_cyan());
                        if !effective.text.is_empty() {
                            println!("{}", effective.text);
                        }
                    }
                }
                Command::Check(check_cli) => {
                    check::run_check_cli(&root, &check_cli.format)?;
                }
                Command::Graph => {
                    let idx = build_index(&root)?;
                    let graph = graph::generate_policy_graph(&idx);
                    println!("{}", graph.mermaid);
                }
                Command::Schema(schema_cli) => {
                    let mut schemas = std::collections::BTreeMap::new();
                    schemas.insert("index", index::schema());
                    schemas.insert("resolve", resolve::schema());
                    schemas.insert("gate", gate::schema());
                    schemas.insert("check", check::schema());
                    schemas.insert("graph", graph::schema());
                    schemas.insert("scaffold", scaffold::schema());

                    let doc = if let Some(sub) = schema_cli.subsystem {
                        schemas
                            .get(sub.as_str())
                            .cloned()
                            .unwrap_or(serde_json::json!({ "error": "subsystem not found" }))
                    } else {
                        serde_json::json!({
                            "schema_version": "1.0.0",
                            "subsystems": schemas
                        })
                    };
                    print_pretty(&doc)?;
                }
                _ => unreachable!(),
            }
        }
    }
    Ok(())
}
