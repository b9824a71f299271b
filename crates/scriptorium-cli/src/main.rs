use anyhow::Context;
use clap::{Parser, Subcommand};
use scriptorium_core::graph::{apply_dependencies, parse_dependency_response, topological_order};
use scriptorium_core::validator::{FormulaValidator, mark_section};
use scriptorium_core::{Config, Flattener, parse_document};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "scriptorium")]
#[command(about = "Structure tools for rewriting LaTeX articles", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./scriptorium.toml when present)
    #[arg(long, global = true, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve \input and \include and print the flattened document
    Flatten {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
    /// Print the segmented document as JSON
    Outline {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
    /// Print the dependency order of the sections as JSON
    Order {
        #[arg(value_name = "FILE")]
        path: PathBuf,
        /// Dependency response: {"dependencies": {"sec_1": ["sec_0"]}}
        #[arg(long, value_name = "JSON")]
        deps: Option<PathBuf>,
    },
    /// Check rewritten sections for lost or changed formulas
    Validate {
        #[arg(value_name = "FILE")]
        path: PathBuf,
        /// Rewritten section contents keyed by section id
        #[arg(long, value_name = "JSON")]
        rewritten: PathBuf,
        /// Write the assembled document here
        #[arg(long, value_name = "TEX")]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = Config::load(cli.config.as_deref())?;
    let flattener = Flattener::from_config(&config.latex);

    match &cli.command {
        Commands::Flatten { path } => {
            let flat = flattener.flatten(path)?;
            for input in &flat.report.inputs {
                log::info!("{} {}", input.fingerprint, input.path.display());
            }
            print!("{}", flat.content);
        }
        Commands::Outline { path } => {
            let parsed = parse_document(path, &flattener)?;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        Commands::Order { path, deps } => {
            let mut document = parse_document(path, &flattener)?.document;
            if let Some(deps) = deps {
                let response = read(deps)?;
                let map = parse_dependency_response(&response);
                let stored = apply_dependencies(&mut document, &map);
                log::info!("Applied {} dependencies from {}", stored, deps.display());
            }
            let order = topological_order(&document);
            println!("{}", serde_json::to_string_pretty(&order)?);
        }
        Commands::Validate {
            path,
            rewritten,
            output,
        } => {
            let mut document = parse_document(path, &flattener)?.document;
            let rewrites: BTreeMap<String, String> = serde_json::from_str(&read(rewritten)?)
                .with_context(|| format!("{} is not a JSON object of strings", rewritten.display()))?;
            document.record_rewrites(rewrites);

            let validator = FormulaValidator::from_config(&config.validation);
            let problems = validator.validate_document(&document);
            println!("{}", serde_json::to_string_pretty(&problems)?);

            if let Some(output) = output {
                if config.output.mark_problematic {
                    for section in document.sections_mut() {
                        mark_section(&validator, section, &config.output.problem_color);
                    }
                }
                fs::write(output, document.assemble())
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                log::info!("Wrote {}", output.display());
            }

            if !problems.is_empty() {
                return Ok(ExitCode::from(1));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
