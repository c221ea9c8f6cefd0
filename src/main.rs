use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use flowbind::app::{handle_fatal_error, init_logging, AppConfig};
use flowbind::{ExecutionIds, VariableSource, VariableStore};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve step variables and interpolate {{ }} templates
#[derive(Parser)]
#[command(name = "flowbind", version)]
#[command(about = "Resolve step variables and interpolate {{ }} templates", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON file holding the variable snapshot (defaults to an empty store)
    #[arg(long, global = true)]
    vars: Option<PathBuf>,

    /// Engine settings file (TOML)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpolate a single template string
    Render {
        /// Template text, e.g. "Hello {{name}}"
        template: String,
    },
    /// Interpolate every string in a JSON settings file
    Resolve {
        /// Path to the settings JSON
        settings: PathBuf,
        /// Report unresolved references on stderr
        #[arg(long)]
        strict: bool,
    },
    /// Evaluate a `$` query against the variables
    Query {
        /// Query expression, e.g. "$.items[*].email"
        expr: String,
    },
    /// Bind a step's output and print the resulting variables
    Bind {
        /// Identifier of the step that produced the output
        step_id: String,
        /// Path to the step output JSON
        output: PathBuf,
        /// Write the updated snapshot back to the --vars file
        #[arg(long)]
        write: bool,
    },
    /// Print the read-only context a step executor would receive
    Context {
        /// Run identifier (generated when omitted)
        #[arg(long)]
        run_id: Option<String>,
        /// Parent execution identifier
        #[arg(long)]
        parent_id: String,
        /// Optional grouping identifier
        #[arg(long)]
        group_id: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let strict = matches!(cli.command, Commands::Resolve { strict: true, .. });
    let app_config = AppConfig::new(cli.verbose)
        .with_config_path(cli.config.clone())
        .with_strict(strict);
    init_logging(&app_config);

    if let Err(e) = run(cli, &app_config) {
        handle_fatal_error(e, app_config.verbose);
    }
}

fn run(cli: Cli, app_config: &AppConfig) -> Result<()> {
    let engine_config = app_config.engine_config()?;
    let mut store = load_store(cli.vars.as_deref())?;
    debug!("Loaded {} variables", store.len());

    match cli.command {
        Commands::Render { template } => {
            let value = store.interpolator_with(engine_config).interpolate(&template);
            print_json(&value.unwrap_or(Value::Null))
        }
        Commands::Resolve { settings, .. } => {
            let settings = read_json(&settings)?;
            let result = store.interpolate_reported(&settings, engine_config);
            for warning in &result.warnings {
                eprintln!("warning: {}", warning);
            }
            print_json(&result.value)
        }
        Commands::Query { expr } => {
            print_json(&store.evaluate_query(&expr).unwrap_or(Value::Null))
        }
        Commands::Bind {
            step_id,
            output,
            write,
        } => {
            let output = read_json(&output)?;
            let promoted = store.bind_output(&step_id, output);
            debug!("Promoted {} keys from step '{}'", promoted.len(), step_id);

            if write {
                let Some(path) = cli.vars.as_deref() else {
                    bail!("--write requires --vars");
                };
                std::fs::write(path, store.to_json_string()?)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            print_json(&store)
        }
        Commands::Context {
            run_id,
            parent_id,
            group_id,
        } => {
            let mut ids = match run_id {
                Some(run_id) => ExecutionIds::new(run_id, parent_id),
                None => ExecutionIds::generate(parent_id),
            };
            ids.group_id = group_id;
            print_json(&store.project(ids))
        }
    }
}

fn load_store(path: Option<&Path>) -> Result<VariableStore> {
    let Some(path) = path else {
        return Ok(VariableStore::new());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read variables from {}", path.display()))?;
    VariableStore::from_json_str(&content)
        .with_context(|| format!("Failed to load variables from {}", path.display()))
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
