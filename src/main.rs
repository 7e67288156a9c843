//! Plangate - gatekeeper for document-driven product planning.
//!
//! Decides whether a planning step may run given the documents that exist
//! under the project root and the chosen target platform.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use serde_json::json;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use plangate::workflow::{
    load_sections, Decision, DocumentSet, Gate, GateInput, Platform, StepCatalog, StepState,
    WorkflowStatus,
};
use plangate::core::{Config, OutputFormat};

/// Gatekeeper for document-driven product planning
#[derive(Parser)]
#[command(name = "plangate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project root holding the planning documents (defaults to `[general] root`)
    #[arg(short = 'C', long, global = true)]
    root: Option<PathBuf>,

    /// Output format; defaults to the configured format
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a planning step may run
    Check {
        /// Step identifier (e.g. data-model)
        step: String,

        /// Platform to check against instead of the configured one
        #[arg(short, long)]
        platform: Option<Platform>,
    },

    /// Show the state of every planning step
    Status {
        /// Platform to check against instead of the configured one
        #[arg(short, long)]
        platform: Option<Platform>,
    },

    /// List the step catalog
    Steps,

    /// Show the documents a step produces
    Outputs {
        /// Step identifier
        step: String,

        /// Placeholder bindings (key=value), e.g. id=billing
        #[arg(short, long = "set")]
        set: Vec<String>,
    },

    /// Show or choose the target platform
    Platform {
        #[command(subcommand)]
        operation: PlatformOperation,
    },

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum PlatformOperation {
    /// Show the configured platform
    Show,

    /// Choose the platform (can only be set once)
    Set {
        /// Platform identifier (e.g. web, cli, ios-native)
        platform: Platform,
    },

    /// List available platforms
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    let (root, config) = resolve_project(cli.root).context("Failed to load configuration")?;
    let json = cli.format.unwrap_or(config.general.output_format) == OutputFormat::Json;

    match cli.command {
        Commands::Check { step, platform } => {
            let code = cmd_check(&root, &config, &step, platform, json)?;
            std::process::exit(code);
        }
        Commands::Status { platform } => {
            cmd_status(&root, &config, platform, json)?;
        }
        Commands::Steps => {
            cmd_steps(&root, &config, json)?;
        }
        Commands::Outputs { step, set } => {
            cmd_outputs(&root, &config, &step, &set, json)?;
        }
        Commands::Platform { operation } => {
            cmd_platform(&root, config, operation, json)?;
        }
        Commands::Config { path } => {
            cmd_config(&root, &config, path)?;
        }
        Commands::Completions { shell } => {
            cmd_completions(shell);
        }
    }

    Ok(())
}

/// Pick the project root and its config.
///
/// `-C` wins. Otherwise the config in the working directory may point at the
/// root with `[general] root`; a `.plangate.toml` there takes over from it.
fn resolve_project(flag: Option<PathBuf>) -> Result<(PathBuf, Config)> {
    if let Some(root) = flag {
        let config = Config::load(&root)?;
        return Ok((root, config));
    }

    let cwd = Path::new(".");
    let config = Config::load(cwd)?;
    let root = config.project_root(cwd);
    if root == cwd {
        return Ok((root, config));
    }

    tracing::debug!(root = %root.display(), "Using configured project root");
    let local = Config::local_path(&root);
    if local.exists() {
        return Ok((root, Config::load_from_file(&local)?));
    }

    // Saved back under the new root, where `root` would point one level too deep
    let mut config = config;
    config.general.root = PathBuf::from(".");
    Ok((root, config))
}

/// Snapshot of the project as the gate sees it.
struct Project {
    catalog: StepCatalog,
    documents: DocumentSet,
    sections: Vec<String>,
}

impl Project {
    fn load(root: &Path, config: &Config) -> Result<Self> {
        let catalog = config.catalog(root).context("Failed to load step catalog")?;
        let documents = DocumentSet::scan(root);
        let sections = load_sections(root);
        Ok(Self { catalog, documents, sections })
    }

    fn input(&self) -> GateInput<'_> {
        GateInput::new(&self.documents).with_sections(&self.sections)
    }
}

/// Check a single step. Returns the process exit code.
fn cmd_check(
    root: &Path,
    config: &Config,
    step: &str,
    platform: Option<Platform>,
    json: bool,
) -> Result<i32> {
    let project = Project::load(root, config)?;
    let gate = Gate::new(&project.catalog);
    let platform = platform.or(config.workflow.platform);

    let def = gate.step(step)?;
    let decision = gate.decide(def, &project.input(), platform);

    if json {
        let mut value = serde_json::to_value(&decision)?;
        value["step"] = json!(def.id);
        value["platform"] = json!(platform);
        if decision.is_allowed() {
            value["outputs"] = json!(def.outputs);
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(decision.exit_code());
    }

    match &decision {
        Decision::Allowed => {
            println!("{}: allowed", def.id);
            for output in &def.outputs {
                println!("  writes: {output}");
            }
        }
        Decision::Blocked { missing } => {
            println!("{}: blocked", def.id);
            for path in missing {
                println!("  missing: {path}");
            }
        }
        Decision::Skipped { reason } => {
            println!("{}: skipped ({reason})", def.id);
        }
    }

    Ok(decision.exit_code())
}

/// Show the state of every step.
fn cmd_status(root: &Path, config: &Config, platform: Option<Platform>, json: bool) -> Result<()> {
    let project = Project::load(root, config)?;
    let gate = Gate::new(&project.catalog);
    let platform = platform.or(config.workflow.platform);
    let status = WorkflowStatus::compute(&gate, &project.input(), platform);

    if json {
        let mut value = serde_json::to_value(&status)?;
        value["next"] = json!(status.next_steps());
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match platform {
        Some(p) => println!("Platform: {p}"),
        None => println!("Platform: unset"),
    }
    println!("Documents: {}", project.documents.len());
    if !project.sections.is_empty() {
        println!("Sections: {}", project.sections.join(", "));
    }
    println!();

    let width = status.steps.iter().map(|s| s.step.as_str().len()).max().unwrap_or(0);
    for entry in &status.steps {
        let name = entry.step.as_str();
        match &entry.state {
            StepState::Blocked { missing } => {
                println!("  {name:<width$}  blocked  (missing: {})", missing.join(", "));
            }
            StepState::Skipped { reason } => {
                println!("  {name:<width$}  skipped  ({reason})");
            }
            state => println!("  {name:<width$}  {state}"),
        }
    }

    let next = status.next_steps();
    println!();
    if next.is_empty() {
        if status.is_finished() {
            println!("All steps complete.");
        } else {
            println!("Next: nothing runnable yet");
        }
    } else {
        let names: Vec<_> = next.iter().map(|s| s.as_str()).collect();
        println!("Next: {}", names.join(", "));
    }

    Ok(())
}

/// List the step catalog.
fn cmd_steps(root: &Path, config: &Config, json: bool) -> Result<()> {
    let catalog = config.catalog(root).context("Failed to load step catalog")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog.steps)?);
        return Ok(());
    }

    for def in catalog.iter() {
        println!("{} [{}]", def.id, def.applies_to);
        if def.prerequisites.is_empty() {
            println!("  needs:  (nothing)");
        } else {
            println!("  needs:  {}", def.prerequisites.join(", "));
        }
        println!("  writes: {}", def.outputs.join(", "));
    }

    println!("\nTotal: {} steps", catalog.len());
    Ok(())
}

/// Show the rendered outputs of a step.
fn cmd_outputs(
    root: &Path,
    config: &Config,
    step: &str,
    assignments: &[String],
    json: bool,
) -> Result<()> {
    let catalog = config.catalog(root).context("Failed to load step catalog")?;
    let gate = Gate::new(&catalog);

    let mut bindings = HashMap::new();
    for assignment in assignments {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Invalid binding '{assignment}', expected key=value"))?;
        bindings.insert(key.trim().to_string(), value.trim().to_string());
    }

    let outputs = gate.outputs(step, &bindings)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
    } else {
        for output in &outputs {
            println!("{output}");
        }
    }

    Ok(())
}

/// Handle platform commands.
fn cmd_platform(
    root: &Path,
    mut config: Config,
    operation: PlatformOperation,
    json: bool,
) -> Result<()> {
    match operation {
        PlatformOperation::Show => {
            if json {
                println!("{}", json!({ "platform": config.workflow.platform }));
            } else {
                match config.workflow.platform {
                    Some(p) => println!("{p}"),
                    None => println!("unset"),
                }
            }
        }
        PlatformOperation::Set { platform } => {
            if config.select_platform(platform)? {
                let path = config.save_local(root)?;
                println!("Platform set to {platform} ({})", path.display());
            } else {
                println!("Platform already set to {platform}");
            }
        }
        PlatformOperation::List => {
            if json {
                let platforms: Vec<_> = Platform::ALL
                    .iter()
                    .map(|p| json!({ "id": p, "name": p.display_name(), "visual": p.is_visual() }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&platforms)?);
            } else {
                for p in Platform::ALL {
                    let marker = if p.is_visual() { "" } else { "  (no visual design)" };
                    println!("{:<24} {}{marker}", p.id(), p.display_name());
                }
            }
        }
    }

    Ok(())
}

/// Show configuration.
fn cmd_config(root: &Path, config: &Config, show_path: bool) -> Result<()> {
    if show_path {
        let local = Config::local_path(root);
        if local.exists() {
            println!("{}", local.display());
        } else if let Some(dir) = Config::config_dir() {
            println!("{}", dir.join("config.toml").display());
        }
        return Ok(());
    }

    let toml = toml::to_string_pretty(config)?;
    println!("{toml}");

    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "plangate", &mut io::stdout());
}
