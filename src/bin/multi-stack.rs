//! # Multi-Stack CLI
//!
//! Deploys, removes, plans or validates every stack declared in the host
//! file's multi-stack section.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use multi_stack::config::{HostConfig, OrchestratorSettings};
use multi_stack::logging::init_structured_logging;
use multi_stack::models::{Command, Region};
use multi_stack::orchestration::{MultiStackOrchestrator, RunOptions};
use multi_stack::registry::HandlerRegistry;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "multi-stack")]
#[command(about = "Deploy and remove several stacks as one ordered operation")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Host file declaring the multi-stack section
    /// (default: serverless.yml in the current directory)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Orchestrator settings file layered over the defaults
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Stage passed to every stack
    #[arg(short, long)]
    stage: Option<String>,

    /// Region used for stacks run without a region binding
    #[arg(short, long)]
    region: Option<String>,

    /// Extra run option, repeatable (`-o aws-profile=ops`)
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    options: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Deploy every stack in priority order
    Deploy,
    /// Remove every stack in reverse deploy order
    Remove,
    /// Print the steps a command would run
    Plan {
        /// Command to plan
        #[arg(default_value = "deploy")]
        command: Command,
    },
    /// Resolve and validate the configuration only
    Validate,
}

impl Cli {
    fn run_options(&self) -> Result<RunOptions> {
        let mut options = RunOptions::new();
        if let Some(stage) = &self.stage {
            options.insert("stage", stage.clone());
        }
        if let Some(region) = &self.region {
            options.insert("region", region.clone());
        }
        for option in &self.options {
            let (key, value) = parse_option(option)?;
            options.insert(key, value);
        }
        if let Some(code) = options.region() {
            Region::parse(&code)?;
        }
        Ok(options)
    }

    fn host(&self) -> Result<HostConfig> {
        let host = match &self.file {
            Some(path) => HostConfig::from_file(path),
            None => HostConfig::discover("."),
        };
        Ok(host?)
    }
}

/// Split `key=value`; the value is parsed as YAML so `true` and `3` keep their type
fn parse_option(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("option `{raw}` must be written as key=value");
    };
    if key.trim().is_empty() {
        bail!("option `{raw}` has an empty key");
    }
    let value = serde_yaml::from_str::<Value>(value)
        .unwrap_or_else(|_| Value::String(value.to_string()));
    let value = if value.is_null() {
        Value::String(String::new())
    } else {
        value
    };
    Ok((key.trim().to_string(), value))
}

async fn run(orchestrator: &mut MultiStackOrchestrator, command: Command) -> Result<()> {
    let report = orchestrator.execute(command).await?;
    info!(
        run_id = %report.run_id,
        steps = report.steps.len(),
        "multi-stack {command} finished"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_structured_logging();

    let settings = OrchestratorSettings::load(cli.settings.as_deref())
        .context("Failed to load orchestrator settings")?;
    let host = cli.host().context("Failed to load host file")?;
    let options = cli.run_options()?;

    info!(
        host = %host.path().display(),
        engine = %settings.engine.executable,
        "multi-stack starting"
    );

    let registry = Arc::new(HandlerRegistry::with_builtins());
    let mut orchestrator = MultiStackOrchestrator::for_host(&host, &settings, registry, options);

    match cli.command {
        Commands::Deploy => run(&mut orchestrator, Command::Deploy).await?,
        Commands::Remove => run(&mut orchestrator, Command::Remove).await?,
        Commands::Plan { command } => {
            for step in orchestrator.plan(command)? {
                println!("{step}");
            }
        }
        Commands::Validate => match orchestrator.resolve()? {
            Some(config) => println!("{} stack descriptor(s) resolved", config.len()),
            None => println!(
                "No stacks found. Missing [{}] section.",
                settings.section_key
            ),
        },
    }

    Ok(())
}
