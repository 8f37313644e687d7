//! # tocc
//!
//! Command-line simulator for basic timestamp-ordering concurrency control.
//!
//! ## Usage
//!
//! ```bash
//! # List the available scenarios
//! tocc scenarios
//!
//! # Run one scenario, or all of them
//! tocc run read-write-conflict --steps
//! tocc run --all
//!
//! # Replay an ad-hoc history
//! tocc replay "r1(x) r2(x) w1(x) c2 c1"
//! tocc --json replay r1(x) w1(x) c1
//! ```

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use tocc_primitives::{parse_history, Operation};
use tocc_scheduler::{Step, TimestampScheduler};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod error;
mod output;
mod report;
mod scenarios;

use config::Config;
use error::CliError;
use output::Output;
use scenarios::Scenario;

/// Timestamp-ordering scheduler simulator
#[derive(Parser, Debug)]
#[command(name = "tocc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Config file (default: ~/.tocc/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// List built-in and configured scenarios
    Scenarios,
    /// Run a named scenario
    Run {
        /// Scenario name
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        name: Option<String>,
        /// Run every scenario in order
        #[arg(long)]
        all: bool,
        /// Narrate each step
        #[arg(long)]
        steps: bool,
    },
    /// Run an ad-hoc history, e.g. `r1(x) w2(x) c1 c2`
    Replay {
        /// Operations in notation form
        #[arg(required = true, num_args = 1..)]
        operations: Vec<String>,
        /// Narrate each step
        #[arg(long)]
        steps: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(e, cli.json),
    };

    // The command line can only switch JSON on
    let json = cli.json || config.json;

    if let Err(e) = execute(cli.command, &config, json) {
        fail(e, json);
    }
}

fn fail(e: CliError, json: bool) -> ! {
    if json {
        println!(
            "{}",
            serde_json::json!({
                "error": e.to_string(),
                "success": false
            })
        );
    } else {
        eprintln!("Error: {}", e);
    }
    std::process::exit(1);
}

fn execute(command: Commands, config: &Config, json: bool) -> Result<(), CliError> {
    match command {
        Commands::Scenarios => {
            let catalog = scenarios::catalog(&config.scenarios)?;
            Output::new(json)
                .field_value("scenarios", serde_json::to_value(&catalog)?)
                .message(&report::render_scenarios(&catalog))
                .print();
        }
        Commands::Run { name, all, steps } => {
            let catalog = scenarios::catalog(&config.scenarios)?;
            let narrate = steps || config.steps;
            if all {
                let runs = catalog
                    .iter()
                    .map(|scenario| run_scenario(scenario, narrate, json))
                    .collect::<Result<Vec<_>, _>>()?;
                print_all(runs, json);
            } else {
                let name = name.ok_or_else(|| {
                    CliError::InvalidInput("give a scenario name or --all".to_string())
                })?;
                run_scenario(scenarios::find(&catalog, &name)?, narrate, json)?.print();
            }
        }
        Commands::Replay { operations, steps } => {
            let input = parse_history(&operations.join(" "))?;
            if input.is_empty() {
                return Err(CliError::InvalidInput("no operations given".to_string()));
            }
            let (out, text) = simulate(&input, steps || config.steps, json)?;
            out.message(&text).print();
        }
    }

    Ok(())
}

fn run_scenario(scenario: &Scenario, narrate: bool, json: bool) -> Result<Output, CliError> {
    tracing::debug!("Running scenario {}", scenario.name);
    let input = scenario.parse()?;
    let (out, text) = simulate(&input, narrate, json)?;

    Ok(out
        .field("scenario", &scenario.name)
        .field("title", &scenario.title)
        .message(&format!(
            "=== {}: {} ===\n{}",
            scenario.name, scenario.title, text
        )))
}

/// Replay `input` on a fresh scheduler, returning JSON fields and the text report
fn simulate(input: &[Operation], narrate: bool, json: bool) -> Result<(Output, String), CliError> {
    let mut steps: Vec<Step> = Vec::new();
    let mut narration = Vec::new();

    let result = TimestampScheduler::new().run_with(input.iter().cloned(), |step, state| {
        if narrate {
            narration.push(report::narrate_step(step, state));
            steps.push(step.clone());
        }
    });

    let notation = input
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");

    let mut text = format!("Input: {}\n\n", notation);
    for step in &narration {
        text.push_str(step);
        text.push_str("\n\n");
    }
    text.push_str(&report::render_report(&result));

    let mut out = Output::new(json).field("input", &notation);
    if narrate {
        out = out.field_value("steps", serde_json::to_value(&steps)?);
    }
    Ok((out.merge(serde_json::to_value(&result)?), text))
}

fn print_all(runs: Vec<Output>, json: bool) {
    if json {
        let runs = runs.into_iter().map(Output::into_value).collect();
        Output::new(true).field_value("runs", Value::Array(runs)).print();
    } else {
        let text = runs
            .iter()
            .filter_map(Output::render)
            .collect::<Vec<_>>()
            .join("\n\n");
        Output::new(false).message(&text).print();
    }
}
