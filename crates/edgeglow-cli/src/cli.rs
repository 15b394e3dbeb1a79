use std::io;

use clap::{Args, Parser, Subcommand};
use edgeglow_core::logging::LOG_ENV;
use tracing_subscriber::EnvFilter;

use crate::config::ConfigArgs;
use crate::error::Result;
use crate::output::write_phase_table;
use crate::scenario::{ScenarioArgs, print_scenarios, run_scenario};
use crate::simulate::{SimulateArgs, run_simulate};

#[derive(Debug, Parser)]
#[command(
    name = "edgeglow",
    about = "Frame-by-frame simulator for the overscroll edge glow state machine",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replay a stimulus script and print one snapshot per frame.
    Simulate(SimulateArgs),

    /// Print the state transition table for a config.
    Table(TableArgs),

    /// Run a built-in scenario.
    Scenario(ScenarioArgs),

    /// Print built-in scenario names.
    #[command(name = "list-scenarios")]
    ListScenarios,
}

#[derive(Debug, Clone, Default, Args)]
pub struct TableArgs {
    /// Emit the table as JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl Cli {
    /// Whether errors should be reported as JSON.
    #[must_use]
    pub fn wants_json(&self) -> bool {
        match &self.command {
            Commands::Simulate(args) => args.frames.json,
            Commands::Scenario(args) => args.frames.json,
            Commands::Table(args) => args.json,
            Commands::ListScenarios => false,
        }
    }
}

/// Install the stderr fmt subscriber, filtered by `EDGEGLOW_LOG` (default
/// `warn`). A subscriber that is already installed is left alone.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> Result<()> {
    init_logging();
    match cli.command {
        Commands::Simulate(args) => run_simulate(args),
        Commands::Table(args) => run_table(&args),
        Commands::Scenario(args) => run_scenario(args),
        Commands::ListScenarios => {
            print_scenarios();
            Ok(())
        }
    }
}

fn run_table(args: &TableArgs) -> Result<()> {
    let config = args.config.resolve()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_phase_table(&mut out, &config, args.json)
}
