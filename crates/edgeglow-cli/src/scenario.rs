use std::io::{self, Write};

use clap::Args;

use crate::config::ConfigArgs;
use crate::error::{CliError, Result};
use crate::output::{FrameArgs, write_frames};
use crate::script::Script;
use crate::simulate::{SimOptions, simulate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub name: &'static str,
    pub about: &'static str,
    pub script: &'static str,
    pub pair: bool,
    pub pull_decay: bool,
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "absorb",
        about: "fling into the edge, grow, fade",
        script: "absorb:5000@0",
        pair: false,
        pull_decay: false,
    },
    Scenario {
        name: "pull-release",
        about: "short drag released before the pull phase ends",
        script: "pull:0.05:0.3@0 pull:0.05:0.4@16 pull:0.05:0.5@32 release@100",
        pair: false,
        pull_decay: false,
    },
    Scenario {
        name: "pull-hold",
        about: "drag and hold until the glow settles on its own",
        script: "pull:0.1:0.2@0 pull:0.05:0.25@16",
        pair: false,
        pull_decay: false,
    },
    Scenario {
        name: "pull-decay",
        about: "held drag that fades through the pull-decay phase",
        script: "pull:0.1@0 pull:0.05@16",
        pair: false,
        pull_decay: true,
    },
    Scenario {
        name: "absorb-then-pull",
        about: "a drag landing while an absorb is still settling",
        script: "absorb:3000@0 pull:0.1:0.7@100 release@300 pull:0.1:0.7@500 release@600",
        pair: false,
        pull_decay: false,
    },
    Scenario {
        name: "pair-bounce",
        about: "overscroll one end then the other on the same axis",
        script: "pull:0.08@0 pull:0.04@16 pull:-0.08@120 release@200 absorb:-4000@900",
        pair: true,
        pull_decay: false,
    },
];

#[must_use]
pub fn find_scenario(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

pub fn print_scenarios() {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for scenario in SCENARIOS {
        // A closed stdout is not worth failing over.
        let _ = writeln!(out, "{:<18} {}", scenario.name, scenario.about);
    }
}

#[derive(Debug, Clone, Args)]
pub struct ScenarioArgs {
    /// Built-in scenario name (see `list-scenarios`).
    pub name: String,

    /// Print the scenario's script instead of running it.
    #[arg(long = "print-script")]
    pub print_script: bool,

    #[command(flatten)]
    pub frames: FrameArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run_scenario(args: ScenarioArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_scenario_to(&args, &mut out)
}

pub fn run_scenario_to<W: Write>(args: &ScenarioArgs, out: &mut W) -> Result<()> {
    let scenario = find_scenario(&args.name).ok_or_else(|| CliError::ScenarioNotFound {
        name: args.name.clone(),
    })?;

    if args.print_script {
        writeln!(out, "{}", scenario.script)?;
        return Ok(());
    }

    let mut config = args.config.resolve()?;
    config.pull_decay |= scenario.pull_decay;

    let script = Script::parse(scenario.script)?;
    let options = SimOptions {
        frame_ms: args.frames.frame_ms,
        max_ms: args.frames.max_ms,
        pair: scenario.pair,
        realtime: false,
    };
    let records = simulate(&script, config, &options)?;
    write_frames(out, &records, args.frames.json)
}
