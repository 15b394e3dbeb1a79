//! Scripted frame simulation.
//!
//! Replays a [`Script`] against one [`EdgeEffect`] (or an [`EdgePair`] with
//! `--pair`) and records a snapshot per frame. Stimuli are applied at their
//! own timestamps, before the first frame at or after that time.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use edgeglow_core::clock::{FrameClock, MonotonicClock};
use edgeglow_core::{EdgeEffect, EdgeEffectConfig, EdgePair, EdgeSide};

use crate::config::ConfigArgs;
use crate::error::{CliError, Result};
use crate::output::{FrameArgs, FrameRecord, write_frames};
use crate::script::{Script, Stimulus};

/// How long to keep rendering after the last stimulus when `--max-ms` is
/// not given.
const DEFAULT_TAIL_MS: u64 = 5_000;

#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    /// Stimulus script, e.g. "pull:0.1:0.5@0 release@50 absorb:5000@600".
    #[arg(long, conflicts_with = "script_file")]
    pub script: Option<String>,

    /// Read the script from a file ("-" for stdin).
    #[arg(long = "script-file")]
    pub script_file: Option<PathBuf>,

    /// Drive a leading/trailing pair; negative deltas pull the trailing edge.
    #[arg(long)]
    pub pair: bool,

    /// Pace frames with the wall clock instead of a fixed step.
    #[arg(long)]
    pub realtime: bool,

    #[command(flatten)]
    pub frames: FrameArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run_simulate(args: SimulateArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_simulate_to(&args, &mut out)
}

pub fn run_simulate_to<W: Write>(args: &SimulateArgs, out: &mut W) -> Result<()> {
    let script = load_script(args)?;
    let config = args.config.resolve()?;
    let options = SimOptions {
        frame_ms: args.frames.frame_ms,
        max_ms: args.frames.max_ms,
        pair: args.pair,
        realtime: args.realtime,
    };
    let records = simulate(&script, config, &options)?;
    write_frames(out, &records, args.frames.json)
}

fn load_script(args: &SimulateArgs) -> Result<Script> {
    let source = match (&args.script, &args.script_file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) if path.as_os_str() == "-" => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
        (None, Some(path)) => {
            if !path.exists() {
                return Err(CliError::MissingPath { path: path.clone() });
            }
            fs::read_to_string(path)?
        }
        (None, None) => {
            return Err(CliError::invalid("provide --script or --script-file"));
        }
    };
    Script::parse(&source)
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimOptions {
    pub frame_ms: u64,
    pub max_ms: Option<u64>,
    pub pair: bool,
    pub realtime: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            frame_ms: crate::output::DEFAULT_FRAME_MS,
            max_ms: None,
            pair: false,
            realtime: false,
        }
    }
}

enum Target {
    Single(EdgeEffect),
    Pair(EdgePair),
}

impl Target {
    fn apply(&mut self, stimulus: Stimulus, at_ms: u64) {
        match (self, stimulus) {
            (
                Self::Single(glow),
                Stimulus::Pull {
                    delta,
                    displacement,
                },
            ) => glow.on_pull(delta, displacement, at_ms),
            (Self::Single(glow), Stimulus::Release) => glow.on_release(at_ms),
            (Self::Single(glow), Stimulus::Absorb { velocity }) => {
                glow.on_absorb(velocity, at_ms);
            }
            (Self::Single(glow), Stimulus::Finish) => glow.finish(),
            (
                Self::Pair(pair),
                Stimulus::Pull {
                    delta,
                    displacement,
                },
            ) => pair.on_overscroll(delta, displacement, at_ms),
            (Self::Pair(pair), Stimulus::Release) => pair.release(at_ms),
            (Self::Pair(pair), Stimulus::Absorb { velocity }) => {
                pair.on_fling_edge(velocity, at_ms);
            }
            (Self::Pair(pair), Stimulus::Finish) => {
                pair.edge_mut(EdgeSide::Leading).finish();
                pair.edge_mut(EdgeSide::Trailing).finish();
            }
        }
    }

    fn advance(&mut self, now_ms: u64) -> bool {
        match self {
            Self::Single(glow) => glow.advance(now_ms),
            Self::Pair(pair) => pair.advance(now_ms),
        }
    }

    fn record(&mut self, frame: usize, now_ms: u64, applied: &[String], out: &mut Vec<FrameRecord>) {
        match self {
            Self::Single(glow) => out.push(FrameRecord {
                frame,
                now_ms,
                side: None,
                snapshot: glow.snapshot(),
                applied: applied.to_vec(),
                events: glow.take_events(),
            }),
            Self::Pair(pair) => {
                let events = pair.take_events();
                for side in [EdgeSide::Leading, EdgeSide::Trailing] {
                    out.push(FrameRecord {
                        frame,
                        now_ms,
                        side: Some(side),
                        snapshot: pair.edge(side).snapshot(),
                        applied: if side == EdgeSide::Leading {
                            applied.to_vec()
                        } else {
                            Vec::new()
                        },
                        events: events
                            .iter()
                            .filter(|(s, _)| *s == side)
                            .map(|(_, e)| *e)
                            .collect(),
                    });
                }
            }
        }
    }
}

enum Pacing {
    Fixed,
    Realtime(MonotonicClock),
}

impl Pacing {
    fn next(&self, prev_ms: u64, frame_ms: u64) -> u64 {
        match self {
            Self::Fixed => prev_ms.saturating_add(frame_ms),
            Self::Realtime(clock) => {
                std::thread::sleep(Duration::from_millis(frame_ms));
                clock.now_ms().max(prev_ms.saturating_add(1))
            }
        }
    }
}

/// Run `script` to completion and return every recorded frame.
///
/// Stops once all stimuli are applied and the glow no longer needs frames,
/// or when the time limit is reached.
pub fn simulate(
    script: &Script,
    config: EdgeEffectConfig,
    options: &SimOptions,
) -> Result<Vec<FrameRecord>> {
    if options.frame_ms == 0 {
        return Err(CliError::invalid("--frame-ms must be at least 1"));
    }
    let max_ms = options
        .max_ms
        .unwrap_or_else(|| script.end_ms().saturating_add(DEFAULT_TAIL_MS));

    let mut target = if options.pair {
        Target::Pair(EdgePair::with_config(config))
    } else {
        Target::Single(EdgeEffect::with_config(config))
    };
    let pacing = if options.realtime {
        Pacing::Realtime(MonotonicClock::new())
    } else {
        Pacing::Fixed
    };

    tracing::info!(
        steps = script.steps().len(),
        frame_ms = options.frame_ms,
        max_ms,
        pair = options.pair,
        "simulate.start"
    );

    let mut records = Vec::new();
    let mut pending = script.steps().iter().peekable();
    let mut now = 0;
    let mut frame = 0;

    loop {
        let mut applied = Vec::new();
        while let Some(step) = pending.next_if(|s| s.at_ms <= now) {
            target.apply(step.stimulus, step.at_ms);
            tracing::debug!(at_ms = step.at_ms, stimulus = %step.stimulus, "simulate.apply");
            applied.push(step.stimulus.to_string());
        }

        let running = target.advance(now);
        target.record(frame, now, &applied, &mut records);

        if now >= max_ms {
            if running {
                tracing::warn!(now_ms = now, "simulate.cutoff: glow still running");
            }
            break;
        }
        if !running && pending.peek().is_none() {
            break;
        }

        now = pacing.next(now, options.frame_ms);
        frame += 1;
    }

    tracing::info!(frames = frame + 1, end_ms = now, "simulate.done");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use edgeglow_core::{EdgeEffectConfig, EdgeEvent, EdgeSide, EdgeState};

    use super::{SimOptions, simulate};
    use crate::error::CliError;
    use crate::script::Script;

    fn run(source: &str, options: SimOptions) -> Vec<crate::output::FrameRecord> {
        let script = Script::parse(source).unwrap();
        simulate(&script, EdgeEffectConfig::default(), &options).unwrap()
    }

    #[test]
    fn absorb_runs_until_idle() {
        let records = run("absorb:5000@0", SimOptions::default());
        let first = &records[0];
        assert_eq!(first.snapshot.state, EdgeState::Absorb);
        assert_eq!(first.events, vec![EdgeEvent::Haptic, EdgeEvent::Invalidate]);
        assert_eq!(first.applied, vec!["absorb:5000".to_string()]);

        let last = records.last().unwrap();
        assert_eq!(last.snapshot.state, EdgeState::Idle);
        assert_eq!(last.snapshot.alpha, 0.0);
        assert!(last.now_ms >= 700 && last.now_ms <= 740, "{}", last.now_ms);
    }

    #[test]
    fn waits_for_late_stimuli() {
        let records = run("absorb:5000@0 absorb:5000@2000", SimOptions::default());
        let second = records
            .iter()
            .find(|r| r.applied.iter().any(|a| a.starts_with("absorb")) && r.now_ms > 0)
            .unwrap();
        assert_eq!(second.now_ms, 2000);
        assert_eq!(second.snapshot.state, EdgeState::Absorb);
    }

    #[test]
    fn pull_release_recedes() {
        let records = run(
            "pull:0.05@0 pull:0.05@16 release@40",
            SimOptions::default(),
        );
        let at_48 = records.iter().find(|r| r.now_ms == 48).unwrap();
        assert_eq!(at_48.snapshot.state, EdgeState::Recede);
        assert_eq!(at_48.snapshot.pull_distance, 0.0);
    }

    #[test]
    fn max_ms_cuts_the_run_short() {
        let options = SimOptions {
            max_ms: Some(100),
            ..SimOptions::default()
        };
        let records = run("absorb:5000@0", options);
        assert_eq!(records.last().unwrap().now_ms, 112);
        assert_ne!(records.last().unwrap().snapshot.state, EdgeState::Idle);
    }

    #[test]
    fn pair_mode_records_both_sides() {
        let options = SimOptions {
            pair: true,
            ..SimOptions::default()
        };
        let records = run("pull:-0.1@0 release@32", options);
        assert_eq!(records[0].side, Some(EdgeSide::Leading));
        assert_eq!(records[1].side, Some(EdgeSide::Trailing));
        assert_eq!(records[0].snapshot.state, EdgeState::Idle);
        assert_eq!(records[1].snapshot.state, EdgeState::Pull);
        assert!(records[1].events.contains(&EdgeEvent::Haptic));
        assert!(records.len() % 2 == 0);
    }

    #[test]
    fn zero_frame_interval_is_rejected() {
        let script = Script::parse("release@0").unwrap();
        let options = SimOptions {
            frame_ms: 0,
            ..SimOptions::default()
        };
        assert!(matches!(
            simulate(&script, EdgeEffectConfig::default(), &options),
            Err(CliError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn empty_script_renders_one_idle_frame() {
        let records = run("", SimOptions::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].snapshot.state, EdgeState::Idle);
    }
}
