//! Stimulus scripts.
//!
//! A script is a list of whitespace- or comma-separated tokens, each an
//! action with an optional `@<ms>` timestamp:
//!
//! ```text
//! pull:0.1:0.5@0  pull:0.05@16  release@50
//! absorb:5000@600  # fling into the edge
//! finish@1200
//! ```
//!
//! - `pull:<delta>[:<displacement>]`, displacement defaults to 0.5
//! - `release`
//! - `absorb:<velocity>`
//! - `finish`
//!
//! A token without `@` happens at the previous token's time. Times may not
//! go backwards. `#` starts a comment that runs to the end of the line.

use std::fmt;

use crate::error::{CliError, Result};

const DEFAULT_DISPLACEMENT: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stimulus {
    Pull { delta: f32, displacement: f32 },
    Release,
    Absorb { velocity: i32 },
    Finish,
}

impl fmt::Display for Stimulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pull {
                delta,
                displacement,
            } => write!(f, "pull:{delta}:{displacement}"),
            Self::Release => f.write_str("release"),
            Self::Absorb { velocity } => write!(f, "absorb:{velocity}"),
            Self::Finish => f.write_str("finish"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptStep {
    pub at_ms: u64,
    pub stimulus: Stimulus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    steps: Vec<ScriptStep>,
}

impl Script {
    pub fn parse(source: &str) -> Result<Self> {
        let mut steps = Vec::new();
        let mut last_ms = 0;

        for line in source.lines() {
            let line = line.split_once('#').map_or(line, |(code, _)| code);
            for token in line
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|t| !t.is_empty())
            {
                let step = parse_token(token, last_ms)?;
                if step.at_ms < last_ms {
                    return Err(CliError::script(
                        token,
                        format!("time {} is before {last_ms}", step.at_ms),
                    ));
                }
                last_ms = step.at_ms;
                steps.push(step);
            }
        }

        Ok(Self { steps })
    }

    #[must_use]
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Time of the last step, or 0 for an empty script.
    #[must_use]
    pub fn end_ms(&self) -> u64 {
        self.steps.last().map_or(0, |step| step.at_ms)
    }
}

fn parse_token(token: &str, default_ms: u64) -> Result<ScriptStep> {
    let (action, at_ms) = match token.split_once('@') {
        Some((action, time)) => {
            let at_ms = time
                .trim()
                .parse::<u64>()
                .map_err(|_| CliError::script(token, "time is not a whole number of ms"))?;
            (action, at_ms)
        }
        None => (token, default_ms),
    };

    let mut parts = action.split(':');
    let name = parts.next().unwrap_or_default().to_ascii_lowercase();
    let args: Vec<&str> = parts.collect();

    let stimulus = match (name.as_str(), args.as_slice()) {
        ("pull", [delta]) => Stimulus::Pull {
            delta: parse_f32(token, delta, "delta")?,
            displacement: DEFAULT_DISPLACEMENT,
        },
        ("pull", [delta, displacement]) => Stimulus::Pull {
            delta: parse_f32(token, delta, "delta")?,
            displacement: parse_f32(token, displacement, "displacement")?,
        },
        ("pull", _) => {
            return Err(CliError::script(
                token,
                "expected pull:<delta>[:<displacement>]",
            ));
        }
        ("release", []) => Stimulus::Release,
        ("absorb", [velocity]) => Stimulus::Absorb {
            velocity: velocity
                .parse::<i32>()
                .map_err(|_| CliError::script(token, "velocity is not an integer"))?,
        },
        ("absorb", _) => return Err(CliError::script(token, "expected absorb:<velocity>")),
        ("finish", []) => Stimulus::Finish,
        ("release" | "finish", _) => {
            return Err(CliError::script(token, format!("{name} takes no arguments")));
        }
        _ => return Err(CliError::script(token, format!("unknown action `{name}`"))),
    };

    Ok(ScriptStep { at_ms, stimulus })
}

fn parse_f32(token: &str, raw: &str, what: &str) -> Result<f32> {
    match raw.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CliError::script(token, format!("{what} is not a finite number"))),
    }
}
