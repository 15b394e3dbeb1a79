//! Rendering simulation frames and the transition table.

use std::io::Write;

use clap::Args;
use edgeglow_core::phase::{self, TABLE};
use edgeglow_core::{EdgeEffectConfig, EdgeEvent, EdgeSide, EdgeState, GlowSnapshot};
use serde::Serialize;

use crate::error::Result;

pub const DEFAULT_FRAME_MS: u64 = 16;

/// Frame pacing and output flags shared by `simulate` and `scenario`.
#[derive(Debug, Clone, Args)]
pub struct FrameArgs {
    /// Milliseconds between frames.
    #[arg(long = "frame-ms", default_value_t = DEFAULT_FRAME_MS)]
    pub frame_ms: u64,

    /// Stop after this many milliseconds even if the glow is still running.
    #[arg(long = "max-ms")]
    pub max_ms: Option<u64>,

    /// Emit one JSON object per frame instead of a table.
    #[arg(long)]
    pub json: bool,
}

impl Default for FrameArgs {
    fn default() -> Self {
        Self {
            frame_ms: DEFAULT_FRAME_MS,
            max_ms: None,
            json: false,
        }
    }
}

/// One edge at one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    pub frame: usize,
    pub now_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<EdgeSide>,
    #[serde(flatten)]
    pub snapshot: GlowSnapshot,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub applied: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<EdgeEvent>,
}

pub fn write_frames<W: Write>(out: &mut W, records: &[FrameRecord], json: bool) -> Result<()> {
    if json {
        for record in records {
            serde_json::to_writer(&mut *out, record)?;
            writeln!(out)?;
        }
        return Ok(());
    }

    let with_side = records.iter().any(|r| r.side.is_some());
    if with_side {
        write!(out, "{:>5} {:>7} {:<8} ", "frame", "t_ms", "side")?;
    } else {
        write!(out, "{:>5} {:>7} ", "frame", "t_ms")?;
    }
    writeln!(
        out,
        "{:<10} {:>8} {:>8} {:>6} {:>8}  notes",
        "state", "alpha", "scale", "disp", "pull"
    )?;

    for record in records {
        write!(out, "{:>5} {:>7} ", record.frame, record.now_ms)?;
        if with_side {
            write!(out, "{:<8} ", side_name(record.side))?;
        }
        let s = &record.snapshot;
        write!(
            out,
            "{:<10} {:>8.5} {:>8.4} {:>6.3} {:>8.4}",
            s.state.as_str(),
            s.alpha,
            s.scale_y,
            s.displacement,
            s.pull_distance
        )?;
        let notes = notes(record);
        if notes.is_empty() {
            writeln!(out)?;
        } else {
            writeln!(out, "  {notes}")?;
        }
    }
    Ok(())
}

fn side_name(side: Option<EdgeSide>) -> &'static str {
    match side {
        Some(EdgeSide::Leading) => "leading",
        Some(EdgeSide::Trailing) => "trailing",
        None => "-",
    }
}

fn notes(record: &FrameRecord) -> String {
    let events = record.events.iter().map(|e| match e {
        EdgeEvent::Haptic => "haptic".to_string(),
        EdgeEvent::Invalidate => "invalidate".to_string(),
    });
    record
        .applied
        .iter()
        .cloned()
        .chain(events)
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Transition table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseRow {
    pub state: EdgeState,
    pub duration_ms: u64,
    pub alpha_start: &'static str,
    pub alpha_finish: &'static str,
    pub scale_start: &'static str,
    pub scale_finish: &'static str,
    pub next: EdgeState,
}

/// The transition table as seen through `config`.
#[must_use]
pub fn phase_rows(config: &EdgeEffectConfig) -> Vec<PhaseRow> {
    TABLE
        .iter()
        .map(|p| PhaseRow {
            state: p.state,
            duration_ms: p.duration.millis(config),
            alpha_start: p.alpha_start.as_str(),
            alpha_finish: p.alpha_finish.as_str(),
            scale_start: p.scale_start.as_str(),
            scale_finish: p.scale_finish.as_str(),
            next: phase::successor(p.state, config),
        })
        .collect()
}

pub fn write_phase_table<W: Write>(
    out: &mut W,
    config: &EdgeEffectConfig,
    json: bool,
) -> Result<()> {
    let rows = phase_rows(config);
    if json {
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "theme={} max_alpha={} max_scale={}",
        config.theme.as_str(),
        config.max_alpha(),
        config.max_scale
    )?;
    writeln!(
        out,
        "{:<10} {:>8}  {:<19} {:<19} {:<10}",
        "state", "ms", "alpha", "scale", "next"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:<10} {:>8}  {:<19} {:<19} {:<10}",
            row.state.as_str(),
            row.duration_ms,
            format!("{}->{}", row.alpha_start, row.alpha_finish),
            format!("{}->{}", row.scale_start, row.scale_finish),
            row.next.as_str()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use edgeglow_core::{EdgeEffectConfig, EdgeEvent, EdgeSide, EdgeState, GlowSnapshot};

    use super::{FrameRecord, phase_rows, write_frames, write_phase_table};

    fn record(side: Option<EdgeSide>) -> FrameRecord {
        FrameRecord {
            frame: 3,
            now_ms: 48,
            side,
            snapshot: GlowSnapshot {
                state: EdgeState::Absorb,
                alpha: 0.025,
                scale_y: 0.5,
                displacement: 0.5,
                pull_distance: 0.0,
            },
            applied: vec!["absorb:5000".to_string()],
            events: vec![EdgeEvent::Haptic],
        }
    }

    #[test]
    fn json_lines_flatten_the_snapshot() {
        let mut out = Vec::new();
        write_frames(&mut out, &[record(None)], true).unwrap();
        let text = String::from_utf8(out).unwrap();
        let value: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(value["state"], "absorb");
        assert_eq!(value["now_ms"], 48);
        assert_eq!(value["events"][0], "haptic");
        assert!(value.get("side").is_none());
    }

    #[test]
    fn table_has_side_column_only_for_pairs() {
        let mut single = Vec::new();
        write_frames(&mut single, &[record(None)], false).unwrap();
        let single = String::from_utf8(single).unwrap();
        assert!(!single.contains("side"));
        assert!(single.contains("absorb:5000 haptic"));

        let mut pair = Vec::new();
        write_frames(&mut pair, &[record(Some(EdgeSide::Trailing))], false).unwrap();
        let pair = String::from_utf8(pair).unwrap();
        assert!(pair.contains("side"));
        assert!(pair.contains("trailing"));
    }

    #[test]
    fn phase_rows_follow_config() {
        let config = EdgeEffectConfig::default().with_pull_decay(true);
        let rows = phase_rows(&config);
        assert_eq!(rows.len(), 7);
        let pull = rows.iter().find(|r| r.state == EdgeState::Pull).unwrap();
        assert_eq!(pull.duration_ms, 167);
        assert_eq!(pull.next, EdgeState::PullDecay);
        assert_eq!(pull.scale_finish, "pull_scale");
    }

    #[test]
    fn phase_table_text_lists_every_state() {
        let mut out = Vec::new();
        write_phase_table(&mut out, &EdgeEffectConfig::default(), false).unwrap();
        let text = String::from_utf8(out).unwrap();
        for state in EdgeState::ALL {
            assert!(text.contains(state.as_str()), "{state} missing");
        }
        assert!(text.starts_with("theme=light"));
    }
}
