#![forbid(unsafe_code)]

//! Leading/trailing glow pair for one scroll axis.
//!
//! A scroll container owns one glow per end of its axis. [`EdgePair`]
//! routes signed overscroll and fling input to the right edge and keeps the
//! two consistent: pulling one edge releases the other.

use crate::config::EdgeEffectConfig;
use crate::edge_effect::{EdgeEffect, EdgeEvent};

/// Which end of the axis an edge sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EdgeSide {
    /// Top or left.
    Leading,
    /// Bottom or right.
    Trailing,
}

#[derive(Debug, Clone, Default)]
pub struct EdgePair {
    leading: EdgeEffect,
    trailing: EdgeEffect,
}

impl EdgePair {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EdgeEffectConfig) -> Self {
        Self {
            leading: EdgeEffect::with_config(config),
            trailing: EdgeEffect::with_config(config),
        }
    }

    #[must_use]
    pub fn edge(&self, side: EdgeSide) -> &EdgeEffect {
        match side {
            EdgeSide::Leading => &self.leading,
            EdgeSide::Trailing => &self.trailing,
        }
    }

    pub fn edge_mut(&mut self, side: EdgeSide) -> &mut EdgeEffect {
        match side {
            EdgeSide::Leading => &mut self.leading,
            EdgeSide::Trailing => &mut self.trailing,
        }
    }

    /// Route an overscroll of `delta` (positive past the leading edge,
    /// negative past the trailing edge) with the pointer at `displacement`
    /// across the axis.
    ///
    /// The trailing glow is drawn mirrored, so its displacement is flipped.
    pub fn on_overscroll(&mut self, delta: f32, displacement: f32, now_ms: u64) {
        if delta > 0.0 {
            self.leading.on_pull(delta, displacement, now_ms);
            if !self.trailing.is_finished() {
                self.trailing.on_release(now_ms);
            }
        } else if delta < 0.0 {
            self.trailing.on_pull(-delta, 1.0 - displacement, now_ms);
            if !self.leading.is_finished() {
                self.leading.on_release(now_ms);
            }
        }
    }

    /// A fling reached an end of the axis. Negative velocity hits the
    /// leading edge.
    pub fn on_fling_edge(&mut self, velocity: i32, now_ms: u64) -> bool {
        if velocity < 0 {
            self.leading.on_absorb(velocity, now_ms)
        } else {
            self.trailing.on_absorb(velocity, now_ms)
        }
    }

    /// The drag ended.
    pub fn release(&mut self, now_ms: u64) {
        self.leading.on_release(now_ms);
        self.trailing.on_release(now_ms);
    }

    /// Advance both edges. Returns `true` while either needs frames.
    pub fn advance(&mut self, now_ms: u64) -> bool {
        let leading = self.leading.advance(now_ms);
        let trailing = self.trailing.advance(now_ms);
        leading || trailing
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.leading.is_finished() && self.trailing.is_finished()
    }

    /// Drain host events from both edges, leading first.
    pub fn take_events(&mut self) -> Vec<(EdgeSide, EdgeEvent)> {
        let mut events: Vec<_> = self
            .leading
            .take_events()
            .into_iter()
            .map(|e| (EdgeSide::Leading, e))
            .collect();
        events.extend(
            self.trailing
                .take_events()
                .into_iter()
                .map(|e| (EdgeSide::Trailing, e)),
        );
        events
    }
}
