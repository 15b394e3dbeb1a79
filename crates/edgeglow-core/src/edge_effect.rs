#![forbid(unsafe_code)]

//! Overscroll edge glow state machine.
//!
//! An [`EdgeEffect`] lives for as long as the scrollable edge it decorates.
//! The host feeds it three stimuli and one clock:
//!
//! - [`EdgeEffect::on_pull`] while the user drags past the edge,
//! - [`EdgeEffect::on_release`] when the drag ends,
//! - [`EdgeEffect::on_absorb`] when a fling reaches the edge,
//! - [`EdgeEffect::advance`] once per frame, with the frame time.
//!
//! `advance` returns whether another frame is needed; the host keeps
//! requesting frames only while it returns `true`. Side effects the host
//! must perform (haptics, redraw requests) are queued as [`EdgeEvent`]s and
//! drained with [`EdgeEffect::take_events`].
//!
//! # Example
//!
//! ```
//! use edgeglow_core::edge_effect::{EdgeEffect, EdgeEvent};
//! use edgeglow_core::state::EdgeState;
//!
//! let mut glow = EdgeEffect::new();
//! glow.on_absorb(5_000, 0);
//! assert_eq!(glow.state(), EdgeState::Absorb);
//! assert_eq!(glow.take_events(), vec![EdgeEvent::Haptic, EdgeEvent::Invalidate]);
//!
//! let mut now = 0;
//! while glow.advance(now) {
//!     now += 16;
//! }
//! assert_eq!(glow.glow_alpha(), 0.0);
//! ```
//!
//! # Invariants
//!
//! 1. In [`EdgeState::Idle`] alpha and scale are exactly 0.0 and `advance`
//!    returns `false`.
//! 2. The elapsed fraction `t` is clamped to [0.0, 1.0]; a zero duration
//!    counts as already elapsed.
//! 3. Time-based transitions happen only inside `advance`; stimuli only
//!    enter their own initial state.
//! 4. A forced release fires at most once per absorb and never after a real
//!    release or a newer absorb.
//!
//! # Failure Modes
//!
//! None are surfaced. Non-finite inputs are treated as zero (deltas) or
//! centered (displacement), and calls that make no sense in the current
//! state are ignored.

use crate::config::{EdgeEffectConfig, GlowTheme};
use crate::curve::{Decelerate, Interpolator, lerp};
use crate::phase::{self, Endpoint};
use crate::state::EdgeState;
use crate::watchdog::ReleaseWatchdog;

/// Fraction of a phase treated as "done".
const EPSILON: f32 = 0.001;

/// Pull distance (as a fraction of the host extent) that maps to full scale.
const PULL_DISTANCE_SCALE_FACTOR: f32 = 7.0;

/// Side effect requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EdgeEvent {
    /// Perform a light haptic tick.
    Haptic,
    /// Schedule a redraw.
    Invalidate,
}

/// Read-only view of what should be drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlowSnapshot {
    pub state: EdgeState,
    pub alpha: f32,
    pub scale_y: f32,
    pub displacement: f32,
    pub pull_distance: f32,
}

/// Pull / release / absorb animator for one scroll edge.
#[derive(Debug, Clone)]
pub struct EdgeEffect {
    config: EdgeEffectConfig,
    curve: Decelerate,
    state: EdgeState,
    glow_alpha: f32,
    glow_scale_y: f32,
    glow_alpha_start: f32,
    glow_alpha_finish: f32,
    glow_scale_y_start: f32,
    glow_scale_y_finish: f32,
    start_time_ms: u64,
    duration_ms: u64,
    pull_distance: f32,
    displacement: f32,
    target_displacement: f32,
    on_release_called: bool,
    absorb_velocity: Option<u32>,
    watchdog: ReleaseWatchdog,
    events: Vec<EdgeEvent>,
}

impl Default for EdgeEffect {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Construction and accessors
// ---------------------------------------------------------------------------

impl EdgeEffect {
    /// Create an idle glow with the default config.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EdgeEffectConfig::default())
    }

    /// Create an idle glow with `config` (validated first).
    #[must_use]
    pub fn with_config(config: EdgeEffectConfig) -> Self {
        let config = config.validated();
        Self {
            curve: Decelerate::new(config.decelerate_factor),
            config,
            state: EdgeState::Idle,
            glow_alpha: 0.0,
            glow_scale_y: 0.0,
            glow_alpha_start: 0.0,
            glow_alpha_finish: 0.0,
            glow_scale_y_start: 0.0,
            glow_scale_y_finish: 0.0,
            start_time_ms: 0,
            duration_ms: 0,
            pull_distance: 0.0,
            displacement: 0.5,
            target_displacement: 0.5,
            on_release_called: false,
            absorb_velocity: None,
            watchdog: ReleaseWatchdog::new(),
            events: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &EdgeEffectConfig {
        &self.config
    }

    /// Switch theme. Takes effect on the next phase that targets max alpha.
    pub fn set_theme(&mut self, theme: GlowTheme) {
        self.config.theme = theme;
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> EdgeState {
        self.state
    }

    /// `true` when no glow is active.
    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == EdgeState::Idle
    }

    #[inline]
    #[must_use]
    pub fn glow_alpha(&self) -> f32 {
        self.glow_alpha
    }

    #[inline]
    #[must_use]
    pub fn glow_scale_y(&self) -> f32 {
        self.glow_scale_y
    }

    #[inline]
    #[must_use]
    pub fn glow_alpha_start(&self) -> f32 {
        self.glow_alpha_start
    }

    #[inline]
    #[must_use]
    pub fn glow_alpha_finish(&self) -> f32 {
        self.glow_alpha_finish
    }

    #[inline]
    #[must_use]
    pub fn glow_scale_y_start(&self) -> f32 {
        self.glow_scale_y_start
    }

    #[inline]
    #[must_use]
    pub fn glow_scale_y_finish(&self) -> f32 {
        self.glow_scale_y_finish
    }

    #[inline]
    #[must_use]
    pub fn start_time_ms(&self) -> u64 {
        self.start_time_ms
    }

    #[inline]
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    #[inline]
    #[must_use]
    pub fn pull_distance(&self) -> f32 {
        self.pull_distance
    }

    #[inline]
    #[must_use]
    pub fn displacement(&self) -> f32 {
        self.displacement
    }

    #[inline]
    #[must_use]
    pub fn target_displacement(&self) -> f32 {
        self.target_displacement
    }

    #[inline]
    #[must_use]
    pub fn on_release_called(&self) -> bool {
        self.on_release_called
    }

    /// Clamped velocity of the most recent accepted absorb.
    #[inline]
    #[must_use]
    pub fn absorb_velocity(&self) -> Option<u32> {
        self.absorb_velocity
    }

    /// Deadline of the pending forced release, if any.
    #[inline]
    #[must_use]
    pub fn forced_release_deadline(&self) -> Option<u64> {
        self.watchdog.deadline_ms()
    }

    #[must_use]
    pub fn snapshot(&self) -> GlowSnapshot {
        GlowSnapshot {
            state: self.state,
            alpha: self.glow_alpha,
            scale_y: self.glow_scale_y,
            displacement: self.displacement,
            pull_distance: self.pull_distance,
        }
    }

    /// Drain queued host side effects, oldest first.
    pub fn take_events(&mut self) -> Vec<EdgeEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether any host side effects are queued.
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Stimuli
// ---------------------------------------------------------------------------

impl EdgeEffect {
    /// The user dragged `delta_distance` (a fraction of the host extent)
    /// past the edge, with the pointer at `displacement` along it.
    pub fn on_pull(&mut self, delta_distance: f32, displacement: f32, now_ms: u64) {
        if self.state == EdgeState::PullDecay
            && now_ms.saturating_sub(self.start_time_ms) < self.duration_ms
        {
            return;
        }

        self.target_displacement = if displacement.is_finite() {
            displacement.clamp(0.0, 1.0)
        } else {
            0.5
        };

        let delta = if delta_distance.is_finite() {
            delta_distance
        } else {
            0.0
        };
        let was_zero = self.pull_distance == 0.0;
        self.pull_distance += delta;

        if self.blocks_pull() || !(was_zero || self.on_release_called) {
            return;
        }

        self.on_release_called = false;
        self.watchdog.cancel();
        self.enter(EdgeState::Pull, now_ms, "pull");
        self.events.push(EdgeEvent::Haptic);
        self.events.push(EdgeEvent::Invalidate);
    }

    /// The drag that was pulling the edge ended.
    pub fn on_release(&mut self, now_ms: u64) {
        self.pull_distance = 0.0;
        self.on_release_called = true;
        self.watchdog.cancel();

        if !self.state.is_pulling() {
            return;
        }

        let (alpha, scale) = self.sample(now_ms);
        self.glow_alpha = alpha;
        self.glow_scale_y = scale;
        self.enter(EdgeState::Recede, now_ms, "release");
        self.events.push(EdgeEvent::Invalidate);
    }

    /// A fling hit the edge at `velocity` pixels per second.
    ///
    /// Returns `true` if the absorb was accepted. Ignored while another
    /// animation is running.
    pub fn on_absorb(&mut self, velocity: i32, now_ms: u64) -> bool {
        let velocity = self.config.clamp_velocity(velocity);
        if self.state.is_running() {
            return false;
        }

        self.absorb_velocity = Some(velocity);
        self.on_release_called = false;
        self.enter(EdgeState::Absorb, now_ms, "absorb");
        self.watchdog.schedule(now_ms, self.config.forced_release_ms);
        self.events.push(EdgeEvent::Haptic);
        self.events.push(EdgeEvent::Invalidate);
        true
    }

    /// Stop immediately and clear all glow.
    pub fn finish(&mut self) {
        self.watchdog.cancel();
        self.pull_distance = 0.0;
        let now = self.start_time_ms;
        self.enter(EdgeState::Idle, now, "finish");
    }
}

// ---------------------------------------------------------------------------
// Frame step
// ---------------------------------------------------------------------------

impl EdgeEffect {
    /// Advance the animation to `now_ms`.
    ///
    /// Returns `true` while further frames are needed.
    pub fn advance(&mut self, now_ms: u64) -> bool {
        if self.watchdog.poll(now_ms).is_some() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                message = "edge.forced_release",
                state = self.state.as_str(),
                now_ms
            );
            self.on_release(now_ms);
        }

        if self.state == EdgeState::Idle {
            self.glow_alpha = 0.0;
            self.glow_scale_y = 0.0;
            return false;
        }

        if self.state == EdgeState::Pull {
            self.glow_scale_y_finish = self.pull_scale();
        }

        let t = self.progress(now_ms);
        let interp = self.curve.interpolate(t);
        self.glow_alpha = lerp(self.glow_alpha_start, self.glow_alpha_finish, interp);
        self.glow_scale_y = lerp(self.glow_scale_y_start, self.glow_scale_y_finish, interp);
        self.displacement = (self.displacement + self.target_displacement) / 2.0;

        if t >= 1.0 - EPSILON {
            let next = phase::successor(self.state, &self.config);
            self.enter(next, now_ms, "elapsed");
        }

        self.state != EdgeState::Idle
    }

    /// Elapsed fraction of the current phase at `now_ms`, in [0.0, 1.0].
    #[must_use]
    pub fn progress(&self, now_ms: u64) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.start_time_ms);
        (elapsed as f64 / self.duration_ms as f64).clamp(0.0, 1.0) as f32
    }

    /// Interpolated (alpha, scale) at `now_ms` without mutating anything.
    #[must_use]
    pub fn sample(&self, now_ms: u64) -> (f32, f32) {
        if self.state == EdgeState::Idle {
            return (0.0, 0.0);
        }
        let interp = self.curve.interpolate(self.progress(now_ms));
        (
            lerp(self.glow_alpha_start, self.glow_alpha_finish, interp),
            lerp(self.glow_scale_y_start, self.glow_scale_y_finish, interp),
        )
    }

    fn blocks_pull(&self) -> bool {
        match self.state {
            EdgeState::Absorb | EdgeState::Appear | EdgeState::Keep => true,
            EdgeState::Recede => !self.on_release_called,
            EdgeState::Idle | EdgeState::Pull | EdgeState::PullDecay => false,
        }
    }

    fn pull_scale(&self) -> f32 {
        (self.pull_distance.abs() * PULL_DISTANCE_SCALE_FACTOR).min(1.0) * self.config.max_scale
    }

    fn resolve(&self, endpoint: Endpoint, current: f32, max: f32) -> f32 {
        match endpoint {
            Endpoint::Zero => 0.0,
            Endpoint::Current => current,
            Endpoint::Max => max,
            Endpoint::PullScale => self.pull_scale(),
        }
    }

    /// Enter `next` at `now_ms`, resolving its endpoints from the table.
    fn enter(&mut self, next: EdgeState, now_ms: u64, reason: &'static str) {
        #[cfg(feature = "tracing")]
        let from = self.state;
        #[cfg(not(feature = "tracing"))]
        let _ = reason;

        let row = phase::phase(next);
        let max_alpha = self.config.max_alpha();
        let max_scale = self.config.max_scale;

        self.glow_alpha_start = self.resolve(row.alpha_start, self.glow_alpha, max_alpha);
        self.glow_alpha_finish = self.resolve(row.alpha_finish, self.glow_alpha, max_alpha);
        self.glow_scale_y_start = self.resolve(row.scale_start, self.glow_scale_y, max_scale);
        self.glow_scale_y_finish = self.resolve(row.scale_finish, self.glow_scale_y, max_scale);
        self.glow_alpha = self.glow_alpha_start;
        self.glow_scale_y = self.glow_scale_y_start;

        self.state = next;
        self.start_time_ms = now_ms;
        self.duration_ms = row.duration.millis(&self.config);

        #[cfg(feature = "tracing")]
        self.trace_transition(from, reason);
    }

    #[cfg(feature = "tracing")]
    fn trace_transition(&self, from: EdgeState, reason: &'static str) {
        let _span = tracing::debug_span!(
            "edge.transition",
            from = from.as_str(),
            to = self.state.as_str(),
            reason,
            alpha = f64::from(self.glow_alpha),
            scale = f64::from(self.glow_scale_y),
            duration_ms = self.duration_ms
        )
        .entered();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
