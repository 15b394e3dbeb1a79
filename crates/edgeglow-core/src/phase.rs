#![forbid(unsafe_code)]

//! Data-driven transition table.
//!
//! Each [`EdgeState`] maps to a [`Phase`]: how long it lasts, where alpha
//! and scale head, and which state follows once its time runs out. The
//! state machine never branches on individual states to decide these
//! values; it looks them up here.

use crate::config::EdgeEffectConfig;
use crate::state::EdgeState;

/// Where a channel (alpha or scale) starts or finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Zero,
    /// The value currently displayed.
    Current,
    /// Theme max alpha, or `max_scale` for the scale channel.
    Max,
    /// Scale derived from the accumulated pull distance.
    PullScale,
}

impl Endpoint {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Current => "current",
            Self::Max => "max",
            Self::PullScale => "pull_scale",
        }
    }
}

/// Which configured duration a phase uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationSlot {
    None,
    Pull,
    Appear,
    Keep,
    Absorb,
    Recede,
    PullDecay,
}

impl DurationSlot {
    #[must_use]
    pub fn millis(self, config: &EdgeEffectConfig) -> u64 {
        match self {
            Self::None => 0,
            Self::Pull => config.pull_ms,
            Self::Appear => config.appear_ms,
            Self::Keep => config.keep_ms,
            Self::Absorb => config.absorb_ms,
            Self::Recede => config.recede_ms,
            Self::PullDecay => config.pull_decay_ms,
        }
    }
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub state: EdgeState,
    pub duration: DurationSlot,
    pub alpha_start: Endpoint,
    pub alpha_finish: Endpoint,
    pub scale_start: Endpoint,
    pub scale_finish: Endpoint,
    pub next: EdgeState,
}

const fn row(
    state: EdgeState,
    duration: DurationSlot,
    start: Endpoint,
    alpha_finish: Endpoint,
    scale_finish: Endpoint,
    next: EdgeState,
) -> Phase {
    Phase {
        state,
        duration,
        alpha_start: start,
        alpha_finish,
        scale_start: start,
        scale_finish,
        next,
    }
}

/// Indexed by [`EdgeState`] declaration order.
pub const TABLE: [Phase; 7] = [
    row(
        EdgeState::Idle,
        DurationSlot::None,
        Endpoint::Zero,
        Endpoint::Zero,
        Endpoint::Zero,
        EdgeState::Idle,
    ),
    row(
        EdgeState::Pull,
        DurationSlot::Pull,
        Endpoint::Current,
        Endpoint::Max,
        Endpoint::PullScale,
        EdgeState::Appear,
    ),
    row(
        EdgeState::Absorb,
        DurationSlot::Absorb,
        Endpoint::Zero,
        Endpoint::Max,
        Endpoint::Max,
        EdgeState::Keep,
    ),
    row(
        EdgeState::Recede,
        DurationSlot::Recede,
        Endpoint::Current,
        Endpoint::Zero,
        Endpoint::Zero,
        EdgeState::Idle,
    ),
    row(
        EdgeState::PullDecay,
        DurationSlot::PullDecay,
        Endpoint::Current,
        Endpoint::Zero,
        Endpoint::Zero,
        EdgeState::Recede,
    ),
    row(
        EdgeState::Appear,
        DurationSlot::Appear,
        Endpoint::Current,
        Endpoint::Max,
        Endpoint::Max,
        EdgeState::Keep,
    ),
    row(
        EdgeState::Keep,
        DurationSlot::Keep,
        Endpoint::Current,
        Endpoint::Max,
        Endpoint::Max,
        EdgeState::Recede,
    ),
];

/// Look up the phase for `state`.
#[inline]
#[must_use]
pub fn phase(state: EdgeState) -> &'static Phase {
    &TABLE[state as usize]
}

/// Successor of `state` once its time budget is exhausted.
///
/// `Pull` hands over to `PullDecay` instead of `Appear` when the config
/// enables pull decay.
#[inline]
#[must_use]
pub fn successor(state: EdgeState, config: &EdgeEffectConfig) -> EdgeState {
    if state == EdgeState::Pull && config.pull_decay {
        EdgeState::PullDecay
    } else {
        phase(state).next
    }
}
