#![forbid(unsafe_code)]

//! Lifecycle states of an edge glow.

use std::fmt;

/// Current phase of the glow lifecycle.
///
/// ```text
/// Idle ──pull──▶ Pull ──▶ Appear ──▶ Keep ──▶ Recede ──▶ Idle
///                  │                   ▲          ▲
///                  └─release───────────┼──────────┤
/// Idle ──absorb──▶ Absorb ─────────────┘          │
///                  Pull ──(pull decay)──▶ PullDecay
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EdgeState {
    /// No glow visible.
    #[default]
    Idle,
    /// The user is dragging past the edge.
    Pull,
    /// A fling hit the edge.
    Absorb,
    /// The glow is fading out.
    Recede,
    /// The pull glow is slowly decaying while the finger stays down.
    PullDecay,
    /// The glow is growing in after a pull.
    Appear,
    /// The glow is held at full strength.
    Keep,
}

impl EdgeState {
    /// All states, in declaration order.
    pub const ALL: [EdgeState; 7] = [
        Self::Idle,
        Self::Pull,
        Self::Absorb,
        Self::Recede,
        Self::PullDecay,
        Self::Appear,
        Self::Keep,
    ];

    /// States that ignore new absorb stimuli while their animation plays.
    #[inline]
    #[must_use]
    pub fn is_running(self) -> bool {
        matches!(self, Self::Absorb | Self::Appear | Self::Keep | Self::Recede)
    }

    /// Whether anything should be drawn.
    #[inline]
    #[must_use]
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Whether a release stimulus fades this state out.
    #[inline]
    #[must_use]
    pub fn is_pulling(self) -> bool {
        matches!(self, Self::Pull | Self::PullDecay)
    }

    /// Stable lowercase name for logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pull => "pull",
            Self::Absorb => "absorb",
            Self::Recede => "recede",
            Self::PullDecay => "pull_decay",
            Self::Appear => "appear",
            Self::Keep => "keep",
        }
    }

    /// Parse a name produced by [`EdgeState::as_str`].
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for EdgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
