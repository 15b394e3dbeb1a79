#![forbid(unsafe_code)]

//! Edge glow tuning.
//!
//! [`EdgeEffectConfig`] holds the theme-dependent glow strength, the
//! per-phase durations, and the absorb velocity window. Values can be set
//! with builder methods, loaded from environment variables, or (with the
//! `serde` feature) deserialized. [`EdgeEffectConfig::validated`] clamps
//! everything into a safe range; invalid environment values are ignored.

use std::time::Duration;

/// Maximum glow alpha on light backgrounds.
pub const LIGHT_MAX_ALPHA: f32 = 0.05;
/// Maximum glow alpha on dark backgrounds.
pub const DARK_MAX_ALPHA: f32 = 0.08;

const DEFAULT_PULL_MS: u64 = 167;
const DEFAULT_APPEAR_MS: u64 = 150;
const DEFAULT_KEEP_MS: u64 = 0;
const DEFAULT_ABSORB_MS: u64 = 250;
const DEFAULT_RECEDE_MS: u64 = 450;
const DEFAULT_PULL_DECAY_MS: u64 = 2000;
const DEFAULT_FORCED_RELEASE_MS: u64 = 700;
const DEFAULT_MIN_VELOCITY: u32 = 100;
const DEFAULT_MAX_VELOCITY: u32 = 10_000;

const MAX_PHASE_MS: u64 = 10_000;
const MAX_SCALE_LIMIT: f32 = 4.0;

/// Background the glow is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GlowTheme {
    #[default]
    Light,
    Dark,
}

impl GlowTheme {
    /// Peak alpha the glow reaches on this theme.
    #[inline]
    #[must_use]
    pub const fn max_alpha(self) -> f32 {
        match self {
            Self::Light => LIGHT_MAX_ALPHA,
            Self::Dark => DARK_MAX_ALPHA,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" | "day" => Some(Self::Light),
            "dark" | "night" => Some(Self::Dark),
            _ => None,
        }
    }
}

/// Tuning for one [`EdgeEffect`](crate::edge_effect::EdgeEffect).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EdgeEffectConfig {
    pub theme: GlowTheme,
    /// Multiplier applied to the full-strength glow scale.
    pub max_scale: f32,
    pub pull_ms: u64,
    pub appear_ms: u64,
    pub keep_ms: u64,
    pub absorb_ms: u64,
    pub recede_ms: u64,
    pub pull_decay_ms: u64,
    /// Delay before an absorb forces its own release.
    pub forced_release_ms: u64,
    pub min_velocity: u32,
    pub max_velocity: u32,
    /// Route `Pull` into `PullDecay` instead of `Appear`.
    pub pull_decay: bool,
    pub decelerate_factor: f32,
}

impl Default for EdgeEffectConfig {
    fn default() -> Self {
        Self {
            theme: GlowTheme::Light,
            max_scale: 1.0,
            pull_ms: DEFAULT_PULL_MS,
            appear_ms: DEFAULT_APPEAR_MS,
            keep_ms: DEFAULT_KEEP_MS,
            absorb_ms: DEFAULT_ABSORB_MS,
            recede_ms: DEFAULT_RECEDE_MS,
            pull_decay_ms: DEFAULT_PULL_DECAY_MS,
            forced_release_ms: DEFAULT_FORCED_RELEASE_MS,
            min_velocity: DEFAULT_MIN_VELOCITY,
            max_velocity: DEFAULT_MAX_VELOCITY,
            pull_decay: false,
            decelerate_factor: 1.0,
        }
    }
}

impl EdgeEffectConfig {
    #[must_use]
    pub fn with_theme(mut self, theme: GlowTheme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn with_max_scale(mut self, max_scale: f32) -> Self {
        self.max_scale = max_scale;
        self
    }

    #[must_use]
    pub fn with_recede(mut self, recede: Duration) -> Self {
        self.recede_ms = u64::try_from(recede.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_forced_release(mut self, delay: Duration) -> Self {
        self.forced_release_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Enable the dormant `PullDecay` phase after `Pull`.
    #[must_use]
    pub fn with_pull_decay(mut self, enabled: bool) -> Self {
        self.pull_decay = enabled;
        self
    }

    #[must_use]
    pub fn with_velocity_window(mut self, min: u32, max: u32) -> Self {
        self.min_velocity = min;
        self.max_velocity = max;
        self
    }

    /// Peak alpha for the configured theme.
    #[inline]
    #[must_use]
    pub fn max_alpha(&self) -> f32 {
        self.theme.max_alpha()
    }

    /// Clamp an absorb velocity magnitude into the configured window.
    #[inline]
    #[must_use]
    pub fn clamp_velocity(&self, velocity: i32) -> u32 {
        velocity
            .unsigned_abs()
            .clamp(self.min_velocity, self.max_velocity)
    }

    /// Load config from environment variables.
    ///
    /// Reads:
    /// - `EDGEGLOW_THEME`: "light" or "dark"
    /// - `EDGEGLOW_MAX_SCALE`: glow scale multiplier
    /// - `EDGEGLOW_PULL_DECAY`: "1" or "true" to enable the pull-decay phase
    /// - `EDGEGLOW_RECEDE_MS`: fade-out duration in milliseconds
    /// - `EDGEGLOW_FORCED_RELEASE_MS`: absorb release watchdog delay
    ///
    /// Values are automatically clamped to valid ranges.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load config using a custom environment lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = get_env("EDGEGLOW_THEME")
            && let Some(theme) = GlowTheme::from_str_opt(&val)
        {
            config.theme = theme;
        }

        if let Some(val) = get_env("EDGEGLOW_MAX_SCALE")
            && let Ok(scale) = val.trim().parse::<f32>()
        {
            config.max_scale = scale;
        }

        if let Some(val) = get_env("EDGEGLOW_PULL_DECAY") {
            let val = val.trim();
            config.pull_decay = val == "1" || val.eq_ignore_ascii_case("true");
        }

        if let Some(val) = get_env("EDGEGLOW_RECEDE_MS")
            && let Ok(ms) = val.trim().parse::<u64>()
        {
            config.recede_ms = ms;
        }

        if let Some(val) = get_env("EDGEGLOW_FORCED_RELEASE_MS")
            && let Ok(ms) = val.trim().parse::<u64>()
        {
            config.forced_release_ms = ms;
        }

        config.validated()
    }

    /// Validate and clamp values to safe ranges.
    ///
    /// - `max_scale` to (0, 4]; non-finite values fall back to 1.0
    /// - phase durations to at most 10s
    /// - `min_velocity` to at least 1, `max_velocity` to at least `min_velocity`
    /// - `decelerate_factor` to a positive finite value
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.max_scale = if self.max_scale.is_finite() && self.max_scale > 0.0 {
            self.max_scale.min(MAX_SCALE_LIMIT)
        } else {
            1.0
        };

        for ms in [
            &mut self.pull_ms,
            &mut self.appear_ms,
            &mut self.keep_ms,
            &mut self.absorb_ms,
            &mut self.recede_ms,
            &mut self.pull_decay_ms,
            &mut self.forced_release_ms,
        ] {
            *ms = (*ms).min(MAX_PHASE_MS);
        }

        self.min_velocity = self.min_velocity.max(1);
        self.max_velocity = self.max_velocity.max(self.min_velocity);

        if !(self.decelerate_factor.is_finite() && self.decelerate_factor > 0.0) {
            self.decelerate_factor = 1.0;
        }

        self
    }
}
