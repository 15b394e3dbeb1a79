#![forbid(unsafe_code)]

//! Interpolation curves.
//!
//! Every curve maps a normalized time `t` in [0.0, 1.0] to an output
//! fraction. Inputs outside that range are clamped before evaluation, so
//! callers can feed raw `elapsed / duration` ratios.
//!
//! | Curve | Shape |
//! |-------|-------|
//! | [`Linear`] | identity |
//! | [`Decelerate`] | fast start, slow finish (the glow curve) |
//! | [`CubicBezier`] | path interpolator through `(x1, y1)` and `(x2, y2)` |
//! | [`ElasticOut`] | overshooting spring-like settle |
//!
//! # Invariants
//!
//! 1. `interpolate(0.0) == 0.0` and `interpolate(1.0) == 1.0` for every curve.
//! 2. [`Linear`], [`Decelerate`], and the sine presets are monotonic.
//! 3. [`ElasticOut`] may overshoot 1.0 in the interior of the range.

use std::f32::consts::TAU;

/// Function-pointer easing, compatible with plain `fn(f32) -> f32` curves.
pub type EasingFn = fn(f32) -> f32;

/// A time-to-progress mapping.
pub trait Interpolator {
    /// Map `t` (clamped to [0.0, 1.0]) to an output fraction.
    fn interpolate(&self, t: f32) -> f32;
}

impl Interpolator for EasingFn {
    #[inline]
    fn interpolate(&self, t: f32) -> f32 {
        (self)(t.clamp(0.0, 1.0))
    }
}

// ---------------------------------------------------------------------------
// Linear
// ---------------------------------------------------------------------------

/// Identity curve.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Linear;

impl Interpolator for Linear {
    #[inline]
    fn interpolate(&self, t: f32) -> f32 {
        t.clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Decelerate
// ---------------------------------------------------------------------------

/// Decelerating curve: `1 - (1 - t)^(2 * factor)`.
///
/// A factor of 1.0 gives the classic quadratic ease-out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decelerate {
    factor: f32,
}

impl Decelerate {
    /// Create a decelerate curve. Non-positive or non-finite factors fall
    /// back to 1.0.
    #[must_use]
    pub fn new(factor: f32) -> Self {
        let factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            1.0
        };
        Self { factor }
    }

    #[inline]
    #[must_use]
    pub fn factor(&self) -> f32 {
        self.factor
    }
}

impl Default for Decelerate {
    fn default() -> Self {
        Self { factor: 1.0 }
    }
}

impl Interpolator for Decelerate {
    #[inline]
    fn interpolate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let inv = 1.0 - t;
        if (self.factor - 1.0).abs() < f32::EPSILON {
            1.0 - inv * inv
        } else {
            1.0 - inv.powf(2.0 * self.factor)
        }
    }
}

// ---------------------------------------------------------------------------
// Cubic bezier
// ---------------------------------------------------------------------------

const BEZIER_NEWTON_ITERATIONS: usize = 8;
const BEZIER_BISECT_ITERATIONS: usize = 32;
const BEZIER_TOLERANCE: f32 = 1e-5;

/// Cubic bezier path interpolator anchored at (0, 0) and (1, 1).
///
/// `x1` and `x2` are clamped to [0.0, 1.0] so the curve is a function of `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
}

impl CubicBezier {
    #[must_use]
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    #[inline]
    fn component(s: f32, p1: f32, p2: f32) -> f32 {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
    }

    #[inline]
    fn derivative(s: f32, p1: f32, p2: f32) -> f32 {
        let inv = 1.0 - s;
        3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
    }

    /// Find the curve parameter whose x coordinate equals `x`.
    fn solve_parameter(&self, x: f32) -> f32 {
        let mut s = x;
        for _ in 0..BEZIER_NEWTON_ITERATIONS {
            let err = Self::component(s, self.x1, self.x2) - x;
            if err.abs() < BEZIER_TOLERANCE {
                return s;
            }
            let slope = Self::derivative(s, self.x1, self.x2);
            if slope.abs() < 1e-6 {
                break;
            }
            s = (s - err / slope).clamp(0.0, 1.0);
        }

        // Newton stalled on a flat segment; bisect instead.
        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        s = x;
        for _ in 0..BEZIER_BISECT_ITERATIONS {
            let value = Self::component(s, self.x1, self.x2);
            if (value - x).abs() < BEZIER_TOLERANCE {
                break;
            }
            if value < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) * 0.5;
        }
        s
    }
}

impl Interpolator for CubicBezier {
    fn interpolate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        let s = self.solve_parameter(t);
        Self::component(s, self.y1, self.y2)
    }
}

/// Symmetric-start sine curves. The suffix is the strength of the ease-out
/// tail: higher numbers settle more slowly.
pub mod sine {
    use super::CubicBezier;

    #[must_use]
    pub fn in_out_33() -> CubicBezier {
        CubicBezier::new(0.33, 0.0, 0.67, 1.0)
    }

    #[must_use]
    pub fn in_out_50() -> CubicBezier {
        CubicBezier::new(0.33, 0.0, 0.5, 1.0)
    }

    #[must_use]
    pub fn in_out_60() -> CubicBezier {
        CubicBezier::new(0.33, 0.0, 0.4, 1.0)
    }

    #[must_use]
    pub fn in_out_70() -> CubicBezier {
        CubicBezier::new(0.33, 0.0, 0.3, 1.0)
    }

    #[must_use]
    pub fn in_out_80() -> CubicBezier {
        CubicBezier::new(0.33, 0.0, 0.2, 1.0)
    }

    #[must_use]
    pub fn in_out_90() -> CubicBezier {
        CubicBezier::new(0.33, 0.0, 0.1, 1.0)
    }

    #[must_use]
    pub fn out_60() -> CubicBezier {
        CubicBezier::new(0.17, 0.17, 0.4, 1.0)
    }

    #[must_use]
    pub fn out_70() -> CubicBezier {
        CubicBezier::new(0.17, 0.17, 0.3, 1.0)
    }

    #[must_use]
    pub fn out_80() -> CubicBezier {
        CubicBezier::new(0.17, 0.17, 0.2, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Elastic
// ---------------------------------------------------------------------------

/// Elastic ease-out: `a * 2^(-10t) * sin((t - s) * 2π / p) + 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElasticOut {
    amplitude: f32,
    period: f32,
}

impl ElasticOut {
    /// Amplitudes below 1.0 are raised to 1.0; the period is floored at 0.01.
    #[must_use]
    pub fn new(amplitude: f32, period: f32) -> Self {
        Self {
            amplitude: if amplitude.is_finite() { amplitude.max(1.0) } else { 1.0 },
            period: if period.is_finite() { period.max(0.01) } else { 0.3 },
        }
    }

    #[inline]
    #[must_use]
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    #[inline]
    #[must_use]
    pub fn period(&self) -> f32 {
        self.period
    }
}

impl Default for ElasticOut {
    fn default() -> Self {
        Self::new(1.0, 0.3)
    }
}

impl Interpolator for ElasticOut {
    fn interpolate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        let a = self.amplitude;
        let p = self.period;
        let s = p / TAU * (1.0 / a).asin();
        a * 2f32.powf(-10.0 * t) * ((t - s) * TAU / p).sin() + 1.0
    }
}

/// Linear interpolation between `start` and `finish` by `fraction`.
#[inline]
#[must_use]
pub fn lerp(start: f32, finish: f32, fraction: f32) -> f32 {
    start + (finish - start) * fraction
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
