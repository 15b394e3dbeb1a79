//! Property-based invariant tests for the edge glow state machine.
//!
//! 1. Positive pulls from idle enter `Pull` and accumulate exactly
//! 2. Release always zeroes the pull distance; pulling states recede to zero
//! 3. Absorb velocity clamping is idempotent at both ends of the window
//! 4. Idle always means zero alpha and no further frames
//! 5. Alpha and scale stay within [0, max] on arbitrary input
//! 6. Without stimuli every state settles to idle

use edgeglow_core::{EdgeEffect, EdgeEffectConfig, EdgeState, GlowSnapshot};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Pull(f32, f32),
    Release,
    Absorb(i32),
    Frame(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-0.5f32..0.5, 0.0f32..1.0).prop_map(|(d, x)| Op::Pull(d, x)),
        Just(Op::Release),
        any::<i32>().prop_map(Op::Absorb),
        (1u64..100).prop_map(Op::Frame),
    ]
}

fn config_strategy() -> impl Strategy<Value = EdgeEffectConfig> {
    (any::<bool>(), any::<bool>(), 0.5f32..3.0).prop_map(|(dark, decay, scale)| {
        let theme = if dark {
            edgeglow_core::GlowTheme::Dark
        } else {
            edgeglow_core::GlowTheme::Light
        };
        EdgeEffectConfig::default()
            .with_theme(theme)
            .with_pull_decay(decay)
            .with_max_scale(scale)
    })
}

/// Apply `ops`, returning the final clock.
fn apply_ops(glow: &mut EdgeEffect, ops: &[Op], mut now: u64) -> u64 {
    for op in ops {
        match op {
            Op::Pull(d, x) => glow.on_pull(*d, *x, now),
            Op::Release => glow.on_release(now),
            Op::Absorb(v) => {
                glow.on_absorb(*v, now);
            }
            Op::Frame(dt) => {
                now += dt;
                glow.advance(now);
            }
        }
    }
    now
}

fn trace_absorb(velocity: i32) -> (Option<u32>, Vec<GlowSnapshot>) {
    let mut glow = EdgeEffect::new();
    glow.on_absorb(velocity, 0);
    let mut frames = vec![glow.snapshot()];
    for now in (16..=1_200).step_by(16) {
        glow.advance(now);
        frames.push(glow.snapshot());
    }
    (glow.absorb_velocity(), frames)
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Pull accumulation
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn positive_pulls_from_idle_accumulate(
        deltas in prop::collection::vec(0.001f32..0.2, 1..20),
    ) {
        let mut glow = EdgeEffect::new();
        for (i, d) in deltas.iter().enumerate() {
            glow.on_pull(*d, 0.5, i as u64);
        }
        let sum: f32 = deltas.iter().sum();
        prop_assert_eq!(glow.state(), EdgeState::Pull);
        prop_assert!((glow.pull_distance() - sum).abs() < 1e-4);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Release
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn release_always_zeroes_pull(
        config in config_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..60),
    ) {
        let mut glow = EdgeEffect::with_config(config);
        let now = apply_ops(&mut glow, &ops, 0);
        let was_pulling = glow.state().is_pulling();
        glow.on_release(now);
        prop_assert_eq!(glow.pull_distance(), 0.0);
        prop_assert!(glow.on_release_called());
        if was_pulling {
            prop_assert_eq!(glow.state(), EdgeState::Recede);
            prop_assert_eq!(glow.glow_alpha_finish(), 0.0);
            prop_assert_eq!(glow.glow_scale_y_finish(), 0.0);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Absorb clamping
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn slow_absorb_behaves_like_minimum(v in -99i32..100) {
        prop_assert_eq!(trace_absorb(v), trace_absorb(100));
    }

    #[test]
    fn fast_absorb_behaves_like_maximum(v in 10_001i32..=i32::MAX) {
        prop_assert_eq!(trace_absorb(v), trace_absorb(10_000));
        prop_assert_eq!(trace_absorb(-v), trace_absorb(10_000));
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4–6. Frame invariants
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn idle_means_dark_and_done(
        ops in prop::collection::vec(op_strategy(), 0..60),
    ) {
        let mut glow = EdgeEffect::new();
        let mut now = 0;
        for op in &ops {
            now = apply_ops(&mut glow, std::slice::from_ref(op), now);
            if glow.state() == EdgeState::Idle {
                now += 1;
                prop_assert!(!glow.advance(now));
                prop_assert_eq!(glow.glow_alpha(), 0.0);
                prop_assert_eq!(glow.glow_scale_y(), 0.0);
            }
        }
    }

    #[test]
    fn values_stay_in_range(
        config in config_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..80),
    ) {
        let mut glow = EdgeEffect::with_config(config);
        let max_alpha = glow.config().max_alpha();
        let max_scale = glow.config().max_scale;
        let mut now = 0;
        for op in &ops {
            now = apply_ops(&mut glow, std::slice::from_ref(op), now);
            prop_assert!(glow.glow_alpha() >= 0.0);
            prop_assert!(glow.glow_alpha() <= max_alpha + 1e-6);
            prop_assert!(glow.glow_scale_y() >= 0.0);
            prop_assert!(glow.glow_scale_y() <= max_scale + 1e-6);
            prop_assert!((0.0..=1.0).contains(&glow.displacement()));
            prop_assert!(glow.progress(now) >= 0.0 && glow.progress(now) <= 1.0);
        }
    }

    #[test]
    fn everything_settles_without_stimuli(
        config in config_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..60),
    ) {
        let mut glow = EdgeEffect::with_config(config);
        let mut now = apply_ops(&mut glow, &ops, 0);
        glow.on_release(now);
        let deadline = now + 10_000;
        while glow.advance(now) {
            now += 16;
            prop_assert!(now < deadline, "stuck in {}", glow.state());
        }
        prop_assert_eq!(glow.state(), EdgeState::Idle);
    }

    #[test]
    fn replay_is_deterministic(
        ops in prop::collection::vec(op_strategy(), 0..60),
    ) {
        let mut a = EdgeEffect::new();
        let mut b = EdgeEffect::new();
        apply_ops(&mut a, &ops, 0);
        apply_ops(&mut b, &ops, 0);
        prop_assert_eq!(a.snapshot(), b.snapshot());
        prop_assert_eq!(a.take_events(), b.take_events());
    }
}
