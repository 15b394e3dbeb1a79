// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: the overscroll edge-glow state machine and its supporting pieces.
//!
//! # Role in edgeglow
//! `edgeglow-core` is framework-free. It turns pull, release, and absorb
//! stimuli plus a frame clock into glow alpha/scale values a renderer can
//! draw, and tells the host when it needs more frames.
//!
//! # Primary responsibilities
//! - **EdgeEffect**: the seven-state pull / absorb / recede animator.
//! - **Transition table**: per-state durations, endpoints, and successors.
//! - **Curves**: decelerate, cubic-bezier sine, and elastic interpolators.
//! - **Geometry**: glow outline and paint from a frame snapshot.
//! - **EdgePair**: leading/trailing routing for one scroll axis.
//!
//! # How it fits in the system
//! The `edgeglow` CLI (`edgeglow-cli`) drives these types with scripted
//! input to inspect frame-by-frame output. Embedding hosts call
//! [`edge_effect::EdgeEffect::advance`] from their render loop and drain
//! [`edge_effect::EdgeEvent`]s for haptics and redraws.

pub mod clock;
pub mod config;
pub mod curve;
pub mod edge_effect;
pub mod geometry;
pub mod logging;
pub mod pair;
pub mod phase;
pub mod state;
pub mod watchdog;

pub use config::{EdgeEffectConfig, GlowTheme};
pub use edge_effect::{EdgeEffect, EdgeEvent, GlowSnapshot};
pub use pair::{EdgePair, EdgeSide};
pub use state::EdgeState;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
