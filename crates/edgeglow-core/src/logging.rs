#![forbid(unsafe_code)]

//! Structured logging hooks.
//!
//! With the `tracing` feature the usual `tracing` macros are re-exported
//! here (and at the crate root). State changes are recorded as
//! `edge.transition` debug spans carrying `from`, `to`, `reason`, `alpha`,
//! `scale` and `duration_ms` fields.
//!
//! With `tracing-json`, [`init_json_logging`] installs a JSON subscriber
//! filtered by `EDGEGLOW_LOG` (falling back to `RUST_LOG`, then `info`).

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Environment variable consulted for the log filter.
pub const LOG_ENV: &str = "EDGEGLOW_LOG";

/// Install a global JSON subscriber.
///
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init()
        .is_ok()
}

#[cfg(all(test, feature = "tracing-json"))]
mod tests {
    use super::init_json_logging;

    #[test]
    fn second_install_is_refused() {
        let _ = init_json_logging();
        assert!(!init_json_logging());
    }
}
