//! Telemetry helpers for hosts embedding the timeline layout engine.
//!
//! Layout passes, skipped events and persistence fallbacks are reported
//! through `tracing`. Installing a subscriber stays the host's decision.

/// Directive used when `RUST_LOG` is not set.
pub const DEFAULT_TRACING_DIRECTIVE: &str = "timeline_layout=info";

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`, falling back
/// to [`DEFAULT_TRACING_DIRECTIVE`].
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_directive(DEFAULT_TRACING_DIRECTIVE)
}

/// Same as [`init_default_tracing`] with an explicit fallback directive.
#[must_use]
pub fn init_tracing_with_directive(fallback: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));

        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback;
        false
    }
}
