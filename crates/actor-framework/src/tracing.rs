//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the process-wide subscriber once at startup. Actors log
//! lifecycle events (`Actor started`, `Shutdown`) and every operation with structured
//! fields (`entity_type`, ids, sizes); clients add `#[instrument]` spans on top.
//!
//! ```bash
//! RUST_LOG=info cargo run      # compact workflow
//! RUST_LOG=debug cargo run     # full payloads
//! RUST_LOG=storefront=debug,actor_framework=info cargo run
//! ```

/// Initializes structured logging driven by `RUST_LOG`, falling back to `default_filter`.
///
/// Module paths are hidden (`with_target(false)`) because actor logs carry
/// `entity_type` instead. Calling it twice is harmless; only the first call installs.
pub fn setup_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
