//! Aress Observability
//!
//! - Structured logging through `tracing` (console, plus an optional JSON file)
//! - HTTP request logging middleware
//! - Prometheus metrics for HTTP traffic and user deletions
//!
//! Metrics can be switched off at runtime with `OBSERVABILITY_ENABLED=false`.
//! Logging to the console is always on.
//!
//! # Examples
//!
//! ```no_run
//! use aress_observability::{init_metrics, init_tracing};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     init_tracing()?;
//!     let _handle = init_metrics();
//!     Ok(())
//! }
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_tracing, logging_middleware};
pub use metrics::{
    CleanupOutcome, DeletionOutcome, init_metrics, is_observability_enabled, metrics_middleware,
    metrics_routes, track_profile_cleanup, track_user_deletion,
};
pub use metrics_exporter_prometheus::PrometheusHandle;
