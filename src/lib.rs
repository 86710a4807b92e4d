// src/lib.rs
// Public library surface for integration tests and the Shuttle binary.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod decision;
pub mod metrics;
pub mod providers;
pub mod signals;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{aggregate, SignalKind, SignalResult};
pub use crate::api::{router, AppState};
pub use crate::decision::{AnalysisResponse, Verdict};
pub use crate::signals::AnalysisRequest;

/// Build the full application router from config files and env (no Shuttle runtime).
pub fn app() -> anyhow::Result<axum::Router> {
    let state = AppState::from_env()?;
    Ok(router(state))
}
