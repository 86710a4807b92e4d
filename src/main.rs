//! Credibility Shield binary entrypoint.
//! Boots the Axum HTTP server, wiring providers, metrics and middleware.

use credibility_shield::{api, metrics::Metrics};
use shuttle_axum::ShuttleAxum;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "credibility_shield=info,warn";

fn wants_json(log_format: Option<&str>) -> bool {
    log_format.is_some_and(|v| v.trim().eq_ignore_ascii_case("json"))
}

/// Compact tracing logs; `RUST_LOG` overrides the default filter.
/// `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if wants_json(std::env::var("LOG_FORMAT").ok().as_deref()) {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    }
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    if let Err(e) = init_tracing() {
        eprintln!("tracing init failed: {e}");
    }

    let state = api::AppState::from_env().map_err(shuttle_runtime::Error::Custom)?;
    let mut router = api::router(state);

    match Metrics::init() {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => warn!(error = %e, "metrics disabled"),
    }

    info!("credibility shield ready");
    Ok(router.into())
}
