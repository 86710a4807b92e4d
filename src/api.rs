// src/api.rs
//! HTTP gateway: health check and `/analyze`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::{counter, histogram};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::aggregate::aggregate;
use crate::config::{AiConfig, SignalsConfig};
use crate::decision::AnalysisResponse;
use crate::providers::Providers;
use crate::signals::{collect_signals, AnalysisRequest};

#[derive(Clone)]
pub struct AppState {
    pub providers: Providers,
}

impl AppState {
    pub fn new(providers: Providers) -> Self {
        Self { providers }
    }

    /// Load `config/ai.json` + `config/signals.toml` (or their env overrides) and build providers.
    pub fn from_env() -> anyhow::Result<Self> {
        let ai = AiConfig::load_default()?;
        let signals = SignalsConfig::load_default()?;
        info!(
            "AI cfg loaded: provider={}, model={}, enabled={}, key_len={}",
            ai.provider,
            ai.model,
            ai.enabled,
            ai.api_key.len()
        );
        Ok(Self::new(Providers::from_config(&ai, &signals)?))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/analyze", post(analyze))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body could not be turned into an [`AnalysisRequest`].
    #[error("{message}")]
    InvalidRequest { status: StatusCode, message: String },
    /// The AI provider did not produce a usable answer. The cause is logged, not returned.
    #[error("analysis provider unavailable")]
    Upstream(anyhow::Error),
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        ApiError::InvalidRequest {
            status: r.status(),
            message: r.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest { status, .. } => *status,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let Json(req) = payload.map_err(|r| {
        counter!("analyze_rejected_total").increment(1);
        warn!(status = %r.status(), "rejected /analyze body");
        ApiError::from(r)
    })?;
    counter!("analyze_requests_total").increment(1);

    // Never log raw text. Only hashed id + which optional fields were present.
    let id = anon_hash(&req.text);
    info!(
        %id,
        chars = req.text.chars().count(),
        has_url = req.url.is_some(),
        has_domain = req.domain.is_some(),
        has_recruiter = req.recruiter_name.is_some(),
        "analyze request"
    );

    let signals = collect_signals(&state.providers, &req).await.map_err(|e| {
        let error = format!("{e:#}");
        warn!(%id, %error, "AI analysis failed");
        counter!("provider_errors_total", "provider" => state.providers.analyzer.name()).increment(1);
        ApiError::Upstream(e)
    })?;

    let resp = aggregate(&signals);
    counter!("analyze_verdict_total", "verdict" => resp.verdict.as_str()).increment(1);
    histogram!("analyze_score").record(f64::from(resp.score));
    info!(%id, score = resp.score, verdict = %resp.verdict, reasons = resp.reasons.len(), "analyze done");

    Ok(Json(resp))
}

/// Short SHA-256 prefix of the text, safe to log.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anon_hash_is_stable_and_short() {
        let a = anon_hash("hello");
        assert_eq!(a.len(), 12);
        assert_eq!(a, anon_hash("hello"));
        assert_ne!(a, anon_hash("hello!"));
        // sha256("hello") = 2cf24dba5fb0...
        assert_eq!(a, "2cf24dba5fb0");
    }

    #[tokio::test]
    async fn upstream_error_maps_to_502_without_cause() {
        let cause = anyhow::anyhow!("https://upstream.example/models/secret-model: 500")
            .context("gemini non-2xx");
        let r = ApiError::Upstream(cause).into_response();
        assert_eq!(r.status(), StatusCode::BAD_GATEWAY);

        let bytes = axum::body::to_bytes(r.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v, json!({ "error": "analysis provider unavailable" }));
    }
}
