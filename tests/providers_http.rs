// tests/providers_http.rs
//
// Real HTTP paths of the Gemini and RDAP providers, against stub axum servers
// bound to 127.0.0.1:0. No external network.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::Path,
    http::{HeaderMap, Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use credibility_shield::api::{router, AppState};
use credibility_shield::config::{AiConfig, DomainConfig};
use credibility_shield::providers::gemini::GeminiAnalyzer;
use credibility_shield::providers::mock::StaticRecruiter;
use credibility_shield::providers::rdap::RdapDomainChecker;
use credibility_shield::providers::{DomainChecker, Providers, TextAnalyzer};
use credibility_shield::signals::domain_step;

/// Serve `app` on an ephemeral local port and return its base URL.
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });
    format!("http://{addr}")
}

// ---------------------------------------------------------------- Gemini

async fn gemini_generate(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some("test-key") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad key" })));
    }
    let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
    if text != "Pay a 50 EUR onboarding fee today" {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "unexpected text" })));
    }
    if body["generationConfig"]["responseMimeType"] != "application/json" {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "mime" })));
    }
    // Answer split across two parts, fenced, as the model sometimes does.
    (
        StatusCode::OK,
        Json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "```JSON\n{\"score\": 72, " },
                        { "text": "\"reasons\": [\"Upfront fee requested\"]}\n```" }
                    ]
                }
            }]
        })),
    )
}

fn gemini_stub() -> Router {
    Router::new()
        .route("/models/test-model:generateContent", post(gemini_generate))
        .route(
            "/models/broken-model:generateContent",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        )
}

fn ai_cfg(model: &str, key: &str) -> AiConfig {
    AiConfig {
        enabled: true,
        model: model.to_string(),
        api_key: key.to_string(),
        timeout_secs: 5,
        ..AiConfig::default()
    }
}

#[tokio::test]
async fn gemini_decodes_joined_parts() {
    let base = spawn(gemini_stub()).await;
    let g = GeminiAnalyzer::with_base(&ai_cfg("test-model", "test-key"), &format!("{base}/")).unwrap();

    let v = g.analyze("Pay a 50 EUR onboarding fee today").await.expect("analyze");
    assert_eq!(v.score, 72);
    assert_eq!(v.reasons, vec!["Upfront fee requested".to_string()]);
}

#[tokio::test]
async fn gemini_non_2xx_is_an_error() {
    let base = spawn(gemini_stub()).await;

    let wrong_key = GeminiAnalyzer::with_base(&ai_cfg("test-model", "other"), &base).unwrap();
    assert!(wrong_key.analyze("Pay a 50 EUR onboarding fee today").await.is_err());

    let broken = GeminiAnalyzer::with_base(&ai_cfg("broken-model", "test-key"), &base).unwrap();
    assert!(broken.analyze("anything").await.is_err());
}

#[tokio::test]
async fn gemini_failure_is_502_without_upstream_details() {
    let base = spawn(gemini_stub()).await;
    let analyzer: Arc<dyn TextAnalyzer> =
        Arc::new(GeminiAnalyzer::with_base(&ai_cfg("broken-model", "test-key"), &base).unwrap());
    let app = router(AppState::new(Providers::new(
        analyzer,
        Arc::new(RdapDomainChecker::new(&DomainConfig::default()).unwrap()),
        Arc::new(StaticRecruiter::new(true)),
    )));

    let req = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"text":"hello"}"#))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body = String::from_utf8(to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec()).unwrap();
    assert!(!body.contains("broken-model"), "leaked model: {body}");
    assert!(!body.contains("127.0.0.1"), "leaked upstream url: {body}");
    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["error"], "analysis provider unavailable");
}

// ---------------------------------------------------------------- RDAP

async fn rdap_domain(Path(name): Path<String>) -> impl IntoResponse {
    let registered = match name.as_str() {
        "new-scam-site.xyz" => Utc::now() - Duration::days(3),
        "established.com" => Utc::now() - Duration::days(9000),
        _ => return (StatusCode::NOT_FOUND, Json(json!({ "errorCode": 404 }))),
    };
    (
        StatusCode::OK,
        Json(json!({
            "objectClassName": "domain",
            "ldhName": name,
            "events": [
                { "eventAction": "registration", "eventDate": registered.to_rfc3339_opts(SecondsFormat::Secs, true) },
                { "eventAction": "last changed", "eventDate": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true) }
            ]
        })),
    )
}

async fn rdap_checker() -> RdapDomainChecker {
    let base = spawn(Router::new().route("/domain/{name}", get(rdap_domain))).await;
    let cfg = DomainConfig {
        rdap_base: format!("{base}/"),
        max_age_days: 30,
        score: 20,
        timeout_secs: 5,
        ..DomainConfig::default()
    };
    RdapDomainChecker::new(&cfg).unwrap()
}

#[tokio::test]
async fn rdap_new_domain_from_url_with_email_in_query() {
    let checker = rdap_checker().await;

    let age = checker
        .check("https://jobs.new-scam-site.xyz/apply?contact=hr@gmail.com")
        .await
        .expect("rdap check");
    assert!(age.is_new);
    assert_eq!(age.score, 20);
    assert_eq!(age.reason, "Domain registered 3 days ago");
}

#[tokio::test]
async fn rdap_established_domain_is_not_new() {
    let checker = rdap_checker().await;

    let age = checker.check("Established.com").await.expect("rdap check");
    assert!(!age.is_new);
    assert_eq!(age.score, 0);
}

#[tokio::test]
async fn rdap_not_found_is_error_and_contributes_nothing() {
    let checker = rdap_checker().await;

    assert!(checker.check("unknown-domain.org").await.is_err());
    assert!(domain_step(&checker, Some("unknown-domain.org")).await.is_none());
}
