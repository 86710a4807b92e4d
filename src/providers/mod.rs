//! Signal providers: the external services behind each check.
//!
//! Each provider sits behind a small async trait so the gateway can be wired with
//! real HTTP clients in production and with static doubles in tests.

pub mod gemini;
pub mod mock;
pub mod rdap;
pub mod recruiter;

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{ai::AiConfig, signals::SignalsConfig};

/// What the AI analyzer returns for a piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiVerdict {
    pub score: u32,
    #[serde(default)]
    pub reasons: Vec<String>,
}

/// What the domain checker returns for one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainAge {
    pub is_new: bool,
    pub score: u32,
    pub reason: String,
}

#[async_trait::async_trait]
pub trait TextAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<AiVerdict>;
    /// Provider name for diagnostics/metrics.
    fn name(&self) -> &'static str;
}

#[async_trait::async_trait]
pub trait DomainChecker: Send + Sync {
    async fn check(&self, domain: &str) -> Result<DomainAge>;
    fn name(&self) -> &'static str;
}

#[async_trait::async_trait]
pub trait RecruiterChecker: Send + Sync {
    /// `true` when the recruiter can be verified.
    async fn exists(&self, name: &str) -> Result<bool>;
    fn name(&self) -> &'static str;
}

/// The three providers a request may consult, shared across requests.
#[derive(Clone)]
pub struct Providers {
    pub analyzer: Arc<dyn TextAnalyzer>,
    pub domain: Arc<dyn DomainChecker>,
    pub recruiter: Arc<dyn RecruiterChecker>,
}

impl Providers {
    pub fn new(
        analyzer: Arc<dyn TextAnalyzer>,
        domain: Arc<dyn DomainChecker>,
        recruiter: Arc<dyn RecruiterChecker>,
    ) -> Self {
        Self {
            analyzer,
            domain,
            recruiter,
        }
    }

    /// Factory: build providers according to config and environment variables.
    ///
    /// * If `AI_TEST_MODE=mock`, the analyzer is a deterministic mock.
    /// * Else if AI is disabled (or the provider is unknown), the analyzer always errors.
    /// * A disabled domain check reports every domain as established.
    pub fn from_config(ai: &AiConfig, signals: &SignalsConfig) -> Result<Self> {
        let analyzer: Arc<dyn TextAnalyzer> = if ai_test_mode_is_mock() {
            info!("AI_TEST_MODE=mock: using mock analyzer");
            Arc::new(mock::StaticAnalyzer::new(0, vec!["Neutral hint (mock)".into()]))
        } else if !ai.enabled {
            warn!("AI analyzer disabled in config; /analyze will return 502");
            Arc::new(mock::DisabledAnalyzer)
        } else {
            match ai.provider.as_str() {
                "gemini" => Arc::new(gemini::GeminiAnalyzer::new(ai)?),
                other => {
                    warn!(provider = other, "unsupported AI provider; analyzer disabled");
                    Arc::new(mock::DisabledAnalyzer)
                }
            }
        };

        let domain: Arc<dyn DomainChecker> = if signals.domain.enabled {
            Arc::new(rdap::RdapDomainChecker::new(&signals.domain)?)
        } else {
            Arc::new(mock::StaticDomain::established())
        };

        let recruiter: Arc<dyn RecruiterChecker> =
            Arc::new(recruiter::RecruiterDirectory::load(&signals.recruiter)?);

        Ok(Self::new(analyzer, domain, recruiter))
    }
}

fn ai_test_mode_is_mock() -> bool {
    std::env::var("AI_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
}

/// Ensure single-line output of bounded length. Collapses whitespace.
pub fn sanitize_reason(input: &str) -> String {
    const MAX: usize = 160;
    let mut out = String::with_capacity(input.len().min(MAX));
    let mut prev_space = false;
    let mut len = 0usize;
    for ch in input.chars() {
        let c = if ch.is_whitespace() || ch.is_control() {
            ' '
        } else {
            ch
        };
        if c == ' ' {
            if !prev_space && !out.is_empty() {
                out.push(' ');
                len += 1;
            }
            prev_space = true;
        } else {
            if len >= MAX {
                break;
            }
            out.push(c);
            len += 1;
            prev_space = false;
        }
    }
    out.trim().to_string()
}
