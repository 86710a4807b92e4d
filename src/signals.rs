//! Ordered signal steps: AI (always), domain (if supplied), recruiter (if supplied).
//!
//! Each step answers "no contribution" (`None` or an untriggered result) or a
//! triggered [`SignalResult`]. Only the AI step can fail the request; the optional
//! checks degrade to no contribution so a lookup outage never reads as risk.

use anyhow::{Context, Result};
use metrics::counter;
use tracing::{debug, warn};

use crate::aggregate::{SignalKind, SignalResult};
use crate::providers::{DomainChecker, Providers, RecruiterChecker, TextAnalyzer};

/// Validated input of one analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub text: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub recruiter_name: Option<String>,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_recruiter(mut self, name: impl Into<String>) -> Self {
        self.recruiter_name = Some(name.into());
        self
    }
}

/// Whitespace-only values count as not supplied.
fn supplied(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

/// AI analysis. Runs unconditionally; its failure is the caller's to surface.
pub async fn ai_step(analyzer: &dyn TextAnalyzer, text: &str) -> Result<SignalResult> {
    let v = analyzer
        .analyze(text)
        .await
        .with_context(|| format!("{} analyzer failed", analyzer.name()))?;
    Ok(SignalResult::triggered(SignalKind::Ai, v.score, v.reasons))
}

/// Domain age. Contributes only for a supplied domain the provider reports as new.
pub async fn domain_step(checker: &dyn DomainChecker, domain: Option<&str>) -> Option<SignalResult> {
    let domain = supplied(domain)?;
    match checker.check(domain).await {
        Ok(age) if age.is_new => Some(SignalResult::triggered(
            SignalKind::Domain,
            age.score,
            vec![age.reason],
        )),
        Ok(_) => Some(SignalResult::quiet(SignalKind::Domain)),
        Err(e) => {
            provider_failed(checker.name(), SignalKind::Domain, &e);
            None
        }
    }
}

/// Recruiter presence. Contributes the fixed penalty when a supplied name is unverifiable.
pub async fn recruiter_step(
    checker: &dyn RecruiterChecker,
    name: Option<&str>,
) -> Option<SignalResult> {
    let name = supplied(name)?;
    match checker.exists(name).await {
        Ok(true) => Some(SignalResult::quiet(SignalKind::Recruiter)),
        Ok(false) => Some(SignalResult::unverified_recruiter()),
        Err(e) => {
            provider_failed(checker.name(), SignalKind::Recruiter, &e);
            None
        }
    }
}

/// Run all steps in their fixed order.
pub async fn collect_signals(providers: &Providers, req: &AnalysisRequest) -> Result<Vec<SignalResult>> {
    let mut out = Vec::with_capacity(3);

    out.push(ai_step(providers.analyzer.as_ref(), &req.text).await?);
    out.extend(domain_step(providers.domain.as_ref(), req.domain.as_deref()).await);
    out.extend(recruiter_step(providers.recruiter.as_ref(), req.recruiter_name.as_deref()).await);

    debug!(
        signals = out.len(),
        triggered = out.iter().filter(|s| s.is_triggered).count(),
        "signals collected"
    );
    Ok(out)
}

fn provider_failed(provider: &'static str, kind: SignalKind, err: &anyhow::Error) {
    warn!(provider, signal = kind.as_str(), error = %err, "signal provider failed; no contribution");
    counter!("provider_errors_total", "provider" => provider).increment(1);
}
