//! Score aggregation: folds independent signal results into one bounded score.
//!
//! The fold is pure. Which signals are present (and whether they fired) is decided
//! upstream in [`crate::signals`]; this module only sums and concatenates.

use serde::{Deserialize, Serialize};

use crate::decision::AnalysisResponse;

/// Fixed penalty for a recruiter that cannot be verified.
pub const RECRUITER_PENALTY: u32 = 15;
/// Reason attached together with [`RECRUITER_PENALTY`].
pub const RECRUITER_REASON: &str = "Recruiter has weak or no online presence";

/// Which check produced a signal. Kept for logs and metrics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Ai,
    Domain,
    Recruiter,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Ai => "ai",
            SignalKind::Domain => "domain",
            SignalKind::Recruiter => "recruiter",
        }
    }
}

/// Output of one signal evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalResult {
    pub kind: SignalKind,
    pub score_contribution: u32,
    pub reasons: Vec<String>,
    /// Whether the signal counts towards the score. Untriggered results are ignored.
    pub is_triggered: bool,
}

impl SignalResult {
    /// A signal that counts.
    pub fn triggered(kind: SignalKind, score_contribution: u32, reasons: Vec<String>) -> Self {
        Self {
            kind,
            score_contribution,
            reasons,
            is_triggered: true,
        }
    }

    /// A signal that was evaluated but does not count (e.g. an old domain).
    pub fn quiet(kind: SignalKind) -> Self {
        Self {
            kind,
            score_contribution: 0,
            reasons: Vec::new(),
            is_triggered: false,
        }
    }

    /// The hardcoded recruiter penalty.
    pub fn unverified_recruiter() -> Self {
        Self::triggered(
            SignalKind::Recruiter,
            RECRUITER_PENALTY,
            vec![RECRUITER_REASON.to_string()],
        )
    }
}

/// Fold signals (in evaluation order) into the final response.
///
/// Reasons are concatenated as-is: no reordering, no deduplication.
pub fn aggregate<'a, I>(signals: I) -> AnalysisResponse
where
    I: IntoIterator<Item = &'a SignalResult>,
{
    let mut sum: u32 = 0;
    let mut reasons = Vec::new();

    for s in signals.into_iter().filter(|s| s.is_triggered) {
        sum = sum.saturating_add(s.score_contribution);
        reasons.extend(s.reasons.iter().cloned());
    }

    AnalysisResponse::from_raw(sum, reasons)
}
