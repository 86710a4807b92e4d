//! decision.rs: verdict ladder and the response shape returned by `/analyze`.
//!
//! The verdict is derived from the final, already clamped score only. Reasons are
//! plain strings in the order the signals were evaluated.

use serde::{Deserialize, Serialize};

/// Highest score a response can carry.
pub const MAX_SCORE: u32 = 100;
/// Lower bound (inclusive) of the "Likely Scam" band.
pub const SCAM_THRESHOLD: u32 = 70;
/// Lower bound (inclusive) of the "Suspicious" band.
pub const SUSPICIOUS_THRESHOLD: u32 = 40;

/// Categorical label for a credibility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Likely Safe")]
    LikelySafe,
    #[serde(rename = "Suspicious")]
    Suspicious,
    #[serde(rename = "Likely Scam")]
    LikelyScam,
}

impl Verdict {
    /// Map a clamped score onto the ladder. First match wins, bounds are inclusive.
    pub fn for_score(score: u32) -> Self {
        if score >= SCAM_THRESHOLD {
            Verdict::LikelyScam
        } else if score >= SUSPICIOUS_THRESHOLD {
            Verdict::Suspicious
        } else {
            Verdict::LikelySafe
        }
    }

    /// Wire label, also used as a metrics label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::LikelySafe => "Likely Safe",
            Verdict::Suspicious => "Suspicious",
            Verdict::LikelyScam => "Likely Scam",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final result of one analysis. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub score: u32,
    pub verdict: Verdict,
    /// Always serialized, even when empty.
    pub reasons: Vec<String>,
}

impl AnalysisResponse {
    /// Build a response from a raw (possibly oversized) sum.
    pub fn from_raw(raw_sum: u32, reasons: Vec<String>) -> Self {
        let score = raw_sum.min(MAX_SCORE);
        Self {
            score,
            verdict: Verdict::for_score(score),
            reasons,
        }
    }
}
