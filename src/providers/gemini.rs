//! Gemini text analyzer (Generative Language API, `generateContent`).
//! Requires an API key; see `config/ai.json`.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{sanitize_reason, AiVerdict, TextAnalyzer};
use crate::config::ai::AiConfig;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const SYSTEM_PROMPT: &str = "You review job offers, recruiter messages and similar content for signs of fraud. \
Respond ONLY with a JSON object of the form {\"score\": <integer 0-100>, \"reasons\": [<short strings>]}. \
`score` is the risk that the content is a scam (0 = clearly legitimate). \
Each reason is one short sentence naming a concrete red flag (urgency, upfront payment, \
unrealistic pay, off-platform contact, requests for personal data). Use an empty list when there are none.";

pub struct GeminiAnalyzer {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GeminiAnalyzer {
    pub fn new(cfg: &AiConfig) -> Result<Self> {
        Self::with_base(cfg, API_BASE)
    }

    /// Same as [`GeminiAnalyzer::new`] but against another endpoint (proxies, local stubs).
    pub fn with_base(cfg: &AiConfig, api_base: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("credibility-shield/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building gemini http client")?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
        })
    }
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}
#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}
#[derive(Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Req<'a> {
    system_instruction: SystemInstruction<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize)]
struct Resp {
    #[serde(default)]
    candidates: Vec<Candidate>,
}
#[derive(Deserialize)]
struct Candidate {
    content: Option<RespContent>,
}
#[derive(Deserialize)]
struct RespContent {
    #[serde(default)]
    parts: Vec<RespPart>,
}
#[derive(Deserialize)]
struct RespPart {
    #[serde(default)]
    text: String,
}

/// Raw model output before clamping; the model may emit floats or negatives.
#[derive(Deserialize)]
struct ModelOutput {
    score: f64,
    #[serde(default)]
    reasons: Vec<String>,
}

#[async_trait::async_trait]
impl TextAnalyzer for GeminiAnalyzer {
    async fn analyze(&self, text: &str) -> Result<AiVerdict> {
        if self.api_key.is_empty() {
            bail!("gemini api key is not configured");
        }

        let req = Req {
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: SYSTEM_PROMPT,
                }],
            },
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.2,
                response_mime_type: "application/json",
            },
        };

        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        let resp = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&req)
            .send()
            .await
            .context("gemini request")?
            .error_for_status()
            .context("gemini non-2xx")?;

        let body: Resp = resp.json().await.context("gemini response body")?;
        let content = body
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");
        debug!(chars = content.len(), "gemini returned content");

        parse_model_output(&content)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

/// Parse the model's JSON answer, tolerating markdown code fences around it.
pub fn parse_model_output(raw: &str) -> Result<AiVerdict> {
    let json = strip_code_fence(raw);
    if json.is_empty() {
        return Err(anyhow!("empty model output"));
    }
    let out: ModelOutput = serde_json::from_str(json).context("model output is not the expected JSON")?;
    if !out.score.is_finite() {
        bail!("model score is not a number");
    }

    let score = out.score.round().max(0.0).min(u32::MAX as f64) as u32;
    let reasons = out
        .reasons
        .iter()
        .map(|r| sanitize_reason(r))
        .filter(|r| !r.is_empty())
        .collect();

    Ok(AiVerdict { score, reasons })
}

fn strip_code_fence(raw: &str) -> &str {
    let t = raw.trim();
    let Some(rest) = t.strip_prefix("```") else {
        return t;
    };
    // Drop an optional language tag (`json`, `JSON`, ...) on the opening fence line.
    let rest = match rest.split_once('\n') {
        Some((tag, body)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => body,
        _ => rest,
    };
    let rest = rest.trim();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let v = parse_model_output(r#"{"score": 50, "reasons": ["Urgent tone detected"]}"#).unwrap();
        assert_eq!(v.score, 50);
        assert_eq!(v.reasons, vec!["Urgent tone detected".to_string()]);
    }

    #[test]
    fn parses_fenced_json_and_missing_reasons() {
        let v = parse_model_output("```json\n{\"score\": 12.6}\n```").unwrap();
        assert_eq!(v.score, 13);
        assert!(v.reasons.is_empty());
    }

    #[test]
    fn fence_tag_is_case_insensitive() {
        for raw in [
            "```JSON\n{\"score\": 50, \"reasons\": []}\n```",
            "```Json\n{\"score\": 50}\n```",
            "```\n{\"score\": 50}\n```",
            "```{\"score\": 50}```",
        ] {
            let v = parse_model_output(raw).unwrap_or_else(|e| panic!("{raw:?}: {e}"));
            assert_eq!(v.score, 50);
        }
    }

    #[test]
    fn negative_score_floors_to_zero() {
        let v = parse_model_output(r#"{"score": -5, "reasons": ["  ", "ok\nfine"]}"#).unwrap();
        assert_eq!(v.score, 0);
        assert_eq!(v.reasons, vec!["ok fine".to_string()]);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_model_output("I think this is fine.").is_err());
        assert!(parse_model_output("").is_err());
        assert!(parse_model_output(r#"{"reasons": []}"#).is_err());
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let cfg = AiConfig {
            enabled: true,
            api_key: String::new(),
            ..AiConfig::default()
        };
        let g = GeminiAnalyzer::new(&cfg).unwrap();
        assert!(g.analyze("hello").await.is_err());
    }
}
