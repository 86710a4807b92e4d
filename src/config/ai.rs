// src/config/ai.rs
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

pub const DEFAULT_AI_CONFIG_PATH: &str = "config/ai.json";
pub const ENV_AI_CONFIG_PATH: &str = "AI_CONFIG_PATH";

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}
fn default_api_key() -> String {
    "ENV".to_string()
}
fn default_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub enabled: bool,
    /// Only "gemini" is wired (case-insensitive).
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// "ENV" means: read from GEMINI_API_KEY
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Total request timeout for one analysis call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_provider(),
            model: default_model(),
            api_key: default_api_key(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AiConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut cfg: AiConfig = serde_json::from_str(&data)?;

        // Normalize provider
        cfg.provider = cfg.provider.trim().to_lowercase();

        // Resolve api key if "ENV"
        if cfg.api_key.trim().eq_ignore_ascii_case("env") {
            cfg.api_key = match cfg.provider.as_str() {
                "gemini" => env::var("GEMINI_API_KEY").unwrap_or_default(),
                other => anyhow::bail!("Unsupported provider in config: {other}"),
            };
        }

        if cfg.model.trim().is_empty() {
            cfg.model = default_model();
        }
        if cfg.timeout_secs == 0 {
            cfg.timeout_secs = default_timeout_secs();
        }

        Ok(cfg)
    }

    /// Load using env var + fallback:
    /// 1) $AI_CONFIG_PATH (must exist)
    /// 2) config/ai.json (optional; defaults when absent)
    pub fn load_default() -> anyhow::Result<Self> {
        if let Ok(p) = env::var(ENV_AI_CONFIG_PATH) {
            return Self::load_from_file(&p)
                .map_err(|e| anyhow::anyhow!("loading {ENV_AI_CONFIG_PATH}={p}: {e}"));
        }
        let p = Path::new(DEFAULT_AI_CONFIG_PATH);
        if p.exists() {
            return Self::load_from_file(p);
        }
        Ok(Self::default())
    }
}
