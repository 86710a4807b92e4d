// src/config/signals.rs
//! Settings for the heuristic signals (domain age, recruiter directory).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SIGNALS_CONFIG_PATH: &str = "config/signals.toml";
pub const ENV_SIGNALS_CONFIG_PATH: &str = "SIGNALS_CONFIG_PATH";

pub const DEFAULT_RDAP_BASE: &str = "https://rdap.org";
pub const DEFAULT_MAX_AGE_DAYS: u32 = 30;
pub const DEFAULT_NEW_DOMAIN_SCORE: u32 = 20;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignalsConfig {
    #[serde(default)]
    pub domain: DomainConfig,
    #[serde(default)]
    pub recruiter: RecruiterConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DomainConfig {
    #[serde(default = "yes")]
    pub enabled: bool,
    #[serde(default = "default_rdap_base")]
    pub rdap_base: String,
    /// Domains registered at most this many days ago count as new.
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u32,
    /// Contribution reported for a new domain.
    #[serde(default = "default_score")]
    pub score: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecruiterConfig {
    /// Known-recruiter list (TOML `recruiters = [...]` or JSON array).
    /// Without a directory no recruiter can be verified.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

fn yes() -> bool {
    true
}
fn default_rdap_base() -> String {
    DEFAULT_RDAP_BASE.to_string()
}
fn default_max_age_days() -> u32 {
    DEFAULT_MAX_AGE_DAYS
}
fn default_score() -> u32 {
    DEFAULT_NEW_DOMAIN_SCORE
}
fn default_timeout_secs() -> u64 {
    8
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rdap_base: default_rdap_base(),
            max_age_days: default_max_age_days(),
            score: default_score(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SignalsConfig {
    /// Load from an explicit TOML path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading signals config from {}", path.display()))?;
        let mut cfg: SignalsConfig = toml::from_str(&content)
            .with_context(|| format!("parsing signals config {}", path.display()))?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Load using env var + fallbacks:
    /// 1) $SIGNALS_CONFIG_PATH (must exist)
    /// 2) config/signals.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_SIGNALS_CONFIG_PATH) {
            return Self::load_from_file(Path::new(&p));
        }
        let p = PathBuf::from(DEFAULT_SIGNALS_CONFIG_PATH);
        if p.exists() {
            return Self::load_from_file(&p);
        }
        Ok(Self::default())
    }

    fn sanitize(&mut self) {
        let base = self.domain.rdap_base.trim().trim_end_matches('/');
        self.domain.rdap_base = if base.is_empty() {
            default_rdap_base()
        } else {
            base.to_string()
        };
        if self.domain.timeout_secs == 0 {
            self.domain.timeout_secs = default_timeout_secs();
        }
    }
}
