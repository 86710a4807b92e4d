// src/providers/recruiter.rs
//! Recruiter verification against a local directory of known recruiters.

use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

use super::RecruiterChecker;
use crate::config::signals::RecruiterConfig;

#[derive(Debug, Clone, Default)]
pub struct RecruiterDirectory {
    known: HashSet<String>,
}

impl RecruiterDirectory {
    /// Build from configuration. No directory configured means nobody is verified.
    pub fn load(cfg: &RecruiterConfig) -> Result<Self> {
        match &cfg.directory {
            Some(path) => {
                let dir = Self::load_from(path)?;
                info!(path = %path.display(), known = dir.len(), "recruiter directory loaded");
                Ok(dir)
            }
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path. Supports TOML (`recruiters = [...]`) or a JSON array.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading recruiter directory from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let names = parse_names(&content, &ext)?;
        Ok(Self::from_names(names))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let known = names
            .into_iter()
            .map(|n| normalize_name(n.as_ref()))
            .filter(|n| !n.is_empty())
            .collect();
        Self { known }
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.known.contains(&normalize_name(name))
    }
}

#[async_trait::async_trait]
impl RecruiterChecker for RecruiterDirectory {
    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.contains(name))
    }

    fn name(&self) -> &'static str {
        "directory"
    }
}

/// Case-insensitive, whitespace-collapsed form used for matching.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn parse_names(s: &str, hint_ext: &str) -> Result<Vec<String>> {
    #[derive(serde::Deserialize)]
    struct TomlDir {
        recruiters: Vec<String>,
    }

    if hint_ext == "toml" || s.contains("recruiters") {
        if let Ok(v) = toml::from_str::<TomlDir>(s) {
            return Ok(v.recruiters);
        }
    }
    if let Ok(v) = serde_json::from_str::<Vec<String>>(s) {
        return Ok(v);
    }
    Err(anyhow!("unsupported recruiter directory format"))
}
