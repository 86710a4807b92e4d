//! Domain-age checker backed by RDAP (the JSON successor of WHOIS).
//!
//! The queried name is reduced to its registrable root first, so
//! `https://careers.example.co.uk/jobs` is looked up as `example.co.uk`.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;
use url::{Host, Url};

use super::{DomainAge, DomainChecker};
use crate::config::signals::DomainConfig;

/// Second-level suffixes under which registrations happen one level deeper.
const TWO_PART_TLDS: &[&str] = &[
    "co.uk", "org.uk", "gov.uk", "ac.uk", "com.au", "net.au", "edu.au", "co.jp", "co.kr",
    "com.br", "co.za", "com.mx", "co.in", "com.sg", "co.nz", "com.ar", "co.il",
];

static RE_HOST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)+$").unwrap());

pub struct RdapDomainChecker {
    http: reqwest::Client,
    base: String,
    max_age_days: u32,
    score: u32,
}

impl RdapDomainChecker {
    pub fn new(cfg: &DomainConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("credibility-shield/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building rdap http client")?;
        Ok(Self {
            http,
            base: cfg.rdap_base.trim_end_matches('/').to_string(),
            max_age_days: cfg.max_age_days,
            score: cfg.score,
        })
    }
}

#[derive(Deserialize)]
struct RdapDomain {
    #[serde(default)]
    events: Vec<RdapEvent>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RdapEvent {
    event_action: String,
    event_date: Option<String>,
}

#[async_trait::async_trait]
impl DomainChecker for RdapDomainChecker {
    async fn check(&self, domain: &str) -> Result<DomainAge> {
        let root = normalize_domain(domain)
            .ok_or_else(|| anyhow!("not a valid domain name: {domain:?}"))?;
        debug!(%root, "rdap lookup");

        let body: RdapDomain = self
            .http
            .get(format!("{}/domain/{}", self.base, root))
            .header("accept", "application/rdap+json, application/json")
            .send()
            .await
            .context("rdap request")?
            .error_for_status()
            .context("rdap non-2xx")?
            .json()
            .await
            .context("rdap response body")?;

        let created = registration_date(&body)
            .ok_or_else(|| anyhow!("no registration event for {root}"))?;
        Ok(assess(created, Utc::now(), self.max_age_days, self.score))
    }

    fn name(&self) -> &'static str {
        "rdap"
    }
}

fn registration_date(body: &RdapDomain) -> Option<DateTime<Utc>> {
    body.events
        .iter()
        .filter(|e| e.event_action.eq_ignore_ascii_case("registration"))
        .filter_map(|e| e.event_date.as_deref())
        .filter_map(|d| DateTime::parse_from_rfc3339(d.trim()).ok())
        .map(|d| d.with_timezone(&Utc))
        .min()
}

/// Turn a registration date into the provider answer.
pub fn assess(created: DateTime<Utc>, now: DateTime<Utc>, max_age_days: u32, score: u32) -> DomainAge {
    let age_days = (now - created).num_days().max(0);
    let is_new = age_days <= i64::from(max_age_days);
    let reason = match age_days {
        0 => "Domain registered today".to_string(),
        1 => "Domain registered 1 day ago".to_string(),
        n => format!("Domain registered {n} days ago"),
    };
    DomainAge {
        is_new,
        score: if is_new { score } else { 0 },
        reason,
    }
}

/// Reduce user input (bare domain, URL, e-mail address) to the registrable root.
/// Unicode names come back in their punycode (`xn--`) form.
pub fn normalize_domain(input: &str) -> Option<String> {
    let s = input.trim();
    let rest = match s.find("://") {
        Some(idx) => &s[idx + 3..],
        None => s,
    };
    // Authority first, then userinfo: an `@` in the path or query must not pick the host.
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or_default();
    if host_port.is_empty() {
        return None;
    }

    let parsed = Url::parse(&format!("http://{host_port}")).ok()?;
    let host = match parsed.host()? {
        Host::Domain(d) => d.trim_end_matches('.').to_string(),
        Host::Ipv4(_) | Host::Ipv6(_) => return None,
    };
    let host = host.as_str();

    if host.len() > 253 || !RE_HOST.is_match(host) {
        return None;
    }

    let parts: Vec<&str> = host.split('.').collect();
    let n = parts.len();
    let last_two = format!("{}.{}", parts[n - 2], parts[n - 1]);
    if n >= 3 && TWO_PART_TLDS.contains(&last_two.as_str()) {
        return Some(format!("{}.{}", parts[n - 3], last_two));
    }
    if TWO_PART_TLDS.contains(&last_two.as_str()) {
        // A bare public suffix is not a registrable domain.
        return None;
    }
    Some(last_two)
}
