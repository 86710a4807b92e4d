//! Static providers for tests, local runs and disabled features.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{anyhow, Result};

use super::{AiVerdict, DomainAge, DomainChecker, RecruiterChecker, TextAnalyzer};

/// Returns the same verdict for every input and counts calls.
#[derive(Debug, Default)]
pub struct StaticAnalyzer {
    pub fixed: AiVerdict,
    calls: AtomicUsize,
}

impl StaticAnalyzer {
    pub fn new(score: u32, reasons: Vec<String>) -> Self {
        Self {
            fixed: AiVerdict { score, reasons },
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TextAnalyzer for StaticAnalyzer {
    async fn analyze(&self, _text: &str) -> Result<AiVerdict> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.fixed.clone())
    }
    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Always fails; used when AI is disabled or not configured.
pub struct DisabledAnalyzer;

#[async_trait::async_trait]
impl TextAnalyzer for DisabledAnalyzer {
    async fn analyze(&self, _text: &str) -> Result<AiVerdict> {
        Err(anyhow!("AI analyzer is disabled"))
    }
    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Fixed domain answer; `None` simulates a lookup failure.
#[derive(Debug)]
pub struct StaticDomain {
    answer: Option<DomainAge>,
    calls: AtomicUsize,
}

impl StaticDomain {
    pub fn new(is_new: bool, score: u32, reason: impl Into<String>) -> Self {
        Self {
            answer: Some(DomainAge {
                is_new,
                score,
                reason: reason.into(),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every domain is old enough to be ignored.
    pub fn established() -> Self {
        Self::new(false, 0, "Domain age check disabled")
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DomainChecker for StaticDomain {
    async fn check(&self, domain: &str) -> Result<DomainAge> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .clone()
            .ok_or_else(|| anyhow!("domain lookup failed for {domain}"))
    }
    fn name(&self) -> &'static str {
        "static"
    }
}

/// Fixed recruiter answer; `None` simulates a lookup failure.
#[derive(Debug)]
pub struct StaticRecruiter {
    answer: Option<bool>,
    calls: AtomicUsize,
}

impl StaticRecruiter {
    pub fn new(exists: bool) -> Self {
        Self {
            answer: Some(exists),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RecruiterChecker for StaticRecruiter {
    async fn exists(&self, name: &str) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .ok_or_else(|| anyhow!("recruiter lookup failed for {name:?}"))
    }
    fn name(&self) -> &'static str {
        "static"
    }
}
