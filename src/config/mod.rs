// src/config/mod.rs
pub mod ai;
pub mod signals;

pub use ai::AiConfig;
pub use signals::{DomainConfig, RecruiterConfig, SignalsConfig};
