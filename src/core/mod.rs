// src/core/mod.rs — Diagnostic pipeline

pub mod analyzer;
pub mod cost;
pub mod results;
pub mod session;

pub use analyzer::{CloudAnalyzer, CloudModels, Diagnosis, LocalAnalyzer};
pub use cost::{CostMeter, PriceResolver, Pricing, TieredPricing};
pub use session::{ChatSession, SessionState};
