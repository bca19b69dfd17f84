// src/core/cost.rs — Per-call cost estimation for metered backends

use crate::infra::config::PricingConfig;
use crate::provider::TokenUsage;

/// USD per 1K tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

impl Pricing {
    pub const fn per_1k(input_per_1k: f64, output_per_1k: f64) -> Self {
        Self {
            input_per_1k,
            output_per_1k,
        }
    }
}

/// Maps a model identifier to its price. Must answer for every identifier.
pub trait PriceResolver: Send + Sync {
    fn price(&self, model: &str) -> Pricing;
}

/// Two-tier table: models starting with `premium_prefix` pay the premium
/// rate, everything else (unknown models included) pays the fallback rate.
#[derive(Debug, Clone)]
pub struct TieredPricing {
    pub premium_prefix: String,
    pub premium: Pricing,
    pub fallback: Pricing,
}

impl Default for TieredPricing {
    fn default() -> Self {
        Self::from(&PricingConfig::default())
    }
}

impl From<&PricingConfig> for TieredPricing {
    fn from(config: &PricingConfig) -> Self {
        Self {
            premium_prefix: config.premium_prefix.clone(),
            premium: Pricing::per_1k(config.premium_input_per_1k, config.premium_output_per_1k),
            fallback: Pricing::per_1k(config.fallback_input_per_1k, config.fallback_output_per_1k),
        }
    }
}

impl PriceResolver for TieredPricing {
    fn price(&self, model: &str) -> Pricing {
        if !self.premium_prefix.is_empty() && model.starts_with(&self.premium_prefix) {
            self.premium
        } else {
            self.fallback
        }
    }
}

/// Cost in USD, rounded to 6 decimal places.
pub fn estimate_cost(pricing: Pricing, usage: &TokenUsage) -> f64 {
    let input_cost = (usage.prompt_tokens as f64 / 1000.0) * pricing.input_per_1k;
    let output_cost = (usage.completion_tokens as f64 / 1000.0) * pricing.output_per_1k;
    round6(input_cost + output_cost)
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

/// Keeps only the cost of the most recent backend call. No running total.
pub struct CostMeter {
    resolver: Box<dyn PriceResolver>,
    last_cost: Option<f64>,
}

impl CostMeter {
    pub fn new(resolver: Box<dyn PriceResolver>) -> Self {
        Self {
            resolver,
            last_cost: None,
        }
    }

    /// Record one backend call. Calls without usage (unmetered backends)
    /// clear the last value.
    pub fn observe(&mut self, model: &str, usage: Option<&TokenUsage>) -> Option<f64> {
        self.last_cost = usage.map(|u| {
            let cost = estimate_cost(self.resolver.price(model), u);
            tracing::debug!(
                "cost: model={model}, prompt_tokens={}, completion_tokens={}, usd={cost:.6}",
                u.prompt_tokens,
                u.completion_tokens
            );
            cost
        });
        self.last_cost
    }

    pub fn last_cost(&self) -> Option<f64> {
        self.last_cost
    }
}

impl Default for CostMeter {
    fn default() -> Self {
        Self::new(Box::new(TieredPricing::default()))
    }
}
