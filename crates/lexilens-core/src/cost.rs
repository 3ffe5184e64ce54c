use std::fmt;

use lexilens_types::TokenUsage;

/// USD per 1000 prompt tokens
pub const PROMPT_COST_PER_1K: f64 = 0.0015;
/// USD per 1000 completion tokens
pub const COMPLETION_COST_PER_1K: f64 = 0.002;

/// Estimated spend for a lookup, in USD
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Cost(f64);

impl Cost {
    pub fn amount(&self) -> f64 {
        self.0
    }

    /// Rounded to four decimals, as displayed
    pub fn rounded(&self) -> f64 {
        (self.0 * 10_000.0).round() / 10_000.0
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.4}", self.rounded())
    }
}

/// Maps token counts to a monetary estimate.
///
/// Counts are unsigned, so negative inputs cannot reach the formula.
#[derive(Debug, Clone, Copy)]
pub struct CostEstimator {
    prompt_per_1k: f64,
    completion_per_1k: f64,
}

impl Default for CostEstimator {
    fn default() -> Self {
        Self {
            prompt_per_1k: PROMPT_COST_PER_1K,
            completion_per_1k: COMPLETION_COST_PER_1K,
        }
    }
}

impl CostEstimator {
    pub fn new(prompt_per_1k: f64, completion_per_1k: f64) -> Self {
        Self {
            prompt_per_1k: prompt_per_1k.max(0.0),
            completion_per_1k: completion_per_1k.max(0.0),
        }
    }

    pub fn estimate(&self, prompt_tokens: u64, completion_tokens: u64) -> Cost {
        Cost(
            (prompt_tokens as f64 * self.prompt_per_1k
                + completion_tokens as f64 * self.completion_per_1k)
                / 1000.0,
        )
    }

    pub fn estimate_usage(&self, usage: &TokenUsage) -> Cost {
        self.estimate(usage.prompt_tokens, usage.completion_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rates() {
        let cost = CostEstimator::default().estimate(1000, 500);
        assert!((cost.amount() - 0.0025).abs() < 1e-12);
        assert_eq!(cost.rounded(), 0.0025);
        assert_eq!(cost.to_string(), "$0.0025");
    }

    #[test]
    fn zero_tokens_cost_nothing() {
        let cost = CostEstimator::default().estimate(0, 0);
        assert_eq!(cost.amount(), 0.0);
        assert_eq!(cost.to_string(), "$0.0000");
    }

    #[test]
    fn small_usage_rounds_to_four_places() {
        // (57 * 0.0015 + 143 * 0.002) / 1000 = 0.0003715
        let cost = CostEstimator::default().estimate_usage(&TokenUsage::new(57, 143));
        assert_eq!(cost.to_string(), "$0.0004");
    }

    #[test]
    fn negative_rates_are_clamped() {
        let cost = CostEstimator::new(-1.0, 0.002).estimate(1000, 1000);
        assert!((cost.amount() - 0.002).abs() < 1e-12);
    }
}
