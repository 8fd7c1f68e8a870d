//! Model Pricing
//!
//! USD cost per 1K tokens for the hosted models the agent is used with.
//! Models outside the table are treated as free.

/// Cost per 1K tokens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPrice {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

const fn price(input_per_1k: f64, output_per_1k: f64) -> ModelPrice {
    ModelPrice {
        input_per_1k,
        output_per_1k,
    }
}

pub const PRICES: &[(&str, ModelPrice)] = &[
    ("gpt-4o-mini", price(0.00015, 0.0006)),
    ("gpt-4o", price(0.005, 0.015)),
    ("gemini/gemini-1.5-flash", price(0.000075, 0.0003)),
    ("gemini/gemini-1.5-pro", price(0.00125, 0.005)),
    ("claude-sonnet-4-20250514", price(0.003, 0.015)),
    ("claude-opus-4-20250514", price(0.015, 0.075)),
];

/// Price entry for an exact model name
pub fn price_for(model: &str) -> Option<ModelPrice> {
    PRICES
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, price)| *price)
}

/// Estimated USD cost of a call; 0.0 for unknown models
pub fn calculate_cost(model: &str, input_tokens: u32, output_tokens: u32) -> f64 {
    match price_for(model) {
        Some(price) => {
            (input_tokens as f64 / 1000.0) * price.input_per_1k
                + (output_tokens as f64 / 1000.0) * price.output_per_1k
        }
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_model_cost() {
        let cost = calculate_cost("gpt-4o", 2000, 1000);
        assert!((cost - (0.01 + 0.015)).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_model_is_free() {
        assert_eq!(calculate_cost("llama3:latest", 10_000, 10_000), 0.0);
    }

    #[test]
    fn test_exact_name_match_only() {
        assert!(price_for("gpt-4o").is_some());
        assert!(price_for("gpt-4o-2024-08-06").is_none());
        assert_eq!(price_for("gpt-4o-mini").unwrap().output_per_1k, 0.0006);
    }

    #[test]
    fn test_zero_tokens_cost_nothing() {
        assert_eq!(calculate_cost("claude-opus-4-20250514", 0, 0), 0.0);
    }
}
