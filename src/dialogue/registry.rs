//! Static table of completion tiers and their constraints.

/// One configured capability/cost level of the completion provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelTier {
    /// Provider-side model identifier, also the usage-tracking key.
    pub id: &'static str,
    /// Hard cap on generated tokens per call.
    pub max_output_tokens: u64,
    /// Price per 1K tokens in USD.
    pub cost_per_1k_tokens: f64,
    /// Whether this deployment may call the tier at all. The premium tier
    /// additionally needs a live probe hit (see the selector).
    pub available: bool,
}

/// Lookup table over the tiers this deployment knows about.
///
/// The table carries per-tier flags and limits only; the fallback order is
/// a selection-policy constant, not a property of the table.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    tiers: Vec<ModelTier>,
}

impl ModelRegistry {
    /// The production tier table. `gpt-5` ships disabled until the provider
    /// starts serving it.
    pub fn standard() -> Self {
        Self::new(vec![
            ModelTier {
                id: "gpt-5",
                max_output_tokens: 300,
                cost_per_1k_tokens: 0.01,
                available: false,
            },
            ModelTier {
                id: "gpt-4o",
                max_output_tokens: 250,
                cost_per_1k_tokens: 0.015,
                available: true,
            },
            ModelTier {
                id: "gpt-4-turbo",
                max_output_tokens: 200,
                cost_per_1k_tokens: 0.03,
                available: true,
            },
        ])
    }

    pub fn new(tiers: Vec<ModelTier>) -> Self {
        assert!(!tiers.is_empty(), "registry requires at least one tier");
        Self { tiers }
    }

    pub fn get(&self, id: &str) -> Option<&ModelTier> {
        self.tiers.iter().find(|t| t.id == id)
    }

    pub fn tiers(&self) -> &[ModelTier] {
        &self.tiers
    }

    /// Whether `id` is marked callable in the table.
    pub fn is_available(&self, id: &str) -> bool {
        self.get(id).is_some_and(|t| t.available)
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_has_three_tiers() {
        let registry = ModelRegistry::standard();
        assert_eq!(registry.tiers().len(), 3);
        assert!(registry.get("gpt-5").is_some());
        assert!(registry.get("gpt-4o").is_some());
        assert!(registry.get("gpt-4-turbo").is_some());
    }

    #[test]
    fn premium_tier_ships_disabled() {
        let registry = ModelRegistry::standard();
        assert!(!registry.is_available("gpt-5"));
        assert!(registry.is_available("gpt-4o"));
        assert!(registry.is_available("gpt-4-turbo"));
    }

    #[test]
    fn output_caps_match_tier_pricing() {
        let registry = ModelRegistry::standard();
        assert_eq!(registry.get("gpt-5").unwrap().max_output_tokens, 300);
        assert_eq!(registry.get("gpt-4o").unwrap().max_output_tokens, 250);
        assert_eq!(registry.get("gpt-4-turbo").unwrap().max_output_tokens, 200);
    }

    #[test]
    fn unknown_tier_is_absent_and_unavailable() {
        let registry = ModelRegistry::standard();
        assert!(registry.get("gpt-3.5-turbo").is_none());
        assert!(!registry.is_available("gpt-3.5-turbo"));
    }

    #[test]
    #[should_panic(expected = "at least one tier")]
    fn empty_registry_is_rejected() {
        ModelRegistry::new(vec![]);
    }
}
