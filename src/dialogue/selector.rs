//! Tier selection: the premium-tier availability probe and the pure
//! fallback policy.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::llm::CompletionClient;

use super::registry::ModelRegistry;
use super::types::Importance;

/// Fallback order, best tier first. Selection walks this order; the
/// registry table only supplies per-tier flags and limits.
pub(crate) const PREFERENCE_ORDER: [&str; 3] = ["gpt-5", "gpt-4o", "gpt-4-turbo"];

/// Checks whether the premium tier is currently served by the provider.
///
/// The probe fails closed: a disabled deployment flag, a listing error, or
/// an absent model id all read as "not available" and steer selection
/// toward the cheaper tiers.
pub struct AvailabilityProbe {
    client: Arc<dyn CompletionClient>,
    premium_enabled: bool,
}

impl AvailabilityProbe {
    pub fn new(client: Arc<dyn CompletionClient>, premium_enabled: bool) -> Self {
        Self {
            client,
            premium_enabled,
        }
    }

    /// Whether the head of [`PREFERENCE_ORDER`] can be called right now.
    /// Queried per request; results are not cached.
    pub async fn top_tier_available(&self) -> bool {
        if !self.premium_enabled {
            return false;
        }
        match self.client.list_models().await {
            Ok(models) => {
                let live = models.iter().any(|m| m == PREFERENCE_ORDER[0]);
                debug!(live, "premium tier probe");
                live
            }
            Err(err) => {
                warn!(error = %err, "availability probe failed, treating premium tier as unavailable");
                false
            }
        }
    }
}

/// Pick the tier for one request.
///
/// The premium tier is used only when the table marks it available, the
/// probe saw it live, and the request is high importance. Otherwise the
/// first table-available tier below it wins, and the last tier in the
/// order is the unconditional fallback. Never returns an id absent from
/// [`PREFERENCE_ORDER`].
pub fn select_tier(
    registry: &ModelRegistry,
    importance: Importance,
    top_tier_live: bool,
) -> &'static str {
    let top = PREFERENCE_ORDER[0];
    if top_tier_live && importance == Importance::High && registry.is_available(top) {
        return top;
    }

    for id in PREFERENCE_ORDER.iter().skip(1).copied() {
        if registry.is_available(id) {
            return id;
        }
    }

    PREFERENCE_ORDER[PREFERENCE_ORDER.len() - 1]
}
