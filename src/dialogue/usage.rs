//! Daily usage accounting for completion tiers.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{NaiveDate, Utc};

/// Default per-tier daily ceiling when `MAX_DAILY_AI_REQUESTS` is unset.
pub const DEFAULT_DAILY_CEILING: u64 = 200;

/// Tracks recorded usage per tier per UTC calendar day and gates requests
/// against a daily ceiling.
///
/// The ceiling is a soft budget: the quota check and the eventual
/// recording for one request are not atomic, so a request that passes the
/// check can still push the counter past the ceiling once the provider
/// reports its actual token count. Tokens cannot be reserved up front.
pub struct UsageTracker {
    /// (tier id, UTC date) → recorded count. Entries for past dates are
    /// never purged; reads simply skip them.
    counters: Mutex<HashMap<(String, NaiveDate), u64>>,
    daily_ceiling: u64,
}

impl UsageTracker {
    pub fn new(daily_ceiling: u64) -> Self {
        Self {
            counters: Mutex::new(HashMap::new()),
            daily_ceiling,
        }
    }

    /// Whether `tier` may make another request today.
    pub fn is_under_quota(&self, tier: &str) -> bool {
        self.is_under_quota_on(tier, Utc::now().date_naive())
    }

    fn is_under_quota_on(&self, tier: &str, date: NaiveDate) -> bool {
        let counters = self.counters.lock().expect("usage counter lock poisoned");
        let count = counters
            .get(&(tier.to_string(), date))
            .copied()
            .unwrap_or(0);
        count < self.daily_ceiling
    }

    /// Add `amount` to today's counter for `tier`, creating it at zero if
    /// absent.
    pub fn record_usage(&self, tier: &str, amount: u64) {
        self.record_usage_on(tier, amount, Utc::now().date_naive());
    }

    fn record_usage_on(&self, tier: &str, amount: u64, date: NaiveDate) {
        let mut counters = self.counters.lock().expect("usage counter lock poisoned");
        let entry = counters.entry((tier.to_string(), date)).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Today's per-tier counts. Entries keyed to other dates are excluded
    /// from the result but left in storage.
    pub fn todays_stats(&self) -> HashMap<String, u64> {
        self.stats_on(Utc::now().date_naive())
    }

    fn stats_on(&self, date: NaiveDate) -> HashMap<String, u64> {
        let counters = self.counters.lock().expect("usage counter lock poisoned");
        counters
            .iter()
            .filter(|((_, day), _)| *day == date)
            .map(|((tier, _), count)| (tier.clone(), *count))
            .collect()
    }
}

impl Default for UsageTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DAILY_CEILING)
    }
}
