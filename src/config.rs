//! Runtime configuration loaded from the environment.
//!
//! Every knob here has a default so the binary starts in a bare
//! environment. Provider credentials are owned by the clients that need
//! them ([`crate::llm::OpenAiClient`], [`crate::store::SessionStore`]) and
//! are validated when those clients are constructed.

use std::env;

use crate::dialogue::DEFAULT_DAILY_CEILING;

const ENV_PREMIUM_FLAG: &str = "ENABLE_GPT5_WHEN_AVAILABLE";
const ENV_DAILY_CEILING: &str = "MAX_DAILY_AI_REQUESTS";
const ENV_BIND_ADDR: &str = "SMARTSTOCKS_BIND_ADDR";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

/// Application-level settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether the gpt-5 tier may be used once the provider starts serving
    /// it. Only the literal `false` in `ENABLE_GPT5_WHEN_AVAILABLE`
    /// disables it.
    pub gpt5_enabled: bool,
    /// Per-tier daily usage ceiling (`MAX_DAILY_AI_REQUESTS`).
    pub daily_ceiling: u64,
    /// Address the HTTP API binds to (`SMARTSTOCKS_BIND_ADDR`).
    pub bind_addr: String,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self {
            gpt5_enabled: premium_flag(env::var(ENV_PREMIUM_FLAG).ok().as_deref()),
            daily_ceiling: daily_ceiling(env::var(ENV_DAILY_CEILING).ok().as_deref()),
            bind_addr: env::var(ENV_BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        }
    }
}

fn premium_flag(raw: Option<&str>) -> bool {
    raw != Some("false")
}

/// Unset or unparseable ceilings fall back to [`DEFAULT_DAILY_CEILING`].
fn daily_ceiling(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_DAILY_CEILING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premium_flag_defaults_on() {
        assert!(premium_flag(None));
    }

    #[test]
    fn premium_flag_only_literal_false_disables() {
        assert!(!premium_flag(Some("false")));
        assert!(premium_flag(Some("true")));
        assert!(premium_flag(Some("FALSE")));
        assert!(premium_flag(Some("0")));
        assert!(premium_flag(Some("")));
    }

    #[test]
    fn daily_ceiling_parses_numbers() {
        assert_eq!(daily_ceiling(Some("50")), 50);
        assert_eq!(daily_ceiling(Some("0")), 0);
    }

    #[test]
    fn daily_ceiling_falls_back_to_default() {
        assert_eq!(daily_ceiling(None), DEFAULT_DAILY_CEILING);
        assert_eq!(daily_ceiling(Some("not-a-number")), DEFAULT_DAILY_CEILING);
        assert_eq!(daily_ceiling(Some("-3")), DEFAULT_DAILY_CEILING);
    }
}
