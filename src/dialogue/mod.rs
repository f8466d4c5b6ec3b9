//! Dialogue generation - tiered model selection, daily quotas, fallback.
//!
//! # Key Concepts
//! - Registry: static table of completion tiers (caps, pricing, flags)
//! - Selector: probe-aware policy picking a tier per request
//! - Usage: per-tier per-day counters behind a soft ceiling
//! - Templates: canned zero-cost lines for every failure path
//! - Engine: the pipeline tying the above into one request cycle

mod engine;
mod prompt;
mod registry;
mod selector;
mod templates;
mod types;
mod usage;

pub use engine::DialogueEngine;
pub use registry::{ModelRegistry, ModelTier};
pub use selector::AvailabilityProbe;
pub use templates::{fallback_dialogue, fallback_dialogue_with, TEMPLATE_MODEL_TAG};
pub use types::{Animation, DialogueRequest, DialogueResult, Emotion, Importance};
pub use usage::{UsageTracker, DEFAULT_DAILY_CEILING};
