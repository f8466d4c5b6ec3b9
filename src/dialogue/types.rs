//! Request and result types for dialogue generation.

use serde::{Deserialize, Serialize};

/// Caller-supplied importance of a dialogue request. Influences tier
/// selection and how much context survives prompt truncation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    #[default]
    Medium,
    High,
}

impl Importance {
    /// Lowercase label, as embedded in prompts and wire payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Low => "low",
            Importance::Medium => "medium",
            Importance::High => "high",
        }
    }
}

/// Emotion attached to a generated line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    #[default]
    Normal,
    Happy,
    Worried,
    Confident,
    Shy,
}

impl Emotion {
    /// Parse a provider-supplied label. Absent or unrecognized labels read
    /// as [`Emotion::Normal`].
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw {
            Some("normal") => Emotion::Normal,
            Some("happy") => Emotion::Happy,
            Some("worried") => Emotion::Worried,
            Some("confident") => Emotion::Confident,
            Some("shy") => Emotion::Shy,
            _ => Emotion::default(),
        }
    }
}

/// Animation cue attached to a generated line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Animation {
    #[default]
    Idle,
    Wave,
    Point,
    Nod,
}

impl Animation {
    /// Parse a provider-supplied label. Absent or unrecognized labels read
    /// as [`Animation::Idle`].
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw {
            Some("idle") => Animation::Idle,
            Some("wave") => Animation::Wave,
            Some("point") => Animation::Point,
            Some("nod") => Animation::Nod,
            _ => Animation::default(),
        }
    }
}

/// A request to generate one in-character line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueRequest {
    /// Market-data snippet the character reacts to.
    pub context: String,
    #[serde(default)]
    pub importance: Importance,
}

/// A generated line plus presentation metadata.
///
/// `model` is either the tier that produced the line or the literal
/// `"template"` tag for canned output; template results always carry
/// `tokens == 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueResult {
    pub dialogue: String,
    pub emotion: Emotion,
    pub animation: Animation,
    pub model: String,
    pub tokens: u64,
}
