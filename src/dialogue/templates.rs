//! Canned fallback lines served when a live completion is unavailable.

use rand::Rng;

use super::types::{Animation, DialogueResult, Emotion};

/// Tag reported in [`DialogueResult::model`] for canned output.
pub const TEMPLATE_MODEL_TAG: &str = "template";

const TEMPLATES: [(&str, Emotion, Animation); 3] = [
    (
        "株価の動きって本当に興味深いですね！",
        Emotion::Happy,
        Animation::Nod,
    ),
    (
        "今の市場状況、少し心配になっちゃいます...",
        Emotion::Worried,
        Animation::Idle,
    ),
    (
        "一緒に分析してみましょうか？",
        Emotion::Confident,
        Animation::Point,
    ),
];

/// Uniformly random canned result. Never fails and never costs tokens.
pub fn fallback_dialogue() -> DialogueResult {
    fallback_dialogue_with(&mut rand::thread_rng())
}

/// Canned result chosen by `rng`; deterministic under a seeded generator.
pub fn fallback_dialogue_with<R: Rng + ?Sized>(rng: &mut R) -> DialogueResult {
    let (dialogue, emotion, animation) = TEMPLATES[rng.gen_range(0..TEMPLATES.len())];
    DialogueResult {
        dialogue: dialogue.to_string(),
        emotion,
        animation,
        model: TEMPLATE_MODEL_TAG.to_string(),
        tokens: 0,
    }
}
