//! Persona prompts for the Rei character.
//!
//! The system prompt pins the persona and the JSON output contract; the
//! user prompt carries the market-data snippet, truncated to a character
//! budget keyed by importance.

use super::types::Importance;

/// Tiers that get the expanded persona description.
const ADVANCED_TIERS: [&str; 2] = ["gpt-5", "gpt-4o"];

/// Context budget in characters for high-importance requests.
const DETAIL_CONTEXT_CHARS: usize = 500;
/// Context budget for everything else.
const BRIEF_CONTEXT_CHARS: usize = 200;

const ADVANCED_TRAITS: &str = "\
高度な感情理解と一貫性のある人格表現で、以下の特徴を持ちます：
- 深い共感力と細やかな感情表現
- 株価情報に基づく論理的かつ直感的なアドバイス
- ユーザーとの長期的な関係性を意識した発言";

const BASIC_TRAITS: &str = "\
以下の基本的な特徴を持ちます：
- 親しみやすく優しい性格
- 株価情報に興味を持つ";

fn is_advanced(tier: &str) -> bool {
    ADVANCED_TIERS.contains(&tier)
}

/// Persona system prompt for `tier`.
pub fn system_prompt(tier: &str) -> String {
    let traits = if is_advanced(tier) {
        ADVANCED_TRAITS
    } else {
        BASIC_TRAITS
    };
    format!(
        r#"あなたは「れい」という22歳の女性キャラクターです。
{traits}

JSON形式で回答してください：
{{
  "dialogue": "セリフ（100-200文字）",
  "emotion": "感情状態（normal/happy/worried/confident/shy）",
  "animation": "アニメーション（idle/wave/point/nod）"
}}"#
    )
}

/// User prompt carrying `context`, truncated by character count.
pub fn user_prompt(context: &str, importance: Importance) -> String {
    let budget = if importance == Importance::High {
        DETAIL_CONTEXT_CHARS
    } else {
        BRIEF_CONTEXT_CHARS
    };
    let snippet: String = context.chars().take(budget).collect();
    let caution = if importance == Importance::High {
        "\n重要な判断を含む場合は慎重に回答"
    } else {
        ""
    };
    format!(
        r#"株価情報: {snippet}

上記の情報に基づいて、れいらしく自然に反応してください。
重要度: {importance}{caution}"#,
        importance = importance.as_str(),
    )
}
