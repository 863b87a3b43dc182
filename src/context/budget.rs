//! Token budget management
//!
//! Reserve accounting for prompt assembly plus the greedy budgeted
//! selection over ranked snippets. Token counts are estimates; real
//! tokenization varies by model.

use serde::{Deserialize, Serialize};

use super::ranking::RankedSnippet;

/// Token budget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBudget {
    /// Total tokens available for the request
    pub total: usize,
    /// Reserved for the system prompt
    pub system_reserve: usize,
    /// Reserved for the user's surrounding code
    pub user_reserve: usize,
    /// Reserved for response generation
    pub response_reserve: usize,
}

impl Default for TokenBudget {
    fn default() -> Self {
        Self {
            total: 32_000,
            system_reserve: 2_000,
            user_reserve: 1_000,
            response_reserve: 4_000,
        }
    }
}

impl TokenBudget {
    /// Budget for a small context window
    pub fn small() -> Self {
        Self {
            total: 8_000,
            system_reserve: 1_000,
            user_reserve: 500,
            response_reserve: 2_000,
        }
    }

    /// Tokens left over for ranked context snippets
    pub fn available_for_context(&self) -> usize {
        self.total
            .saturating_sub(self.system_reserve)
            .saturating_sub(self.user_reserve)
            .saturating_sub(self.response_reserve)
    }
}

/// Rough estimation: ~4 characters per token for code, rounded up.
pub fn estimate_token_count(text: &str) -> usize {
    (text.len() + 3) / 4
}

/// Greedy budgeted selection over an already-ranked list.
///
/// Walks the list in order; a snippet is accepted when its estimated cost
/// still fits the remaining budget, otherwise it is skipped — the walk does
/// not stop, a later cheaper snippet may still be admitted. The accepted
/// subset keeps its input order and never exceeds `max_tokens` in total
/// estimated cost.
pub fn fill_prompt_with_snippets<F>(
    snippets: Vec<RankedSnippet>,
    max_tokens: usize,
    estimate: F,
) -> Vec<RankedSnippet>
where
    F: Fn(&str) -> usize,
{
    let mut tokens_remaining = max_tokens;
    let mut kept = Vec::new();

    for snippet in snippets {
        let cost = estimate(&snippet.content);
        if cost <= tokens_remaining {
            tokens_remaining -= cost;
            kept.push(snippet);
        }
    }
    kept
}
