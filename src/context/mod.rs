//! Context selection for outbound prompts
//!
//! Candidate code snippets (recent edits, cross-file history) are scored
//! against the code around the cursor and admitted under a token budget.
//! Everything here is pure and deterministic: the same inputs always select
//! the same context.

mod budget;
mod ranking;

pub use budget::{estimate_token_count, fill_prompt_with_snippets, TokenBudget};
pub use ranking::{
    deduplicate_snippets, jaccard_similarity, rank_snippets, symbols_for_snippet, CodeSnippet,
    RankedSnippet,
};
