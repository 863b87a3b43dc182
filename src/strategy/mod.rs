//! Prompt strategies
//!
//! A strategy defines the system/user prompt contract for one use case and
//! assembles its context with the ranking and budget helpers. Strategies
//! are stateless beyond identity and fixed limits; every method is a pure
//! function of the supplied context, so selection and prompt building are
//! fully reproducible.

mod fim;
mod xml_edit;

pub use fim::FimStrategy;
pub use xml_edit::XmlEditStrategy;

use crate::context::{
    estimate_token_count, fill_prompt_with_snippets, rank_snippets, CodeSnippet, TokenBudget,
};
use crate::error::ConfigurationError;
use crate::types::{DocumentAccessor, Operation, Position, Range, SuggestionContext, UseCaseType};

/// Sentinel token marking the exact edit insertion point inside a prompt.
/// FIM responses must include it inside their search span.
pub const CURSOR_MARKER: &str = "<<<AUTOCOMPLETE_HERE>>>";

/// Returned by `get_user_prompt` when the context carries no document or
/// cursor range. Not an error; the caller decides whether to send it.
pub const NO_CONTEXT_SENTINEL: &str = "No context available for completion.";

/// Tuning knobs for context assembly, fixed per strategy instance
#[derive(Debug, Clone, Copy)]
pub struct ContextLimits {
    /// Lines taken on each side of the cursor for the comparison window
    pub window_lines: u32,
    /// Maximum recent operations included in the prompt
    pub max_operations: usize,
    /// Token budget for the recent-operations section
    pub max_tokens: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            window_lines: 5,
            max_operations: 3,
            max_tokens: TokenBudget::small().available_for_context(),
        }
    }
}

/// Capability set of a prompt builder
pub trait PromptStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn use_case_type(&self) -> UseCaseType;

    /// Whether this strategy applies to the given context
    fn can_handle(&self, context: &SuggestionContext) -> bool;

    fn get_system_instructions(&self) -> String;

    fn get_user_prompt(&self, context: &SuggestionContext) -> String;
}

/// The built-in strategies, in selection priority order.
pub fn default_strategies() -> Vec<Box<dyn PromptStrategy>> {
    vec![
        Box::new(XmlEditStrategy::new()),
        Box::new(FimStrategy::new()),
    ]
}

/// First strategy whose `can_handle` accepts the context.
///
/// No eligible strategy is a setup problem requiring user action, so it is
/// surfaced as an error rather than recovered.
pub fn select_strategy<'a>(
    strategies: &'a [Box<dyn PromptStrategy>],
    context: &SuggestionContext,
) -> Result<&'a dyn PromptStrategy, ConfigurationError> {
    strategies
        .iter()
        .map(|strategy| strategy.as_ref())
        .find(|strategy| strategy.can_handle(context))
        .ok_or(ConfigurationError::NoEligibleStrategy)
}

/// Text around the cursor used as the similarity comparison window.
pub(crate) fn window_around_cursor(
    document: &dyn DocumentAccessor,
    range: &Range,
    window_lines: u32,
) -> String {
    let position = range.start;
    let before = document.get_text(&Range::new(
        Position::new(position.line.saturating_sub(window_lines), 0),
        position,
    ));
    let after = document.get_text(&Range::new(
        position,
        Position::new(
            (position.line + window_lines).min(document.line_count()),
            0,
        ),
    ));
    format!("{before}{after}")
}

/// Recent-edit history formatted as a context section for the prompt.
///
/// Current-file and cross-file operations are ranked against the window
/// around the cursor, admitted under the token budget, and the top N are
/// formatted with a human-readable relevance percentage and an attribution
/// comment distinguishing same-file from cross-file origin. Empty when the
/// context has no usable history.
pub(crate) fn recent_operations_context(
    context: &SuggestionContext,
    limits: &ContextLimits,
) -> String {
    let (Some(document), Some(range)) = (&context.document, &context.range) else {
        return String::new();
    };

    let mut operations: Vec<Operation> = Vec::new();
    for op in &context.recent_operations {
        if !op.content.is_empty() {
            operations.push(Operation {
                filepath: document.filepath().to_string(),
                is_global: false,
                ..op.clone()
            });
        }
    }
    for op in &context.global_recent_operations {
        if !op.content.is_empty() {
            operations.push(Operation {
                is_global: true,
                ..op.clone()
            });
        }
    }
    if operations.is_empty() {
        return String::new();
    }

    let snippets: Vec<CodeSnippet> = operations
        .iter()
        .map(|op| CodeSnippet::new(op.content.clone(), op.filepath.clone()))
        .collect();
    let window = window_around_cursor(document.as_ref(), range, limits.window_lines);
    let ranked = rank_snippets(&snippets, &window);
    let admitted = fill_prompt_with_snippets(ranked, limits.max_tokens, estimate_token_count);

    let mut parts: Vec<String> = Vec::new();
    for snippet in admitted.iter().take(limits.max_operations) {
        let Some(op) = operations
            .iter()
            .find(|op| op.content == snippet.content && op.filepath == snippet.filepath)
        else {
            continue;
        };
        let relevance = (snippet.score * 100.0).round() as u32;
        if op.is_global {
            let filename = op.filepath.rsplit('/').next().unwrap_or(&op.filepath);
            parts.push(format!(
                "// Recent in {}: {} (relevance: {}%)\n{}",
                filename, op.description, relevance, snippet.content
            ));
        } else {
            parts.push(format!(
                "// Recent: {} (relevance: {}%)\n{}",
                op.description, relevance, snippet.content
            ));
        }
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!("{}\n\n", parts.join("\n\n"))
    }
}
