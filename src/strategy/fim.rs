//! Fill-In-the-Middle strategy
//!
//! Emits the `[SUFFIX]`/`[PREFIX]` prompt format that Codestral-family
//! models are trained on: code after the cursor first, then recent-edit
//! context and the code before the cursor, ending at the cursor marker.

use super::{
    recent_operations_context, ContextLimits, PromptStrategy, CURSOR_MARKER, NO_CONTEXT_SENTINEL,
};
use crate::types::{SuggestionContext, UseCaseType};

pub struct FimStrategy {
    limits: ContextLimits,
}

impl Default for FimStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl FimStrategy {
    pub fn new() -> Self {
        Self {
            limits: ContextLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ContextLimits) -> Self {
        self.limits = limits;
        self
    }
}

impl PromptStrategy for FimStrategy {
    fn name(&self) -> &'static str {
        "FIM Codestral"
    }

    fn use_case_type(&self) -> UseCaseType {
        UseCaseType::AutoTrigger
    }

    fn can_handle(&self, _context: &SuggestionContext) -> bool {
        true
    }

    fn get_system_instructions(&self) -> String {
        format!(
            r#"You are an AI assistant specialized in code completion using Fill-In-the-Middle (FIM) format.

## FIM Format Understanding
The user prompt follows the Codestral FIM format:
- [SUFFIX] marker followed by code that comes AFTER the cursor
- [PREFIX] marker followed by code that comes BEFORE the cursor
- The {CURSOR_MARKER} marker indicates the exact cursor position

## Your Task
Generate code to fill in at the cursor position. The code should:
1. Fit naturally between the prefix and suffix
2. Follow the existing code style and patterns
3. Be syntactically correct
4. Be minimal - only complete what's necessary

## Important Rules
1. Your <search> block MUST include the {CURSOR_MARKER} marker
2. Include sufficient context around the cursor to uniquely identify the location
3. The <replace> block should contain the complete text including your completion
4. Generate only ONE <change> block
5. Focus on the immediate completion need"#
        )
    }

    fn get_user_prompt(&self, context: &SuggestionContext) -> String {
        let (Some(document), Some(range)) = (&context.document, &context.range) else {
            return NO_CONTEXT_SENTINEL.to_string();
        };

        let position = range.start;
        let text_before = document.text_before(position);
        let text_after = document.text_after(position);
        let recent = recent_operations_context(context, &self.limits);

        format!("[SUFFIX]{text_after}[PREFIX]{recent}{text_before}{CURSOR_MARKER}")
    }
}
