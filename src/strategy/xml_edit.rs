//! Edit-instruction strategy
//!
//! Asks the model for search/replace `<change>` blocks, the grammar the
//! streaming parser extracts. Used for explicit user requests where the
//! edit may touch code anywhere around the cursor.

use super::{
    recent_operations_context, ContextLimits, PromptStrategy, CURSOR_MARKER, NO_CONTEXT_SENTINEL,
};
use crate::types::{SuggestionContext, UseCaseType};

pub struct XmlEditStrategy {
    limits: ContextLimits,
}

impl Default for XmlEditStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlEditStrategy {
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

impl PromptStrategy for XmlEditStrategy {
    fn name(&self) -> &'static str {
        "XML Edit"
    }

    fn use_case_type(&self) -> UseCaseType {
        UseCaseType::UserRequest
    }

    fn can_handle(&self, context: &SuggestionContext) -> bool {
        context.use_case == UseCaseType::UserRequest
    }

    fn get_system_instructions(&self) -> String {
        format!(
            r#"You are an AI assistant that proposes precise code edits.

## Response Format
Respond with one or more change blocks, nothing else:

<change><search><![CDATA[exact text to find]]></search><replace><![CDATA[replacement text]]></replace></change>

## Rules
1. The <search> content must match the current code exactly, byte for byte, including whitespace and indentation
2. Wrap both sections in <![CDATA[...]]>; the content is taken verbatim, with no escaping or decoding
3. Include enough surrounding context in <search> to uniquely identify the location
4. The {CURSOR_MARKER} marker in the code shows where the user's cursor is; edits should stay close to it
5. Keep each change minimal; use several small change blocks rather than one large one
6. Do not explain the changes inside the blocks"#
        )
    }

    fn get_user_prompt(&self, context: &SuggestionContext) -> String {
        let (Some(document), Some(range)) = (&context.document, &context.range) else {
            return NO_CONTEXT_SENTINEL.to_string();
        };

        let position = range.start;
        let before = document.text_before(position);
        let after = document.text_after(position);
        let recent = recent_operations_context(context, &self.limits);

        format!("{recent}{before}{CURSOR_MARKER}{after}")
    }
}
