//! Streaming suggestion parser
//!
//! Stateful session object that accumulates model output chunk by chunk and
//! surfaces change blocks as soon as they close, without waiting for the
//! full response. One parser is created per completion request and discarded
//! (or `reset`) with it.
//!
//! Parsing never fails: malformed or truncated model output is expected, and
//! the worst case is an empty result set.

use tracing::debug;

use crate::extractor::extract_change_blocks;
use crate::strategy::CURSOR_MARKER;
use crate::types::{ChangeBlock, SuggestionContext};

/// Session lifecycle. `reset()` forces `Idle` from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserStatus {
    #[default]
    Idle,
    Initialized,
    Streaming,
    Finished,
}

/// Incremental parser over a single model response stream.
///
/// Invariants: the buffer only grows during a session, `completed_changes`
/// is append-only and never reorders, and every element of it satisfies the
/// change-block grammar exactly.
pub struct StreamingParser {
    buffer: String,
    completed_changes: Vec<ChangeBlock>,
    context: Option<SuggestionContext>,
    status: ParserStatus,
}

impl Default for StreamingParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingParser {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            completed_changes: Vec::new(),
            context: None,
            status: ParserStatus::Idle,
        }
    }

    pub fn status(&self) -> ParserStatus {
        self.status
    }

    /// Start a new session: clears the buffer and any completed changes,
    /// stores the context for end-of-stream sanitization.
    pub fn initialize(&mut self, context: SuggestionContext) {
        self.buffer.clear();
        self.completed_changes.clear();
        self.context = Some(context);
        self.status = ParserStatus::Initialized;
    }

    /// Append a chunk and return the change blocks completed by it.
    ///
    /// Blocks already emitted earlier in the session are never returned
    /// again. Partially open blocks stay in the buffer for a later call.
    /// An empty chunk yields no new results.
    pub fn process_chunk(&mut self, chunk: &str) -> Vec<ChangeBlock> {
        self.buffer.push_str(chunk);
        self.status = ParserStatus::Streaming;

        let mut newly_completed = Vec::new();
        for block in extract_change_blocks(&self.buffer) {
            if !self.completed_changes.contains(&block) {
                debug!(
                    search_len = block.search.len(),
                    replace_len = block.replace.len(),
                    "completed change block"
                );
                self.completed_changes.push(block.clone());
                newly_completed.push(block);
            }
        }
        newly_completed
    }

    /// End the stream and return the sanitized final set.
    ///
    /// Sanitization drops no-op changes and changes whose search text does
    /// not exist in the live document (stale or hallucinated edits). The
    /// cursor marker is stripped from both spans first: FIM prompts require
    /// it inside the search span, but the live document never contains it.
    /// Trailing unterminated fragments in the buffer are silently dropped.
    pub fn finish_stream(&mut self) -> Vec<ChangeBlock> {
        self.status = ParserStatus::Finished;
        self.sanitized_changes()
    }

    /// Abandon the session from any state, e.g. on cancellation.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.completed_changes.clear();
        self.context = None;
        self.status = ParserStatus::Idle;
    }

    /// Raw accumulated model output, for diagnostics.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Every change completed so far this session, unsanitized.
    pub fn completed_changes(&self) -> &[ChangeBlock] {
        &self.completed_changes
    }

    fn sanitized_changes(&self) -> Vec<ChangeBlock> {
        let document_text = self
            .context
            .as_ref()
            .and_then(|context| context.document.as_ref())
            .map(|document| document.full_text());

        let mut kept = Vec::new();
        for change in &self.completed_changes {
            let search = change.search.replace(CURSOR_MARKER, "");
            let replace = change.replace.replace(CURSOR_MARKER, "");

            if search == replace {
                debug!("dropping no-op change");
                continue;
            }
            if let Some(text) = &document_text {
                if !text.contains(&search) {
                    debug!("dropping stale change: search text not in document");
                    continue;
                }
            }
            kept.push(ChangeBlock::new(search, replace));
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::{Position, Range, TextDocument, UseCaseType};

    const DOC_TEXT: &str = "fn main() {\n    foo();\n    bar();\n}\n";

    fn context() -> SuggestionContext {
        SuggestionContext::new(UseCaseType::AutoTrigger)
            .with_document(Arc::new(TextDocument::new("src/main.rs", DOC_TEXT)))
            .with_range(Range::at(Position::new(1, 4)))
    }

    fn block(search: &str, replace: &str) -> String {
        format!(
            "<change><search><![CDATA[{search}]]></search><replace><![CDATA[{replace}]]></replace></change>"
        )
    }

    #[test]
    fn test_status_transitions() {
        let mut parser = StreamingParser::new();
        assert_eq!(parser.status(), ParserStatus::Idle);

        parser.initialize(context());
        assert_eq!(parser.status(), ParserStatus::Initialized);

        parser.process_chunk("prose");
        assert_eq!(parser.status(), ParserStatus::Streaming);

        parser.finish_stream();
        assert_eq!(parser.status(), ParserStatus::Finished);

        parser.reset();
        assert_eq!(parser.status(), ParserStatus::Idle);
        assert_eq!(parser.buffer(), "");
        assert!(parser.completed_changes().is_empty());
    }

    #[test]
    fn test_block_split_across_chunks() {
        let mut parser = StreamingParser::new();
        parser.initialize(context());

        let first = parser.process_chunk("<change><search><![CDATA[foo]");
        assert!(first.is_empty());

        let second =
            parser.process_chunk("]></search><replace><![CDATA[bar]]></replace></change>");
        assert_eq!(second, vec![ChangeBlock::new("foo", "bar")]);
    }

    #[test]
    fn test_split_inside_cdata_terminator_captures_verbatim() {
        let mut parser = StreamingParser::new();
        parser.initialize(context());

        // A chunk boundary can land inside the `]]>` terminator; the extra
        // bracket belongs to the content under the first-terminator rule.
        let first = parser.process_chunk("<change><search><![CDATA[foo]");
        assert!(first.is_empty());

        let second =
            parser.process_chunk("]]></search><replace><![CDATA[bar]]></replace></change>");
        assert_eq!(second, vec![ChangeBlock::new("foo]", "bar")]);
    }

    #[test]
    fn test_empty_chunk_yields_nothing() {
        let mut parser = StreamingParser::new();
        parser.initialize(context());
        parser.process_chunk(&block("foo", "bar"));

        assert!(parser.process_chunk("").is_empty());
    }

    #[test]
    fn test_no_double_emission() {
        let mut parser = StreamingParser::new();
        parser.initialize(context());

        let first = parser.process_chunk(&block("foo", "bar"));
        assert_eq!(first.len(), 1);

        // Later chunks rescan the whole buffer but must not re-emit.
        let second = parser.process_chunk("\nsome trailing prose\n");
        assert!(second.is_empty());

        let third = parser.process_chunk(&block("bar", "baz"));
        assert_eq!(third, vec![ChangeBlock::new("bar", "baz")]);
        assert_eq!(parser.completed_changes().len(), 2);
    }

    #[test]
    fn test_chunk_split_invariance() {
        let document = format!(
            "Here is the fix:\n{}\nand also\n{}",
            block("foo()", "foo()?"),
            block("bar()", "bar().await")
        );

        let mut whole = StreamingParser::new();
        whole.initialize(context());
        whole.process_chunk(&document);
        let expected = whole.finish_stream();
        assert_eq!(expected.len(), 2);

        // Feed the same document in every possible two-way split and a
        // byte-at-a-time split; the final set must not change.
        let mut split_points: Vec<usize> = (0..=document.len())
            .filter(|i| document.is_char_boundary(*i))
            .collect();
        split_points.push(document.len());
        for at in split_points {
            let mut parser = StreamingParser::new();
            parser.initialize(context());
            parser.process_chunk(&document[..at]);
            parser.process_chunk(&document[at..]);
            assert_eq!(parser.finish_stream(), expected, "split at byte {at}");
        }

        let mut byte_wise = StreamingParser::new();
        byte_wise.initialize(context());
        for ch in document.chars() {
            byte_wise.process_chunk(&ch.to_string());
        }
        assert_eq!(byte_wise.finish_stream(), expected);
    }

    #[test]
    fn test_finish_drops_stale_changes() {
        let mut parser = StreamingParser::new();
        parser.initialize(context());
        parser.process_chunk(&block("foo();", "foo()?;"));
        parser.process_chunk(&block("does_not_exist();", "whatever();"));

        let finished = parser.finish_stream();
        assert_eq!(finished, vec![ChangeBlock::new("foo();", "foo()?;")]);
        // The unsanitized record is untouched.
        assert_eq!(parser.completed_changes().len(), 2);
    }

    #[test]
    fn test_finish_drops_noop_changes() {
        let mut parser = StreamingParser::new();
        parser.initialize(context());
        parser.process_chunk(&block("foo();", "foo();"));

        assert!(parser.finish_stream().is_empty());
    }

    #[test]
    fn test_finish_strips_cursor_marker() {
        let mut parser = StreamingParser::new();
        parser.initialize(context());
        let search = format!("    foo();{CURSOR_MARKER}\n");
        parser.process_chunk(&block(&search, "    foo();\n    qux();\n"));

        let finished = parser.finish_stream();
        assert_eq!(
            finished,
            vec![ChangeBlock::new("    foo();\n", "    foo();\n    qux();\n")]
        );
    }

    #[test]
    fn test_trailing_fragment_silently_dropped() {
        let mut parser = StreamingParser::new();
        parser.initialize(context());
        parser.process_chunk(&block("foo();", "foo()?;"));
        parser.process_chunk("<change><search><![CDATA[bar();");

        let finished = parser.finish_stream();
        assert_eq!(finished, vec![ChangeBlock::new("foo();", "foo()?;")]);
    }

    #[test]
    fn test_finish_without_document_keeps_structural_changes() {
        let mut parser = StreamingParser::new();
        parser.initialize(SuggestionContext::new(UseCaseType::UserRequest));
        parser.process_chunk(&block("anything", "something"));

        let finished = parser.finish_stream();
        assert_eq!(finished, vec![ChangeBlock::new("anything", "something")]);
    }

    #[test]
    fn test_initialize_clears_previous_session() {
        let mut parser = StreamingParser::new();
        parser.initialize(context());
        parser.process_chunk(&block("foo();", "foo()?;"));

        parser.initialize(context());
        assert_eq!(parser.buffer(), "");
        assert!(parser.completed_changes().is_empty());
        assert_eq!(parser.status(), ParserStatus::Initialized);
    }
}
