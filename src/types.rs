//! Core data types for suggestion sessions
//!
//! Positions and ranges are plain `{line, column}` values with explicit
//! arithmetic. Columns count characters within a line; lines are
//! newline-separated. The editor layer owns the real document; this crate
//! only sees it through [`DocumentAccessor`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A zero-based cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const ZERO: Position = Position { line: 0, column: 0 };

    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A half-open span between two positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Empty range sitting at a single position (a bare cursor)
    pub fn at(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, position: Position) -> bool {
        position >= self.start && position < self.end
    }
}

/// Read-only view of the live document held by the editor layer
pub trait DocumentAccessor: Send + Sync {
    /// Text within `range`, clamped to the document bounds
    fn get_text(&self, range: &Range) -> String;

    /// Number of lines in the document
    fn line_count(&self) -> u32;

    /// Path of the backing file, used for snippet attribution
    fn filepath(&self) -> &str;

    fn full_text(&self) -> String {
        self.get_text(&Range::new(
            Position::ZERO,
            Position::new(self.line_count(), 0),
        ))
    }

    fn text_before(&self, position: Position) -> String {
        self.get_text(&Range::new(Position::ZERO, position))
    }

    fn text_after(&self, position: Position) -> String {
        self.get_text(&Range::new(position, Position::new(self.line_count(), 0)))
    }
}

/// In-memory document, used by tests and by callers that already hold the
/// full text as a string
#[derive(Debug, Clone)]
pub struct TextDocument {
    filepath: String,
    text: String,
}

impl TextDocument {
    pub fn new(filepath: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filepath: filepath.into(),
            text: text.into(),
        }
    }

    /// Byte offset of a position, clamped to line and document ends
    fn offset_of(&self, position: Position) -> usize {
        let mut line_start = 0;
        for _ in 0..position.line {
            match self.text[line_start..].find('\n') {
                Some(idx) => line_start += idx + 1,
                None => return self.text.len(),
            }
        }
        let line_end = self.text[line_start..]
            .find('\n')
            .map(|idx| line_start + idx)
            .unwrap_or(self.text.len());
        let line = &self.text[line_start..line_end];
        let column_offset = line
            .char_indices()
            .nth(position.column as usize)
            .map(|(idx, _)| idx)
            .unwrap_or(line.len());
        line_start + column_offset
    }
}

impl DocumentAccessor for TextDocument {
    fn get_text(&self, range: &Range) -> String {
        let start = self.offset_of(range.start);
        let end = self.offset_of(range.end);
        if start >= end {
            return String::new();
        }
        self.text[start..end].to_string()
    }

    fn line_count(&self) -> u32 {
        self.text.split('\n').count() as u32
    }

    fn filepath(&self) -> &str {
        &self.filepath
    }
}

/// A recorded recent edit usable as prompt context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub content: String,
    pub description: String,
    pub filepath: String,
    #[serde(default)]
    pub is_global: bool,
}

/// What triggered the suggestion request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseCaseType {
    /// Explicit user instruction ("refactor this", "add error handling")
    UserRequest,
    /// Automatic completion while typing
    AutoTrigger,
}

/// Snapshot of everything a prompt strategy may look at for one request.
///
/// Created together with a parser session and discarded with it.
#[derive(Clone)]
pub struct SuggestionContext {
    pub document: Option<Arc<dyn DocumentAccessor>>,
    pub range: Option<Range>,
    pub recent_operations: Vec<Operation>,
    pub global_recent_operations: Vec<Operation>,
    pub use_case: UseCaseType,
}

impl SuggestionContext {
    pub fn new(use_case: UseCaseType) -> Self {
        Self {
            document: None,
            range: None,
            recent_operations: Vec::new(),
            global_recent_operations: Vec::new(),
            use_case,
        }
    }

    pub fn with_document(mut self, document: Arc<dyn DocumentAccessor>) -> Self {
        self.document = Some(document);
        self
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_recent_operations(mut self, operations: Vec<Operation>) -> Self {
        self.recent_operations = operations;
        self
    }

    pub fn with_global_recent_operations(mut self, operations: Vec<Operation>) -> Self {
        self.global_recent_operations = operations;
        self
    }
}

/// Atomic proposed edit: replace the first occurrence of `search` with
/// `replace`. Both spans are verbatim captures, no decoding or trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeBlock {
    pub search: String,
    pub replace: String,
}

impl ChangeBlock {
    pub fn new(search: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            replace: replace.into(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.search == self.replace
    }
}
