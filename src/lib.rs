//! Inlay — streaming suggestion parsing and context assembly for AI inline
//! code completion.
//!
//! The crate consumes chunked language-model output, extracts structurally
//! valid change blocks as soon as they close, and separately selects which
//! surrounding code context to include in the outbound prompt under a token
//! budget, ranked by Jaccard similarity. Editor integration, network
//! transport and credential handling live outside; the
//! [`orchestrator::SuggestionOrchestrator`] facade is the only integration
//! point.

pub mod context;
pub mod error;
pub mod extractor;
pub mod orchestrator;
pub mod profile;
pub mod settings;
pub mod strategy;
pub mod streaming;
pub mod types;

pub use error::ConfigurationError;
pub use orchestrator::SuggestionOrchestrator;
pub use streaming::{ParserStatus, StreamingParser};
pub use types::{ChangeBlock, Operation, Position, Range, SuggestionContext, UseCaseType};
