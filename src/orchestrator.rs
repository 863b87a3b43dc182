//! Suggestion orchestrator
//!
//! The single integration surface of the crate: binds one prompt strategy
//! and one streaming parser session. The editor layer builds prompts
//! through it, feeds model output chunks into it, and receives completed
//! change blocks back.

use crate::error::ConfigurationError;
use crate::profile::{resolve_profile, strategy_for_id, ApiConfigMeta};
use crate::settings::SuggestionSettings;
use crate::strategy::{default_strategies, select_strategy, PromptStrategy};
use crate::streaming::StreamingParser;
use crate::types::{ChangeBlock, SuggestionContext};

pub struct SuggestionOrchestrator {
    strategy: Box<dyn PromptStrategy>,
    parser: StreamingParser,
}

impl SuggestionOrchestrator {
    pub fn new(strategy: Box<dyn PromptStrategy>) -> Self {
        Self {
            strategy,
            parser: StreamingParser::new(),
        }
    }

    /// Pick the first built-in strategy that can handle `context`.
    pub fn for_context(context: &SuggestionContext) -> Result<Self, ConfigurationError> {
        let mut strategies = default_strategies();
        let selected = select_strategy(&strategies, context)?;
        let index = strategies
            .iter()
            .position(|s| s.name() == selected.name())
            .expect("selected strategy comes from the list");
        Ok(Self::new(strategies.remove(index)))
    }

    /// Build from persisted settings and the host's provider configs,
    /// resolving the model profile first.
    pub fn from_settings(
        settings: &SuggestionSettings,
        configs: &[ApiConfigMeta],
    ) -> Result<Self, ConfigurationError> {
        let profile = resolve_profile(settings, configs)?;
        let strategy = strategy_for_id(&profile.strategy_id, settings.context_limits())
            .ok_or(ConfigurationError::NoEligibleStrategy)?;
        Ok(Self::new(strategy))
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn system_prompt(&self) -> String {
        self.strategy.get_system_instructions()
    }

    pub fn user_prompt(&self, context: &SuggestionContext) -> String {
        self.strategy.get_user_prompt(context)
    }

    /// Start a streaming session for one completion request.
    pub fn initialize_streaming_parser(&mut self, context: SuggestionContext) {
        self.parser.initialize(context);
    }

    /// Feed one model output chunk; returns newly completed change blocks.
    pub fn process_streaming_chunk(&mut self, chunk: &str) -> Vec<ChangeBlock> {
        self.parser.process_chunk(chunk)
    }

    /// End the session and return the sanitized final set.
    pub fn finish_streaming_parser(&mut self) -> Vec<ChangeBlock> {
        self.parser.finish_stream()
    }

    /// Abandon the session, e.g. on cancellation.
    pub fn reset_streaming_parser(&mut self) {
        self.parser.reset();
    }

    /// Raw accumulated model output, for diagnostics.
    pub fn streaming_buffer(&self) -> &str {
        self.parser.buffer()
    }

    /// Changes completed so far this session, unsanitized, for diagnostics.
    pub fn streaming_completed_changes(&self) -> &[ChangeBlock] {
        self.parser.completed_changes()
    }
}
