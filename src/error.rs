//! Error taxonomy
//!
//! Parsing and streaming never fail — a grammar miss is just the absence of
//! a result, and sanitization drops are silent. The only fatal condition is
//! a configuration problem the user has to fix.

use thiserror::Error;

/// Setup problems requiring user action. Unlike parse misses these are
/// surfaced to the caller with an actionable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("no prompt strategy can handle this suggestion context; check the configured strategy id")]
    NoEligibleStrategy,
    #[error("no usable model profile: configure at least one API provider before requesting suggestions")]
    NoModelProfile,
}
