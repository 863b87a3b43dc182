//! Model profile resolution
//!
//! Picks which provider configuration backs a suggestion session and which
//! strategy id it runs with. Providers are tried in a fixed priority order
//! so resolution is deterministic across sessions. The provider configs
//! themselves come from the host application; this module only selects
//! among them.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigurationError;
use crate::settings::SuggestionSettings;
use crate::strategy::{ContextLimits, FimStrategy, PromptStrategy, XmlEditStrategy};

/// Strategy id of the general edit-instruction strategy, the default.
pub const DEFAULT_STRATEGY_ID: &str = "xml-edit";

/// Strategy ids the crate can instantiate.
pub const KNOWN_STRATEGY_IDS: &[&str] = &["xml-edit", "fim-codestral"];

/// Providers with suggestion-tuned models, most preferred first. Configs
/// for other providers are only used when none of these are present.
const PROVIDER_PRIORITY: &[&str] = &["mistral", "kilocode", "openrouter"];

/// A provider configuration as listed by the host application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfigMeta {
    pub id: String,
    pub name: String,
    pub provider: String,
}

/// Resolved profile for one suggestion session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelProfile {
    pub id: String,
    pub name: String,
    pub api_config_id: String,
    pub strategy_id: String,
}

/// Resolve the active profile from settings and the available configs.
///
/// An unknown strategy id in settings falls back to the default with a
/// warning; zero available configs is a fatal configuration error.
pub fn resolve_profile(
    settings: &SuggestionSettings,
    configs: &[ApiConfigMeta],
) -> Result<ModelProfile, ConfigurationError> {
    if configs.is_empty() {
        return Err(ConfigurationError::NoModelProfile);
    }

    let config = PROVIDER_PRIORITY
        .iter()
        .find_map(|provider| configs.iter().find(|c| c.provider == *provider))
        .unwrap_or(&configs[0]);

    let strategy_id = match settings.strategy_id.as_deref() {
        Some(id) if KNOWN_STRATEGY_IDS.contains(&id) => id.to_string(),
        Some(id) => {
            warn!("invalid suggestion strategy id: {id}, falling back to default");
            DEFAULT_STRATEGY_ID.to_string()
        }
        None => DEFAULT_STRATEGY_ID.to_string(),
    };

    Ok(ModelProfile {
        id: "default".to_string(),
        name: format!("Auto-Selected ({})", config.provider),
        api_config_id: config.id.clone(),
        strategy_id,
    })
}

/// Instantiate the strategy a profile names. `None` for unknown ids, which
/// `resolve_profile` never produces.
pub fn strategy_for_id(id: &str, limits: ContextLimits) -> Option<Box<dyn PromptStrategy>> {
    match id {
        "xml-edit" => Some(Box::new(XmlEditStrategy::new().with_limits(limits))),
        "fim-codestral" => Some(Box::new(FimStrategy::new().with_limits(limits))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn config(id: &str, name: &str, provider: &str) -> ApiConfigMeta {
        ApiConfigMeta {
            id: id.into(),
            name: name.into(),
            provider: provider.into(),
        }
    }

    fn settings_with_strategy(id: Option<&str>) -> SuggestionSettings {
        SuggestionSettings {
            strategy_id: id.map(str::to_string),
            ..SuggestionSettings::default()
        }
    }

    #[test]
    fn test_resolves_custom_strategy_id() {
        let configs = vec![config("mistral-config", "Mistral Config", "mistral")];
        let profile =
            resolve_profile(&settings_with_strategy(Some("fim-codestral")), &configs).unwrap();

        assert_eq!(
            profile,
            ModelProfile {
                id: "default".into(),
                name: "Auto-Selected (mistral)".into(),
                api_config_id: "mistral-config".into(),
                strategy_id: "fim-codestral".into(),
            }
        );
    }

    #[test]
    fn test_default_strategy_when_none_configured() {
        let configs = vec![config("kilocode-config", "Kilocode Config", "kilocode")];
        let profile = resolve_profile(&settings_with_strategy(None), &configs).unwrap();

        assert_eq!(profile.strategy_id, DEFAULT_STRATEGY_ID);
        assert_eq!(profile.name, "Auto-Selected (kilocode)");
    }

    #[test]
    fn test_invalid_strategy_id_falls_back_to_default() {
        let configs = vec![config("openrouter-config", "OpenRouter Config", "openrouter")];
        let profile =
            resolve_profile(&settings_with_strategy(Some("invalid-strategy")), &configs).unwrap();

        assert_eq!(profile.strategy_id, DEFAULT_STRATEGY_ID);
    }

    #[test]
    fn test_provider_priority_order() {
        let configs = vec![
            config("openrouter-config", "OpenRouter Config", "openrouter"),
            config("mistral-config", "Mistral Config", "mistral"),
            config("kilocode-config", "Kilocode Config", "kilocode"),
        ];
        let profile = resolve_profile(&SuggestionSettings::default(), &configs).unwrap();

        assert_eq!(profile.api_config_id, "mistral-config");
    }

    #[test]
    fn test_unknown_provider_used_as_last_resort() {
        let configs = vec![config("local-config", "Local", "ollama")];
        let profile = resolve_profile(&SuggestionSettings::default(), &configs).unwrap();

        assert_eq!(profile.api_config_id, "local-config");
        assert_eq!(profile.name, "Auto-Selected (ollama)");
    }

    #[test]
    fn test_no_configs_is_fatal() {
        let err = resolve_profile(&SuggestionSettings::default(), &[]).unwrap_err();
        assert_eq!(err, ConfigurationError::NoModelProfile);
    }

    #[test]
    fn test_strategy_for_known_ids() {
        for id in KNOWN_STRATEGY_IDS {
            assert!(strategy_for_id(id, ContextLimits::default()).is_some());
        }
        assert!(strategy_for_id("nope", ContextLimits::default()).is_none());
    }
}
