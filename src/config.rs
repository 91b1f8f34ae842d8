use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

/// Tuning knobs for the segmenter.
///
/// Defaults reproduce the standard marker priority: two or more markers of a
/// convention are trusted outright, a single dot or step-colon marker is used
/// only when nothing repeats.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SegmenterConfig {
    /// Text before the first marker becomes a step only when it has strictly
    /// more whitespace-separated tokens than this
    #[serde(default = "default_preamble_min_tokens")]
    pub preamble_min_tokens: usize,
    /// Marker count at which a convention is trusted outright
    #[serde(default = "default_confident_matches")]
    pub confident_matches: usize,
    /// Marker count for the lone dot / step-colon strategies
    #[serde(default = "default_tentative_matches")]
    pub tentative_matches: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            preamble_min_tokens: default_preamble_min_tokens(),
            confident_matches: default_confident_matches(),
            tentative_matches: default_tentative_matches(),
        }
    }
}

// Default value functions
fn default_preamble_min_tokens() -> usize {
    3
}

fn default_confident_matches() -> usize {
    2
}

fn default_tentative_matches() -> usize {
    1
}

impl SegmenterConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with PASTE_RECIPE__ prefix
    /// 2. paste_recipe.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: PASTE_RECIPE__PREAMBLE_MIN_TOKENS
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Parse configuration from TOML text, filling missing keys with defaults.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

/// Load configuration from file and environment variables
///
/// See [`SegmenterConfig::load`] for the source priority.
pub fn load_config() -> Result<SegmenterConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("paste_recipe").required(false))
        // Use double underscore for nested keys: PASTE_RECIPE__PREAMBLE_MIN_TOKENS
        .add_source(
            Environment::with_prefix("PASTE_RECIPE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = SegmenterConfig::default();
        assert_eq!(config.preamble_min_tokens, 3);
        assert_eq!(config.confident_matches, 2);
        assert_eq!(config.tentative_matches, 1);
    }

    #[test]
    fn test_from_toml_overrides_single_field() {
        let config = SegmenterConfig::from_toml_str("preamble_min_tokens = 5").unwrap();
        assert_eq!(config.preamble_min_tokens, 5);
        assert_eq!(config.confident_matches, 2);
        assert_eq!(config.tentative_matches, 1);
    }

    #[test]
    fn test_from_empty_toml_uses_defaults() {
        let config = SegmenterConfig::from_toml_str("").unwrap();
        assert_eq!(config, SegmenterConfig::default());
    }

    #[test]
    fn test_from_toml_rejects_wrong_type() {
        let result = SegmenterConfig::from_toml_str("confident_matches = \"many\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_without_file() {
        // No paste_recipe.toml ships with the crate, so defaults must load
        // unless the environment overrides them
        let result = load_config();
        assert!(result.is_ok());
    }
}
