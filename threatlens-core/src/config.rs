//! Configuration management

use crate::error::{ErrorContext, ThreatlensError, ThreatlensResult};
use crate::types::{LlmSettings, ReportSettings, ThreatlensConfig};

use std::path::Path;

impl Default for ThreatlensConfig {
    fn default() -> Self {
        Self {
            llm: LlmSettings {
                model: "claude-sonnet-4-20250514".to_string(),
                base_url: "https://api.anthropic.com".to_string(),
                temperature: 0.0,
                max_tokens: 16000,
                force_messages: false,
            },
            report: ReportSettings {
                renderer_path: "wkhtmltopdf".to_string(),
                company_name: None,
                footer_text: None,
            },
            logging: crate::logging::LoggingConfig::default(),
        }
    }
}

impl ThreatlensConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ThreatlensResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ThreatlensError::Config {
            message: format!("Failed to read config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("read_file")
                .with_suggestion("Check if the config file exists and is readable"),
        })?;

        let config: ThreatlensConfig =
            toml::from_str(&content).map_err(|e| ThreatlensError::Config {
                message: format!("Failed to parse config: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("config")
                    .with_operation("parse_toml")
                    .with_suggestion("Check TOML syntax in config file"),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ThreatlensResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ThreatlensError::Config {
            message: format!("Failed to serialize config: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config").with_operation("serialize_toml"),
        })?;

        std::fs::write(path, content).map_err(|e| ThreatlensError::Config {
            message: format!("Failed to write config file: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("config")
                .with_operation("write_file")
                .with_suggestion("Check if the directory exists and is writable"),
        })?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> ThreatlensResult<()> {
        if self.llm.model.trim().is_empty() {
            return Err(ThreatlensError::Config {
                message: "LLM model must not be empty".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set llm.model to a valid model identifier"),
            });
        }

        if self.llm.max_tokens == 0 {
            return Err(ThreatlensError::Config {
                message: "LLM max_tokens must be greater than 0".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set llm.max_tokens to a positive value"),
            });
        }

        if !(0.0..=1.0).contains(&self.llm.temperature) {
            return Err(ThreatlensError::Config {
                message: "LLM temperature must be between 0.0 and 1.0".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set llm.temperature within [0.0, 1.0]"),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ThreatlensConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.llm.model.contains("claude"));
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("threatlens.toml");

        let mut config = ThreatlensConfig::default();
        config.llm.temperature = 0.2;
        config.report.company_name = Some("Acme Security".to_string());
        config.save_to_file(&path).unwrap();

        let loaded = ThreatlensConfig::from_file(&path).unwrap();
        assert_eq!(loaded.llm.temperature, 0.2);
        assert_eq!(loaded.report.company_name.as_deref(), Some("Acme Security"));
    }

    #[test]
    fn test_invalid_temperature_rejected() {
        let mut config = ThreatlensConfig::default();
        config.llm.temperature = 2.5;
        assert!(config.validate().is_err());
    }
}
