//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Log parsing and sampling settings
    #[serde(default)]
    pub triage: TriageConfig,

    /// Bedrock model settings
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Alert destination
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    ///
    /// The topic is not checked here; commands that never publish run
    /// without one. Use [`NotifyConfig::topic_arn`] where it is needed.
    pub fn validate(&self) -> Result<()> {
        self.triage.delimiter_byte()?;
        if self.triage.sample_limit == 0 {
            return Err(AppError::config("triage.sample_limit must be > 0"));
        }
        if self.inference.model_id.trim().is_empty() {
            return Err(AppError::config("inference.model_id is empty"));
        }
        if self.inference.anthropic_version.trim().is_empty() {
            return Err(AppError::config("inference.anthropic_version is empty"));
        }
        if self.inference.max_tokens == 0 {
            return Err(AppError::config("inference.max_tokens must be > 0"));
        }
        Ok(())
    }
}

/// Log parsing and sampling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Field delimiter of the log file (`,` for CSV exports, `\t` for CloudFront)
    #[serde(default = "defaults::delimiter")]
    pub delimiter: char,

    /// Maximum number of suspicious entries quoted in the prompt
    #[serde(default = "defaults::sample_limit")]
    pub sample_limit: usize,
}

impl TriageConfig {
    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(AppError::config(format!(
                "triage.delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )))
        }
    }
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            delimiter: defaults::delimiter(),
            sample_limit: defaults::sample_limit(),
        }
    }
}

/// Bedrock model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Bedrock model identifier
    #[serde(default = "defaults::model_id")]
    pub model_id: String,

    /// Anthropic Messages API version tag sent in the request body
    #[serde(default = "defaults::anthropic_version")]
    pub anthropic_version: String,

    /// Upper bound on generated tokens
    #[serde(default = "defaults::max_tokens")]
    pub max_tokens: u32,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model_id: defaults::model_id(),
            anthropic_version: defaults::anthropic_version(),
            max_tokens: defaults::max_tokens(),
        }
    }
}

/// Alert destination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// SNS topic that receives the assessment
    #[serde(default)]
    pub topic_arn: Option<String>,
}

impl NotifyConfig {
    /// The configured topic, or an error when none is set.
    pub fn topic_arn(&self) -> Result<&str> {
        match self.topic_arn.as_deref().map(str::trim) {
            Some(arn) if !arn.is_empty() => Ok(arn),
            _ => Err(AppError::config("notify.topic_arn is not set")),
        }
    }
}

mod defaults {
    pub fn delimiter() -> char {
        ','
    }
    pub fn sample_limit() -> usize {
        30
    }

    pub fn model_id() -> String {
        "anthropic.claude-3-haiku-20240307-v1:0".into()
    }
    pub fn anthropic_version() -> String {
        "bedrock-2023-05-31".into()
    }
    pub fn max_tokens() -> u32 {
        1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn defaults_match_deployed_model() {
        let config = Config::default();
        assert_eq!(
            config.inference.model_id,
            "anthropic.claude-3-haiku-20240307-v1:0"
        );
        assert_eq!(config.inference.anthropic_version, "bedrock-2023-05-31");
        assert_eq!(config.inference.max_tokens, 1000);
        assert_eq!(config.triage.sample_limit, 30);
        assert_eq!(config.triage.delimiter_byte().unwrap(), b',');
    }

    #[test]
    fn validate_rejects_zero_sample_limit() {
        let mut config = Config::default();
        config.triage.sample_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_ascii_delimiter() {
        let mut config = Config::default();
        config.triage.delimiter = '¦';
        assert!(config.validate().is_err());
    }

    #[test]
    fn topic_arn_required_when_publishing() {
        let mut notify = NotifyConfig::default();
        assert!(notify.topic_arn().is_err());

        notify.topic_arn = Some("   ".to_string());
        assert!(notify.topic_arn().is_err());

        notify.topic_arn = Some("arn:aws:sns:us-east-1:123456789012:alerts".to_string());
        assert_eq!(
            notify.topic_arn().unwrap(),
            "arn:aws:sns:us-east-1:123456789012:alerts"
        );
    }

    #[test]
    fn partial_toml_keeps_section_defaults() {
        let config: Config = toml::from_str(
            r#"
            [triage]
            delimiter = "\t"

            [notify]
            topic_arn = "arn:aws:sns:eu-west-1:000000000000:triage"
            "#,
        )
        .unwrap();

        assert_eq!(config.triage.delimiter_byte().unwrap(), b'\t');
        assert_eq!(config.triage.sample_limit, 30);
        assert_eq!(config.inference.max_tokens, 1000);
        assert!(config.notify.topic_arn().is_ok());
    }
}
