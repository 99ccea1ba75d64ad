// src/config.rs

//! Configuration loading utilities.
//!
//! The Lambda reads its settings from the environment:
//!
//! - `SNS_TOPIC_ARN`: topic that receives alerts (required)
//! - `BEDROCK_MODEL_ID`: model identifier
//! - `BEDROCK_MAX_TOKENS`: upper bound on generated tokens
//! - `LOG_DELIMITER`: field delimiter of the log files (`\t` or `tab` for TSV)
//! - `TRIAGE_SAMPLE_LIMIT`: flagged rows quoted in the prompt

use crate::error::{AppError, Result};
use crate::models::Config;

pub const ENV_TOPIC_ARN: &str = "SNS_TOPIC_ARN";
pub const ENV_MODEL_ID: &str = "BEDROCK_MODEL_ID";
pub const ENV_MAX_TOKENS: &str = "BEDROCK_MAX_TOKENS";
pub const ENV_DELIMITER: &str = "LOG_DELIMITER";
pub const ENV_SAMPLE_LIMIT: &str = "TRIAGE_SAMPLE_LIMIT";

/// Load configuration suitable for the Lambda environment.
pub fn load_lambda_config() -> Result<Config> {
    let mut config = Config::default();
    apply_overrides(&mut config, |name| std::env::var(name).ok());

    config.notify.topic_arn()?;
    config.validate()?;
    Ok(config)
}

/// Override config values from a variable lookup.
///
/// Unparsable numbers are ignored with a warning and the previous value kept.
pub fn apply_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(arn) = var(ENV_TOPIC_ARN) {
        config.notify.topic_arn = Some(arn);
    }

    if let Some(model_id) = var(ENV_MODEL_ID) {
        config.inference.model_id = model_id;
    }

    if let Some(tokens) = var(ENV_MAX_TOKENS) {
        match tokens.parse() {
            Ok(n) => config.inference.max_tokens = n,
            Err(_) => log::warn!("Ignoring {ENV_MAX_TOKENS}={tokens:?}: not a number"),
        }
    }

    if let Some(limit) = var(ENV_SAMPLE_LIMIT) {
        match limit.parse() {
            Ok(n) => config.triage.sample_limit = n,
            Err(_) => log::warn!("Ignoring {ENV_SAMPLE_LIMIT}={limit:?}: not a number"),
        }
    }

    if let Some(delimiter) = var(ENV_DELIMITER) {
        match parse_delimiter(&delimiter) {
            Ok(c) => config.triage.delimiter = c,
            Err(e) => log::warn!("Ignoring {ENV_DELIMITER}: {e}"),
        }
    }
}

/// Parse a delimiter given as a single character, `\t` or `tab`.
pub fn parse_delimiter(value: &str) -> Result<char> {
    if matches!(value, r"\t" | "tab") {
        return Ok('\t');
    }

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(AppError::config(format!(
            "delimiter must be a single character, got {value:?}"
        ))),
    }
}
