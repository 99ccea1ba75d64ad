// src/lambda/mod.rs

//! AWS Lambda handler for S3 log uploads.
//!
//! Each invocation:
//! 1. Reads bucket and key from the first S3 record
//! 2. Fetches and scans the log
//! 3. Asks Bedrock for an assessment if anything was flagged
//! 4. Publishes the assessment to SNS
//!
//! Failures are logged once and returned to the runtime, so the invocation
//! is recorded as failed.

use std::time::Instant;

use lambda_runtime::{Error as LambdaError, LambdaEvent};
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::config::load_lambda_config;
use crate::error::Result;
use crate::models::{Config, ObjectRef, S3Notification};
use crate::pipeline::{TriageOutcome, run_triage};
use crate::services::{Analyzer, BedrockAnalyzer, Notifier, SnsNotifier};
use crate::storage::{LogSource, S3LogSource};

/// Collaborators shared by every invocation of a warm container.
pub struct App {
    pub config: Config,
    pub source: Box<dyn LogSource>,
    pub analyzer: Box<dyn Analyzer>,
    pub notifier: Box<dyn Notifier>,
}

impl App {
    /// Build the AWS-backed collaborators from the environment.
    pub async fn from_env() -> Result<Self> {
        let config = load_lambda_config()?;
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        let topic_arn = config.notify.topic_arn()?.to_string();
        Ok(Self {
            source: Box::new(S3LogSource::from_conf(&sdk_config)),
            analyzer: Box::new(BedrockAnalyzer::from_conf(
                &sdk_config,
                config.inference.clone(),
            )),
            notifier: Box::new(SnsNotifier::from_conf(&sdk_config, topic_arn)),
            config,
        })
    }
}

/// Lambda response payload.
#[derive(Debug, Serialize)]
pub struct TriageResponse {
    /// Object that was triaged
    pub object: ObjectRef,

    #[serde(flatten)]
    pub outcome: TriageOutcome,

    /// Execution time in milliseconds
    pub execution_time_ms: u64,
}

/// Main Lambda handler function.
#[instrument(skip(event, app))]
pub async fn handler(
    event: LambdaEvent<S3Notification>,
    app: &App,
) -> std::result::Result<TriageResponse, LambdaError> {
    let (notification, context) = event.into_parts();
    info!(
        "Handling request {} with {} record(s)",
        context.request_id,
        notification.records.len()
    );

    process(&notification, app).await.map_err(|e| {
        error!("Triage failed: {}", e);
        LambdaError::from(e)
    })
}

/// Internal triage logic.
pub async fn process(notification: &S3Notification, app: &App) -> Result<TriageResponse> {
    let start = Instant::now();
    let object = notification.first_object()?;

    let outcome = run_triage(
        &app.config,
        app.source.as_ref(),
        app.analyzer.as_ref(),
        app.notifier.as_ref(),
        &object,
    )
    .await?;

    let execution_time_ms = start.elapsed().as_millis() as u64;
    info!("Triage of {} finished in {}ms: {:?}", object, execution_time_ms, outcome);

    Ok(TriageResponse {
        object,
        outcome,
        execution_time_ms,
    })
}
