//! Lambda entry point for log triage.
//!
//! Triggered by S3 object-created notifications on the log bucket.
//! Deploy with `cargo lambda build --release --features lambda`.
//!
//! ## Environment Variables
//!
//! - `SNS_TOPIC_ARN`: topic that receives alerts (required)
//! - `BEDROCK_MODEL_ID`, `BEDROCK_MAX_TOKENS`: model overrides
//! - `LOG_DELIMITER`, `TRIAGE_SAMPLE_LIMIT`: parsing overrides
//! - `RUST_LOG`: Log level (e.g., `info`, `debug`)

use lambda_runtime::service_fn;
use log_triage::lambda::{App, handler};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    // Initialize tracing for Lambda
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Log triage Lambda starting...");

    let app = App::from_env().await.inspect_err(|e| {
        tracing::error!("Initialization failed: {}", e);
    })?;

    // Run Lambda handler
    lambda_runtime::run(service_fn(|event| handler(event, &app))).await
}
