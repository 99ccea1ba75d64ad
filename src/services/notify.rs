// src/services/notify.rs

//! Alert delivery.

use async_trait::async_trait;
use aws_sdk_sns::Client;
use aws_sdk_sns::error::DisplayErrorContext;

use crate::error::{AppError, Result};

/// Subject line of every alert.
pub const SUBJECT: &str = "⚠️ Alerta de Seguridad Portafolio - Análisis IA";

/// Build the alert body around the model's assessment.
pub fn format_message(analysis: &str) -> String {
    format!("Se han analizado logs sospechosos.\n\nResumen de la IA:\n{analysis}")
}

/// Trait for alert destinations.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one message. Returns the destination's message id, if any.
    async fn publish(&self, subject: &str, message: &str) -> Result<Option<String>>;
}

/// Publish the assessment with the standard subject and body.
pub async fn notify(notifier: &dyn Notifier, analysis: &str) -> Result<Option<String>> {
    notifier.publish(SUBJECT, &format_message(analysis)).await
}

/// Publishes to an SNS topic.
pub struct SnsNotifier {
    client: Client,
    topic_arn: String,
}

impl SnsNotifier {
    pub fn new(client: Client, topic_arn: impl Into<String>) -> Self {
        Self {
            client,
            topic_arn: topic_arn.into(),
        }
    }

    /// Create a notifier from the shared AWS configuration.
    pub fn from_conf(sdk_config: &aws_config::SdkConfig, topic_arn: impl Into<String>) -> Self {
        Self::new(Client::new(sdk_config), topic_arn)
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn publish(&self, subject: &str, message: &str) -> Result<Option<String>> {
        let output = self
            .client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(subject)
            .message(message)
            .send()
            .await
            .map_err(|e| AppError::Sns(DisplayErrorContext(&e).to_string()))?;

        let message_id = output.message_id().map(str::to_string);
        log::info!(
            "Published alert to {} (message id: {})",
            self.topic_arn,
            message_id.as_deref().unwrap_or("-")
        );
        Ok(message_id)
    }
}

/// Prints the alert instead of sending it.
#[derive(Debug, Default)]
pub struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn publish(&self, subject: &str, message: &str) -> Result<Option<String>> {
        println!("Subject: {subject}\n\n{message}");
        Ok(None)
    }
}
