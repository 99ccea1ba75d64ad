//! In-memory collaborators for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::ObjectRef;
use crate::services::{Analyzer, Notifier};
use crate::storage::LogSource;

/// Serves objects from a map keyed by `bucket/key`.
#[derive(Default)]
pub struct MemorySource {
    objects: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn with(mut self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) -> Self {
        self.objects.insert(format!("{bucket}/{key}"), body.into());
        self
    }
}

#[async_trait]
impl LogSource for MemorySource {
    async fn fetch_bytes(&self, object: &ObjectRef) -> Result<Vec<u8>> {
        self.objects
            .get(&format!("{}/{}", object.bucket, object.key))
            .cloned()
            .ok_or_else(|| AppError::S3(format!("NoSuchKey: {object}")))
    }
}

/// Answers every prompt with a fixed reply and records the prompts.
pub struct RecordingAnalyzer {
    reply: std::result::Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl RecordingAnalyzer {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Analyzer for RecordingAnalyzer {
    async fn analyze(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(reply) => Ok(reply.clone()),
            Err(message) => Err(AppError::Bedrock(message.clone())),
        }
    }
}

/// Records every published (subject, message) pair.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(&self, subject: &str, message: &str) -> Result<Option<String>> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((subject.to_string(), message.to_string()));
        Ok(Some(format!("msg-{}", sent.len())))
    }
}
