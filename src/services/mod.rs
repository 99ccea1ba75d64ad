//! Service layer for the triage pipeline.
//!
//! This module contains the outbound collaborators:
//! - Model analysis (`Analyzer`, backed by Bedrock)
//! - Alert delivery (`Notifier`, backed by SNS)

pub mod inference;
pub mod notify;

pub use inference::{Analyzer, BedrockAnalyzer};
pub use notify::{Notifier, SnsNotifier, StdoutNotifier};
