// src/models/mod.rs

//! Domain models for the triage pipeline.

mod config;
mod entry;
mod event;
mod log_row;

// Re-export all public types
pub use config::{Config, InferenceConfig, NotifyConfig, TriageConfig};
pub use entry::{Detection, ScanReport, SuspiciousEntry, render};
pub use event::{ObjectRef, S3Notification, decode_object_key};
pub use log_row::{
    COL_IP, COL_METHOD, COL_PATH, COL_STATUS, COL_USER_AGENT, Field, HeaderIndex, LogRow,
};
