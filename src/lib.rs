// src/lib.rs

//! Log triage library
//!
//! Scans web-access logs for attack and reconnaissance patterns, asks a
//! hosted model for an assessment, and publishes it as an alert.

pub mod config;
pub mod error;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;

#[cfg(test)]
mod testing;
