//! Local filesystem log source.
//!
//! Resolves object keys under a root directory. The bucket name is kept for
//! display only. Used by the CLI and in tests.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ObjectRef;
use crate::storage::LogSource;

/// Local filesystem log source.
#[derive(Debug, Clone)]
pub struct LocalLogSource {
    root_dir: PathBuf,
}

impl LocalLogSource {
    /// Create a new LocalLogSource rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }
}

#[async_trait]
impl LogSource for LocalLogSource {
    async fn fetch_bytes(&self, object: &ObjectRef) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(self.path(&object.key)).await?)
    }
}
