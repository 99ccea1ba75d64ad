//! Log object retrieval.
//!
//! A [`LogSource`] returns the raw bytes of one log object. [`decode_body`]
//! turns them into text, inflating gzip payloads first, since CloudFront
//! delivers its standard logs as `.gz`.

pub mod local;
pub mod s3;

use std::io::Read;

use async_trait::async_trait;
use flate2::read::GzDecoder;

use crate::error::Result;
use crate::models::ObjectRef;

// Re-export for convenience
pub use local::LocalLogSource;
pub use s3::S3LogSource;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Trait for log object backends.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Read the full object.
    async fn fetch_bytes(&self, object: &ObjectRef) -> Result<Vec<u8>>;

    /// Read the object and decode it as text.
    async fn fetch_text(&self, object: &ObjectRef) -> Result<String> {
        let bytes = self.fetch_bytes(object).await?;
        log::debug!("Fetched {} bytes from {}", bytes.len(), object);
        decode_body(bytes)
    }
}

/// Decode an object body as UTF-8, inflating it first if it is gzip.
pub fn decode_body(bytes: Vec<u8>) -> Result<String> {
    let bytes = if bytes.starts_with(&GZIP_MAGIC) {
        let mut decoder = GzDecoder::new(&bytes[..]);
        let mut inflated = Vec::new();
        decoder.read_to_end(&mut inflated)?;
        inflated
    } else {
        bytes
    };
    Ok(String::from_utf8(bytes)?)
}
