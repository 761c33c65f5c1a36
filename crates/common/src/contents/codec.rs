//! Collaborator seams for document (de)serialization and trust signing.
//!
//! The storage engines never interpret document bytes themselves; they hand
//! the body to a [`DocumentCodec`] and invoke the [`TrustSigner`] before
//! persisting. Both ship with defaults suitable for JSON documents.

use super::error::Result;

/// Encodes and decodes document bodies.
pub trait DocumentCodec: Send + Sync {
    fn encode(&self, content: &serde_json::Value) -> Result<Vec<u8>>;

    fn decode(&self, bytes: &[u8]) -> Result<serde_json::Value>;
}

/// Pretty-printed JSON with a trailing newline, matching how notebook files
/// are written on disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl DocumentCodec for JsonCodec {
    fn encode(&self, content: &serde_json::Value) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(content)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<serde_json::Value> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Trust-signing hook invoked on the document body before it is persisted.
pub trait TrustSigner: Send + Sync {
    fn sign_if_needed(&self, document: &mut serde_json::Value) -> Result<()>;
}

/// Signer that leaves documents untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSigner;

impl TrustSigner for NoopSigner {
    fn sign_if_needed(&self, _document: &mut serde_json::Value) -> Result<()> {
        Ok(())
    }
}
