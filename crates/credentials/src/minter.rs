use async_trait::async_trait;

use crate::error::CredentialError;

/// Turns the raw bytes of a credentials file into a token string.
///
/// Implementations hold no per-credential state: every call parses the key
/// material again and produces a fresh token.
#[async_trait]
pub trait TokenMinter: Send + Sync {
    async fn mint(&self, key: &[u8]) -> Result<String, CredentialError>;
}
