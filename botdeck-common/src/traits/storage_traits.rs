// File: botdeck-common/src/traits/storage_traits.rs

use async_trait::async_trait;
use crate::error::Error;

/// Persistent key/value storage for session state (tokens, expiries,
/// cached profile blobs). Injected wherever session state is touched so
/// tests can substitute an in-memory implementation.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;
    async fn set(&self, key: &str, value: &str) -> Result<(), Error>;
    async fn remove(&self, key: &str) -> Result<(), Error>;
}
