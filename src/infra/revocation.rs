//! Token revocation store.
//!
//! Holds the identifiers (`jti`) of tokens revoked by logout. The trait is
//! async so the in-process set can be swapped for an external store without
//! touching callers.

use async_trait::async_trait;
use dashmap::DashSet;

use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Set of revoked token identifiers
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TokenRevocationStore: Send + Sync {
    /// Whether the token identifier has been revoked
    async fn contains(&self, jti: &str) -> AppResult<bool>;

    /// Revoke a token identifier. Revoking twice is a no-op.
    async fn add(&self, jti: String) -> AppResult<()>;
}

/// Process-local revocation set. Entries live until the process exits.
#[derive(Debug, Default)]
pub struct InMemoryRevocationStore {
    revoked: DashSet<String>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }
}

#[async_trait]
impl TokenRevocationStore for InMemoryRevocationStore {
    async fn contains(&self, jti: &str) -> AppResult<bool> {
        Ok(self.revoked.contains(jti))
    }

    async fn add(&self, jti: String) -> AppResult<()> {
        if self.revoked.insert(jti) {
            tracing::debug!(revoked = self.revoked.len(), "Token revoked");
        }
        Ok(())
    }
}
