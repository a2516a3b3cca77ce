//! Access-token acquisition for the backend API.
//!
//! Token issuance itself is owned by an external identity provider; this
//! module only defines the seam the transport pulls credentials through.
//! Tokens are short-lived, so [`TokenProvider::access_token`] is called once
//! per request and the result is never cached by the transport.

use async_trait::async_trait;

use super::backend::TransportError;

// ---------------------------------------------------------------------------
// TokenProvider
// ---------------------------------------------------------------------------

/// Supplies a fresh bearer token for each outbound request.
///
/// Implementors must be `Send + Sync` so they can be shared as
/// `Arc<dyn TokenProvider>` between the transport and the polling tasks.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a currently-valid access token.
    ///
    /// Called before every request; implementations that talk to an identity
    /// provider should handle their own refresh logic here rather than
    /// expecting the transport to cache anything.
    async fn access_token(&self) -> Result<String, TransportError>;
}

// ---------------------------------------------------------------------------
// StaticTokenProvider
// ---------------------------------------------------------------------------

/// Serves a fixed token on every call.
///
/// Suitable for development against a local backend and for tests; real
/// deployments wire in a provider backed by the identity service.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, TransportError> {
        Ok(self.token.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
