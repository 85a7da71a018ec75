//! Identity provider — who is signed in, and with which bearer credential.

use async_trait::async_trait;

use crate::types::AuthState;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Current authentication state. Consulted once when a dashboard loads.
    async fn auth_state(&self) -> AuthState;
}
