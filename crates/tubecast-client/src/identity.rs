//! Identity from a pre-issued bearer token.

use async_trait::async_trait;
use tubecast_core::config::BackendConfig;
use tubecast_core::traits::IdentityProvider;
use tubecast_core::types::AuthState;

/// Signed in whenever a non-empty token is configured.
pub struct StaticIdentity {
    uid: String,
    token: String,
}

impl StaticIdentity {
    pub fn new(uid: &str, token: &str) -> Self {
        Self {
            uid: uid.to_string(),
            token: token.trim().to_string(),
        }
    }

    /// Token from `[backend] token` (already overridden by `TUBECAST_TOKEN`),
    /// uid from `TUBECAST_UID` or `"local"`.
    pub fn from_config(config: &BackendConfig) -> Self {
        let uid = std::env::var("TUBECAST_UID").unwrap_or_else(|_| "local".into());
        Self::new(&uid, &config.token)
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn auth_state(&self) -> AuthState {
        if self.token.is_empty() {
            AuthState::SignedOut
        } else {
            AuthState::SignedIn {
                uid: self.uid.clone(),
                token: self.token.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_token_is_signed_out() {
        assert_eq!(StaticIdentity::new("u1", "  ").auth_state().await, AuthState::SignedOut);
    }

    #[tokio::test]
    async fn test_token_signs_in() {
        let state = StaticIdentity::new("u1", "abc").auth_state().await;
        assert_eq!(
            state,
            AuthState::SignedIn { uid: "u1".into(), token: "abc".into() }
        );
    }
}
