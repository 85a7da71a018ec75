//! Session bootstrap — consult the identity provider once, keep the credential.

use tubecast_core::error::{Result, TubecastError};
use tubecast_core::traits::IdentityProvider;
use tubecast_core::types::AuthState;

/// Signed-in user and the bearer credential every send uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub uid: String,
    pub token: String,
}

impl Session {
    /// Signed-out callers get no session and therefore no dashboard.
    pub async fn bootstrap(identity: &dyn IdentityProvider) -> Result<Self> {
        match identity.auth_state().await {
            AuthState::SignedIn { uid, token } => {
                tracing::info!("🔑 Signed in as {uid}");
                Ok(Self { uid, token })
            }
            AuthState::SignedOut => Err(TubecastError::Auth(
                "Not signed in — set TUBECAST_TOKEN or [backend] token".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Fixed(AuthState);

    #[async_trait]
    impl IdentityProvider for Fixed {
        async fn auth_state(&self) -> AuthState {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_signed_in() {
        let identity = Fixed(AuthState::SignedIn { uid: "u1".into(), token: "t".into() });
        let session = Session::bootstrap(&identity).await.unwrap();
        assert_eq!(session.uid, "u1");
        assert_eq!(session.token, "t");
    }

    #[tokio::test]
    async fn test_signed_out() {
        let err = Session::bootstrap(&Fixed(AuthState::SignedOut)).await.unwrap_err();
        assert!(matches!(err, TubecastError::Auth(_)));
    }
}
