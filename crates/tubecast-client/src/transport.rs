//! HTTP send transport — one POST per attempt.

use std::time::Duration;

use async_trait::async_trait;
use tubecast_core::config::BackendConfig;
use tubecast_core::error::{Result, TubecastError};
use tubecast_core::traits::SendTransport;
use tubecast_core::types::{SendPayload, SendResponse};

/// Posts the payload as form data to `{base_url}/send`.
///
/// Error statuses with a well-formed JSON body (`{"status":"error",...}`) are
/// returned as `Ok`; only network, timeout and parse failures are `Err`.
pub struct HttpTransport {
    client: reqwest::Client,
    send_url: String,
    token: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: crate::build_client(timeout)?,
            send_url: crate::endpoint(base_url, "/send"),
            token: token.to_string(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            &config.token,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Same endpoint, different bearer credential.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = token.to_string();
        self
    }
}

#[async_trait]
impl SendTransport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, payload: &SendPayload) -> Result<SendResponse> {
        let start = std::time::Instant::now();
        let resp = self
            .client
            .post(&self.send_url)
            .bearer_auth(&self.token)
            .form(&payload.form_fields()[..])
            .send()
            .await
            .map_err(|e| TubecastError::Transport(format!("Send request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TubecastError::Transport(format!("Read body failed: {e}")))?;
        tracing::debug!(
            "📡 POST {} → {} ({:.0}ms)",
            self.send_url,
            status,
            start.elapsed().as_millis()
        );

        serde_json::from_str::<SendResponse>(&body).map_err(|e| {
            TubecastError::Transport(format!("Malformed send response (HTTP {status}): {e}"))
        })
    }
}
