//! Plan entitlement lookup over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tubecast_core::config::BackendConfig;
use tubecast_core::error::{Result, TubecastError};
use tubecast_core::traits::PlanSource;
use tubecast_core::types::{Plan, PlanStatus, SendStatus};

/// `GET {base}/api/user/status` reply.
#[derive(Debug, Deserialize)]
struct StatusReply {
    status: SendStatus,
    #[serde(default)]
    message: String,
    #[serde(default)]
    plan: Plan,
    #[serde(default)]
    credits: u32,
}

pub struct HttpPlanSource {
    client: reqwest::Client,
    status_url: String,
    token: String,
}

impl HttpPlanSource {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: crate::build_client(timeout)?,
            status_url: crate::endpoint(base_url, "/api/user/status"),
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
}

#[async_trait]
impl PlanSource for HttpPlanSource {
    async fn plan_status(&self) -> Result<PlanStatus> {
        let reply: StatusReply = self
            .client
            .get(&self.status_url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| TubecastError::Transport(format!("Plan lookup failed: {e}")))?
            .json()
            .await
            .map_err(|e| TubecastError::Transport(format!("Malformed plan response: {e}")))?;

        if reply.status == SendStatus::Error {
            return Err(TubecastError::Backend(reply.message));
        }
        let status = PlanStatus {
            plan: reply.plan,
            credits: reply.credits,
        };
        tracing::debug!("💳 Plan: {}", status.label());
        Ok(status)
    }
}
