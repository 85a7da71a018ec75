//! Plan entitlement source.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::PlanStatus;

/// Reports the caller's plan tier and remaining credits.
#[async_trait]
pub trait PlanSource: Send + Sync {
    async fn plan_status(&self) -> Result<PlanStatus>;
}
