//! Send transport — delivers one attempt to the backend.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{SendPayload, SendResponse};

/// Posts a payload to the send endpoint.
///
/// `Ok` carries any well-formed reply, including `status = error`.
/// `Err` is reserved for transport-level failures (network, timeout, parse).
#[async_trait]
pub trait SendTransport: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, payload: &SendPayload) -> Result<SendResponse>;
}
