//! Target video preview lookup.

use std::time::Duration;

use serde::Deserialize;
use tubecast_core::config::BackendConfig;
use tubecast_core::error::{Result, TubecastError};
use tubecast_core::types::{SendStatus, VideoInfo};

/// IDs shorter than this are not looked up.
pub const MIN_VIDEO_ID_LEN: usize = 5;

/// `POST {base}/get_video_info` reply.
#[derive(Debug, Deserialize)]
struct VideoReply {
    status: SendStatus,
    #[serde(default)]
    message: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel: String,
    #[serde(default)]
    thumbnail: String,
}

pub struct HttpVideoLookup {
    client: reqwest::Client,
    info_url: String,
    token: String,
}

impl HttpVideoLookup {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: crate::build_client(timeout)?,
            info_url: crate::endpoint(base_url, "/get_video_info"),
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

    /// Title, channel and thumbnail for `video_id`.
    ///
    /// `Ok(None)` when the trimmed ID is too short to be worth a request.
    pub async fn video_info(&self, video_id: &str) -> Result<Option<VideoInfo>> {
        let video_id = video_id.trim();
        if video_id.len() < MIN_VIDEO_ID_LEN {
            return Ok(None);
        }

        let reply: VideoReply = self
            .client
            .post(&self.info_url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "video_id": video_id }))
            .send()
            .await
            .map_err(|e| TubecastError::Transport(format!("Video lookup failed: {e}")))?
            .json()
            .await
            .map_err(|e| TubecastError::Transport(format!("Malformed video response: {e}")))?;

        if reply.status == SendStatus::Error {
            return Err(TubecastError::Backend(reply.message));
        }
        tracing::debug!("🎬 {video_id}: {} — {}", reply.title, reply.channel);
        Ok(Some(VideoInfo {
            title: reply.title,
            channel: reply.channel,
            thumbnail: reply.thumbnail,
        }))
    }
}
