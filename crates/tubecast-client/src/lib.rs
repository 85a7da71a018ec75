//! # Tubecast Client
//!
//! Backend-facing implementations of the core collaborator traits:
//! - [`HttpTransport`] — `POST {base}/send` with form fields and a bearer token
//! - [`HttpPlanSource`] — `GET {base}/api/user/status`
//! - [`StaticIdentity`] — bearer credential from config / `TUBECAST_TOKEN`
//! - [`HttpVideoLookup`] — `POST {base}/get_video_info` preview of the target video

pub mod identity;
pub mod plan;
pub mod transport;
pub mod video;

pub use identity::StaticIdentity;
pub use plan::HttpPlanSource;
pub use transport::HttpTransport;
pub use video::HttpVideoLookup;

use std::time::Duration;

use tubecast_core::error::{Result, TubecastError};

/// Build the shared HTTP client. `timeout` bounds every request end to end.
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("Tubecast/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(|e| TubecastError::Transport(format!("Client error: {e}")))
}

/// Join a base URL and an absolute path without doubling slashes.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
pub(crate) mod test_backend {
    use axum::Router;

    /// Serve `app` on an ephemeral local port and return its base URL.
    pub async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}
