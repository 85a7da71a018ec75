//! Shared data model — send jobs, verdicts, plans, attempt records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Auto mode never waits less than this between attempts.
pub const MIN_INTERVAL_SECS: u64 = 5;

/// Single send or repeated auto mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendMode {
    Single,
    Auto,
}

/// Where the message lands on the target video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Top-level comment thread.
    #[default]
    Comment,
    /// Live chat of an active broadcast.
    Live,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Comment => "comment",
            MessageKind::Live => "live",
        }
    }
}

/// Form data forwarded verbatim to the send endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendPayload {
    pub video_id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

impl SendPayload {
    pub fn new(video_id: impl Into<String>, message: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            video_id: video_id.into(),
            message: message.into(),
            kind,
        }
    }

    /// Form fields as the backend expects them.
    pub fn form_fields(&self) -> [(&'static str, &str); 3] {
        [
            ("video_id", self.video_id.as_str()),
            ("message", self.message.as_str()),
            ("type", self.kind.as_str()),
        ]
    }
}

/// Immutable parameters of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendJobConfig {
    pub mode: SendMode,
    /// Only meaningful in auto mode.
    pub repeat_count: u32,
    /// Only meaningful in auto mode.
    pub interval_secs: u64,
    pub payload: SendPayload,
}

impl SendJobConfig {
    pub fn single(payload: SendPayload) -> Self {
        Self {
            mode: SendMode::Single,
            repeat_count: 1,
            interval_secs: 0,
            payload,
        }
    }

    pub fn auto(payload: SendPayload, repeat_count: u32, interval_secs: u64) -> Self {
        Self {
            mode: SendMode::Auto,
            repeat_count,
            interval_secs,
            payload,
        }
    }

    /// Resolved attempt count.
    pub fn total(&self) -> u32 {
        match self.mode {
            SendMode::Single => 1,
            SendMode::Auto => self.repeat_count,
        }
    }
}

/// `status` field of a send response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendStatus {
    Success,
    Error,
}

/// Well-formed reply from the send endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResponse {
    pub status: SendStatus,
    pub message: String,
}

impl SendResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self { status: SendStatus::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { status: SendStatus::Error, message: message.into() }
    }
}

/// Why the validator blocked a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    #[default]
    None,
    ContainsLink,
    ContainsForbiddenTerm,
}

/// Outcome of validating the current message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub allowed: bool,
    pub reason: BlockReason,
    /// Advisory only, never blocks.
    pub caps_warning: bool,
    /// The forbidden term that fired, if any.
    pub matched_term: Option<String>,
}

impl ValidationVerdict {
    pub fn allowed(caps_warning: bool) -> Self {
        Self {
            allowed: true,
            reason: BlockReason::None,
            caps_warning,
            matched_term: None,
        }
    }

    pub fn blocked(reason: BlockReason, caps_warning: bool, matched_term: Option<String>) -> Self {
        Self {
            allowed: false,
            reason,
            caps_warning,
            matched_term,
        }
    }

    /// Inline message shown next to the input.
    pub fn inline_message(&self) -> Option<String> {
        match self.reason {
            BlockReason::ContainsLink => Some("Links are not allowed in messages.".into()),
            BlockReason::ContainsForbiddenTerm => Some(match &self.matched_term {
                Some(term) => format!("Forbidden term: \"{term}\"."),
                None => "Message contains a forbidden term.".into(),
            }),
            BlockReason::None if self.caps_warning => {
                Some("Too many capital letters may look like spam.".into())
            }
            BlockReason::None => None,
        }
    }
}

impl Default for ValidationVerdict {
    fn default() -> Self {
        Self::allowed(false)
    }
}

/// Subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    #[default]
    Free,
    Pro,
}

/// Current plan and remaining quota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlanStatus {
    #[serde(default)]
    pub plan: Plan,
    #[serde(default)]
    pub credits: u32,
}

impl PlanStatus {
    /// Auto mode is a PRO feature.
    pub fn allows_auto_mode(&self) -> bool {
        self.plan == Plan::Pro
    }

    /// Free accounts with three credits or fewer get a reminder.
    pub fn is_low_on_credits(&self) -> bool {
        self.plan != Plan::Pro && self.credits <= 3
    }

    pub fn label(&self) -> String {
        let name = match self.plan {
            Plan::Pro => "PRO 💎",
            Plan::Free => "Free",
        };
        format!("{name} ({} credits)", self.credits)
    }
}

/// Styling of one recorded attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Success,
    Failed,
}

/// What happened on one attempt of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub attempt_index: u32,
    pub total: u32,
    pub mode: SendMode,
    pub message: String,
    pub outcome: AttemptOutcome,
    pub at: DateTime<Utc>,
}

impl AttemptRecord {
    /// `"[i/total] message"` in auto mode, plain message otherwise.
    pub fn display_text(&self) -> String {
        match self.mode {
            SendMode::Auto => format!("[{}/{}] {}", self.attempt_index, self.total, self.message),
            SendMode::Single => self.message.clone(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == AttemptOutcome::Success
    }
}

/// A reusable message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Preview of the target video, shown before sending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub title: String,
    pub channel: String,
    #[serde(default)]
    pub thumbnail: String,
}

/// Authentication state reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    SignedIn { uid: String, token: String },
    SignedOut,
}
