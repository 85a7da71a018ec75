//! # Tubecast Scheduler
//!
//! Drives one send job at a time: a single attempt, or an auto-mode run of
//! attempts separated by a one-second-granularity countdown.
//!
//! ## Design Principles
//! - One active job per scheduler — admission is a compare-and-swap, not a lock
//! - Stop is cooperative: observed after the in-flight send, or at the next second
//! - Transport failures are recorded per attempt, never retried, never fatal
//! - Time comes from an injected [`Clock`] — tests run on tokio's paused clock
//!
//! ## Phases
//! ```text
//! Idle ──submit──▶ Requesting (single) ───────────────────────────▶ Idle
//!   │
//!   └──submit──▶ Sending ──▶ CountingDown(n..1) ──▶ Sending ... ──▶ Idle
//!                   │               │
//!                   └──stop──▶ Stopping ──(attempt/tick done)──────▶ Idle
//! ```

pub mod engine;
pub mod history;
pub mod jobs;
pub mod store;
pub mod timer;

pub use engine::{JobHandle, SendScheduler};
pub use history::AttemptHistory;
pub use jobs::{JobRejection, JobReport, SchedulerPhase, SendJobState};
pub use store::FileTemplateStore;
pub use timer::{Clock, Countdown, TokioClock};
