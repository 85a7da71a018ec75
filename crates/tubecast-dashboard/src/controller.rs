//! Dashboard controller — explicit command dispatch into guard and scheduler.

use std::sync::Arc;

use tubecast_core::config::SchedulerConfig;
use tubecast_core::traits::PlanSource;
use tubecast_core::types::{MessageKind, SendJobConfig, SendPayload, ValidationVerdict};
use tubecast_guard::MessageGuard;
use tubecast_scheduler::{JobHandle, JobRejection, SendScheduler};

use crate::affordance::SubmitAffordance;
use crate::session::Session;

/// Shown when a plan without auto mode engages the toggle.
pub const AUTO_MODE_ADVISORY: &str = "Auto mode is available on the PRO plan only.";

/// User intents, as a front end reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Edit(String),
    ToggleAuto(bool),
    SetRepeat { count: u32, interval_secs: u64 },
    Submit { video_id: String, kind: MessageKind },
    Stop,
}

/// Result of engaging or releasing the auto toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Enabled,
    Disabled,
    /// Toggle reverted to off; carries the advisory to show.
    Denied(String),
}

/// Result of a submit.
pub enum SubmitOutcome {
    Started(JobHandle),
    /// A job was running; submit acted as stop.
    StopRequested,
    /// The guard verdict blocks dispatch. Nothing was sent.
    Blocked(ValidationVerdict),
    Rejected(JobRejection),
}

impl std::fmt::Debug for SubmitOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitOutcome::Started(_) => write!(f, "Started"),
            SubmitOutcome::StopRequested => write!(f, "StopRequested"),
            SubmitOutcome::Blocked(v) => f.debug_tuple("Blocked").field(v).finish(),
            SubmitOutcome::Rejected(r) => f.debug_tuple("Rejected").field(r).finish(),
        }
    }
}

/// Result of dispatching any [`Command`].
#[derive(Debug)]
pub enum Outcome {
    Verdict(ValidationVerdict),
    Toggle(ToggleOutcome),
    Submit(SubmitOutcome),
    /// Stop command; whether a job was running.
    Stop(bool),
    Updated,
}

/// One dashboard instance: one guard, one scheduler, one job at a time.
pub struct Dashboard {
    session: Session,
    guard: MessageGuard,
    scheduler: SendScheduler,
    plans: Arc<dyn PlanSource>,
    text: String,
    verdict: ValidationVerdict,
    auto_mode: bool,
    repeat_count: u32,
    interval_secs: u64,
}

impl Dashboard {
    pub fn new(
        session: Session,
        guard: MessageGuard,
        scheduler: SendScheduler,
        plans: Arc<dyn PlanSource>,
        defaults: &SchedulerConfig,
    ) -> Self {
        Self {
            session,
            guard,
            scheduler,
            plans,
            text: String::new(),
            verdict: ValidationVerdict::default(),
            auto_mode: false,
            repeat_count: defaults.default_repeat_count.max(1),
            interval_secs: defaults.default_interval_secs,
        }
    }

    pub async fn dispatch(&mut self, command: Command) -> Outcome {
        match command {
            Command::Edit(text) => Outcome::Verdict(self.edit(text)),
            Command::ToggleAuto(on) => Outcome::Toggle(self.toggle_auto(on).await),
            Command::SetRepeat { count, interval_secs } => {
                self.set_repeat(count, interval_secs);
                Outcome::Updated
            }
            Command::Submit { video_id, kind } => Outcome::Submit(self.submit(&video_id, kind)),
            Command::Stop => Outcome::Stop(self.stop()),
        }
    }

    /// Replace the message text and recompute the verdict.
    pub fn edit(&mut self, text: impl Into<String>) -> ValidationVerdict {
        self.text = text.into();
        self.verdict = self.guard.validate(&self.text);
        if !self.verdict.allowed {
            tracing::debug!("🛡️ Message blocked: {:?}", self.verdict.reason);
        }
        self.verdict.clone()
    }

    /// Engage or release auto mode. Entitlement is checked here, not at submit.
    pub async fn toggle_auto(&mut self, on: bool) -> ToggleOutcome {
        if !on {
            self.auto_mode = false;
            return ToggleOutcome::Disabled;
        }
        match self.plans.plan_status().await {
            Ok(status) if status.allows_auto_mode() => {
                self.auto_mode = true;
                ToggleOutcome::Enabled
            }
            Ok(status) => {
                tracing::info!("🔒 Auto mode denied for {} on {}", self.session.uid, status.label());
                self.auto_mode = false;
                ToggleOutcome::Denied(AUTO_MODE_ADVISORY.to_string())
            }
            Err(e) => {
                tracing::warn!("⚠️ Plan lookup failed, auto mode stays off: {e}");
                self.auto_mode = false;
                ToggleOutcome::Denied(AUTO_MODE_ADVISORY.to_string())
            }
        }
    }

    /// Auto-mode parameters. Checked against the floor at submit, never clamped.
    pub fn set_repeat(&mut self, count: u32, interval_secs: u64) {
        self.repeat_count = count;
        self.interval_secs = interval_secs;
    }

    /// Start a job, or stop the running one.
    pub fn submit(&self, video_id: &str, kind: MessageKind) -> SubmitOutcome {
        if self.scheduler.is_running() {
            self.scheduler.stop();
            return SubmitOutcome::StopRequested;
        }
        if !self.verdict.allowed {
            return SubmitOutcome::Blocked(self.verdict.clone());
        }

        let payload = SendPayload::new(video_id, self.text.clone(), kind);
        let config = if self.auto_mode {
            SendJobConfig::auto(payload, self.repeat_count, self.interval_secs)
        } else {
            SendJobConfig::single(payload)
        };
        match self.scheduler.start(config) {
            Ok(handle) => SubmitOutcome::Started(handle),
            Err(rejection) => {
                tracing::info!("🚫 Job not started: {rejection}");
                SubmitOutcome::Rejected(rejection)
            }
        }
    }

    pub fn stop(&self) -> bool {
        self.scheduler.stop()
    }

    pub fn affordance(&self) -> SubmitAffordance {
        SubmitAffordance::compute(&self.verdict, self.scheduler.phase(), self.scheduler.is_running())
    }

    pub fn verdict(&self) -> &ValidationVerdict {
        &self.verdict
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn auto_mode(&self) -> bool {
        self.auto_mode
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn scheduler(&self) -> &SendScheduler {
        &self.scheduler
    }
}
