//! Job definitions — per-job state, observable phases, admission rules.

use serde::{Deserialize, Serialize};
use tubecast_core::types::{AttemptRecord, MIN_INTERVAL_SECS, SendJobConfig, SendMode};

/// Mutable state of the job currently driven by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendJobState {
    pub running: bool,
    /// 1-based, never above `total`.
    pub attempt_index: u32,
    pub total: u32,
    /// Only set between attempts in auto mode.
    pub remaining_countdown_secs: Option<u64>,
}

impl SendJobState {
    pub fn new(config: &SendJobConfig) -> Self {
        Self {
            running: true,
            attempt_index: 1,
            total: config.total(),
            remaining_countdown_secs: None,
        }
    }

    pub fn is_last_attempt(&self) -> bool {
        self.attempt_index >= self.total
    }

    /// Move to the next attempt. Returns `false` if already on the last one.
    pub fn advance(&mut self) -> bool {
        if self.is_last_attempt() {
            return false;
        }
        self.attempt_index += 1;
        self.remaining_countdown_secs = None;
        true
    }
}

/// What the scheduler is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum SchedulerPhase {
    #[default]
    Idle,
    /// Single-mode attempt in flight.
    Requesting,
    /// Auto-mode attempt in flight.
    Sending { attempt_index: u32, total: u32 },
    /// Waiting between auto-mode attempts.
    CountingDown {
        attempt_index: u32,
        total: u32,
        remaining_secs: u64,
    },
    /// Stop requested; waiting for the current attempt or tick to finish.
    Stopping,
}

impl SchedulerPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, SchedulerPhase::Idle)
    }
}

/// Why a job was not started. Nothing is sent when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobRejection {
    #[error("A send job is already running")]
    AlreadyRunning,

    #[error("For safety, the minimum interval is {min} seconds (got {requested})")]
    IntervalTooShort { requested: u64, min: u64 },

    #[error("Repeat count must be at least 1")]
    InvalidRepeatCount,
}

/// Check a job's parameters. Intervals below the floor are rejected, never clamped.
pub fn check_config(config: &SendJobConfig) -> Result<(), JobRejection> {
    if config.mode == SendMode::Auto {
        if config.interval_secs < MIN_INTERVAL_SECS {
            return Err(JobRejection::IntervalTooShort {
                requested: config.interval_secs,
                min: MIN_INTERVAL_SECS,
            });
        }
        if config.repeat_count == 0 {
            return Err(JobRejection::InvalidRepeatCount);
        }
    }
    Ok(())
}

/// Summary of a finished job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReport {
    pub mode: SendMode,
    pub total: u32,
    pub attempts: Vec<AttemptRecord>,
    /// Stop was requested before all attempts ran.
    pub stopped_early: bool,
}

impl JobReport {
    pub fn succeeded(&self) -> usize {
        self.attempts.iter().filter(|a| a.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempts.len() - self.succeeded()
    }

    pub fn last(&self) -> Option<&AttemptRecord> {
        self.attempts.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubecast_core::types::{MessageKind, SendPayload};

    fn payload() -> SendPayload {
        SendPayload::new("abc123", "hi", MessageKind::Comment)
    }

    #[test]
    fn test_interval_floor() {
        let err = check_config(&SendJobConfig::auto(payload(), 3, 4)).unwrap_err();
        assert_eq!(err, JobRejection::IntervalTooShort { requested: 4, min: 5 });
        assert!(check_config(&SendJobConfig::auto(payload(), 3, 5)).is_ok());
    }

    #[test]
    fn test_single_ignores_auto_fields() {
        let mut config = SendJobConfig::single(payload());
        config.interval_secs = 0;
        config.repeat_count = 0;
        assert!(check_config(&config).is_ok());
    }

    #[test]
    fn test_zero_repeat_rejected() {
        let err = check_config(&SendJobConfig::auto(payload(), 0, 10)).unwrap_err();
        assert_eq!(err, JobRejection::InvalidRepeatCount);
    }

    #[test]
    fn test_state_never_passes_total() {
        let mut state = SendJobState::new(&SendJobConfig::auto(payload(), 2, 5));
        assert_eq!(state.attempt_index, 1);
        assert!(state.advance());
        assert_eq!(state.attempt_index, 2);
        assert!(!state.advance());
        assert_eq!(state.attempt_index, 2);
    }

    #[test]
    fn test_phase_json() {
        let phase = SchedulerPhase::CountingDown { attempt_index: 1, total: 3, remaining_secs: 4 };
        let json = serde_json::to_value(phase).unwrap();
        assert_eq!(json["phase"], "counting_down");
        assert_eq!(json["remaining_secs"], 4);
    }
}
