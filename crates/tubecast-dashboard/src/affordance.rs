//! Submit button state, derived from the guard verdict and the scheduler phase.

use serde::Serialize;
use tubecast_core::types::ValidationVerdict;
use tubecast_scheduler::SchedulerPhase;

/// What the submit control should look like right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitAffordance {
    pub label: String,
    /// Starting a new job is not possible. Either a blocking verdict or a
    /// running job is enough to disable it.
    pub disabled: bool,
    /// A stop request would be accepted.
    pub can_stop: bool,
}

impl SubmitAffordance {
    pub fn compute(verdict: &ValidationVerdict, phase: SchedulerPhase, running: bool) -> Self {
        let label = match phase {
            SchedulerPhase::Idle => "Send".to_string(),
            SchedulerPhase::Requesting => "Sending...".to_string(),
            SchedulerPhase::Sending { .. } => "Stop automation".to_string(),
            SchedulerPhase::CountingDown { remaining_secs, .. } => {
                format!("Stop (next in {remaining_secs}s)")
            }
            SchedulerPhase::Stopping => "Stopping...".to_string(),
        };
        let can_stop = running
            && matches!(
                phase,
                SchedulerPhase::Sending { .. } | SchedulerPhase::CountingDown { .. }
            );
        Self {
            label,
            disabled: running || !verdict.allowed,
            can_stop,
        }
    }
}
