//! Scheduler Engine — runs send jobs against the transport.
//! One job at a time; stop is a flag checked between suspension points.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tubecast_core::config::SchedulerConfig;
use tubecast_core::traits::SendTransport;
use tubecast_core::types::{AttemptOutcome, AttemptRecord, SendJobConfig, SendMode, SendStatus};

use crate::history::AttemptHistory;
use crate::jobs::{JobRejection, JobReport, SchedulerPhase, SendJobState, check_config};
use crate::timer::{Clock, Countdown, TokioClock};

/// State shared by every clone of a scheduler.
struct Shared {
    /// A job has been admitted and has not yet returned to idle.
    active: AtomicBool,
    /// Cooperative flag; cleared by `stop()`.
    running: AtomicBool,
    phase: watch::Sender<SchedulerPhase>,
    history: Mutex<AttemptHistory>,
}

/// Releases the single job slot when a job ends, however it ends.
struct ActiveJob {
    shared: Arc<Shared>,
}

impl Drop for ActiveJob {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::Release);
        self.shared.phase.send_replace(SchedulerPhase::Idle);
        self.shared.active.store(false, Ordering::Release);
    }
}

/// The send scheduler. Cheap to clone; clones share the same job slot.
#[derive(Clone)]
pub struct SendScheduler {
    transport: Arc<dyn SendTransport>,
    clock: Arc<dyn Clock>,
    shared: Arc<Shared>,
}

impl SendScheduler {
    /// Create a scheduler with an explicit clock and history size.
    pub fn new(
        transport: Arc<dyn SendTransport>,
        clock: Arc<dyn Clock>,
        history_limit: usize,
    ) -> Self {
        let (phase, _) = watch::channel(SchedulerPhase::Idle);
        Self {
            transport,
            clock,
            shared: Arc::new(Shared {
                active: AtomicBool::new(false),
                running: AtomicBool::new(false),
                phase,
                history: Mutex::new(AttemptHistory::new(history_limit)),
            }),
        }
    }

    pub fn from_config(transport: Arc<dyn SendTransport>, config: &SchedulerConfig) -> Self {
        Self::new(transport, Arc::new(TokioClock), config.history_limit)
    }

    /// True from admission until the job's attempt or tick in progress completes.
    pub fn is_running(&self) -> bool {
        self.shared.active.load(Ordering::Acquire)
    }

    pub fn phase(&self) -> SchedulerPhase {
        *self.shared.phase.borrow()
    }

    /// Watch phase changes (countdown labels, stop button state).
    pub fn subscribe(&self) -> watch::Receiver<SchedulerPhase> {
        self.shared.phase.subscribe()
    }

    /// Recent attempts across jobs, oldest first.
    pub async fn history(&self) -> Vec<AttemptRecord> {
        self.shared.history.lock().await.records()
    }

    /// Request a cooperative stop. Returns whether a job was running.
    ///
    /// An in-flight send is not interrupted; the job exits after it returns,
    /// or at the next countdown second.
    pub fn stop(&self) -> bool {
        if self.shared.running.swap(false, Ordering::AcqRel) {
            tracing::info!("⏹️ Stop requested — finishing current step");
            self.shared.phase.send_replace(SchedulerPhase::Stopping);
            true
        } else {
            false
        }
    }

    /// Run a job to completion on the current task.
    pub async fn run(&self, config: SendJobConfig) -> Result<JobReport, JobRejection> {
        let job = self.admit(&config)?;
        Ok(self.drive(job, config).await)
    }

    /// Admit a job and drive it on a spawned task.
    pub fn start(&self, config: SendJobConfig) -> Result<JobHandle, JobRejection> {
        let job = self.admit(&config)?;
        let scheduler = self.clone();
        let handle = tokio::spawn(async move { scheduler.drive(job, config).await });
        Ok(JobHandle { handle })
    }

    fn admit(&self, config: &SendJobConfig) -> Result<ActiveJob, JobRejection> {
        if self.is_running() {
            return Err(JobRejection::AlreadyRunning);
        }
        check_config(config)?;
        self.shared
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| JobRejection::AlreadyRunning)?;
        self.shared.running.store(true, Ordering::Release);
        Ok(ActiveJob {
            shared: self.shared.clone(),
        })
    }

    async fn drive(&self, job: ActiveJob, config: SendJobConfig) -> JobReport {
        let mut state = SendJobState::new(&config);
        let mut attempts = Vec::new();

        tracing::info!(
            "🚀 Send job started: {:?} ×{} on {} via {}",
            config.mode,
            state.total,
            config.payload.video_id,
            self.transport.name()
        );

        loop {
            self.publish(match config.mode {
                SendMode::Single => SchedulerPhase::Requesting,
                SendMode::Auto => SchedulerPhase::Sending {
                    attempt_index: state.attempt_index,
                    total: state.total,
                },
            });

            let record = self.attempt(&config, &state).await;
            self.shared.history.lock().await.record(record.clone());
            attempts.push(record);

            if config.mode == SendMode::Single {
                break;
            }
            state.running = self.keep_going();
            if !state.running || state.is_last_attempt() {
                break;
            }

            let mut countdown = Countdown::new(self.clock.as_ref(), config.interval_secs);
            let finished = countdown
                .run(
                    || self.keep_going(),
                    |remaining| {
                        state.remaining_countdown_secs = Some(remaining);
                        self.publish(SchedulerPhase::CountingDown {
                            attempt_index: state.attempt_index,
                            total: state.total,
                            remaining_secs: remaining,
                        });
                    },
                )
                .await;
            if !finished {
                state.running = false;
                break;
            }
            state.advance();
        }

        let report = JobReport {
            mode: config.mode,
            total: state.total,
            stopped_early: attempts.len() < state.total as usize,
            attempts,
        };
        tracing::info!(
            "🏁 Send job finished: {}/{} attempts ({} ok, {} failed){}",
            report.attempts.len(),
            report.total,
            report.succeeded(),
            report.failed(),
            if report.stopped_early { " — stopped" } else { "" }
        );
        drop(job);
        report
    }

    async fn attempt(&self, config: &SendJobConfig, state: &SendJobState) -> AttemptRecord {
        let (message, outcome) = match self.transport.send(&config.payload).await {
            Ok(resp) => {
                let outcome = match resp.status {
                    SendStatus::Success => AttemptOutcome::Success,
                    SendStatus::Error => AttemptOutcome::Failed,
                };
                tracing::debug!(
                    "📨 Attempt {}/{}: {:?} — {}",
                    state.attempt_index,
                    state.total,
                    resp.status,
                    resp.message
                );
                (resp.message, outcome)
            }
            Err(e) => {
                tracing::warn!(
                    "⚠️ Attempt {}/{} failed at transport level: {e}",
                    state.attempt_index,
                    state.total
                );
                (
                    format!("Connection error on attempt {}.", state.attempt_index),
                    AttemptOutcome::Failed,
                )
            }
        };

        AttemptRecord {
            attempt_index: state.attempt_index,
            total: state.total,
            mode: config.mode,
            message,
            outcome,
            at: Utc::now(),
        }
    }

    fn keep_going(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Publish a working phase unless a stop is pending.
    fn publish(&self, phase: SchedulerPhase) {
        if self.keep_going() {
            self.shared.phase.send_replace(phase);
        }
    }
}

/// Handle to a job started with [`SendScheduler::start`].
pub struct JobHandle {
    handle: JoinHandle<JobReport>,
}

impl JobHandle {
    /// Wait for the job. `None` if the task panicked or was aborted.
    pub async fn wait(self) -> Option<JobReport> {
        match self.handle.await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::warn!("⚠️ Send job task ended abnormally: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;
    use tubecast_core::error::{Result, TubecastError};
    use tubecast_core::types::{MessageKind, SendPayload, SendResponse};

    /// Replies from a script, then repeats the last entry.
    struct ScriptedTransport {
        calls: AtomicU32,
        script: Vec<std::result::Result<SendResponse, String>>,
        delay: Duration,
    }

    impl ScriptedTransport {
        fn always_ok() -> Arc<Self> {
            Self::scripted(vec![Ok(SendResponse::success("Live message sent!"))])
        }

        fn scripted(script: Vec<std::result::Result<SendResponse, String>>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                script,
                delay: Duration::ZERO,
            })
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                script: vec![Ok(SendResponse::success("ok"))],
                delay,
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SendTransport for ScriptedTransport {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn send(&self, _payload: &SendPayload) -> Result<SendResponse> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let step = self.script.get(n).or(self.script.last()).cloned();
            match step {
                Some(Ok(resp)) => Ok(resp),
                Some(Err(e)) => Err(TubecastError::Transport(e)),
                None => Err(TubecastError::Transport("empty script".into())),
            }
        }
    }

    /// Tokio clock that also counts one-second ticks.
    #[derive(Default)]
    struct CountingClock {
        ticks: AtomicU32,
    }

    #[async_trait]
    impl Clock for CountingClock {
        async fn sleep(&self, duration: Duration) {
            self.ticks.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(duration).await;
        }
    }

    fn payload() -> SendPayload {
        SendPayload::new("dQw4w9WgXcQ", "Hello chat!", MessageKind::Live)
    }

    fn scheduler(transport: Arc<ScriptedTransport>, clock: Arc<CountingClock>) -> SendScheduler {
        SendScheduler::new(transport, clock, 100)
    }

    /// Wait until the scheduler publishes a phase matching `pred`.
    async fn wait_for_phase<F>(rx: &mut watch::Receiver<SchedulerPhase>, pred: F) -> SchedulerPhase
    where
        F: Fn(&SchedulerPhase) -> bool,
    {
        *rx.wait_for(|p| pred(p)).await.unwrap()
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_auto_three_attempts_two_countdowns() {
        let transport = ScriptedTransport::always_ok();
        let clock = Arc::new(CountingClock::default());
        let sched = scheduler(transport.clone(), clock.clone());
        let start = tokio::time::Instant::now();

        let report = sched.run(SendJobConfig::auto(payload(), 3, 5)).await.unwrap();

        assert_eq!(transport.calls(), 3);
        let indices: Vec<u32> = report.attempts.iter().map(|a| a.attempt_index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert!(report.attempts.iter().all(|a| a.total == 3 && a.is_success()));
        assert_eq!(report.attempts[1].display_text(), "[2/3] Live message sent!");
        // Two countdowns of five one-second ticks.
        assert_eq!(clock.ticks.load(Ordering::SeqCst), 10);
        assert_eq!(start.elapsed(), Duration::from_secs(10));
        assert!(!report.stopped_early);
        assert!(sched.phase().is_idle());
        assert!(!sched.is_running());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_stop_during_first_countdown() {
        let transport = ScriptedTransport::always_ok();
        let clock = Arc::new(CountingClock::default());
        let sched = scheduler(transport.clone(), clock.clone());
        let mut rx = sched.subscribe();

        let handle = sched.start(SendJobConfig::auto(payload(), 3, 5)).unwrap();
        wait_for_phase(&mut rx, |p| {
            matches!(p, SchedulerPhase::CountingDown { remaining_secs: 3, .. })
        })
        .await;
        assert!(sched.stop());

        let report = handle.wait().await.unwrap();
        assert_eq!(transport.calls(), 1);
        assert_eq!(report.attempts.len(), 1);
        assert!(report.stopped_early);
        assert!(sched.phase().is_idle());
        assert!(!sched.is_running());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_stop_during_send_lets_attempt_finish() {
        let transport = ScriptedTransport::slow(Duration::from_secs(2));
        let clock = Arc::new(CountingClock::default());
        let sched = scheduler(transport.clone(), clock.clone());
        let mut rx = sched.subscribe();

        let handle = sched.start(SendJobConfig::auto(payload(), 3, 5)).unwrap();
        wait_for_phase(&mut rx, |p| matches!(p, SchedulerPhase::Sending { .. })).await;
        assert!(sched.stop());
        assert_eq!(sched.phase(), SchedulerPhase::Stopping);
        assert!(sched.is_running(), "in-flight attempt keeps the slot");

        let report = handle.wait().await.unwrap();
        assert_eq!(report.attempts.len(), 1);
        assert!(report.attempts[0].is_success());
        assert_eq!(clock.ticks.load(Ordering::SeqCst), 0, "no countdown after stop");
        assert!(sched.phase().is_idle());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_single_failure_not_retried() {
        let transport = ScriptedTransport::scripted(vec![Err("connection refused".into())]);
        let clock = Arc::new(CountingClock::default());
        let sched = scheduler(transport.clone(), clock.clone());

        let report = sched.run(SendJobConfig::single(payload())).await.unwrap();

        assert_eq!(transport.calls(), 1);
        assert_eq!(report.attempts.len(), 1);
        let attempt = &report.attempts[0];
        assert_eq!(attempt.outcome, AttemptOutcome::Failed);
        assert_eq!(attempt.message, "Connection error on attempt 1.");
        assert_eq!(attempt.display_text(), "Connection error on attempt 1.");
        assert!(!report.stopped_early);
        assert!(sched.phase().is_idle());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_auto_continues_after_failures() {
        let transport = ScriptedTransport::scripted(vec![
            Err("timeout".into()),
            Ok(SendResponse::error("API error: quotaExceeded")),
            Ok(SendResponse::success("Comment posted!")),
        ]);
        let clock = Arc::new(CountingClock::default());
        let sched = scheduler(transport.clone(), clock);

        let report = sched.run(SendJobConfig::auto(payload(), 3, 5)).await.unwrap();

        assert_eq!(report.attempts.len(), 3);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.attempts[0].message, "Connection error on attempt 1.");
        assert_eq!(report.attempts[1].display_text(), "[2/3] API error: quotaExceeded");
        assert!(report.last().unwrap().is_success());
        assert_eq!(sched.history().await.len(), 3);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_short_interval_rejected_before_send() {
        let transport = ScriptedTransport::always_ok();
        let sched = scheduler(transport.clone(), Arc::new(CountingClock::default()));

        let err = sched.run(SendJobConfig::auto(payload(), 3, 4)).await.unwrap_err();

        assert_eq!(err, JobRejection::IntervalTooShort { requested: 4, min: 5 });
        assert_eq!(transport.calls(), 0);
        assert!(!sched.is_running());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_second_job_rejected_while_running() {
        let transport = ScriptedTransport::always_ok();
        let sched = scheduler(transport.clone(), Arc::new(CountingClock::default()));
        let mut rx = sched.subscribe();

        let handle = sched.start(SendJobConfig::auto(payload(), 2, 5)).unwrap();
        wait_for_phase(&mut rx, |p| matches!(p, SchedulerPhase::CountingDown { .. })).await;

        let err = sched.run(SendJobConfig::single(payload())).await.unwrap_err();
        assert_eq!(err, JobRejection::AlreadyRunning);

        let report = handle.wait().await.unwrap();
        assert_eq!(report.attempts.len(), 2);
        assert_eq!(transport.calls(), 2);

        // The slot is free again; a fresh job starts with fresh state.
        let report = sched.run(SendJobConfig::single(payload())).await.unwrap();
        assert_eq!(report.attempts[0].attempt_index, 1);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_huge_repeat_count_stops_cleanly() {
        let transport = ScriptedTransport::always_ok();
        let sched = scheduler(transport.clone(), Arc::new(CountingClock::default()));
        let mut rx = sched.subscribe();

        let handle = sched.start(SendJobConfig::auto(payload(), u32::MAX, 5)).unwrap();
        wait_for_phase(&mut rx, |p| {
            matches!(p, SchedulerPhase::CountingDown { total: u32::MAX, .. })
        })
        .await;
        assert!(sched.stop());

        let report = handle.wait().await.unwrap();
        assert_eq!(report.attempts.len(), 1);
        assert_eq!(report.total, u32::MAX);
        assert!(report.stopped_early);
        assert!(!sched.is_running());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_stop_when_idle_is_noop() {
        let sched = scheduler(ScriptedTransport::always_ok(), Arc::new(CountingClock::default()));
        assert!(!sched.stop());
        assert!(sched.phase().is_idle());
    }
}
