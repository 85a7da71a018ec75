//! # Tubecast Dashboard
//!
//! UI-framework-agnostic controller. Front ends turn user input into
//! [`Command`]s; the controller keeps the guard verdict, the auto-mode toggle
//! and the scheduler in step, and reports what the submit button should show.
//!
//! ```text
//! Edit(text) ──▶ MessageGuard ──▶ verdict ──┐
//! ToggleAuto ──▶ PlanSource (PRO only) ─────┤
//! Submit ─────▶ verdict ok && idle ? ───────┴──▶ SendScheduler::start
//!   └── running ? ──▶ stop()
//! ```

pub mod affordance;
pub mod controller;
pub mod session;

pub use affordance::SubmitAffordance;
pub use controller::{AUTO_MODE_ADVISORY, Command, Dashboard, Outcome, SubmitOutcome, ToggleOutcome};
pub use session::Session;
