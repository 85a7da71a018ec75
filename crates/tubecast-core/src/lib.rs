//! # Tubecast Core
//!
//! Shared building blocks for every Tubecast crate:
//! - [`config`] — TOML configuration (`~/.tubecast/config.toml`)
//! - [`error`] — the crate-wide error enum
//! - [`types`] — send jobs, payloads, verdicts, plans, attempt records
//! - [`traits`] — collaborator seams (transport, identity, plan, templates)

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::TubecastConfig;
pub use error::{Result, TubecastError};
