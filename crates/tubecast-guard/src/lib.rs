//! # Tubecast Guard
//!
//! Synchronous gate run on every edit of the message text. No I/O: the
//! verdict decides whether the submit affordance may be enabled.
//!
//! Rule order (first match wins):
//! 1. link-like text → [`BlockReason::ContainsLink`]
//! 2. forbidden term (case-insensitive) → [`BlockReason::ContainsForbiddenTerm`]
//! 3. otherwise allowed
//!
//! The caps warning is computed independently and never blocks.
//!
//! [`BlockReason::ContainsLink`]: tubecast_core::types::BlockReason::ContainsLink
//! [`BlockReason::ContainsForbiddenTerm`]: tubecast_core::types::BlockReason::ContainsForbiddenTerm

pub mod rules;

pub use rules::{FORBIDDEN_TERMS, GuardRules, MessageGuard, validate};
