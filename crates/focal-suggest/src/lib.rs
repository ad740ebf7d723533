#![forbid(unsafe_code)]
//! focal-suggest: the "what now" engine.
//!
//! Given the user's current context (available time, energy level, and any
//! blockers), rank the incomplete tasks and return a short list of
//! suggestions.
//!
//! # Conventions
//!
//! - **Errors**: the ranking is total — no failure paths.
//! - **Logging**: `tracing` macros (`debug!`).

pub mod context;
pub mod rank;

pub use context::{Context, TimeWindow};
pub use rank::{DEFAULT_SUGGESTION_LIMIT, suggest, suggest_with_limit};
