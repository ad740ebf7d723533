#![forbid(unsafe_code)]
//! focal-core: data model, mutation engine, and persistence backends for
//! the focal task manager.
//!
//! # Conventions
//!
//! - **Errors**: typed [`error::CoreError`] with stable machine-readable
//!   codes; `anyhow::Result` only at config-loading edges.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).
//! - **Time**: every mutation entry point takes an explicit `now` so
//!   behavior is deterministic under test.

pub mod capture;
pub mod config;
pub mod error;
pub mod model;
pub mod persist;
pub mod portable;
pub mod review;
pub mod session;
pub mod store;
pub mod undo;
pub mod verify;

pub use error::{CoreError, EntityKind, ErrorCode};
pub use session::Session;
pub use store::{NewTask, Snapshot, Store};
