// src/device/mod.rs

//! Device lifecycle and shared state.
//!
//! - [`lifecycle`] is the pure transition table (`Off / On / Running / Paused`).
//! - [`state`] holds the device state snapshot and notification payloads.
//! - [`observer`] fans notifications out to subscribers.
//! - [`machine`] owns the state behind a lock and enforces every transition.

pub mod lifecycle;
pub mod machine;
pub mod observer;
pub mod state;

pub use lifecycle::{Command, Lifecycle};
pub use machine::{DeviceStateMachine, RunId, TickOutcome};
pub use observer::SubscriptionId;
pub use state::{DeviceState, Readouts, StepChange};
