// src/exec/mod.rs

//! Execution layer.
//!
//! - [`ticker`] provides the `TickSource` / `Ticker` abstraction driving the
//!   timing loop, with a tokio interval implementation for production.
//! - [`task_executor`] runs one task, committing each tick to the device state
//!   machine.
//! - [`recipe_executor`] sequences recipe steps through the task executor and
//!   defines the `TaskFactory` collaborator it materializes steps with.

pub mod recipe_executor;
pub mod task_executor;
pub mod ticker;

pub use recipe_executor::{RecipeExecutor, TaskFactory};
pub use task_executor::TaskExecutor;
pub use ticker::{IntervalTickSource, TickSource, Ticker};
