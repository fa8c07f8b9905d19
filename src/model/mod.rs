// src/model/mod.rs

//! Data entities consumed by the device engine.
//!
//! - [`task`] describes one timed operation.
//! - [`recipe`] holds recipes, their steps and ingredients.
//! - [`progress`] contains the percentage / remaining-time / interpolation math
//!   used while a task runs.

pub mod progress;
pub mod recipe;
pub mod task;

pub use recipe::{Ingredient, Recipe, RecipeId, RecipeStep};
pub use task::Task;
