// src/exec/recipe_executor.rs

//! Runs a recipe as a sequence of task runs.

use std::sync::Arc;

use tracing::{info, warn};

use crate::device::{DeviceStateMachine, RunId};
use crate::errors::{KitchenError, Result};
use crate::exec::task_executor::TaskExecutor;
use crate::model::{Recipe, Task};

/// Materializes recipe steps into concrete tasks.
///
/// The executor only knows operation identifiers; what a "chop" or a "boil"
/// means is up to the implementation (see [`crate::catalog::Catalog`]).
pub trait TaskFactory: Send + Sync {
    /// Whether `operation` can be materialized at all.
    fn supports(&self, operation: &str) -> bool;

    /// Build the task for one step.
    fn create(&self, operation: &str, duration_seconds: u32) -> Result<Task>;
}

/// Iterates recipe steps on top of a [`TaskExecutor`].
///
/// Pause and resume act on the step that is currently running; sequencing
/// itself is not pausable.
#[derive(Debug, Clone)]
pub struct RecipeExecutor {
    tasks: TaskExecutor,
}

impl RecipeExecutor {
    pub fn new(tasks: TaskExecutor) -> Self {
        Self { tasks }
    }

    /// Run every step of `recipe` in order.
    ///
    /// Device conditions are checked first:
    /// - `Err(DeviceNotPowered)` if the device is off.
    /// - `Err(InvalidOperation)` outside guided cooking mode or while the
    ///   device is busy.
    ///
    /// Then the recipe itself, still before anything starts:
    /// - `Err(InvalidOperation)` for a recipe without steps.
    /// - `Err(RecipeIncompatible)` if `factory` does not support one of the
    ///   step operations.
    ///
    /// Otherwise `Ok(false)` if a step was aborted (later steps are never
    /// created) and `Ok(true)` once every step completed.
    pub async fn execute(&self, recipe: &Recipe, factory: &dyn TaskFactory) -> Result<bool> {
        let machine = self.tasks.machine();
        machine.check_recipe_start(&recipe.name)?;

        if recipe.steps.is_empty() {
            return Err(KitchenError::invalid(format!(
                "recipe '{}' has no steps",
                recipe.name
            )));
        }
        if let Some(step) = recipe.steps.iter().find(|s| !factory.supports(&s.operation)) {
            return Err(KitchenError::RecipeIncompatible {
                operation: step.operation.clone(),
            });
        }

        let run = machine.begin_recipe(Arc::new(recipe.clone()))?;
        let _release = RecipeRunGuard { machine, run };
        let total = recipe.step_count();

        for (index, step) in recipe.steps.iter().enumerate() {
            if !machine.enter_step(run, index) {
                info!(recipe = %recipe.name, step = index, "recipe cancelled between steps");
                return Ok(false);
            }

            let task = match factory.create(&step.operation, step.duration_seconds) {
                Ok(task) => task,
                Err(err) => {
                    warn!(
                        recipe = %recipe.name,
                        step = index,
                        operation = %step.operation,
                        error = %err,
                        "could not materialize recipe step; ending recipe"
                    );
                    return Err(err);
                }
            };

            info!(
                recipe = %recipe.name,
                step = index + 1,
                total,
                task = %task.name(),
                "starting recipe step"
            );

            let completed = match self.tasks.run(task, Some(run)).await {
                Ok(completed) => completed,
                // Emergency stop landed between entering the step and starting it.
                Err(_) if !machine.recipe_is_current(run) => false,
                Err(err) => return Err(err),
            };
            if !completed {
                info!(recipe = %recipe.name, step = index, "recipe stopped");
                return Ok(false);
            }
        }

        info!(recipe = %recipe.name, "recipe completed");
        Ok(true)
    }
}

/// Releases the recipe reservation however `execute` exits, including when
/// its future is dropped between or during steps.
struct RecipeRunGuard<'a> {
    machine: &'a DeviceStateMachine,
    run: RunId,
}

impl Drop for RecipeRunGuard<'_> {
    fn drop(&mut self) {
        self.machine.end_recipe(self.run);
    }
}
