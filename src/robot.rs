// src/robot.rs

//! The robot handle: one device state machine plus the executors driving it.

use std::sync::Arc;

use crate::config::DeviceSettings;
use crate::device::{
    DeviceState, DeviceStateMachine, Lifecycle, Readouts, StepChange, SubscriptionId,
};
use crate::errors::Result;
use crate::exec::{IntervalTickSource, RecipeExecutor, TaskExecutor, TaskFactory, TickSource};
use crate::model::{Recipe, Task};
use crate::types::Mode;

/// A kitchen robot.
///
/// Cloning yields another handle to the same device, so a run can be awaited
/// on one clone while another clone pauses or stops it.
#[derive(Debug, Clone)]
pub struct Robot {
    machine: DeviceStateMachine,
    tasks: TaskExecutor,
    recipes: RecipeExecutor,
}

impl Robot {
    /// Robot ticking on a tokio interval of `settings.tick`.
    pub fn new(settings: &DeviceSettings) -> Self {
        Self::with_tick_source(settings, Arc::new(IntervalTickSource::new(settings.tick)))
    }

    pub fn with_tick_source(settings: &DeviceSettings, ticks: Arc<dyn TickSource>) -> Self {
        let machine = DeviceStateMachine::new(settings.ambient_temperature, settings.initial_mode);
        let tasks = TaskExecutor::new(machine.clone(), ticks);
        let recipes = RecipeExecutor::new(tasks.clone());
        Self {
            machine,
            tasks,
            recipes,
        }
    }

    pub fn machine(&self) -> &DeviceStateMachine {
        &self.machine
    }

    /// Snapshot of the device state.
    pub fn state(&self) -> DeviceState {
        self.machine.state()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.machine.lifecycle()
    }

    pub fn mode(&self) -> Mode {
        self.machine.mode()
    }

    pub fn power_on(&self) -> bool {
        self.machine.power_on()
    }

    pub fn power_off(&self) -> Result<bool> {
        self.machine.power_off()
    }

    pub fn pause(&self) -> Result<()> {
        self.machine.pause()
    }

    pub fn resume(&self) -> Result<()> {
        self.machine.resume()
    }

    pub fn emergency_stop(&self) {
        self.machine.emergency_stop()
    }

    pub fn change_mode(&self, mode: Mode) -> Result<()> {
        self.machine.change_mode(mode)
    }

    /// Run a single task. See [`TaskExecutor::execute`].
    pub async fn execute_task(&self, task: Task) -> Result<bool> {
        self.tasks.execute(task).await
    }

    /// Run every step of a recipe. See [`RecipeExecutor::execute`].
    pub async fn execute_recipe(&self, recipe: &Recipe, factory: &dyn TaskFactory) -> Result<bool> {
        self.recipes.execute(recipe, factory).await
    }

    pub fn subscribe_state(&self, f: impl Fn(&Lifecycle) + Send + Sync + 'static) -> SubscriptionId {
        self.machine.subscribe_state(f)
    }

    pub fn subscribe_progress(&self, f: impl Fn(&u8) + Send + Sync + 'static) -> SubscriptionId {
        self.machine.subscribe_progress(f)
    }

    pub fn subscribe_parameters(
        &self,
        f: impl Fn(&Readouts) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.machine.subscribe_parameters(f)
    }

    pub fn subscribe_steps(&self, f: impl Fn(&StepChange) + Send + Sync + 'static) -> SubscriptionId {
        self.machine.subscribe_steps(f)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.machine.unsubscribe(id)
    }
}
