#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use kitchenbot::Robot;
use kitchenbot::config::DeviceSettings;
use kitchenbot::exec::TickSource;
use kitchenbot::model::{Recipe, RecipeId, RecipeStep, Task};
use kitchenbot::types::{Mode, Ramp};

/// Builder for `Task` to simplify test setup.
pub struct TaskBuilder {
    name: String,
    duration_seconds: u32,
    speed: Option<u32>,
    temperature: Option<u32>,
    ramp: Ramp,
}

impl TaskBuilder {
    pub fn new(name: &str, duration_seconds: u32) -> Self {
        Self {
            name: name.to_string(),
            duration_seconds,
            speed: None,
            temperature: None,
            ramp: Ramp::Linear,
        }
    }

    pub fn speed(mut self, speed: u32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn temperature(mut self, temperature: u32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn ramp(mut self, ramp: Ramp) -> Self {
        self.ramp = ramp;
        self
    }

    pub fn build(self) -> Task {
        let mut task = Task::new(&self.name, "test task", self.duration_seconds)
            .expect("Failed to build valid task from builder")
            .with_ramp(self.ramp);
        if let Some(speed) = self.speed {
            task = task.with_speed(speed);
        }
        if let Some(temperature) = self.temperature {
            task = task.with_temperature(temperature);
        }
        task
    }
}

/// Builder for `Recipe`.
pub struct RecipeBuilder {
    recipe: Recipe,
}

impl RecipeBuilder {
    pub fn new(id: RecipeId, name: &str) -> Self {
        Self {
            recipe: Recipe::new(id, name),
        }
    }

    pub fn step(mut self, operation: &str, duration_seconds: u32) -> Self {
        self.recipe
            .steps
            .push(RecipeStep::new(operation, duration_seconds));
        self
    }

    pub fn servings(mut self, servings: u32) -> Self {
        self.recipe.servings = servings;
        self
    }

    pub fn factory(mut self) -> Self {
        self.recipe.is_factory_default = true;
        self
    }

    pub fn build(self) -> Recipe {
        self.recipe
    }
}

/// Device settings with 500 ms ticks and a 20 °C ambient temperature.
pub fn test_settings(mode: Mode) -> DeviceSettings {
    DeviceSettings {
        tick: Duration::from_millis(500),
        ambient_temperature: 20,
        initial_mode: mode,
    }
}

/// A robot driven by `ticks`, already powered on.
pub fn powered_robot(mode: Mode, ticks: Arc<dyn TickSource>) -> Robot {
    let robot = Robot::with_tick_source(&test_settings(mode), ticks);
    assert!(robot.power_on());
    robot
}
