// src/device/state.rs

//! Device state owned by the state machine, plus the value types carried by
//! observer notifications.

use std::sync::Arc;

use crate::device::Lifecycle;
use crate::model::{Recipe, Task};
use crate::types::Mode;

/// Live parameter readouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Readouts {
    pub speed: u32,
    pub temperature: u32,
}

impl Readouts {
    /// Readouts of an idle device: motor stopped, ambient temperature.
    pub fn baseline(ambient_temperature: u32) -> Self {
        Self {
            speed: 0,
            temperature: ambient_temperature,
        }
    }
}

/// Recipe step notification payload ("step `index + 1` of `total`").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepChange {
    pub recipe: String,
    pub index: usize,
    pub total: usize,
}

/// Snapshot of the device.
///
/// The state machine keeps the authoritative copy; callers get clones through
/// [`DeviceStateMachine::state`](crate::device::DeviceStateMachine::state).
#[derive(Debug, Clone)]
pub struct DeviceState {
    pub(crate) lifecycle: Lifecycle,
    pub(crate) mode: Mode,
    pub(crate) readouts: Readouts,
    pub(crate) ambient_temperature: u32,
    pub(crate) active_task: Option<Arc<Task>>,
    pub(crate) active_recipe: Option<Arc<Recipe>>,
    pub(crate) current_step_index: Option<usize>,
    pub(crate) progress: u8,
}

impl DeviceState {
    pub(crate) fn new(ambient_temperature: u32, mode: Mode) -> Self {
        Self {
            lifecycle: Lifecycle::Off,
            mode,
            readouts: Readouts::baseline(ambient_temperature),
            ambient_temperature,
            active_task: None,
            active_recipe: None,
            current_step_index: None,
            progress: 0,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_speed(&self) -> u32 {
        self.readouts.speed
    }

    pub fn current_temperature(&self) -> u32 {
        self.readouts.temperature
    }

    pub fn readouts(&self) -> Readouts {
        self.readouts
    }

    pub fn active_task(&self) -> Option<&Task> {
        self.active_task.as_deref()
    }

    pub fn active_recipe(&self) -> Option<&Recipe> {
        self.active_recipe.as_deref()
    }

    pub fn current_step_index(&self) -> Option<usize> {
        self.current_step_index
    }

    /// Last reported progress of the active task, 0 when idle.
    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub(crate) fn baseline(&self) -> Readouts {
        Readouts::baseline(self.ambient_temperature)
    }
}
