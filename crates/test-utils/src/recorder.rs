use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use kitchenbot::Robot;
use kitchenbot::device::{Lifecycle, Readouts, StepChange};
use kitchenbot::errors::{KitchenError, Result};
use kitchenbot::exec::TaskFactory;
use kitchenbot::model::Task;

/// Everything a robot reports to its observers, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    State(Lifecycle),
    Progress(u8),
    Parameters(Readouts),
    Step(StepChange),
}

/// Subscribes to every notification stream of a robot and keeps the events.
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventRecorder {
    pub fn attach(robot: &Robot) -> Self {
        let recorder = Self::default();

        let events = Arc::clone(&recorder.events);
        robot.subscribe_state(move |s| events.lock().unwrap().push(Event::State(*s)));
        let events = Arc::clone(&recorder.events);
        robot.subscribe_progress(move |p| events.lock().unwrap().push(Event::Progress(*p)));
        let events = Arc::clone(&recorder.events);
        robot.subscribe_parameters(move |r| events.lock().unwrap().push(Event::Parameters(*r)));
        let events = Arc::clone(&recorder.events);
        robot.subscribe_steps(move |c| events.lock().unwrap().push(Event::Step(c.clone())));

        recorder
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn states(&self) -> Vec<Lifecycle> {
        self.filter(|e| match e {
            Event::State(s) => Some(*s),
            _ => None,
        })
    }

    pub fn progress(&self) -> Vec<u8> {
        self.filter(|e| match e {
            Event::Progress(p) => Some(*p),
            _ => None,
        })
    }

    pub fn readouts(&self) -> Vec<Readouts> {
        self.filter(|e| match e {
            Event::Parameters(r) => Some(*r),
            _ => None,
        })
    }

    pub fn step_indexes(&self) -> Vec<usize> {
        self.filter(|e| match e {
            Event::Step(c) => Some(c.index),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    fn filter<T>(&self, f: impl Fn(&Event) -> Option<T>) -> Vec<T> {
        self.events.lock().unwrap().iter().filter_map(f).collect()
    }
}

/// Task factory over a fixed operation table that records every `create`.
#[derive(Clone, Default)]
pub struct RecordingFactory {
    operations: BTreeMap<String, (Option<u32>, Option<u32>)>,
    failing: HashSet<String>,
    created: Arc<Mutex<Vec<String>>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Support `operation` with no speed or temperature targets.
    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operations.insert(operation.to_string(), (None, None));
        self
    }

    pub fn with_heating(mut self, operation: &str, temperature: u32) -> Self {
        self.operations
            .insert(operation.to_string(), (None, Some(temperature)));
        self
    }

    /// Claim to support `operation` but fail when asked to create it.
    pub fn with_failing(mut self, operation: &str) -> Self {
        self.operations.insert(operation.to_string(), (None, None));
        self.failing.insert(operation.to_string());
        self
    }

    /// Operations passed to `create`, in call order.
    pub fn created(&self) -> Vec<String> {
        self.created.lock().unwrap().clone()
    }
}

impl TaskFactory for RecordingFactory {
    fn supports(&self, operation: &str) -> bool {
        self.operations.contains_key(operation)
    }

    fn create(&self, operation: &str, duration_seconds: u32) -> Result<Task> {
        self.created.lock().unwrap().push(operation.to_string());

        if self.failing.contains(operation) {
            return Err(KitchenError::Other(anyhow::anyhow!(
                "no attachment fitted for {operation}"
            )));
        }
        let (speed, temperature) =
            self.operations
                .get(operation)
                .copied()
                .ok_or_else(|| KitchenError::RecipeIncompatible {
                    operation: operation.to_string(),
                })?;

        let mut task = Task::new(operation, "recorded", duration_seconds)?;
        if let Some(speed) = speed {
            task = task.with_speed(speed);
        }
        if let Some(temperature) = temperature {
            task = task.with_temperature(temperature);
        }
        Ok(task)
    }
}
