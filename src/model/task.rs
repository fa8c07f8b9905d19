// src/model/task.rs

use std::time::Duration;

use crate::errors::{KitchenError, Result};
use crate::types::Ramp;

/// Immutable description of one timed operation.
///
/// Built with [`Task::new`] plus the `with_*` helpers; once handed to an
/// executor it is shared read-only for the length of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    name: String,
    description: String,
    duration_seconds: u32,
    target_speed: Option<u32>,
    target_temperature: Option<u32>,
    ramp: Ramp,
}

impl Task {
    /// Create a task with no parameter targets.
    ///
    /// Fails if `duration_seconds` is zero.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        duration_seconds: u32,
    ) -> Result<Self> {
        let name = name.into();
        if duration_seconds == 0 {
            return Err(KitchenError::ConfigError(format!(
                "task '{name}' must have a duration greater than 0 seconds"
            )));
        }

        Ok(Self {
            name,
            description: description.into(),
            duration_seconds,
            target_speed: None,
            target_temperature: None,
            ramp: Ramp::default(),
        })
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.target_speed = Some(speed);
        self
    }

    pub fn with_temperature(mut self, temperature: u32) -> Self {
        self.target_temperature = Some(temperature);
        self
    }

    pub fn with_ramp(mut self, ramp: Ramp) -> Self {
        self.ramp = ramp;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration_seconds))
    }

    pub fn target_speed(&self) -> Option<u32> {
        self.target_speed
    }

    pub fn target_temperature(&self) -> Option<u32> {
        self.target_temperature
    }

    pub fn ramp(&self) -> Ramp {
        self.ramp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_is_rejected() {
        let err = Task::new("Chop", "", 0).unwrap_err();
        assert!(matches!(err, KitchenError::ConfigError(_)));
    }

    #[test]
    fn builder_helpers_set_targets() {
        let task = Task::new("Boil", "Boil water", 600)
            .unwrap()
            .with_temperature(100)
            .with_speed(1)
            .with_ramp(Ramp::Step);

        assert_eq!(task.duration(), Duration::from_secs(600));
        assert_eq!(task.target_temperature(), Some(100));
        assert_eq!(task.target_speed(), Some(1));
        assert_eq!(task.ramp(), Ramp::Step);
    }
}
