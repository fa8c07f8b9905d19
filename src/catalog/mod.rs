// src/catalog/mod.rs

//! Operation catalog.
//!
//! The set of operations the robot knows is closed ([`OperationKind`]); what
//! each one does (default duration, speed, temperature) is configuration data
//! held in an [`OperationPreset`] table. [`Catalog`] is the default
//! [`TaskFactory`] handed to the recipe executor.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::{KitchenError, Result};
use crate::exec::TaskFactory;
use crate::model::Task;
use crate::types::Ramp;

/// Operations supported by the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperationKind {
    Chop,
    Dice,
    Knead,
    Saute,
    Boil,
    Steam,
}

impl OperationKind {
    pub const ALL: [OperationKind; 6] = [
        OperationKind::Chop,
        OperationKind::Dice,
        OperationKind::Knead,
        OperationKind::Saute,
        OperationKind::Boil,
        OperationKind::Steam,
    ];

    /// Identifier used in recipes and configuration.
    pub fn id(&self) -> &'static str {
        match self {
            OperationKind::Chop => "chop",
            OperationKind::Dice => "dice",
            OperationKind::Knead => "knead",
            OperationKind::Saute => "saute",
            OperationKind::Boil => "boil",
            OperationKind::Steam => "steam",
        }
    }

    /// Built-in preset for this operation.
    pub fn default_preset(&self) -> OperationPreset {
        let (label, description, duration, speed, temperature, ramp) = match self {
            OperationKind::Chop => ("Chop", "Fine, precise cut", 10, Some(8), None, Ramp::Step),
            OperationKind::Dice => ("Dice", "Medium-sized cubes", 8, Some(5), None, Ramp::Step),
            OperationKind::Knead => ("Knead", "Slow rotary kneading", 120, Some(2), None, Ramp::Step),
            OperationKind::Saute => ("Sauté", "Fry at 120 °C", 300, Some(1), Some(120), Ramp::Linear),
            OperationKind::Boil => ("Boil", "Boil at 100 °C", 600, Some(1), Some(100), Ramp::Linear),
            OperationKind::Steam => ("Steam", "Gentle steam cooking", 900, None, Some(100), Ramp::Linear),
        };
        OperationPreset {
            label: label.to_string(),
            description: description.to_string(),
            default_duration: duration,
            speed,
            temperature,
            ramp,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        OperationKind::ALL
            .into_iter()
            .find(|kind| kind.id() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = OperationKind::ALL.iter().map(|k| k.id()).collect();
                format!("unknown operation: {s} (expected one of {})", known.join(", "))
            })
    }
}

/// Parameters used to build the task for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationPreset {
    pub label: String,
    pub description: String,
    /// Duration used when the operation is started manually.
    pub default_duration: u32,
    pub speed: Option<u32>,
    pub temperature: Option<u32>,
    pub ramp: Ramp,
}

impl OperationPreset {
    fn to_task(&self, duration_seconds: u32) -> Result<Task> {
        let mut task = Task::new(&self.label, &self.description, duration_seconds)?.with_ramp(self.ramp);
        if let Some(speed) = self.speed {
            task = task.with_speed(speed);
        }
        if let Some(temperature) = self.temperature {
            task = task.with_temperature(temperature);
        }
        Ok(task)
    }
}

/// Mapping from operation kind to preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    presets: BTreeMap<OperationKind, OperationPreset>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// Catalog with every operation at its built-in preset.
    pub fn builtin() -> Self {
        let presets = OperationKind::ALL
            .into_iter()
            .map(|kind| (kind, kind.default_preset()))
            .collect();
        Self { presets }
    }

    pub fn empty() -> Self {
        Self {
            presets: BTreeMap::new(),
        }
    }

    /// Add or replace the preset for `kind`.
    pub fn set(&mut self, kind: OperationKind, preset: OperationPreset) {
        self.presets.insert(kind, preset);
    }

    pub fn preset(&self, kind: OperationKind) -> Option<&OperationPreset> {
        self.presets.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (OperationKind, &OperationPreset)> {
        self.presets.iter().map(|(k, p)| (*k, p))
    }

    /// Task for a manual run of `kind`, with the preset duration unless
    /// `duration_seconds` overrides it.
    pub fn preset_task(&self, kind: OperationKind, duration_seconds: Option<u32>) -> Result<Task> {
        let preset = self.preset(kind).ok_or_else(|| KitchenError::RecipeIncompatible {
            operation: kind.id().to_string(),
        })?;
        preset.to_task(duration_seconds.unwrap_or(preset.default_duration))
    }

    fn resolve(&self, operation: &str) -> Option<(OperationKind, &OperationPreset)> {
        let kind = operation.parse::<OperationKind>().ok()?;
        self.preset(kind).map(|p| (kind, p))
    }
}

impl TaskFactory for Catalog {
    fn supports(&self, operation: &str) -> bool {
        self.resolve(operation).is_some()
    }

    fn create(&self, operation: &str, duration_seconds: u32) -> Result<Task> {
        let (_, preset) = self
            .resolve(operation)
            .ok_or_else(|| KitchenError::RecipeIncompatible {
                operation: operation.to_string(),
            })?;
        preset.to_task(duration_seconds)
    }
}
