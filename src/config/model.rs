// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::catalog::Catalog;
use crate::model::{Recipe, RecipeId};
use crate::types::{Difficulty, Mode, Ramp};

/// Configuration exactly as read from a TOML file.
///
/// ```toml
/// [device]
/// tick_ms = 100
/// ambient_temperature = 20
/// initial_mode = "manual"
///
/// [operation.boil]
/// duration = 600
/// temperature = 100
///
/// [[recipe]]
/// id = 1
/// name = "Tomato sauce"
/// steps = [{ operation = "chop", duration = 20 }]
/// ```
///
/// All sections are optional. Turn it into a [`ConfigFile`] with
/// `ConfigFile::try_from`, which runs validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub device: DeviceSection,

    /// Preset overrides from `[operation.<id>]`, keyed by operation id.
    #[serde(default)]
    pub operation: BTreeMap<String, OperationConfig>,

    /// Factory recipes from `[[recipe]]`.
    #[serde(default)]
    pub recipe: Vec<RecipeConfig>,
}

/// `[device]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceSection {
    /// Period of the execution tick in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Temperature readout while nothing is heating.
    #[serde(default = "default_ambient_temperature")]
    pub ambient_temperature: u32,

    #[serde(default)]
    pub initial_mode: Mode,
}

fn default_tick_ms() -> u64 {
    100
}

fn default_ambient_temperature() -> u32 {
    20
}

impl Default for DeviceSection {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            ambient_temperature: default_ambient_temperature(),
            initial_mode: Mode::default(),
        }
    }
}

/// `[operation.<id>]` section.
///
/// Every field is optional; missing ones keep the built-in preset value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationConfig {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Default duration in seconds for manual runs.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub speed: Option<u32>,
    #[serde(default)]
    pub temperature: Option<u32>,
    #[serde(default)]
    pub ramp: Option<Ramp>,
}

/// One `[[recipe]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeConfig {
    pub id: RecipeId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub ingredients: Vec<IngredientConfig>,
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

fn default_servings() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngredientConfig {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StepConfig {
    pub operation: String,
    /// Seconds.
    pub duration: u32,
    #[serde(default)]
    pub description: Option<String>,
}

/// Device-level settings after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSettings {
    pub tick: Duration,
    pub ambient_temperature: u32,
    pub initial_mode: Mode,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        let raw = DeviceSection::default();
        Self {
            tick: Duration::from_millis(raw.tick_ms),
            ambient_temperature: raw.ambient_temperature,
            initial_mode: raw.initial_mode,
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (or the loader helpers),
/// so a `ConfigFile` always has a positive tick, a catalog without zero
/// durations and recipes whose steps the catalog can run.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub device: DeviceSettings,
    pub catalog: Catalog,
    pub recipes: Vec<Recipe>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        device: DeviceSettings,
        catalog: Catalog,
        recipes: Vec<Recipe>,
    ) -> Self {
        Self {
            device,
            catalog,
            recipes,
        }
    }

    pub fn recipe(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }
}
