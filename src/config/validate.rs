// src/config/validate.rs

use std::collections::BTreeSet;
use std::time::Duration;

use crate::catalog::{Catalog, OperationKind, OperationPreset};
use crate::config::model::{
    ConfigFile, DeviceSection, DeviceSettings, OperationConfig, RawConfigFile, RecipeConfig,
};
use crate::errors::{KitchenError, Result};
use crate::exec::TaskFactory;
use crate::model::{Ingredient, Recipe, RecipeStep};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::KitchenError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let device = validate_device(&raw.device)?;
        let catalog = build_catalog(&raw)?;
        let recipes = build_recipes(&raw, &catalog)?;
        Ok(ConfigFile::new_unchecked(device, catalog, recipes))
    }
}

fn validate_device(device: &DeviceSection) -> Result<DeviceSettings> {
    if device.tick_ms == 0 {
        return Err(KitchenError::ConfigError(
            "[device].tick_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(DeviceSettings {
        tick: Duration::from_millis(device.tick_ms),
        ambient_temperature: device.ambient_temperature,
        initial_mode: device.initial_mode,
    })
}

fn build_catalog(cfg: &RawConfigFile) -> Result<Catalog> {
    let mut catalog = Catalog::builtin();
    for (key, overrides) in cfg.operation.iter() {
        let kind: OperationKind = key
            .parse()
            .map_err(|e| KitchenError::ConfigError(format!("[operation.{key}]: {e}")))?;
        let preset = apply_overrides(kind.default_preset(), overrides);
        if preset.default_duration == 0 {
            return Err(KitchenError::ConfigError(format!(
                "[operation.{key}].duration must be >= 1 (got 0)"
            )));
        }
        catalog.set(kind, preset);
    }
    Ok(catalog)
}

fn apply_overrides(mut preset: OperationPreset, cfg: &OperationConfig) -> OperationPreset {
    if let Some(ref label) = cfg.label {
        preset.label = label.clone();
    }
    if let Some(ref description) = cfg.description {
        preset.description = description.clone();
    }
    if let Some(duration) = cfg.duration {
        preset.default_duration = duration;
    }
    if cfg.speed.is_some() {
        preset.speed = cfg.speed;
    }
    if cfg.temperature.is_some() {
        preset.temperature = cfg.temperature;
    }
    if let Some(ramp) = cfg.ramp {
        preset.ramp = ramp;
    }
    preset
}

fn build_recipes(cfg: &RawConfigFile, catalog: &Catalog) -> Result<Vec<Recipe>> {
    let mut seen = BTreeSet::new();
    let mut recipes = Vec::with_capacity(cfg.recipe.len());

    for raw in cfg.recipe.iter() {
        if !seen.insert(raw.id) {
            return Err(KitchenError::ConfigError(format!(
                "duplicate recipe id {} ('{}')",
                raw.id, raw.name
            )));
        }

        let recipe = recipe_from_config(raw);
        recipe.validate()?;

        for (index, step) in recipe.steps.iter().enumerate() {
            if !catalog.supports(&step.operation) {
                return Err(KitchenError::ConfigError(format!(
                    "recipe '{}' step {} uses unknown operation '{}'",
                    recipe.name,
                    index + 1,
                    step.operation
                )));
            }
        }

        recipes.push(recipe);
    }

    Ok(recipes)
}

fn recipe_from_config(raw: &RecipeConfig) -> Recipe {
    let mut recipe = Recipe::new(raw.id, raw.name.clone());
    recipe.description = raw.description.clone();
    recipe.servings = raw.servings;
    recipe.difficulty = raw.difficulty;
    recipe.is_factory_default = true;
    recipe.ingredients = raw
        .ingredients
        .iter()
        .map(|i| Ingredient {
            name: i.name.clone(),
            quantity: i.quantity,
            unit: i.unit.clone(),
        })
        .collect();
    recipe.steps = raw
        .steps
        .iter()
        .map(|s| RecipeStep {
            operation: s.operation.clone(),
            duration_seconds: s.duration,
            description: s.description.clone(),
        })
        .collect();
    recipe
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Mode, Ramp};

    fn parse(toml_src: &str) -> Result<ConfigFile> {
        let raw: RawConfigFile = toml::from_str(toml_src)?;
        ConfigFile::try_from(raw)
    }

    fn config_error(result: Result<ConfigFile>) -> String {
        match result {
            Err(KitchenError::ConfigError(msg)) => msg,
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.device, DeviceSettings::default());
        assert_eq!(cfg.device.tick, Duration::from_millis(100));
        assert_eq!(cfg.catalog, Catalog::builtin());
        assert!(cfg.recipes.is_empty());
    }

    #[test]
    fn device_section_is_applied() {
        let cfg = parse(
            r#"
            [device]
            tick_ms = 250
            ambient_temperature = 18
            initial_mode = "guided"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.device.tick, Duration::from_millis(250));
        assert_eq!(cfg.device.ambient_temperature, 18);
        assert_eq!(cfg.device.initial_mode, Mode::GuidedCooking);
    }

    #[test]
    fn zero_tick_is_rejected() {
        let msg = config_error(parse("[device]\ntick_ms = 0\n"));
        assert!(msg.contains("tick_ms"));
    }

    #[test]
    fn operation_overrides_keep_unset_fields() {
        let cfg = parse(
            r#"
            [operation.boil]
            duration = 480
            ramp = "step"
            "#,
        )
        .unwrap();
        let boil = cfg.catalog.preset(OperationKind::Boil).unwrap();
        assert_eq!(boil.default_duration, 480);
        assert_eq!(boil.ramp, Ramp::Step);
        assert_eq!(boil.temperature, Some(100));
        assert_eq!(boil.label, "Boil");
    }

    #[test]
    fn unknown_operation_section_is_rejected() {
        let msg = config_error(parse("[operation.flambe]\nduration = 5\n"));
        assert!(msg.contains("flambe"));
    }

    #[test]
    fn zero_operation_duration_is_rejected() {
        let msg = config_error(parse("[operation.chop]\nduration = 0\n"));
        assert!(msg.contains("operation.chop"));
    }

    #[test]
    fn recipes_become_factory_recipes() {
        let cfg = parse(
            r#"
            [[recipe]]
            id = 7
            name = "Soup"
            servings = 2
            difficulty = "medium"
            ingredients = [{ name = "carrot", quantity = 3 }]
            steps = [{ operation = "chop", duration = 20 }, { operation = "boil", duration = 600 }]
            "#,
        )
        .unwrap();

        let soup = cfg.recipe(7).unwrap();
        assert!(soup.is_factory_default);
        assert_eq!(soup.servings, 2);
        assert_eq!(soup.ingredients[0].to_string(), "3 carrot");
        assert_eq!(soup.step_count(), 2);
        assert_eq!(soup.steps[1].duration_seconds, 600);
    }

    #[test]
    fn duplicate_recipe_ids_are_rejected() {
        let msg = config_error(parse(
            r#"
            [[recipe]]
            id = 1
            name = "A"
            steps = [{ operation = "chop", duration = 5 }]

            [[recipe]]
            id = 1
            name = "B"
            steps = [{ operation = "dice", duration = 5 }]
            "#,
        ));
        assert!(msg.contains("duplicate recipe id 1"));
    }

    #[test]
    fn recipe_with_unknown_step_is_rejected() {
        let msg = config_error(parse(
            r#"
            [[recipe]]
            id = 1
            name = "Crepes"
            steps = [{ operation = "flip", duration = 5 }]
            "#,
        ));
        assert!(msg.contains("flip"));
    }

    #[test]
    fn recipe_without_steps_is_rejected() {
        let msg = config_error(parse("[[recipe]]\nid = 1\nname = \"Air\"\n"));
        assert!(msg.contains("at least one step"));
    }
}
