// src/model/recipe.rs

use std::fmt;
use std::time::Duration;

use crate::errors::{KitchenError, Result};
use crate::types::Difficulty;

pub type RecipeId = u32;

/// One step of a recipe.
///
/// `operation` is resolved into a concrete [`Task`](crate::model::Task) by the
/// caller-supplied task factory when the step is about to run.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeStep {
    pub operation: String,
    pub duration_seconds: u32,
    pub description: Option<String>,
}

impl RecipeStep {
    pub fn new(operation: impl Into<String>, duration_seconds: u32) -> Self {
        Self {
            operation: operation.into(),
            duration_seconds,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An ingredient line such as "200 g flour" or "2 eggs".
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            unit: None,
        }
    }

    pub fn with_quantity(mut self, quantity: f64, unit: Option<&str>) -> Self {
        self.quantity = Some(quantity);
        self.unit = unit.map(str::to_string);
        self
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(quantity) = self.quantity {
            if quantity.fract() == 0.0 {
                write!(f, "{} ", quantity as i64)?;
            } else {
                write!(f, "{quantity} ")?;
            }
            if let Some(ref unit) = self.unit {
                write!(f, "{unit} ")?;
            }
        }
        f.write_str(&self.name)
    }
}

/// A recipe: metadata plus an ordered list of steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub description: String,
    pub servings: u32,
    pub difficulty: Difficulty,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<RecipeStep>,
    /// Shipped with the device; storage never deletes these.
    pub is_factory_default: bool,
}

impl Recipe {
    pub fn new(id: RecipeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            servings: 1,
            difficulty: Difficulty::default(),
            ingredients: Vec::new(),
            steps: Vec::new(),
            is_factory_default: false,
        }
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Sum of all step durations.
    pub fn total_duration(&self) -> Duration {
        self.steps
            .iter()
            .map(|s| Duration::from_secs(u64::from(s.duration_seconds)))
            .sum()
    }

    /// Human readable total time, e.g. `"45 s"`, `"12 min"`, `"1h 05min"`.
    pub fn total_time_label(&self) -> String {
        format_duration_label(self.total_duration())
    }

    /// Check the structural invariants every stored or executed recipe must
    /// satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(KitchenError::ConfigError(format!(
                "recipe {} must have a name",
                self.id
            )));
        }
        if self.servings == 0 {
            return Err(KitchenError::ConfigError(format!(
                "recipe '{}' must serve at least 1 person",
                self.name
            )));
        }
        if self.steps.is_empty() {
            return Err(KitchenError::ConfigError(format!(
                "recipe '{}' must contain at least one step",
                self.name
            )));
        }
        for (i, step) in self.steps.iter().enumerate() {
            if step.duration_seconds == 0 {
                return Err(KitchenError::ConfigError(format!(
                    "recipe '{}' step {} ('{}') must have a duration greater than 0",
                    self.name,
                    i + 1,
                    step.operation
                )));
            }
        }
        for ingredient in &self.ingredients {
            if matches!(ingredient.quantity, Some(q) if !(q > 0.0)) {
                return Err(KitchenError::ConfigError(format!(
                    "recipe '{}' ingredient '{}' must have a positive quantity",
                    self.name, ingredient.name
                )));
            }
        }
        Ok(())
    }
}

fn format_duration_label(total: Duration) -> String {
    let secs = total.as_secs();
    if secs < 60 {
        format!("{secs} s")
    } else if secs < 3600 {
        let (min, rest) = (secs / 60, secs % 60);
        if rest == 0 {
            format!("{min} min")
        } else {
            format!("{min} min {rest} s")
        }
    } else {
        format!("{}h {:02}min", secs / 3600, (secs % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sauce() -> Recipe {
        let mut recipe = Recipe::new(1, "Tomato sauce");
        recipe.servings = 4;
        recipe.steps = vec![
            RecipeStep::new("chop", 20),
            RecipeStep::new("saute", 300).with_description("Add oil first"),
        ];
        recipe
    }

    #[test]
    fn total_duration_sums_steps() {
        let recipe = sauce();
        assert_eq!(recipe.step_count(), 2);
        assert_eq!(recipe.total_duration(), Duration::from_secs(320));
        assert_eq!(recipe.total_time_label(), "5 min 20 s");
    }

    #[test]
    fn time_labels() {
        assert_eq!(format_duration_label(Duration::from_secs(45)), "45 s");
        assert_eq!(format_duration_label(Duration::from_secs(720)), "12 min");
        assert_eq!(format_duration_label(Duration::from_secs(3900)), "1h 05min");
    }

    #[test]
    fn ingredient_display() {
        assert_eq!(
            Ingredient::new("flour").with_quantity(200.0, Some("g")).to_string(),
            "200 g flour"
        );
        assert_eq!(Ingredient::new("eggs").with_quantity(2.0, None).to_string(), "2 eggs");
        assert_eq!(
            Ingredient::new("milk").with_quantity(0.5, Some("l")).to_string(),
            "0.5 l milk"
        );
        assert_eq!(Ingredient::new("salt").to_string(), "salt");
    }

    #[test]
    fn validate_rejects_broken_recipes() {
        assert!(sauce().validate().is_ok());

        let mut no_steps = sauce();
        no_steps.steps.clear();
        assert!(no_steps.validate().is_err());

        let mut no_servings = sauce();
        no_servings.servings = 0;
        assert!(no_servings.validate().is_err());

        let mut zero_step = sauce();
        zero_step.steps[1].duration_seconds = 0;
        assert!(zero_step.validate().is_err());

        let mut bad_quantity = sauce();
        bad_quantity.ingredients = vec![Ingredient::new("oil").with_quantity(0.0, Some("ml"))];
        assert!(bad_quantity.validate().is_err());
    }
}
