// src/storage/memory.rs

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::RecipeStore;
use crate::errors::{KitchenError, Result};
use crate::model::{Recipe, RecipeId};

/// Recipe store kept entirely in memory (lost on restart).
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecipeStore {
    recipes: BTreeMap<RecipeId, Recipe>,
}

impl InMemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with factory recipes. Every seeded recipe is marked as a
    /// factory default.
    pub fn with_factory_recipes(recipes: impl IntoIterator<Item = Recipe>) -> Self {
        let recipes = recipes
            .into_iter()
            .map(|mut r| {
                r.is_factory_default = true;
                (r.id, r)
            })
            .collect();
        Self { recipes }
    }

    fn next_id(&self) -> Option<RecipeId> {
        self.recipes.keys().next_back().map_or(Some(1), |id| id.checked_add(1))
    }
}

impl RecipeStore for InMemoryRecipeStore {
    fn list(&self) -> Result<Vec<Recipe>> {
        let (mut factory, user): (Vec<Recipe>, Vec<Recipe>) = self
            .recipes
            .values()
            .cloned()
            .partition(|r| r.is_factory_default);
        factory.extend(user);
        Ok(factory)
    }

    fn get(&self, id: RecipeId) -> Result<Option<Recipe>> {
        Ok(self.recipes.get(&id).cloned())
    }

    fn insert_user_recipe(&mut self, mut recipe: Recipe) -> Result<RecipeId> {
        recipe.validate()?;

        let id = self
            .next_id()
            .ok_or_else(|| KitchenError::ConfigError("recipe id space exhausted".to_string()))?;
        recipe.id = id;
        recipe.is_factory_default = false;
        info!(id, name = %recipe.name, "user recipe stored");
        self.recipes.insert(id, recipe);
        Ok(id)
    }

    fn delete_user_recipe(&mut self, id: RecipeId) -> Result<bool> {
        match self.recipes.get(&id) {
            Some(recipe) if !recipe.is_factory_default => {
                self.recipes.remove(&id);
                info!(id, "user recipe deleted");
                Ok(true)
            }
            Some(_) => {
                debug!(id, "refusing to delete factory recipe");
                Ok(false)
            }
            None => Ok(false),
        }
    }

    fn factory_reset(&mut self) -> Result<usize> {
        let before = self.recipes.len();
        self.recipes.retain(|_, r| r.is_factory_default);
        let removed = before - self.recipes.len();
        info!(removed, "factory reset completed");
        Ok(removed)
    }
}
