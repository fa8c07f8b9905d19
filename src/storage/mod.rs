// src/storage/mod.rs

//! Recipe storage collaborator.
//!
//! The engine only consumes recipe data; where recipes live is up to the
//! [`RecipeStore`] implementation. [`memory::InMemoryRecipeStore`] is the one
//! shipped with the crate, seeded with the factory recipes from config.

use std::fmt::Debug;

use crate::errors::Result;
use crate::model::{Recipe, RecipeId};

pub mod memory;

pub use memory::InMemoryRecipeStore;

/// Abstract recipe storage.
pub trait RecipeStore: Send + Sync + Debug {
    /// All recipes, factory recipes first, each group ordered by id.
    fn list(&self) -> Result<Vec<Recipe>>;

    fn get(&self, id: RecipeId) -> Result<Option<Recipe>>;

    /// Store a user recipe under a fresh id and return that id.
    fn insert_user_recipe(&mut self, recipe: Recipe) -> Result<RecipeId>;

    /// Delete a user recipe. Returns `false` for unknown ids and for factory
    /// recipes, which are never deleted.
    fn delete_user_recipe(&mut self, id: RecipeId) -> Result<bool>;

    /// Remove every user recipe and return how many were removed.
    fn factory_reset(&mut self) -> Result<usize>;
}
