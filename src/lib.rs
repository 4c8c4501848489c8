//! # Reinhardt Recipes
//!
//! Named, reusable model recipes for building test data.
//!
//! This crate re-exports the recipe engine and the model layer it builds on:
//!
//! - [`orm`] - model metadata, the in-memory [`Database`] and generated field values
//! - [`recipes`] - [`Recipe`], [`Overrides`], foreign keys and the recipe registry
//! - [`mommy`] - `make_recipe`, `prepare_recipe` and friends, resolving recipes by name
//!
//! ## Quick Start
//!
//! ```ignore
//! use reinhardt_recipes::prelude::*;
//!
//! recipe_module!("people.recipes" {
//!     person => Recipe::<Person>::new().with("name", "John Doe"),
//! });
//!
//! let db = Database::new();
//! let people: Vec<Person> =
//!     mommy::make_recipe_quantity(&db, "people.recipes.person", 3, Overrides::new())?;
//! assert_eq!(db.objects::<Person>().count(), 3);
//! ```

pub mod orm;
pub mod recipes;

pub use reinhardt_recipes_core::mommy;
pub use reinhardt_recipes_core::recipe_module;
pub use reinhardt_recipes_core::{
	Generator, Overrides, Persist, Recipe, RecipeError, RecipeForeignKey, RecipeRegistry,
	RecipeResult, RecipeSettings, foreign_key, register_recipe, registry,
};
pub use reinhardt_recipes_orm::{Database, Model, ModelMeta, OrmError};

/// Prelude for recipe definitions and tests.
pub mod prelude {
	pub use reinhardt_recipes_core::prelude::*;
	pub use reinhardt_recipes_orm::{OrmError, Related};

	// External
	pub use serde::{Deserialize, Serialize};
}
