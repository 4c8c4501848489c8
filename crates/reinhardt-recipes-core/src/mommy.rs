//! Module-level recipe API.
//!
//! Thin wrappers resolving recipe names through the process-wide
//! [`registry`](crate::registry::registry).
//!
//! # Example
//!
//! ```ignore
//! use reinhardt_recipes_core::{Overrides, mommy};
//!
//! let person: Person = mommy::make_recipe(&db, "test.generic.person", Overrides::new())?;
//! let people: Vec<Person> = mommy::make_recipe_quantity(
//!     &db,
//!     "test.generic.person",
//!     3,
//!     Overrides::new().set("name", "Dennis Ritchie"),
//! )?;
//! let dogs: Vec<Dog> = mommy::make_many_from_recipe(&db, "test.generic.dog", None, Overrides::new())?;
//! assert_eq!(dogs.len(), mommy::MAX_MANY_QUANTITY);
//! ```

use reinhardt_recipes_orm::{Database, Model};

use crate::error::RecipeResult;
use crate::overrides::Overrides;
use crate::registry::registry;

/// Default number of instances built by [`make_many_from_recipe`].
///
/// This is the default of [`RecipeSettings::max_many_quantity`]; a registry
/// configured with another value uses that value instead.
///
/// [`RecipeSettings::max_many_quantity`]: crate::settings::RecipeSettings::max_many_quantity
pub const MAX_MANY_QUANTITY: usize = 5;

/// Builds and saves one instance of the named recipe.
pub fn make_recipe<M: Model>(db: &Database, name: &str, overrides: Overrides) -> RecipeResult<M> {
	registry().make_recipe(db, name, overrides)
}

/// Builds and saves `quantity` instances of the named recipe, each with the
/// same overrides.
pub fn make_recipe_quantity<M: Model>(
	db: &Database,
	name: &str,
	quantity: usize,
	overrides: Overrides,
) -> RecipeResult<Vec<M>> {
	registry().make_recipe_quantity(db, name, quantity, overrides)
}

/// Builds one unsaved instance of the named recipe.
pub fn prepare_recipe<M: Model>(
	db: &Database,
	name: &str,
	overrides: Overrides,
) -> RecipeResult<M> {
	registry().prepare_recipe(db, name, overrides)
}

/// Builds `quantity` unsaved instances of the named recipe.
pub fn prepare_recipe_quantity<M: Model>(
	db: &Database,
	name: &str,
	quantity: usize,
	overrides: Overrides,
) -> RecipeResult<Vec<M>> {
	registry().prepare_recipe_quantity(db, name, quantity, overrides)
}

/// Builds and saves many instances of the named recipe.
///
/// Without a quantity, the registry's `max_many_quantity` setting decides
/// how many instances are built: [`MAX_MANY_QUANTITY`] by default.
pub fn make_many_from_recipe<M: Model>(
	db: &Database,
	name: &str,
	quantity: Option<usize>,
	overrides: Overrides,
) -> RecipeResult<Vec<M>> {
	registry().make_many_from_recipe(db, name, quantity, overrides)
}
