//! Reusable model recipes for test data.
//!
//! A recipe is a named template describing how to build a model instance:
//! literal defaults, callables evaluated at build time, and nested recipes
//! for foreign keys. Fields a recipe leaves out are filled with generated
//! values.
//!
//! - [`Recipe::make`] builds and saves an instance
//! - [`Recipe::prepare`] builds an instance without saving it
//! - [`Overrides`] replaces attributes for one call, including lookups such
//!   as `owner__name` that target the related instance
//! - [`foreign_key`] wraps a recipe (or recipe name) as the generator of a
//!   foreign key, with an explicit [`Persist`] policy
//! - [`mommy`] resolves recipes by dotted name through the registry
//!
//! # Quick Start
//!
//! ```ignore
//! use reinhardt_recipes_core::prelude::*;
//!
//! fn person() -> Recipe<Person> {
//!     Recipe::new()
//!         .with("name", "John Doe")
//!         .with("age", 18)
//! }
//!
//! recipe_module!("test.generic" {
//!     person => person(),
//!     dog => Recipe::<Dog>::new()
//!         .with("breed", "Pug")
//!         .with("owner", RecipeForeignKey::new(person())),
//! });
//!
//! let db = Database::new();
//! let dog: Dog = mommy::make_recipe(&db, "test.generic.dog", Overrides::new().set("owner__name", "James"))?;
//! assert_eq!(dog.owner.name, "James");
//! assert_eq!(db.objects::<Person>().count(), 1);
//! ```

#![warn(missing_docs)]

mod build;
pub mod error;
pub mod foreign_key;
pub mod generator;
pub mod mommy;
pub mod overrides;
pub mod prelude;
pub mod recipe;
pub mod registry;
pub mod settings;

pub use error::{RecipeError, RecipeResult};
pub use foreign_key::{Persist, RecipeForeignKey, foreign_key};
pub use generator::{Generator, GeneratorFn};
pub use overrides::Overrides;
pub use recipe::{AnyRecipe, BuildContext, Mode, Recipe};
pub use registry::{RecipeModule, RecipeName, RecipeRef, RecipeRegistry, register_recipe, registry};
pub use settings::RecipeSettings;

#[doc(hidden)]
pub use inventory;
