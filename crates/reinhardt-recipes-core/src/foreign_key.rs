//! Foreign keys built from recipes.
//!
//! A [`RecipeForeignKey`] defers creation of the related instance to build
//! time and states, per relation, whether that instance follows the parent's
//! persistence mode or is always saved.

use std::fmt;
use std::sync::Arc;

use reinhardt_recipes_orm::{Database, Model, Related};
use serde_json::Value;

use crate::build;
use crate::error::{RecipeError, RecipeResult};
use crate::generator::Generator;
use crate::overrides::Overrides;
use crate::recipe::{AnyRecipe, BuildContext, Mode, Recipe};

/// Persistence policy of a recipe-backed relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Persist {
	/// `make` saves the related instance, `prepare` leaves it unsaved.
	#[default]
	FollowParent,
	/// The related instance is saved even when the parent is only prepared.
	Always,
}

#[derive(Clone)]
enum RecipeSource {
	Recipe(Arc<dyn AnyRecipe>),
	Named(String),
}

/// Marks a recipe as the generator of a foreign key field.
#[derive(Clone)]
pub struct RecipeForeignKey {
	source: RecipeSource,
	persist: Persist,
}

impl RecipeForeignKey {
	/// Wraps a recipe.
	pub fn new<M: Model>(recipe: Recipe<M>) -> Self {
		Self {
			source: RecipeSource::Recipe(Arc::new(recipe)),
			persist: Persist::default(),
		}
	}

	/// Refers to a registered recipe by name.
	///
	/// The name is resolved at build time. A name without a dot is relative
	/// to the module of the recipe being built.
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			source: RecipeSource::Named(name.into()),
			persist: Persist::default(),
		}
	}

	/// Sets the persistence policy.
	pub fn persist(mut self, persist: Persist) -> Self {
		self.persist = persist;
		self
	}

	/// Shorthand for `persist(Persist::Always)`.
	pub fn always_persist(self) -> Self {
		self.persist(Persist::Always)
	}

	/// Returns the persistence policy.
	pub fn policy(&self) -> Persist {
		self.persist
	}

	/// Returns the recipe name for name-based foreign keys.
	pub fn name(&self) -> Option<&str> {
		match &self.source {
			RecipeSource::Named(name) => Some(name),
			RecipeSource::Recipe(_) => None,
		}
	}

	/// Mode used for the related instance when the parent is built in `parent`.
	pub fn mode_for(&self, parent: Mode) -> Mode {
		match self.persist {
			Persist::FollowParent => parent,
			Persist::Always => Mode::Make,
		}
	}

	pub(crate) fn resolve(
		&self,
		field: &str,
		related: &Related,
		db: &Database,
		parent: Mode,
		overrides: Overrides,
		ctx: &BuildContext<'_>,
	) -> RecipeResult<Value> {
		let mode = self.mode_for(parent);
		match &self.source {
			RecipeSource::Recipe(recipe) => {
				build::build_related(recipe.as_ref(), field, related, db, mode, overrides, ctx)
			}
			RecipeSource::Named(name) => {
				let (recipe, module) = ctx.registry().resolve_from(name, ctx.module())?;
				let ctx = ctx.within(module);
				build::build_related(recipe.as_ref(), field, related, db, mode, overrides, &ctx)
			}
		}
	}
}

impl fmt::Debug for RecipeForeignKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut debug = f.debug_struct("RecipeForeignKey");
		match &self.source {
			RecipeSource::Recipe(recipe) => debug.field("recipe", &recipe.label()),
			RecipeSource::Named(name) => debug.field("name", name),
		};
		debug.field("persist", &self.persist).finish()
	}
}

/// Builds a [`RecipeForeignKey`] from a recipe or a recipe name.
///
/// Any other generator is rejected with [`RecipeError::NotARecipe`].
///
/// # Example
///
/// ```ignore
/// let dog = Recipe::<Dog>::new()
///     .with("breed", "Pug")
///     .with("owner", foreign_key(person_recipe)?);
///
/// assert_eq!(foreign_key(2).unwrap_err().to_string(), "Not a recipe");
/// ```
pub fn foreign_key(source: impl Into<Generator>) -> RecipeResult<RecipeForeignKey> {
	match source.into() {
		Generator::Recipe(recipe) => Ok(RecipeForeignKey {
			source: RecipeSource::Recipe(recipe),
			persist: Persist::default(),
		}),
		Generator::Value(Value::String(name)) => Ok(RecipeForeignKey::named(name)),
		_ => Err(RecipeError::NotARecipe),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Generator::from(2))]
	#[case(Generator::from(1.6))]
	#[case(Generator::from(false))]
	#[case(Generator::callable(|| "person"))]
	fn test_rejects_non_recipes(#[case] source: Generator) {
		let error = foreign_key(source).unwrap_err();
		assert_eq!(error.to_string(), "Not a recipe");
	}

	#[rstest]
	fn test_accepts_recipe_names() {
		let fk = foreign_key("person").unwrap();
		assert_eq!(fk.name(), Some("person"));
		assert_eq!(fk.policy(), Persist::FollowParent);
	}

	#[rstest]
	#[case(Persist::FollowParent, Mode::Make, Mode::Make)]
	#[case(Persist::FollowParent, Mode::Prepare, Mode::Prepare)]
	#[case(Persist::Always, Mode::Make, Mode::Make)]
	#[case(Persist::Always, Mode::Prepare, Mode::Make)]
	fn test_mode_for(#[case] persist: Persist, #[case] parent: Mode, #[case] expected: Mode) {
		let fk = RecipeForeignKey::named("person").persist(persist);
		assert_eq!(fk.mode_for(parent), expected);
	}
}
