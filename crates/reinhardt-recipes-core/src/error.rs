//! Error types for recipe building and lookup.

use reinhardt_recipes_orm::OrmError;
use thiserror::Error;

/// Errors that can occur while resolving or building recipes.
#[derive(Debug, Error)]
pub enum RecipeError {
	/// `foreign_key` received something other than a recipe or recipe name.
	#[error("Not a recipe")]
	NotARecipe,

	/// A recipe name is not of the form `module.recipe`.
	#[error("Invalid recipe name: '{0}'")]
	InvalidRecipeName(String),

	/// No recipe module is registered under the given path.
	#[error("No recipe module named '{0}'")]
	ModuleNotFound(String),

	/// The module exists but defines no recipe with the given name.
	#[error("Recipe '{0}' not found")]
	RecipeNotFound(String),

	/// The recipe builds a different model than the caller asked for.
	#[error("Recipe '{name}' builds {found}, not {expected}")]
	ModelMismatch {
		/// Requested recipe name.
		name: String,
		/// Model the caller expected.
		expected: &'static str,
		/// Model the recipe builds.
		found: &'static str,
	},

	/// A foreign key generator builds a model other than the related one.
	#[error("Field '{field}' references {expected}, but its recipe builds {found}")]
	RelationMismatch {
		/// Foreign key field.
		field: String,
		/// Related model of the field.
		expected: &'static str,
		/// Model built by the nested recipe.
		found: &'static str,
	},

	/// A `relation__field` override cannot be routed.
	#[error("Invalid lookup '{lookup}': {reason}")]
	InvalidLookup {
		/// The offending lookup.
		lookup: String,
		/// Why the lookup was rejected.
		reason: String,
	},

	/// A generator cannot produce a value for the field it is bound to.
	#[error("Invalid generator for field '{field}': {reason}")]
	InvalidGenerator {
		/// Field name.
		field: String,
		/// Why the generator was rejected.
		reason: String,
	},

	/// A value could not be converted into a field value.
	#[error("Invalid value: {0}")]
	InvalidValue(String),

	/// Settings could not be loaded or are inconsistent.
	#[error("Configuration error: {key}: {message}")]
	Configuration {
		/// Setting name.
		key: String,
		/// Description of the problem.
		message: String,
	},

	/// Error raised by the model layer.
	#[error(transparent)]
	Orm(#[from] OrmError),
}

impl From<serde_json::Error> for RecipeError {
	fn from(error: serde_json::Error) -> Self {
		RecipeError::Orm(OrmError::Json(error))
	}
}

/// Result type alias for recipe operations.
pub type RecipeResult<T> = Result<T, RecipeError>;
