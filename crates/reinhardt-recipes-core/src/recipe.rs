//! Recipes.
//!
//! A [`Recipe`] binds a model type to named field generators. It is an
//! immutable template: [`Recipe::make`] and [`Recipe::prepare`] merge their
//! overrides into a fresh copy of the attributes for every call.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use reinhardt_recipes_orm::{Database, Model};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::build;
use crate::error::RecipeResult;
use crate::generator::Generator;
use crate::overrides::Overrides;
use crate::registry::{self, RecipeRegistry};
use crate::settings::RecipeSettings;

/// Whether a build persists its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
	/// Build and save.
	Make,
	/// Build only.
	Prepare,
}

impl Mode {
	/// Returns true for [`Mode::Make`].
	pub fn persists(self) -> bool {
		matches!(self, Mode::Make)
	}
}

/// State shared by the nested builds of a single call.
#[derive(Clone)]
pub struct BuildContext<'a> {
	registry: &'a RecipeRegistry,
	settings: RecipeSettings,
	module: Option<String>,
}

impl<'a> BuildContext<'a> {
	/// Creates a context resolving recipe names through `registry`.
	pub fn new(registry: &'a RecipeRegistry) -> Self {
		Self {
			registry,
			settings: registry.settings(),
			module: None,
		}
	}

	/// Returns a copy scoped to `module`, used to resolve relative names.
	pub fn within(&self, module: impl Into<String>) -> Self {
		Self {
			registry: self.registry,
			settings: self.settings.clone(),
			module: Some(module.into()),
		}
	}

	/// Registry used for name-based foreign keys.
	pub fn registry(&self) -> &'a RecipeRegistry {
		self.registry
	}

	/// Settings in effect for this call.
	pub fn settings(&self) -> &RecipeSettings {
		&self.settings
	}

	/// Module of the recipe being built, if it came from the registry.
	pub fn module(&self) -> Option<&str> {
		self.module.as_deref()
	}
}

impl fmt::Debug for BuildContext<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BuildContext")
			.field("settings", &self.settings)
			.field("module", &self.module)
			.finish_non_exhaustive()
	}
}

/// Type-erased recipe, used for nested recipes and registry entries.
pub trait AnyRecipe: Send + Sync {
	/// Label of the model built by the recipe.
	fn label(&self) -> &'static str;

	/// Builds the field map of an instance.
	///
	/// In [`Mode::Make`] the returned map carries the assigned primary key.
	fn build_fields(
		&self,
		db: &Database,
		mode: Mode,
		overrides: Overrides,
		ctx: &BuildContext<'_>,
	) -> RecipeResult<Map<String, Value>>;
}

/// Template for building instances of `M`.
///
/// # Example
///
/// ```ignore
/// use reinhardt_recipes_core::{Overrides, Recipe};
///
/// let person = Recipe::<Person>::new()
///     .with("name", "John Doe")
///     .with("age", 18);
///
/// let saved = person.make(&db)?;
/// assert!(saved.id.is_some());
///
/// let guido = person.prepare_with(&db, Overrides::new().set("name", "Guido"))?;
/// assert!(guido.id.is_none());
/// ```
pub struct Recipe<M: Model> {
	// Base attributes followed by one layer per `extend`.
	layers: Arc<Vec<Overrides>>,
	_model: PhantomData<fn() -> M>,
}

impl<M: Model> Recipe<M> {
	/// Creates a recipe without attributes; every field falls back to the
	/// model's generated defaults.
	pub fn new() -> Self {
		Self::from_attrs(Overrides::new())
	}

	/// Creates a recipe from a prepared set of attributes.
	pub fn from_attrs(attrs: Overrides) -> Self {
		Self {
			layers: Arc::new(vec![attrs]),
			_model: PhantomData,
		}
	}

	/// Adds an attribute. Generators are not evaluated until build time.
	pub fn with(self, field: impl Into<String>, generator: impl Into<Generator>) -> Self {
		let mut layers = Arc::unwrap_or_clone(self.layers);
		match layers.last_mut() {
			Some(last) => last.insert(field, generator),
			None => layers.push(Overrides::new().set(field, generator)),
		}
		Self {
			layers: Arc::new(layers),
			_model: PhantomData,
		}
	}

	/// Adds an attribute produced by a callable on every build.
	pub fn with_fn<F, T>(self, field: impl Into<String>, f: F) -> Self
	where
		F: Fn() -> T + Send + Sync + 'static,
		T: Serialize,
	{
		self.with(field, Generator::callable(f))
	}

	/// Returns a new recipe with `overrides` merged over these attributes.
	///
	/// The original recipe is left untouched. Lookups in `overrides` are
	/// split with the separator of the registry the recipe is built with.
	pub fn extend(&self, overrides: Overrides) -> Self {
		let mut layers = self.layers.as_ref().clone();
		layers.push(overrides);
		Self {
			layers: Arc::new(layers),
			_model: PhantomData,
		}
	}

	/// The recipe attributes with every extension applied, using
	/// `separator` to recognize lookups.
	pub fn attrs(&self, separator: &str) -> Overrides {
		self.layers
			.iter()
			.fold(Overrides::new(), |attrs, layer| attrs.merged(layer.clone(), separator))
	}

	/// Builds and saves an instance.
	pub fn make(&self, db: &Database) -> RecipeResult<M> {
		self.make_with(db, Overrides::new())
	}

	/// Builds and saves an instance with call-time overrides.
	///
	/// On error nothing written by the call remains, related rows included.
	pub fn make_with(&self, db: &Database, overrides: Overrides) -> RecipeResult<M> {
		let ctx = BuildContext::new(registry::registry());
		db.atomic(|| -> RecipeResult<M> {
			self.build(db, Mode::Make, overrides, &ctx)
		})
	}

	/// Builds an instance without saving it.
	pub fn prepare(&self, db: &Database) -> RecipeResult<M> {
		self.prepare_with(db, Overrides::new())
	}

	/// Builds an instance without saving it, with call-time overrides.
	pub fn prepare_with(&self, db: &Database, overrides: Overrides) -> RecipeResult<M> {
		let ctx = BuildContext::new(registry::registry());
		db.atomic(|| -> RecipeResult<M> {
			self.build(db, Mode::Prepare, overrides, &ctx)
		})
	}

	/// Builds and saves `quantity` instances sharing the same overrides.
	pub fn make_many(
		&self,
		db: &Database,
		quantity: usize,
		overrides: Overrides,
	) -> RecipeResult<Vec<M>> {
		db.atomic(|| -> RecipeResult<Vec<M>> {
			(0..quantity)
				.map(|_| self.make_with(db, overrides.clone()))
				.collect()
		})
	}

	/// Builds `quantity` unsaved instances sharing the same overrides.
	pub fn prepare_many(
		&self,
		db: &Database,
		quantity: usize,
		overrides: Overrides,
	) -> RecipeResult<Vec<M>> {
		db.atomic(|| -> RecipeResult<Vec<M>> {
			(0..quantity)
				.map(|_| self.prepare_with(db, overrides.clone()))
				.collect()
		})
	}

	/// Builds an instance in `mode` within an existing context.
	pub fn build(
		&self,
		db: &Database,
		mode: Mode,
		overrides: Overrides,
		ctx: &BuildContext<'_>,
	) -> RecipeResult<M> {
		let fields = self.build_fields(db, mode, overrides, ctx)?;
		Ok(M::from_fields(fields)?)
	}
}

impl<M: Model> AnyRecipe for Recipe<M> {
	fn label(&self) -> &'static str {
		M::LABEL
	}

	fn build_fields(
		&self,
		db: &Database,
		mode: Mode,
		overrides: Overrides,
		ctx: &BuildContext<'_>,
	) -> RecipeResult<Map<String, Value>> {
		let separator = &ctx.settings().lookup_separator;
		let attrs = self.attrs(separator).merged(overrides, separator);
		build::build_fields(&M::meta(), M::check_fields, attrs, db, mode, ctx)
	}
}

impl<M: Model> Default for Recipe<M> {
	fn default() -> Self {
		Self::new()
	}
}

impl<M: Model> Clone for Recipe<M> {
	fn clone(&self) -> Self {
		Self {
			layers: Arc::clone(&self.layers),
			_model: PhantomData,
		}
	}
}

impl<M: Model> fmt::Debug for Recipe<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Recipe")
			.field("model", &M::LABEL)
			.field("layers", &self.layers)
			.finish()
	}
}

impl<M: Model> From<Recipe<M>> for Generator {
	fn from(recipe: Recipe<M>) -> Self {
		Generator::Recipe(Arc::new(recipe))
	}
}

impl<M: Model> From<&Recipe<M>> for Generator {
	fn from(recipe: &Recipe<M>) -> Self {
		Generator::Recipe(Arc::new(recipe.clone()))
	}
}
