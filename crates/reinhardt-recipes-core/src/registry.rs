//! Recipe registry.
//!
//! Recipes are addressed by dotted names such as `"test.generic.person"`:
//! the last segment is the recipe name and the rest is its module path,
//! which may be nested to any depth.
//!
//! Modules are declared with [`recipe_module!`](crate::recipe_module), which
//! submits a loader to a compile-time table collected by `inventory`. A
//! module is loaded the first time one of its recipes is looked up and then
//! cached. Loading only constructs recipe templates; it never touches a
//! database. Recipes can also be registered explicitly with
//! [`RecipeRegistry::register`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use reinhardt_recipes_orm::{Database, Model};

use crate::error::{RecipeError, RecipeResult};
use crate::overrides::Overrides;
use crate::recipe::{AnyRecipe, BuildContext, Mode, Recipe};
use crate::settings::RecipeSettings;

/// Shared handle to a type-erased recipe.
pub type RecipeRef = Arc<dyn AnyRecipe>;

/// Compile-time registration of a recipe module.
///
/// Submitted by [`recipe_module!`](crate::recipe_module).
pub struct RecipeModule {
	/// Dotted module path (e.g., "test.generic").
	pub path: &'static str,
	/// Constructs the recipes of the module.
	pub loader: fn() -> Vec<(&'static str, RecipeRef)>,
}

inventory::collect!(RecipeModule);

/// Erases the model type of a recipe for registration.
pub fn erase<M: Model>(recipe: Recipe<M>) -> RecipeRef {
	Arc::new(recipe)
}

/// A dotted recipe name split into module path and recipe name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeName<'a> {
	/// Module path.
	pub module: &'a str,
	/// Recipe name within the module.
	pub recipe: &'a str,
}

impl<'a> RecipeName<'a> {
	/// Parses `module.recipe`.
	pub fn parse(name: &'a str) -> RecipeResult<Self> {
		match name.rsplit_once('.') {
			Some((module, recipe))
				if !recipe.is_empty() && !module.is_empty() && !module.split('.').any(str::is_empty) =>
			{
				Ok(Self { module, recipe })
			}
			_ => Err(RecipeError::InvalidRecipeName(name.to_string())),
		}
	}
}

#[derive(Default)]
struct Modules {
	recipes: HashMap<String, IndexMap<String, RecipeRef>>,
	discovered: HashSet<String>,
}

/// Name-to-recipe registry.
pub struct RecipeRegistry {
	modules: RwLock<Modules>,
	settings: RwLock<RecipeSettings>,
	discover: bool,
}

impl RecipeRegistry {
	/// Creates a registry that also discovers modules declared with
	/// [`recipe_module!`](crate::recipe_module).
	pub fn new() -> Self {
		Self {
			modules: RwLock::new(Modules::default()),
			settings: RwLock::new(RecipeSettings::default()),
			discover: true,
		}
	}

	/// Creates a registry holding only explicitly registered recipes.
	pub fn isolated() -> Self {
		Self {
			discover: false,
			..Self::new()
		}
	}

	/// Replaces the settings after validating them.
	///
	/// # Errors
	///
	/// Returns [`RecipeError::Configuration`] for settings rejected by
	/// [`RecipeSettings::validate`].
	pub fn with_settings(self, settings: RecipeSettings) -> RecipeResult<Self> {
		self.configure(settings)?;
		Ok(self)
	}

	/// Returns a copy of the current settings.
	pub fn settings(&self) -> RecipeSettings {
		self.settings.read().clone()
	}

	/// Validates and installs new settings.
	pub fn configure(&self, settings: RecipeSettings) -> RecipeResult<()> {
		settings.validate()?;
		*self.settings.write() = settings;
		Ok(())
	}

	/// Registers `recipe` under a dotted name, replacing any previous entry.
	pub fn register<M: Model>(&self, name: &str, recipe: Recipe<M>) -> RecipeResult<()> {
		let parsed = RecipeName::parse(name)?;
		self.modules
			.write()
			.recipes
			.entry(parsed.module.to_string())
			.or_default()
			.insert(parsed.recipe.to_string(), erase(recipe));
		tracing::debug!(name, model = M::LABEL, "registered recipe");
		Ok(())
	}

	/// Resolves a dotted name.
	///
	/// # Errors
	///
	/// - [`RecipeError::InvalidRecipeName`] when the name has no module part
	/// - [`RecipeError::ModuleNotFound`] when no module has that path
	/// - [`RecipeError::RecipeNotFound`] when the module lacks the recipe
	pub fn resolve(&self, name: &str) -> RecipeResult<RecipeRef> {
		let parsed = RecipeName::parse(name)?;
		self.load_module(parsed.module)?;
		self.modules
			.read()
			.recipes
			.get(parsed.module)
			.and_then(|recipes| recipes.get(parsed.recipe))
			.cloned()
			.ok_or_else(|| RecipeError::RecipeNotFound(name.to_string()))
	}

	/// Resolves `name`, relative to `module` when it has no dot. Returns the
	/// recipe and the module it was found in.
	pub(crate) fn resolve_from(
		&self,
		name: &str,
		module: Option<&str>,
	) -> RecipeResult<(RecipeRef, String)> {
		let full = match module {
			Some(module) if !name.contains('.') => format!("{module}.{name}"),
			_ => name.to_string(),
		};
		let recipe = self.resolve(&full)?;
		let module = RecipeName::parse(&full)?.module.to_string();
		Ok((recipe, module))
	}

	/// Resolves `name` and checks that it builds `M`.
	pub fn get<M: Model>(&self, name: &str) -> RecipeResult<RecipeRef> {
		let recipe = self.resolve(name)?;
		if recipe.label() != M::LABEL {
			return Err(RecipeError::ModelMismatch {
				name: name.to_string(),
				expected: M::LABEL,
				found: recipe.label(),
			});
		}
		Ok(recipe)
	}

	/// Returns true if `name` resolves.
	pub fn contains(&self, name: &str) -> bool {
		self.resolve(name).is_ok()
	}

	/// Names of the recipes currently loaded for `module`, in registration
	/// order.
	pub fn recipe_names(&self, module: &str) -> Vec<String> {
		self.modules
			.read()
			.recipes
			.get(module)
			.map(|recipes| recipes.keys().cloned().collect())
			.unwrap_or_default()
	}

	/// Drops every loaded and registered recipe. Declared modules are
	/// discovered again on the next lookup.
	pub fn clear(&self) {
		let mut modules = self.modules.write();
		modules.recipes.clear();
		modules.discovered.clear();
	}

	/// Builds and saves one instance of the named recipe.
	pub fn make_recipe<M: Model>(
		&self,
		db: &Database,
		name: &str,
		overrides: Overrides,
	) -> RecipeResult<M> {
		self.build_one(db, name, Mode::Make, overrides)
	}

	/// Builds and saves `quantity` instances of the named recipe, in call
	/// order.
	pub fn make_recipe_quantity<M: Model>(
		&self,
		db: &Database,
		name: &str,
		quantity: usize,
		overrides: Overrides,
	) -> RecipeResult<Vec<M>> {
		self.build_many(db, name, Mode::Make, quantity, overrides)
	}

	/// Builds one unsaved instance of the named recipe.
	pub fn prepare_recipe<M: Model>(
		&self,
		db: &Database,
		name: &str,
		overrides: Overrides,
	) -> RecipeResult<M> {
		self.build_one(db, name, Mode::Prepare, overrides)
	}

	/// Builds `quantity` unsaved instances of the named recipe.
	pub fn prepare_recipe_quantity<M: Model>(
		&self,
		db: &Database,
		name: &str,
		quantity: usize,
		overrides: Overrides,
	) -> RecipeResult<Vec<M>> {
		self.build_many(db, name, Mode::Prepare, quantity, overrides)
	}

	/// Builds and saves many instances.
	///
	/// `None` uses the registry's `max_many_quantity` setting, which is
	/// [`MAX_MANY_QUANTITY`](crate::mommy::MAX_MANY_QUANTITY) unless
	/// configured otherwise.
	pub fn make_many_from_recipe<M: Model>(
		&self,
		db: &Database,
		name: &str,
		quantity: Option<usize>,
		overrides: Overrides,
	) -> RecipeResult<Vec<M>> {
		let quantity = quantity.unwrap_or_else(|| self.settings().max_many_quantity);
		self.build_many(db, name, Mode::Make, quantity, overrides)
	}

	fn build_one<M: Model>(
		&self,
		db: &Database,
		name: &str,
		mode: Mode,
		overrides: Overrides,
	) -> RecipeResult<M> {
		let recipe = self.get::<M>(name)?;
		let ctx = self.context_for(name)?;
		db.atomic(|| -> RecipeResult<M> {
			let fields = recipe.build_fields(db, mode, overrides, &ctx)?;
			Ok(M::from_fields(fields)?)
		})
	}

	fn build_many<M: Model>(
		&self,
		db: &Database,
		name: &str,
		mode: Mode,
		quantity: usize,
		overrides: Overrides,
	) -> RecipeResult<Vec<M>> {
		let recipe = self.get::<M>(name)?;
		let ctx = self.context_for(name)?;
		tracing::debug!(name, ?mode, quantity, "building recipe batch");
		db.atomic(|| -> RecipeResult<Vec<M>> {
			(0..quantity)
				.map(|_| -> RecipeResult<M> {
					let fields = recipe.build_fields(db, mode, overrides.clone(), &ctx)?;
					Ok(M::from_fields(fields)?)
				})
				.collect()
		})
	}

	fn context_for(&self, name: &str) -> RecipeResult<BuildContext<'_>> {
		let parsed = RecipeName::parse(name)?;
		Ok(BuildContext::new(self).within(parsed.module))
	}

	fn load_module(&self, module: &str) -> RecipeResult<()> {
		{
			let modules = self.modules.read();
			if modules.discovered.contains(module) {
				return Ok(());
			}
			if !self.discover {
				return if modules.recipes.contains_key(module) {
					Ok(())
				} else {
					Err(RecipeError::ModuleNotFound(module.to_string()))
				};
			}
		}

		let declared: Vec<(&'static str, RecipeRef)> = inventory::iter::<RecipeModule>
			.into_iter()
			.filter(|entry| entry.path == module)
			.flat_map(|entry| (entry.loader)())
			.collect();

		let mut modules = self.modules.write();
		if declared.is_empty() && !modules.recipes.contains_key(module) {
			return Err(RecipeError::ModuleNotFound(module.to_string()));
		}
		tracing::debug!(module, recipes = declared.len(), "loaded recipe module");
		let recipes = modules.recipes.entry(module.to_string()).or_default();
		for (name, recipe) in declared {
			// Explicit registrations take precedence over declared recipes.
			recipes.entry(name.to_string()).or_insert(recipe);
		}
		modules.discovered.insert(module.to_string());
		Ok(())
	}
}

impl Default for RecipeRegistry {
	fn default() -> Self {
		Self::new()
	}
}

static REGISTRY: Lazy<RecipeRegistry> = Lazy::new(RecipeRegistry::new);

/// Returns the process-wide registry.
pub fn registry() -> &'static RecipeRegistry {
	&REGISTRY
}

/// Registers a recipe in the process-wide registry.
pub fn register_recipe<M: Model>(name: &str, recipe: Recipe<M>) -> RecipeResult<()> {
	registry().register(name, recipe)
}

/// Declares a recipe module.
///
/// Each entry binds a recipe name to an expression evaluating to a
/// [`Recipe`]. The expressions run when the module is first looked up.
///
/// # Example
///
/// ```ignore
/// use reinhardt_recipes_core::{Recipe, RecipeForeignKey, recipe_module};
///
/// fn person() -> Recipe<Person> {
///     Recipe::new().with("name", "John Doe")
/// }
///
/// recipe_module!("test.generic" {
///     person => person(),
///     dog => Recipe::<Dog>::new()
///         .with("breed", "Pug")
///         .with("owner", RecipeForeignKey::new(person())),
/// });
/// ```
#[macro_export]
macro_rules! recipe_module {
	($path:literal { $($name:ident => $recipe:expr),* $(,)? }) => {
		const _: () = {
			fn __recipes() -> ::std::vec::Vec<(&'static str, $crate::registry::RecipeRef)> {
				::std::vec![$((::core::stringify!($name), $crate::registry::erase($recipe))),*]
			}

			$crate::inventory::submit! {
				$crate::registry::RecipeModule {
					path: $path,
					loader: __recipes,
				}
			}
		};
	};
}
