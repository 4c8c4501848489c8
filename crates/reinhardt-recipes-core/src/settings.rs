//! Recipe settings.
//!
//! Settings can be built in code, deserialized from any serde source, or
//! read from environment variables prefixed with `REINHARDT_RECIPES_`:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `REINHARDT_RECIPES_MAX_MANY_QUANTITY` | [`RecipeSettings::max_many_quantity`] |
//! | `REINHARDT_RECIPES_LOOKUP_SEPARATOR` | [`RecipeSettings::lookup_separator`] |

use serde::{Deserialize, Serialize};

use crate::error::{RecipeError, RecipeResult};
use crate::mommy::MAX_MANY_QUANTITY;

/// Default separator between a relation and its field in lookup overrides.
pub const LOOKUP_SEPARATOR: &str = "__";

/// Tunables of the recipe engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeSettings {
	/// Number of instances built by `make_many_from_recipe` when the caller
	/// gives no quantity.
	pub max_many_quantity: usize,
	/// Separator of lookup overrides such as `owner__name`.
	pub lookup_separator: String,
}

impl Default for RecipeSettings {
	fn default() -> Self {
		Self {
			max_many_quantity: MAX_MANY_QUANTITY,
			lookup_separator: LOOKUP_SEPARATOR.to_string(),
		}
	}
}

impl RecipeSettings {
	/// Prefix of the environment variables read by [`RecipeSettings::from_env`].
	pub const ENV_PREFIX: &'static str = "REINHARDT_RECIPES_";

	/// Creates default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the default bulk quantity.
	pub fn with_max_many_quantity(mut self, quantity: usize) -> Self {
		self.max_many_quantity = quantity;
		self
	}

	/// Sets the lookup separator.
	pub fn with_lookup_separator(mut self, separator: impl Into<String>) -> Self {
		self.lookup_separator = separator.into();
		self
	}

	/// Reads settings from the process environment, keeping defaults for
	/// unset variables.
	pub fn from_env() -> RecipeResult<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Reads settings through `lookup`, which maps a full variable name to
	/// its value.
	pub fn from_lookup<F>(lookup: F) -> RecipeResult<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut settings = Self::default();
		let key = |name: &str| format!("{}{}", Self::ENV_PREFIX, name);

		let quantity_key = key("MAX_MANY_QUANTITY");
		if let Some(raw) = lookup(&quantity_key) {
			settings.max_many_quantity =
				raw.trim()
					.parse()
					.map_err(|e: std::num::ParseIntError| RecipeError::Configuration {
						key: quantity_key.clone(),
						message: e.to_string(),
					})?;
		}
		if let Some(raw) = lookup(&key("LOOKUP_SEPARATOR")) {
			settings.lookup_separator = raw;
		}

		settings.validate()?;
		Ok(settings)
	}

	/// Checks that the settings are usable.
	pub fn validate(&self) -> RecipeResult<()> {
		if self.max_many_quantity == 0 {
			return Err(RecipeError::Configuration {
				key: "max_many_quantity".to_string(),
				message: "must be at least 1".to_string(),
			});
		}
		if self.lookup_separator.is_empty() || self.lookup_separator.contains('.') {
			return Err(RecipeError::Configuration {
				key: "lookup_separator".to_string(),
				message: format!("'{}' cannot separate lookups", self.lookup_separator),
			});
		}
		Ok(())
	}
}
