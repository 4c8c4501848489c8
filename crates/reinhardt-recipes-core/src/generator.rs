//! Field generators.
//!
//! Every recipe attribute and every call-time override is a [`Generator`]:
//! a literal value, a zero-argument callable, a nested recipe, or a
//! [`RecipeForeignKey`]. Generators are resolved once per field per build.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use reinhardt_recipes_orm::Model;
use serde::Serialize;
use serde_json::Value;

use crate::error::{RecipeError, RecipeResult};
use crate::foreign_key::RecipeForeignKey;
use crate::recipe::AnyRecipe;

/// Zero-argument value factory evaluated at build time.
pub type GeneratorFn = Arc<dyn Fn() -> RecipeResult<Value> + Send + Sync>;

/// Source of a field value.
#[derive(Clone)]
pub enum Generator {
	/// A literal value, used as-is.
	Value(Value),
	/// A callable evaluated on every build.
	Callable(GeneratorFn),
	/// A nested recipe building the related instance of a foreign key.
	Recipe(Arc<dyn AnyRecipe>),
	/// A foreign key wrapper with an explicit persistence policy.
	ForeignKey(RecipeForeignKey),
}

impl Generator {
	/// Wraps any serializable value.
	///
	/// Serialization errors are reported when the field is built.
	pub fn value(value: impl Serialize) -> Self {
		match serde_json::to_value(value) {
			Ok(value) => Generator::Value(value),
			Err(error) => {
				let message = error.to_string();
				Generator::Callable(Arc::new(move || {
					Err(RecipeError::InvalidValue(message.clone()))
				}))
			}
		}
	}

	/// Wraps a callable producing a serializable value.
	///
	/// # Example
	///
	/// ```
	/// use reinhardt_recipes_core::Generator;
	///
	/// let generator = Generator::callable(|| "callable!!");
	/// assert_eq!(generator.kind(), "callable");
	/// ```
	pub fn callable<F, T>(f: F) -> Self
	where
		F: Fn() -> T + Send + Sync + 'static,
		T: Serialize,
	{
		Generator::Callable(Arc::new(move || Ok(serde_json::to_value(f())?)))
	}

	/// Wraps a fallible callable. Its errors propagate out of the build.
	pub fn try_callable<F, T>(f: F) -> Self
	where
		F: Fn() -> RecipeResult<T> + Send + Sync + 'static,
		T: Serialize,
	{
		Generator::Callable(Arc::new(move || Ok(serde_json::to_value(f()?)?)))
	}

	/// Wraps an existing model instance, typically for a foreign key.
	///
	/// A saved instance is used as-is and never rebuilt.
	pub fn instance<M: Model>(instance: &M) -> Self {
		match instance.to_fields() {
			Ok(fields) => Generator::Value(Value::Object(fields)),
			Err(error) => {
				let message = error.to_string();
				Generator::Callable(Arc::new(move || {
					Err(RecipeError::InvalidValue(message.clone()))
				}))
			}
		}
	}

	/// Short name of the variant, for diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Generator::Value(_) => "value",
			Generator::Callable(_) => "callable",
			Generator::Recipe(_) => "recipe",
			Generator::ForeignKey(_) => "foreign key",
		}
	}

	/// Resolves a plain value or callable.
	pub(crate) fn evaluate(&self, field: &str) -> RecipeResult<Value> {
		match self {
			Generator::Value(value) => Ok(value.clone()),
			Generator::Callable(f) => f(),
			Generator::Recipe(_) | Generator::ForeignKey(_) => Err(RecipeError::InvalidGenerator {
				field: field.to_string(),
				reason: format!("a {} can only generate a foreign key", self.kind()),
			}),
		}
	}
}

impl fmt::Debug for Generator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Generator::Value(value) => f.debug_tuple("Value").field(value).finish(),
			Generator::Callable(_) => f.write_str("Callable(..)"),
			Generator::Recipe(recipe) => f.debug_tuple("Recipe").field(&recipe.label()).finish(),
			Generator::ForeignKey(fk) => f.debug_tuple("ForeignKey").field(fk).finish(),
		}
	}
}

impl From<Value> for Generator {
	fn from(value: Value) -> Self {
		Generator::Value(value)
	}
}

impl From<&str> for Generator {
	fn from(value: &str) -> Self {
		Generator::Value(Value::String(value.to_string()))
	}
}

impl From<String> for Generator {
	fn from(value: String) -> Self {
		Generator::Value(Value::String(value))
	}
}

impl From<&String> for Generator {
	fn from(value: &String) -> Self {
		Generator::Value(Value::String(value.clone()))
	}
}

macro_rules! impl_from_json {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for Generator {
				fn from(value: $ty) -> Self {
					Generator::Value(Value::from(value))
				}
			}
		)*
	};
}

impl_from_json!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

macro_rules! impl_from_serialize {
	($($ty:ty),* $(,)?) => {
		$(
			impl From<$ty> for Generator {
				fn from(value: $ty) -> Self {
					Generator::value(value)
				}
			}
		)*
	};
}

impl_from_serialize!(NaiveDate, NaiveTime, NaiveDateTime, DateTime<Utc>);

impl From<RecipeForeignKey> for Generator {
	fn from(fk: RecipeForeignKey) -> Self {
		Generator::ForeignKey(fk)
	}
}
