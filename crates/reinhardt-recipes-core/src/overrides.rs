//! Call-time overrides.
//!
//! [`Overrides`] is the typed replacement for keyword arguments. Keys are
//! field names; keys containing the lookup separator (`owner__name`) and
//! nested [`Overrides::related`] builders both target fields of a related
//! instance.

use indexmap::IndexMap;
use reinhardt_recipes_orm::Model;
use serde::Serialize;

use crate::error::{RecipeError, RecipeResult};
use crate::generator::Generator;

/// Field overrides for a single build.
///
/// # Example
///
/// ```
/// use reinhardt_recipes_core::Overrides;
///
/// let overrides = Overrides::new()
///     .set("breed", "Beagle")
///     .set("owner__name", "James")
///     .related("owner", Overrides::new().set("age", 40));
///
/// assert_eq!(overrides.len(), 3);
/// assert!(overrides.contains("owner__name"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Overrides {
	fields: IndexMap<String, Generator>,
	related: IndexMap<String, Overrides>,
}

/// Overrides split into direct fields and per-relation lookups.
pub(crate) struct Parts {
	pub direct: IndexMap<String, Generator>,
	pub lookups: IndexMap<String, Overrides>,
}

impl Overrides {
	/// Creates an empty set of overrides.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets a field or lookup.
	pub fn set(mut self, field: impl Into<String>, generator: impl Into<Generator>) -> Self {
		self.insert(field, generator);
		self
	}

	/// Sets a field from a callable evaluated at build time.
	pub fn set_fn<F, T>(self, field: impl Into<String>, f: F) -> Self
	where
		F: Fn() -> T + Send + Sync + 'static,
		T: Serialize,
	{
		self.set(field, Generator::callable(f))
	}

	/// Sets a field to an existing instance.
	pub fn instance<M: Model>(self, field: impl Into<String>, instance: &M) -> Self {
		self.set(field, Generator::instance(instance))
	}

	/// Sets overrides for the instance behind `relation`.
	///
	/// Equivalent to prefixing every key of `overrides` with the relation
	/// name and the lookup separator.
	pub fn related(mut self, relation: impl Into<String>, overrides: Overrides) -> Self {
		self.related
			.entry(relation.into())
			.or_default()
			.absorb(overrides);
		self
	}

	/// Sets a field or lookup in place.
	pub fn insert(&mut self, field: impl Into<String>, generator: impl Into<Generator>) {
		self.fields.insert(field.into(), generator.into());
	}

	/// Returns the generator set for `field`.
	pub fn get(&self, field: &str) -> Option<&Generator> {
		self.fields.get(field)
	}

	/// Returns true if `field` is set.
	pub fn contains(&self, field: &str) -> bool {
		self.fields.contains_key(field)
	}

	/// Returns the nested overrides registered with [`Overrides::related`].
	pub fn get_related(&self, relation: &str) -> Option<&Overrides> {
		self.related.get(relation)
	}

	/// Number of entries, counting each nested builder's entries.
	pub fn len(&self) -> usize {
		self.fields.len() + self.related.values().map(Overrides::len).sum::<usize>()
	}

	/// Returns true if nothing is overridden.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Iterates over the flat entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Generator)> {
		self.fields.iter().map(|(key, generator)| (key.as_str(), generator))
	}

	/// Returns `self` updated with `call`, `call` taking precedence.
	///
	/// Setting a relation directly in `call` discards lookups on that
	/// relation from `self`.
	pub(crate) fn merged(&self, call: Overrides, separator: &str) -> Overrides {
		let mut merged = self.clone();
		for key in call.fields.keys() {
			if key.contains(separator) {
				continue;
			}
			merged.related.shift_remove(key);
			let prefix = format!("{key}{separator}");
			merged.fields.retain(|existing, _| !existing.starts_with(&prefix));
		}
		merged.absorb(call);
		merged
	}

	/// Splits lookups off the direct field overrides.
	pub(crate) fn into_parts(self, separator: &str) -> RecipeResult<Parts> {
		let mut direct = IndexMap::new();
		let mut lookups: IndexMap<String, Overrides> = self.related;
		for (key, generator) in self.fields {
			match key.split_once(separator) {
				Some((relation, rest)) => {
					if relation.is_empty() || rest.is_empty() {
						return Err(RecipeError::InvalidLookup {
							lookup: key.clone(),
							reason: "expected <relation><separator><field>".to_string(),
						});
					}
					lookups
						.entry(relation.to_string())
						.or_default()
						.insert(rest, generator);
				}
				None => {
					direct.insert(key, generator);
				}
			}
		}
		Ok(Parts { direct, lookups })
	}

	fn absorb(&mut self, other: Overrides) {
		for (key, generator) in other.fields {
			self.fields.insert(key, generator);
		}
		for (relation, nested) in other.related {
			self.related.entry(relation).or_default().absorb(nested);
		}
	}
}

impl<K, G> FromIterator<(K, G)> for Overrides
where
	K: Into<String>,
	G: Into<Generator>,
{
	fn from_iter<I: IntoIterator<Item = (K, G)>>(iter: I) -> Self {
		let mut overrides = Overrides::new();
		for (key, generator) in iter {
			overrides.insert(key, generator);
		}
		overrides
	}
}
