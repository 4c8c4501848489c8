//! Model metadata.
//!
//! A [`Model`] is a serde-serializable struct with an optional integer
//! primary key. Its [`ModelMeta`] lists the fields in declaration order so
//! that callers can fill, validate and persist instances without knowing
//! the concrete Rust type.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{OrmError, OrmResult};

/// Name of the implicit primary key field.
pub const PK_FIELD: &str = "id";

/// A persisted model type.
///
/// # Example
///
/// ```
/// use reinhardt_recipes_orm::{FieldDef, FieldKind, Model, ModelMeta};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Tag {
///     id: Option<i64>,
///     label: String,
/// }
///
/// impl Model for Tag {
///     const LABEL: &'static str = "blog.Tag";
///
///     fn meta() -> ModelMeta {
///         ModelMeta::new(Self::LABEL).field(FieldDef::new("label", FieldKind::Char { max_length: 20 }))
///     }
///
///     fn pk(&self) -> Option<i64> {
///         self.id
///     }
/// }
///
/// assert_eq!(Tag::meta().table(), "blog_tag");
/// ```
pub trait Model: Serialize + DeserializeOwned + Send + Sync + 'static {
	/// Model label in the form "app.Model".
	const LABEL: &'static str;

	/// Returns the field metadata for this model.
	fn meta() -> ModelMeta;

	/// Returns the primary key, or `None` for an unsaved instance.
	fn pk(&self) -> Option<i64>;

	/// Serializes the instance into a field map.
	fn to_fields(&self) -> OrmResult<Map<String, Value>> {
		match serde_json::to_value(self)? {
			Value::Object(fields) => Ok(fields),
			other => Err(OrmError::Serialization(format!(
				"{} serialized to {} instead of an object",
				Self::LABEL,
				json_type(&other)
			))),
		}
	}

	/// Builds an instance from a field map.
	fn from_fields(fields: Map<String, Value>) -> OrmResult<Self> {
		Ok(serde_json::from_value(Value::Object(fields))?)
	}

	/// Checks that `fields` deserializes into this model.
	///
	/// Run before a field map is written, so that the store only ever holds
	/// rows that load back.
	fn check_fields(fields: &Map<String, Value>) -> OrmResult<()> {
		Self::from_fields(fields.clone()).map(drop)
	}
}

/// Reference to the model targeted by a foreign key.
#[derive(Debug, Clone, Copy)]
pub struct Related {
	/// Label of the related model.
	pub label: &'static str,
	/// Metadata accessor of the related model.
	pub meta: fn() -> ModelMeta,
	/// Typed check of a field map of the related model.
	pub check: fn(&Map<String, Value>) -> OrmResult<()>,
}

impl Related {
	/// Creates a reference to `M`.
	pub fn to<M: Model>() -> Self {
		Self {
			label: M::LABEL,
			meta: M::meta,
			check: M::check_fields,
		}
	}

	/// Returns the related model metadata.
	pub fn model_meta(&self) -> ModelMeta {
		(self.meta)()
	}
}

/// Storage type of a field.
#[derive(Debug, Clone)]
pub enum FieldKind {
	/// Auto-incrementing integer primary key.
	Auto,
	/// Bounded string.
	Char {
		/// Maximum number of characters.
		max_length: usize,
	},
	/// Unbounded string.
	Text,
	/// Lowercase words joined by hyphens.
	Slug,
	/// E-mail address.
	Email,
	/// Absolute URL.
	Url,
	/// 32-bit signed integer.
	Integer,
	/// 16-bit signed integer.
	SmallInteger,
	/// 16-bit non-negative integer.
	PositiveSmallInteger,
	/// 64-bit signed integer.
	BigInteger,
	/// Double precision float.
	Float,
	/// Boolean.
	Boolean,
	/// Calendar date.
	Date,
	/// UTC timestamp.
	DateTime,
	/// Time of day.
	Time,
	/// Reference to a row of another model.
	ForeignKey(Related),
}

impl FieldKind {
	/// Returns the related model when the field is a foreign key.
	pub fn related(&self) -> Option<&Related> {
		match self {
			FieldKind::ForeignKey(related) => Some(related),
			_ => None,
		}
	}

	/// Returns true for string-backed kinds.
	pub fn is_textual(&self) -> bool {
		matches!(
			self,
			FieldKind::Char { .. }
				| FieldKind::Text
				| FieldKind::Slug
				| FieldKind::Email
				| FieldKind::Url
		)
	}
}

/// Definition of a single model field.
#[derive(Debug, Clone)]
pub struct FieldDef {
	/// Field name, matching the serde name of the struct field.
	pub name: &'static str,
	/// Storage type.
	pub kind: FieldKind,
	/// Whether the column accepts null.
	pub null: bool,
	/// Whether an empty value is acceptable.
	pub blank: bool,
	/// Value used when nothing else is supplied.
	pub default: Option<Value>,
}

impl FieldDef {
	/// Creates a required field.
	pub fn new(name: &'static str, kind: FieldKind) -> Self {
		Self {
			name,
			kind,
			null: false,
			blank: false,
			default: None,
		}
	}

	/// Creates a foreign key to `M`.
	pub fn foreign_key<M: Model>(name: &'static str) -> Self {
		Self::new(name, FieldKind::ForeignKey(Related::to::<M>()))
	}

	/// Allows null values.
	pub fn null(mut self) -> Self {
		self.null = true;
		self
	}

	/// Allows empty values.
	pub fn blank(mut self) -> Self {
		self.blank = true;
		self
	}

	/// Sets the field default.
	pub fn default_value(mut self, value: impl Into<Value>) -> Self {
		self.default = Some(value.into());
		self
	}

	/// Returns true for foreign keys.
	pub fn is_relation(&self) -> bool {
		self.kind.related().is_some()
	}
}

/// Metadata of a model: label, table and ordered fields.
#[derive(Debug, Clone)]
pub struct ModelMeta {
	label: &'static str,
	table: String,
	fields: Vec<FieldDef>,
}

impl ModelMeta {
	/// Creates metadata holding only the primary key field.
	///
	/// The table name is derived from the label: `"generic.Person"` maps to
	/// `"generic_person"`.
	pub fn new(label: &'static str) -> Self {
		Self {
			label,
			table: label.replace('.', "_").to_lowercase(),
			fields: vec![FieldDef::new(PK_FIELD, FieldKind::Auto)],
		}
	}

	/// Appends a field.
	pub fn field(mut self, field: FieldDef) -> Self {
		self.fields.push(field);
		self
	}

	/// Returns the model label.
	pub fn label(&self) -> &'static str {
		self.label
	}

	/// Returns the table name.
	pub fn table(&self) -> &str {
		&self.table
	}

	/// Returns the primary key field name.
	pub fn pk(&self) -> &'static str {
		PK_FIELD
	}

	/// Returns the fields in declaration order, primary key first.
	pub fn fields(&self) -> &[FieldDef] {
		&self.fields
	}

	/// Looks up a field by name.
	pub fn get_field(&self, name: &str) -> OrmResult<&FieldDef> {
		self.fields
			.iter()
			.find(|field| field.name == name)
			.ok_or_else(|| OrmError::FieldDoesNotExist {
				model: self.label.to_string(),
				field: name.to_string(),
			})
	}

	/// Returns the foreign key fields.
	pub fn relations(&self) -> impl Iterator<Item = (&FieldDef, &Related)> {
		self.fields
			.iter()
			.filter_map(|field| field.kind.related().map(|related| (field, related)))
	}
}

pub(crate) fn json_type(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
