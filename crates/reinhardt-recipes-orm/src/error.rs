//! Error types for the ORM layer.

use thiserror::Error;

/// Errors raised by model metadata lookups and the in-memory database.
#[derive(Debug, Error)]
pub enum OrmError {
	/// The model has no field with the given name.
	#[error("{model} has no field named '{field}'")]
	FieldDoesNotExist {
		/// Model label (e.g., "generic.Person").
		model: String,
		/// Requested field name.
		field: String,
	},

	/// No row matches the requested primary key.
	#[error("{model} matching query does not exist (pk={pk})")]
	DoesNotExist {
		/// Model label.
		model: String,
		/// Requested primary key.
		pk: i64,
	},

	/// A row violates a storage-level constraint.
	#[error("Integrity error: {0}")]
	Integrity(String),

	/// The field cannot be filled by the default value generator.
	#[error("Unsupported field {model}.{field}: {reason}")]
	UnsupportedField {
		/// Model label.
		model: String,
		/// Field name.
		field: String,
		/// Why the field is unsupported.
		reason: String,
	},

	/// A model did not serialize to a JSON object.
	#[error("Serialization error: {0}")]
	Serialization(String),

	/// JSON conversion between a model and its field map failed.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Result type alias for ORM operations.
pub type OrmResult<T> = Result<T, OrmError>;
