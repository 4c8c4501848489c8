//! In-memory database.
//!
//! Rows are stored as JSON field maps keyed by model label. Foreign keys are
//! stored as the related primary key and expanded back into nested objects
//! when rows are read, so a loaded `Dog` carries its `owner` the same way a
//! freshly built one does.

use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::error::{OrmError, OrmResult};
use crate::model::{FieldDef, FieldKind, Model, ModelMeta, Related, json_type};

type Row = Map<String, Value>;

#[derive(Debug, Clone, Default)]
struct Table {
	last_pk: i64,
	rows: BTreeMap<i64, Row>,
}

type Tables = HashMap<&'static str, Table>;

/// Handle to an in-memory database.
///
/// Cloning the handle shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct Database {
	tables: Arc<RwLock<Tables>>,
}

impl Database {
	/// Creates an empty database.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a manager for `M`.
	pub fn objects<M: Model>(&self) -> Manager<'_, M> {
		Manager {
			db: self,
			_model: PhantomData,
		}
	}

	/// Inserts or updates a row.
	///
	/// A missing or null primary key inserts a new row and assigns the next
	/// key; an existing key replaces that row. Returns `fields` with the
	/// primary key set.
	///
	/// # Errors
	///
	/// Fails with [`OrmError::FieldDoesNotExist`] for unknown fields and with
	/// [`OrmError::Integrity`] when a required field is null or a foreign key
	/// points at an unsaved or missing row.
	pub fn insert(&self, meta: &ModelMeta, mut fields: Row) -> OrmResult<Row> {
		for name in fields.keys() {
			meta.get_field(name)?;
		}

		let mut tables = self.tables.write();
		let mut row = Row::new();
		for field in meta.fields() {
			if field.name == meta.pk() {
				continue;
			}
			let value = fields.get(field.name).cloned().unwrap_or(Value::Null);
			let column = match &field.kind {
				FieldKind::ForeignKey(related) => {
					foreign_key_column(&tables, meta, field, related, &value)?
				}
				_ => {
					if value.is_null() && !field.null {
						return Err(not_null(meta, field));
					}
					value
				}
			};
			row.insert(field.name.to_string(), column);
		}

		let table = tables.entry(meta.label()).or_default();
		let pk = match fields.get(meta.pk()).and_then(Value::as_i64) {
			Some(pk) => {
				table.last_pk = table.last_pk.max(pk);
				pk
			}
			None => {
				table.last_pk += 1;
				table.last_pk
			}
		};
		row.insert(meta.pk().to_string(), Value::from(pk));
		table.rows.insert(pk, row);
		tracing::trace!(model = meta.label(), pk, "saved row");

		fields.insert(meta.pk().to_string(), Value::from(pk));
		Ok(fields)
	}

	/// Saves `instance` and returns the stored copy with its primary key.
	pub fn save<M: Model>(&self, instance: &M) -> OrmResult<M> {
		let fields = self.insert(&M::meta(), instance.to_fields()?)?;
		M::from_fields(fields)
	}

	/// Loads a row as a field map, expanding foreign keys into nested objects.
	pub fn get_value(&self, meta: &ModelMeta, pk: i64) -> OrmResult<Row> {
		let tables = self.tables.read();
		load_row(&tables, meta, pk)
	}

	/// Loads an instance by primary key.
	pub fn get<M: Model>(&self, pk: i64) -> OrmResult<M> {
		M::from_fields(self.get_value(&M::meta(), pk)?)
	}

	/// Returns true if a row with `pk` exists for `M`.
	pub fn exists<M: Model>(&self, pk: i64) -> bool {
		self.tables
			.read()
			.get(M::LABEL)
			.is_some_and(|table| table.rows.contains_key(&pk))
	}

	/// Returns the number of stored rows for `M`.
	pub fn count<M: Model>(&self) -> usize {
		self.tables
			.read()
			.get(M::LABEL)
			.map_or(0, |table| table.rows.len())
	}

	/// Loads every row of `M` in primary key order.
	pub fn all<M: Model>(&self) -> OrmResult<Vec<M>> {
		let meta = M::meta();
		let tables = self.tables.read();
		let Some(table) = tables.get(M::LABEL) else {
			return Ok(Vec::new());
		};
		table
			.rows
			.keys()
			.map(|pk| load_row(&tables, &meta, *pk).and_then(M::from_fields))
			.collect()
	}

	/// Deletes a row. Returns true if the row existed.
	pub fn delete<M: Model>(&self, pk: i64) -> bool {
		self.tables
			.write()
			.get_mut(M::LABEL)
			.is_some_and(|table| table.rows.remove(&pk).is_some())
	}

	/// Removes every row of every table.
	pub fn flush(&self) {
		self.tables.write().clear();
	}

	/// Runs `f` and discards every write it made if it returns an error.
	///
	/// The tables are restored to their state before the call, so writes
	/// made through other handles while `f` runs are discarded as well.
	/// Blocks nest: an inner failure only rolls back the inner block.
	///
	/// # Example
	///
	/// ```ignore
	/// let result: OrmResult<()> = db.atomic(|| {
	///     db.save(&owner)?;
	///     Err(OrmError::Integrity("abort".to_string()))
	/// });
	/// assert!(result.is_err());
	/// assert_eq!(db.objects::<Owner>().count(), 0);
	/// ```
	pub fn atomic<T, E, F>(&self, f: F) -> Result<T, E>
	where
		F: FnOnce() -> Result<T, E>,
	{
		let snapshot = self.tables.read().clone();
		let result = f();
		if result.is_err() {
			*self.tables.write() = snapshot;
			tracing::debug!("rolled back atomic block");
		}
		result
	}
}

/// Model manager, the query entry point for a single model.
///
/// Obtained from [`Database::objects`].
pub struct Manager<'a, M: Model> {
	db: &'a Database,
	_model: PhantomData<fn() -> M>,
}

impl<M: Model> Manager<'_, M> {
	/// Number of stored rows.
	pub fn count(&self) -> usize {
		self.db.count::<M>()
	}

	/// All rows in primary key order.
	pub fn all(&self) -> OrmResult<Vec<M>> {
		self.db.all::<M>()
	}

	/// Row with the given primary key.
	pub fn get(&self, pk: i64) -> OrmResult<M> {
		self.db.get::<M>(pk)
	}

	/// Returns true if the row exists.
	pub fn exists(&self, pk: i64) -> bool {
		self.db.exists::<M>(pk)
	}

	/// Rows whose stored `field` equals `value`.
	///
	/// Foreign keys compare against the related primary key.
	pub fn filter(&self, field: &str, value: impl Into<Value>) -> OrmResult<Vec<M>> {
		let meta = M::meta();
		meta.get_field(field)?;
		let value = value.into();
		let tables = self.db.tables.read();
		let Some(table) = tables.get(M::LABEL) else {
			return Ok(Vec::new());
		};
		table
			.rows
			.iter()
			.filter(|(_, row)| row.get(field) == Some(&value))
			.map(|(pk, _)| load_row(&tables, &meta, *pk).and_then(M::from_fields))
			.collect()
	}
}

fn load_row(tables: &Tables, meta: &ModelMeta, pk: i64) -> OrmResult<Row> {
	let mut row = tables
		.get(meta.label())
		.and_then(|table| table.rows.get(&pk))
		.cloned()
		.ok_or_else(|| OrmError::DoesNotExist {
			model: meta.label().to_string(),
			pk,
		})?;
	for (field, related) in meta.relations() {
		if let Some(related_pk) = row.get(field.name).and_then(Value::as_i64) {
			let nested = load_row(tables, &related.model_meta(), related_pk)?;
			row.insert(field.name.to_string(), Value::Object(nested));
		}
	}
	Ok(row)
}

fn foreign_key_column(
	tables: &Tables,
	meta: &ModelMeta,
	field: &FieldDef,
	related: &Related,
	value: &Value,
) -> OrmResult<Value> {
	let pk = match value {
		Value::Null if field.null => return Ok(Value::Null),
		Value::Null => return Err(not_null(meta, field)),
		Value::Number(_) => value.as_i64(),
		Value::Object(object) => {
			let pk = object.get(crate::model::PK_FIELD).and_then(Value::as_i64);
			if pk.is_none() {
				return Err(OrmError::Integrity(format!(
					"save() prohibited to prevent data loss due to unsaved related object '{}'",
					field.name
				)));
			}
			pk
		}
		other => {
			return Err(OrmError::Integrity(format!(
				"{}.{} expects a {} instance, got {}",
				meta.label(),
				field.name,
				related.label,
				json_type(other)
			)));
		}
	};

	let exists = pk.is_some_and(|pk| {
		tables
			.get(related.label)
			.is_some_and(|table| table.rows.contains_key(&pk))
	});
	match pk {
		Some(pk) if exists => Ok(Value::from(pk)),
		_ => Err(OrmError::Integrity(format!(
			"FOREIGN KEY constraint failed: {}.{} references a missing {} row",
			meta.label(),
			field.name,
			related.label
		))),
	}
}

fn not_null(meta: &ModelMeta, field: &FieldDef) -> OrmError {
	OrmError::Integrity(format!(
		"NOT NULL constraint failed: {}.{}",
		meta.table(),
		field.name
	))
}
