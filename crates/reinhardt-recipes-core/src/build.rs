//! Field resolution shared by every recipe.
//!
//! For each field of the model, in declaration order:
//!
//! 1. a direct override or recipe attribute wins
//! 2. otherwise the model default generator fills the field
//!
//! Foreign keys resolve to a nested object. Lookups (`owner__name`) are
//! routed to the nested recipe or default instance of their relation.
//! In [`Mode::Make`] related instances are saved before the parent. Every
//! field map passes the model's typed check before it is written.

use reinhardt_recipes_orm::{Database, FieldDef, ModelMeta, OrmResult, Related, generate_value};
use serde_json::{Map, Value};

use crate::error::{RecipeError, RecipeResult};
use crate::generator::Generator;
use crate::overrides::Overrides;
use crate::recipe::{AnyRecipe, BuildContext, Mode};

/// Typed check of a built field map, usually `Model::check_fields`.
pub(crate) type FieldCheck = fn(&Map<String, Value>) -> OrmResult<()>;

pub(crate) fn build_fields(
	meta: &ModelMeta,
	check: FieldCheck,
	attrs: Overrides,
	db: &Database,
	mode: Mode,
	ctx: &BuildContext<'_>,
) -> RecipeResult<Map<String, Value>> {
	let separator = ctx.settings().lookup_separator.clone();
	let parts = attrs.into_parts(&separator)?;
	let mut direct = parts.direct;
	let mut lookups = parts.lookups;

	for name in direct.keys() {
		meta.get_field(name)?;
	}
	for relation in lookups.keys() {
		if !meta.get_field(relation)?.is_relation() {
			return Err(RecipeError::InvalidLookup {
				lookup: relation.clone(),
				reason: format!("{}.{} is not a foreign key", meta.label(), relation),
			});
		}
	}

	let mut fields = Map::new();
	for field in meta.fields() {
		let source = direct.shift_remove(field.name);
		let nested = lookups.shift_remove(field.name);
		let value = match field.kind.related() {
			Some(related) => resolve_relation(field, related, source, nested, db, mode, ctx)?,
			None => match source {
				Some(generator) => generator.evaluate(field.name)?,
				None => generate_value(meta.label(), field)?,
			},
		};
		fields.insert(field.name.to_string(), value);
	}

	check(&fields)?;
	if mode.persists() {
		fields = db.insert(meta, fields)?;
	}
	tracing::debug!(
		model = meta.label(),
		?mode,
		pk = ?fields.get(meta.pk()),
		"built recipe instance"
	);
	Ok(fields)
}

/// Builds the instance behind a foreign key with a recipe.
pub(crate) fn build_related(
	recipe: &dyn AnyRecipe,
	field: &str,
	related: &Related,
	db: &Database,
	mode: Mode,
	overrides: Overrides,
	ctx: &BuildContext<'_>,
) -> RecipeResult<Value> {
	if recipe.label() != related.label {
		return Err(RecipeError::RelationMismatch {
			field: field.to_string(),
			expected: related.label,
			found: recipe.label(),
		});
	}
	Ok(Value::Object(recipe.build_fields(db, mode, overrides, ctx)?))
}

fn resolve_relation(
	field: &FieldDef,
	related: &Related,
	source: Option<Generator>,
	nested: Option<Overrides>,
	db: &Database,
	mode: Mode,
	ctx: &BuildContext<'_>,
) -> RecipeResult<Value> {
	match source {
		Some(Generator::Value(value)) => {
			reject_lookups(field, nested)?;
			resolve_instance(field, related, value, db)
		}
		Some(generator @ Generator::Callable(_)) => {
			reject_lookups(field, nested)?;
			let value = generator.evaluate(field.name)?;
			resolve_instance(field, related, value, db)
		}
		Some(Generator::Recipe(recipe)) => build_related(
			recipe.as_ref(),
			field.name,
			related,
			db,
			mode,
			nested.unwrap_or_default(),
			ctx,
		),
		Some(Generator::ForeignKey(fk)) => fk.resolve(
			field.name,
			related,
			db,
			mode,
			nested.unwrap_or_default(),
			ctx,
		),
		None if field.null && nested.is_none() => Ok(Value::Null),
		None => {
			let meta = related.model_meta();
			let fields =
				build_fields(&meta, related.check, nested.unwrap_or_default(), db, mode, ctx)?;
			Ok(Value::Object(fields))
		}
	}
}

/// Uses a supplied instance as-is; an integer is loaded as a primary key.
fn resolve_instance(
	field: &FieldDef,
	related: &Related,
	value: Value,
	db: &Database,
) -> RecipeResult<Value> {
	match value {
		Value::Object(_) | Value::Null => Ok(value),
		Value::Number(ref number) => match number.as_i64() {
			Some(pk) => Ok(Value::Object(db.get_value(&related.model_meta(), pk)?)),
			None => Err(invalid_instance(field, related)),
		},
		_ => Err(invalid_instance(field, related)),
	}
}

fn reject_lookups(field: &FieldDef, nested: Option<Overrides>) -> RecipeResult<()> {
	match nested {
		Some(overrides) if !overrides.is_empty() => Err(RecipeError::InvalidLookup {
			lookup: field.name.to_string(),
			reason: "the relation is set to a concrete value, not a recipe".to_string(),
		}),
		_ => Ok(()),
	}
}

fn invalid_instance(field: &FieldDef, related: &Related) -> RecipeError {
	RecipeError::InvalidGenerator {
		field: field.name.to_string(),
		reason: format!("expected a {} instance or primary key", related.label),
	}
}
