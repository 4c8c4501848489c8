//! Default value generation.
//!
//! Produces "any valid value" for a field that nobody supplied. Required
//! fields never receive an empty string or zero, so generated instances
//! pass the same checks as hand-written ones.

use chrono::{DateTime, Days, NaiveDate, NaiveTime};
use fake::faker::internet::en::{DomainSuffix, SafeEmail};
use fake::faker::lorem::en::{Sentence, Word, Words};
use fake::faker::name::en::Name;
use fake::{Fake, Faker};
use serde_json::Value;

use crate::error::{OrmError, OrmResult};
use crate::model::{FieldDef, FieldKind};

const DATE_RANGE_DAYS: u64 = 365 * 70;
const SECONDS_PER_DAY: u32 = 86_400;
// 2000-01-01T00:00:00Z .. 2030-01-01T00:00:00Z
const TIMESTAMP_RANGE: std::ops::Range<i64> = 946_684_800..1_893_456_000;

/// Generates a value for `field`.
///
/// Resolution order: the field default, null for nullable fields, an empty
/// string for blank text fields, then a fake value matching the field kind.
/// Foreign keys are the caller's responsibility and are rejected.
pub fn generate_value(model: &str, field: &FieldDef) -> OrmResult<Value> {
	if let Some(default) = &field.default {
		return Ok(default.clone());
	}
	if field.null {
		return Ok(Value::Null);
	}
	if field.blank && field.kind.is_textual() {
		return Ok(Value::String(String::new()));
	}

	let value = match &field.kind {
		FieldKind::Auto => Value::Null,
		FieldKind::Char { max_length } => {
			let name: String = Name().fake();
			Value::String(truncate(name, *max_length))
		}
		FieldKind::Text => Value::String(Sentence(3..8).fake()),
		FieldKind::Slug => {
			let words: Vec<String> = Words(2..4).fake();
			Value::String(words.join("-").to_lowercase())
		}
		FieldKind::Email => Value::String(SafeEmail().fake()),
		FieldKind::Url => {
			let host: String = Word().fake();
			let suffix: String = DomainSuffix().fake();
			Value::String(format!("http://{}.{}", host.to_lowercase(), suffix))
		}
		FieldKind::Integer => Value::from((1..10_000i64).fake::<i64>()),
		FieldKind::SmallInteger | FieldKind::PositiveSmallInteger => {
			Value::from((1..100i64).fake::<i64>())
		}
		FieldKind::BigInteger => Value::from((1..1_000_000_000i64).fake::<i64>()),
		FieldKind::Float => Value::from((1.0..1000.0f64).fake::<f64>()),
		FieldKind::Boolean => Value::Bool(Faker.fake::<bool>()),
		FieldKind::Date => serde_json::to_value(fake_date(model, field)?)?,
		FieldKind::DateTime => {
			let seconds: i64 = TIMESTAMP_RANGE.fake();
			let timestamp = DateTime::from_timestamp(seconds, 0)
				.ok_or_else(|| out_of_range(model, field))?;
			serde_json::to_value(timestamp)?
		}
		FieldKind::Time => {
			let seconds: u32 = (1..SECONDS_PER_DAY).fake();
			let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
				.ok_or_else(|| out_of_range(model, field))?;
			serde_json::to_value(time)?
		}
		FieldKind::ForeignKey(related) => {
			return Err(OrmError::UnsupportedField {
				model: model.to_string(),
				field: field.name.to_string(),
				reason: format!("foreign key to {} needs a related instance", related.label),
			});
		}
	};
	Ok(value)
}

fn fake_date(model: &str, field: &FieldDef) -> OrmResult<NaiveDate> {
	let offset: u64 = (0..DATE_RANGE_DAYS).fake();
	NaiveDate::from_ymd_opt(1950, 1, 1)
		.and_then(|start| start.checked_add_days(Days::new(offset)))
		.ok_or_else(|| out_of_range(model, field))
}

fn out_of_range(model: &str, field: &FieldDef) -> OrmError {
	OrmError::UnsupportedField {
		model: model.to_string(),
		field: field.name.to_string(),
		reason: "generated value out of range".to_string(),
	}
}

fn truncate(value: String, max_length: usize) -> String {
	if value.chars().count() <= max_length {
		value
	} else {
		value.chars().take(max_length.max(1)).collect()
	}
}
