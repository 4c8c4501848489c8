//! Test models.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use reinhardt_recipes_orm::{FieldDef, FieldKind, Model, ModelMeta};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
	pub id: Option<i64>,
	pub name: String,
	pub nickname: String,
	pub age: i32,
	pub bio: String,
	pub birthday: NaiveDate,
	pub appointment: DateTime<Utc>,
	pub blog: String,
	pub wanted_games_qtd: i32,
	pub birth_time: NaiveTime,
}

impl Model for Person {
	const LABEL: &'static str = "generic.Person";

	fn meta() -> ModelMeta {
		ModelMeta::new(Self::LABEL)
			.field(FieldDef::new("name", FieldKind::Char { max_length: 30 }))
			.field(FieldDef::new("nickname", FieldKind::Slug))
			.field(FieldDef::new("age", FieldKind::Integer))
			.field(FieldDef::new("bio", FieldKind::Text))
			.field(FieldDef::new("birthday", FieldKind::Date))
			.field(FieldDef::new("appointment", FieldKind::DateTime))
			.field(FieldDef::new("blog", FieldKind::Url))
			.field(FieldDef::new("wanted_games_qtd", FieldKind::PositiveSmallInteger))
			.field(FieldDef::new("birth_time", FieldKind::Time))
	}

	fn pk(&self) -> Option<i64> {
		self.id
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dog {
	pub id: Option<i64>,
	pub owner: Person,
	pub breed: String,
}

impl Model for Dog {
	const LABEL: &'static str = "generic.Dog";

	fn meta() -> ModelMeta {
		ModelMeta::new(Self::LABEL)
			.field(FieldDef::foreign_key::<Person>("owner"))
			.field(FieldDef::new("breed", FieldKind::Char { max_length: 50 }))
	}

	fn pk(&self) -> Option<i64> {
		self.id
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DummyNumbersModel {
	pub id: Option<i64>,
	pub float_field: f64,
}

impl Model for DummyNumbersModel {
	const LABEL: &'static str = "generic.DummyNumbersModel";

	fn meta() -> ModelMeta {
		ModelMeta::new(Self::LABEL).field(FieldDef::new("float_field", FieldKind::Float))
	}

	fn pk(&self) -> Option<i64> {
		self.id
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DummyBlankFieldsModel {
	pub id: Option<i64>,
	pub blank_char_field: String,
	pub blank_text_field: String,
}

impl Model for DummyBlankFieldsModel {
	const LABEL: &'static str = "generic.DummyBlankFieldsModel";

	fn meta() -> ModelMeta {
		ModelMeta::new(Self::LABEL)
			.field(FieldDef::new("blank_char_field", FieldKind::Char { max_length: 50 }).blank())
			.field(FieldDef::new("blank_text_field", FieldKind::Text).blank())
	}

	fn pk(&self) -> Option<i64> {
		self.id
	}
}
