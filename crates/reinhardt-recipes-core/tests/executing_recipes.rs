//! Integration tests for executing recipes by name.
//!
//! Recipes are declared in `helpers/recipes.rs` with `recipe_module!` and
//! resolved through the process-wide registry by the `mommy` functions.

mod helpers;

use helpers::models::{Dog, DummyNumbersModel, Person};
use reinhardt_recipes_core::mommy::{self, MAX_MANY_QUANTITY};
use reinhardt_recipes_core::{Overrides, Recipe, RecipeError, RecipeRegistry, RecipeSettings};
use reinhardt_recipes_orm::Database;
use rstest::*;

#[fixture]
fn db() -> Database {
	Database::new()
}

fn ritchie() -> Overrides {
	Overrides::new().set("name", "Dennis Ritchie").set("age", 70)
}

#[rstest]
fn test_model_with_foreign_key(db: Database) {
	let dog: Dog = mommy::make_recipe(&db, "test.generic.dog", Overrides::new()).unwrap();
	assert_eq!(dog.breed, "Pug");
	assert_eq!(dog.owner.name, "John Doe");
	assert!(dog.owner.id.is_some());
	assert!(dog.id.is_some());

	let dog: Dog = mommy::prepare_recipe(&db, "test.generic.dog", Overrides::new()).unwrap();
	assert_eq!(dog.breed, "Pug");
	assert_eq!(dog.owner.name, "John Doe");
	assert!(dog.owner.id.is_none());
	assert!(dog.id.is_none());
	assert_eq!(db.objects::<Person>().count(), 1);
}

#[rstest]
fn test_model_with_always_persisted_foreign_key(db: Database) {
	let dog: Dog =
		mommy::prepare_recipe(&db, "test.generic.saved_owner_dog", Overrides::new()).unwrap();

	assert_eq!(dog.breed, "Pug");
	assert!(dog.owner.id.is_some());
	assert!(dog.id.is_none());
	assert_eq!(db.objects::<Person>().count(), 1);
	assert_eq!(db.objects::<Dog>().count(), 0);
}

#[rstest]
fn test_model_with_foreign_key_as_str(db: Database) {
	let dog: Dog = mommy::make_recipe(&db, "test.generic.other_dog", Overrides::new()).unwrap();
	assert_eq!(dog.breed, "Basset");
	assert_eq!(dog.owner.name, "John Doe");
	assert!(dog.owner.id.is_some());

	let dog: Dog =
		mommy::prepare_recipe(&db, "test.generic.other_dog", Overrides::new()).unwrap();
	assert_eq!(dog.breed, "Basset");
	assert!(dog.owner.id.is_none());
}

#[rstest]
fn test_make_recipe(db: Database) {
	let person: Person = mommy::make_recipe(&db, "test.generic.person", Overrides::new()).unwrap();
	assert!(person.id.is_some());
	assert_eq!(db.objects::<Person>().count(), 1);
}

#[rstest]
fn test_make_recipe_with_quantity_parameter(db: Database) {
	let people: Vec<Person> =
		mommy::make_recipe_quantity(&db, "test.generic.person", 3, Overrides::new()).unwrap();

	assert_eq!(people.len(), 3);
	assert!(people.iter().all(|person| person.id.is_some()));
	let ids: Vec<_> = people.iter().map(|person| person.id.unwrap()).collect();
	assert_eq!(ids, vec![1, 2, 3]);
}

#[rstest]
fn test_make_recipe_with_quantity_parameter_respecting_model_args(db: Database) {
	let people: Vec<Person> =
		mommy::make_recipe_quantity(&db, "test.generic.person", 3, ritchie()).unwrap();

	assert_eq!(people.len(), 3);
	for person in &people {
		assert_eq!(person.name, "Dennis Ritchie");
		assert_eq!(person.age, 70);
	}
}

#[rstest]
fn test_prepare_recipe(db: Database) {
	let person: Person =
		mommy::prepare_recipe(&db, "test.generic.person", Overrides::new()).unwrap();
	assert!(person.id.is_none());
	assert_eq!(db.objects::<Person>().count(), 0);
}

#[rstest]
fn test_prepare_recipe_with_quantity(db: Database) {
	let people: Vec<Person> =
		mommy::prepare_recipe_quantity(&db, "test.generic.person", 4, ritchie()).unwrap();
	assert_eq!(people.len(), 4);
	assert!(people.iter().all(|p| p.id.is_none() && p.age == 70));
	assert_eq!(db.objects::<Person>().count(), 0);
}

#[rstest]
fn test_make_recipe_with_args(db: Database) {
	let person: Person = mommy::make_recipe(&db, "test.generic.person", ritchie()).unwrap();
	assert_eq!(person.name, "Dennis Ritchie");
	assert_eq!(person.age, 70);
}

#[rstest]
fn test_prepare_recipe_with_args(db: Database) {
	let person: Person = mommy::prepare_recipe(&db, "test.generic.person", ritchie()).unwrap();
	assert_eq!(person.name, "Dennis Ritchie");
	assert_eq!(person.age, 70);
}

#[rstest]
fn test_import_recipe_inside_deeper_modules(db: Database) {
	let person: Person = mommy::prepare_recipe(
		&db,
		"test.generic.tests.sub_package.person",
		Overrides::new(),
	)
	.unwrap();
	assert_eq!(person.name, "John Deeper");
}

#[rstest]
fn test_make_many_from_recipe(db: Database) {
	let people: Vec<Person> =
		mommy::make_many_from_recipe(&db, "test.generic.person", None, Overrides::new()).unwrap();

	assert_eq!(people.len(), MAX_MANY_QUANTITY);
	assert!(people.iter().all(|person| person.id.is_some()));
	assert_eq!(db.objects::<Person>().count(), MAX_MANY_QUANTITY);
}

#[rstest]
fn test_make_many_from_recipe_with_specified_quantity(db: Database) {
	let people: Vec<Person> =
		mommy::make_many_from_recipe(&db, "test.generic.person", Some(2), Overrides::new())
			.unwrap();
	assert_eq!(people.len(), 2);
}

#[rstest]
fn test_make_many_with_model_args(db: Database) {
	let people: Vec<Person> =
		mommy::make_many_from_recipe(&db, "test.generic.person", None, ritchie()).unwrap();
	for person in &people {
		assert_eq!(person.name, "Dennis Ritchie");
		assert_eq!(person.age, 70);
	}
}

#[rstest]
fn test_recipe_without_declared_fields(db: Database) {
	let numbers: DummyNumbersModel =
		mommy::make_recipe(&db, "test.generic.numbers", Overrides::new()).unwrap();
	assert_eq!(numbers.float_field, 1.6);
}

#[rstest]
#[case("test.generic.cat")]
fn test_unknown_recipe(db: Database, #[case] name: &str) {
	let error = mommy::make_recipe::<Person>(&db, name, Overrides::new()).unwrap_err();
	assert!(matches!(error, RecipeError::RecipeNotFound(ref missing) if missing == name));
}

#[rstest]
fn test_unknown_module(db: Database) {
	let error =
		mommy::prepare_recipe::<Person>(&db, "test.missing.person", Overrides::new()).unwrap_err();
	assert!(matches!(error, RecipeError::ModuleNotFound(ref module) if module == "test.missing"));
}

#[rstest]
fn test_name_without_module(db: Database) {
	let error = mommy::make_recipe::<Person>(&db, "person", Overrides::new()).unwrap_err();
	assert!(matches!(error, RecipeError::InvalidRecipeName(_)));
}

#[rstest]
fn test_wrong_model_type(db: Database) {
	let error = mommy::make_recipe::<Dog>(&db, "test.generic.person", Overrides::new()).unwrap_err();
	assert!(matches!(
		error,
		RecipeError::ModelMismatch {
			expected: "generic.Dog",
			found: "generic.Person",
			..
		}
	));
	assert_eq!(db.objects::<Person>().count(), 0);
}

#[rstest]
fn test_resolving_creates_no_rows(db: Database) {
	let registry = RecipeRegistry::new();
	assert!(registry.contains("test.generic.dog"));
	assert!(registry.contains("test.generic.tests.sub_package.person"));
	assert_eq!(db.objects::<Person>().count(), 0);
	assert_eq!(db.objects::<Dog>().count(), 0);
}

#[rstest]
fn test_registry_settings_drive_bulk_size(db: Database) {
	let registry = RecipeRegistry::isolated()
		.with_settings(RecipeSettings::new().with_max_many_quantity(2))
		.unwrap();
	registry
		.register("local.person", Recipe::<Person>::new().with("name", "Ken"))
		.unwrap();

	let people: Vec<Person> = registry
		.make_many_from_recipe(&db, "local.person", None, Overrides::new())
		.unwrap();

	assert_eq!(people.len(), 2);
	assert!(people.iter().all(|person| person.name == "Ken"));
}

#[rstest]
fn test_default_bulk_size_is_max_many_quantity() {
	let registry = RecipeRegistry::isolated();
	assert_eq!(registry.settings().max_many_quantity, MAX_MANY_QUANTITY);
}

#[rstest]
#[case(RecipeSettings::new().with_lookup_separator(""))]
#[case(RecipeSettings::new().with_max_many_quantity(0))]
fn test_invalid_registry_settings_are_rejected(#[case] settings: RecipeSettings) {
	let error = RecipeRegistry::isolated().with_settings(settings).err();

	assert!(matches!(error, Some(RecipeError::Configuration { .. })));
}

#[rstest]
fn test_failed_make_recipe_leaves_no_rows(db: Database) {
	let error = mommy::make_recipe::<Dog>(
		&db,
		"test.generic.dog",
		Overrides::new().set("breed", serde_json::Value::Null),
	)
	.unwrap_err();

	assert!(matches!(error, RecipeError::Orm(_)));
	assert_eq!(db.objects::<Person>().count(), 0);
	assert_eq!(db.objects::<Dog>().count(), 0);
}

#[rstest]
fn test_failed_batch_leaves_no_rows(db: Database) {
	let error = mommy::make_recipe_quantity::<Person>(
		&db,
		"test.generic.person",
		3,
		Overrides::new().set("age", "seventy"),
	)
	.unwrap_err();

	assert!(matches!(error, RecipeError::Orm(_)));
	assert_eq!(db.objects::<Person>().count(), 0);
	assert!(db.objects::<Person>().all().unwrap().is_empty());
}
