//! Smoke tests for the `reinhardt-recipes` facade and its prelude.

use reinhardt_recipes::prelude::*;
use rstest::*;
use serial_test::serial;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Author {
	id: Option<i64>,
	name: String,
	email: String,
}

impl Model for Author {
	const LABEL: &'static str = "library.Author";

	fn meta() -> ModelMeta {
		ModelMeta::new(Self::LABEL)
			.field(FieldDef::new("name", FieldKind::Char { max_length: 40 }))
			.field(FieldDef::new("email", FieldKind::Email))
	}

	fn pk(&self) -> Option<i64> {
		self.id
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Book {
	id: Option<i64>,
	author: Author,
	title: String,
	pages: i32,
}

impl Model for Book {
	const LABEL: &'static str = "library.Book";

	fn meta() -> ModelMeta {
		ModelMeta::new(Self::LABEL)
			.field(FieldDef::foreign_key::<Author>("author"))
			.field(FieldDef::new("title", FieldKind::Char { max_length: 100 }))
			.field(FieldDef::new("pages", FieldKind::PositiveSmallInteger))
	}

	fn pk(&self) -> Option<i64> {
		self.id
	}
}

recipe_module!("library.recipes" {
	author => Recipe::<Author>::new().with("name", "Ursula"),
	book => Recipe::<Book>::new()
		.with("title", "The Dispossessed")
		.with("author", RecipeForeignKey::named("author")),
});

#[fixture]
fn db() -> Database {
	Database::new()
}

#[rstest]
fn test_make_recipe_through_facade(db: Database) {
	let book: Book = mommy::make_recipe(&db, "library.recipes.book", Overrides::new()).unwrap();

	assert_eq!(book.title, "The Dispossessed");
	assert_eq!(book.author.name, "Ursula");
	assert!(book.pages > 0);
	assert!(book.author.email.contains('@'));
	assert_eq!(db.objects::<Author>().count(), 1);
	assert_eq!(db.objects::<Book>().count(), 1);
}

#[rstest]
fn test_prepare_many_through_facade(db: Database) {
	let books: Vec<Book> = mommy::prepare_recipe_quantity(
		&db,
		"library.recipes.book",
		2,
		Overrides::new().set("author__name", "Le Guin"),
	)
	.unwrap();

	assert_eq!(books.len(), 2);
	assert!(books.iter().all(|book| book.id.is_none() && book.author.name == "Le Guin"));
	assert_eq!(db.objects::<Author>().count(), 0);
}

#[rstest]
#[serial(recipe_registry)]
fn test_configured_bulk_size(db: Database) {
	let defaults = registry().settings();
	registry()
		.configure(RecipeSettings::new().with_max_many_quantity(3))
		.unwrap();

	let result: RecipeResult<Vec<Author>> =
		mommy::make_many_from_recipe(&db, "library.recipes.author", None, Overrides::new());
	registry().configure(defaults).unwrap();

	assert_eq!(result.unwrap().len(), 3);
}

#[rstest]
fn test_unknown_module_is_reported(db: Database) {
	let error = mommy::make_recipe::<Book>(&db, "library.missing.book", Overrides::new())
		.unwrap_err();

	assert!(matches!(error, RecipeError::ModuleNotFound(ref module) if module == "library.missing"));
}
