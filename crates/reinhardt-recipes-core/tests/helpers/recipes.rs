//! Recipe modules resolved by name in the integration tests.

use chrono::Utc;
use reinhardt_recipes_core::{Recipe, RecipeForeignKey, recipe_module};

use super::models::{Dog, DummyNumbersModel, Person};

pub fn person() -> Recipe<Person> {
	let now = Utc::now();
	Recipe::new()
		.with("name", "John Doe")
		.with("nickname", "joe")
		.with("age", 18)
		.with("bio", "Someone in the crowd")
		.with("birthday", now.date_naive())
		.with("appointment", now)
		.with("blog", "http://joe.blogspot.com")
		.with("wanted_games_qtd", 4)
		.with("birth_time", now.time())
}

recipe_module!("test.generic" {
	person => person(),
	dog => Recipe::<Dog>::new()
		.with("breed", "Pug")
		.with("owner", RecipeForeignKey::new(person())),
	other_dog => Recipe::<Dog>::new()
		.with("breed", "Basset")
		.with("owner", RecipeForeignKey::named("person")),
	saved_owner_dog => Recipe::<Dog>::new()
		.with("breed", "Pug")
		.with("owner", RecipeForeignKey::new(person()).always_persist()),
	any_dog => Recipe::<Dog>::new().with("breed", "Mutt"),
	numbers => Recipe::<DummyNumbersModel>::new().with("float_field", 1.6),
});

recipe_module!("test.generic.tests.sub_package" {
	person => Recipe::<Person>::new().with("name", "John Deeper"),
});
