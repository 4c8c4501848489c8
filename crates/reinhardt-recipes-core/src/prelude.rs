//! Convenience re-exports for common usage.
//!
//! ```ignore
//! use reinhardt_recipes_core::prelude::*;
//! ```

pub use crate::error::{RecipeError, RecipeResult};
pub use crate::foreign_key::{Persist, RecipeForeignKey, foreign_key};
pub use crate::generator::Generator;
pub use crate::mommy::{self, MAX_MANY_QUANTITY};
pub use crate::overrides::Overrides;
pub use crate::recipe::{Mode, Recipe};
pub use crate::recipe_module;
pub use crate::registry::{RecipeRegistry, register_recipe, registry};
pub use crate::settings::RecipeSettings;

pub use reinhardt_recipes_orm::{Database, FieldDef, FieldKind, Model, ModelMeta};
