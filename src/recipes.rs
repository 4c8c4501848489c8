//! Recipe definitions, foreign keys and the recipe registry.
//!
//! # Examples
//!
//! ```rust,no_run
//! use reinhardt_recipes::recipes::registry::RecipeName;
//! use reinhardt_recipes::recipes::{Overrides, Recipe, RecipeForeignKey};
//! ```

pub use reinhardt_recipes_core::*;
