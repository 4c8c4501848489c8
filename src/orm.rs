//! Model layer used by recipes.
//!
//! # Examples
//!
//! ```rust,no_run
//! use reinhardt_recipes::orm::{Database, FieldDef, FieldKind, ModelMeta};
//! ```

pub use reinhardt_recipes_orm::*;
