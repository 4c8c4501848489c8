//! Model layer used by reinhardt-recipes.
//!
//! This crate stands in for the ORM that recipes build on:
//!
//! - [`Model`] and [`ModelMeta`] describe a model's fields, including
//!   foreign keys to other models
//! - [`Database`] stores rows in memory and enforces not-null and
//!   referential constraints
//! - [`generate_value`] produces a valid value for any non-relational
//!   field, used when a recipe leaves a field unspecified
//!
//! # Example
//!
//! ```ignore
//! use reinhardt_recipes_orm::Database;
//!
//! let db = Database::new();
//! let person = db.save(&person)?;
//! assert_eq!(db.objects::<Person>().count(), 1);
//! ```

#![warn(missing_docs)]

pub mod database;
pub mod error;
pub mod fields;
pub mod model;

pub use database::{Database, Manager};
pub use error::{OrmError, OrmResult};
pub use fields::generate_value;
pub use model::{FieldDef, FieldKind, Model, ModelMeta, PK_FIELD, Related};
