//! Shared models and recipe modules for the integration tests.

#![allow(dead_code)]

#[path = "helpers/models.rs"]
pub mod models;
#[path = "helpers/recipes.rs"]
pub mod recipes;
