//! Shared test utilities for the cookbook server.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test recipes with sensible defaults.

use crate::{
    core::recipe::{self, NewRecipe},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test recipe with sensible defaults.
///
/// # Defaults
/// * `ingredients`: `["flour", "eggs", "milk"]`
/// * `description`: `"Test description"`
/// * `notes`: empty
/// * `image_path`: None
pub async fn create_test_recipe(
    db: &DatabaseConnection,
    title: &str,
) -> Result<entities::recipe::Model> {
    create_custom_recipe(db, title, &["flour", "eggs", "milk"]).await
}

/// Creates a test recipe with custom ingredients.
pub async fn create_custom_recipe(
    db: &DatabaseConnection,
    title: &str,
    ingredients: &[&str],
) -> Result<entities::recipe::Model> {
    recipe::create_recipe(
        db,
        NewRecipe {
            title: title.to_string(),
            ingredients: ingredients.iter().map(ToString::to_string).collect(),
            description: "Test description".to_string(),
            notes: String::new(),
            image_path: None,
        },
    )
    .await
}

/// Creates `count` recipes named `Recipe 1`..`Recipe N` and returns their ids in order.
pub async fn create_test_recipes(db: &DatabaseConnection, count: usize) -> Result<Vec<i64>> {
    let mut ids = Vec::with_capacity(count);
    for n in 1..=count {
        ids.push(create_test_recipe(db, &format!("Recipe {n}")).await?.id);
    }
    Ok(ids)
}
