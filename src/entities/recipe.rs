//! Recipe entity - Represents a single cookbook recipe.
//!
//! Ingredients are stored as one comma-joined string; the api layer accepts them
//! as a list of `{ "text": ... }` objects and joins them before insertion.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recipe database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    /// Unique identifier for the recipe
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Recipe title shown in listings
    pub title: String,
    /// Ingredient lines joined with `,`
    pub ingredients: String,
    /// Preparation steps
    pub description: String,
    /// Free-form notes
    pub notes: String,
    /// Path of the uploaded image, relative to the public directory
    pub image_path: Option<String>,
    /// Whether the recipe was marked as a favourite
    pub liked: bool,
}

/// `Recipe` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
