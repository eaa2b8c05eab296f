//! System state entity - Stores key-value pairs for server-wide state.
//! Holds the recipe-of-the-day record (selected ids plus the time they were
//! last checked) so that rotation survives restarts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// System state database model - stores key-value pairs
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "system_state")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// State key (e.g., `"recipe_of_the_day"`)
    #[sea_orm(unique)]
    pub key: String,
    /// Value stored as string (JSON for structured records)
    pub value: String,
    /// When this entry was last written
    pub updated_at: DateTime,
}

/// `SystemState` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
