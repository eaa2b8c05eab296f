//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod recipe;
pub mod system_state;

pub use recipe::{Column as RecipeColumn, Entity as Recipe, Model as RecipeModel};
pub use system_state::{
    Column as SystemStateColumn, Entity as SystemState, Model as SystemStateModel,
};
