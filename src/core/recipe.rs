//! Recipe business logic - the persistence gateway over the `recipes` table.
//!
//! Provides filtered listing, lookup by id, insertion, update and deletion, plus
//! the random selection queries used by the recipe-of-the-day rotation.
//! All functions are async and propagate database failures unchanged.

use crate::{
    entities::{Recipe, recipe},
    errors::Result,
};
use sea_orm::{Condition, Order, QueryOrder, QuerySelect, Set, prelude::*, sea_query::Expr};
use serde::{Deserialize, Serialize};

/// Separator used when storing the ingredient list as a single column.
pub const INGREDIENT_SEPARATOR: &str = ",";

/// Criteria for listing recipes. Empty criteria match every recipe.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    /// Text searched for in title, ingredients, description and notes
    pub query: Option<String>,
    /// Only liked (`true`) or only not-liked (`false`) recipes
    pub liked: Option<bool>,
}

/// Fields of a recipe about to be created.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    /// Recipe title
    pub title: String,
    /// Ingredient lines, in order
    pub ingredients: Vec<String>,
    /// Preparation steps
    pub description: String,
    /// Free-form notes
    pub notes: String,
    /// Previously uploaded image, if any
    pub image_path: Option<String>,
}

/// Full replacement of a recipe's editable fields.
#[derive(Debug, Clone)]
pub struct RecipeChanges {
    /// Recipe title
    pub title: String,
    /// Ingredient lines, in order
    pub ingredients: Vec<String>,
    /// Preparation steps
    pub description: String,
    /// Free-form notes
    pub notes: String,
    /// Image path; `None` clears it
    pub image_path: Option<String>,
    /// Favourite flag
    pub liked: bool,
}

/// Number of rows touched by an update or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResult {
    /// Rows affected
    pub changes: u64,
}

/// Joins ingredient lines into the stored column format.
#[must_use]
pub fn join_ingredients<S: AsRef<str>>(ingredients: &[S]) -> String {
    ingredients
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(INGREDIENT_SEPARATOR)
}

/// Splits the stored ingredient column back into lines.
#[must_use]
pub fn split_ingredients(stored: &str) -> Vec<String> {
    if stored.is_empty() {
        return Vec::new();
    }
    stored
        .split(INGREDIENT_SEPARATOR)
        .map(ToString::to_string)
        .collect()
}

/// Lists recipes matching `filter`, ordered by id.
///
/// A blank query is ignored. The query is matched as a substring against the title,
/// the stored ingredient string, the description and the notes.
pub async fn get_all_recipes<C>(db: &C, filter: &RecipeFilter) -> Result<Vec<recipe::Model>>
where
    C: ConnectionTrait,
{
    let mut select = Recipe::find();

    if let Some(query) = filter
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
    {
        select = select.filter(
            Condition::any()
                .add(recipe::Column::Title.contains(query))
                .add(recipe::Column::Ingredients.contains(query))
                .add(recipe::Column::Description.contains(query))
                .add(recipe::Column::Notes.contains(query)),
        );
    }

    if let Some(liked) = filter.liked {
        select = select.filter(recipe::Column::Liked.eq(liked));
    }

    select
        .order_by_asc(recipe::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a recipe by its id, returning `None` if it does not exist.
pub async fn get_recipe_by_id<C>(db: &C, recipe_id: i64) -> Result<Option<recipe::Model>>
where
    C: ConnectionTrait,
{
    Recipe::find_by_id(recipe_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Picks up to `limit` recipes in random order.
///
/// `include` restricts the candidates to the given ids, `exclude` removes ids from
/// them. Randomization is done by the database (`ORDER BY RANDOM()`).
pub async fn random_recipes<C>(
    db: &C,
    limit: u64,
    include: Option<&[i64]>,
    exclude: &[i64],
) -> Result<Vec<recipe::Model>>
where
    C: ConnectionTrait,
{
    let mut select = Recipe::find();

    if let Some(ids) = include {
        select = select.filter(recipe::Column::Id.is_in(ids.iter().copied()));
    }
    if !exclude.is_empty() {
        select = select.filter(recipe::Column::Id.is_not_in(exclude.iter().copied()));
    }

    select
        .order_by(Expr::cust("RANDOM()"), Order::Asc)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Inserts a new recipe. Ingredients are joined into one string and `liked` starts false.
pub async fn create_recipe<C>(db: &C, new_recipe: NewRecipe) -> Result<recipe::Model>
where
    C: ConnectionTrait,
{
    let recipe = recipe::ActiveModel {
        title: Set(new_recipe.title),
        ingredients: Set(join_ingredients(&new_recipe.ingredients)),
        description: Set(new_recipe.description),
        notes: Set(new_recipe.notes),
        image_path: Set(new_recipe.image_path),
        liked: Set(false),
        ..Default::default()
    };

    let result = recipe.insert(db).await?;
    tracing::info!("Created recipe {} ('{}')", result.id, result.title);
    Ok(result)
}

/// Overwrites the editable fields of the recipe with `recipe_id`.
///
/// An unknown id is not an error; the result simply reports zero changes.
pub async fn update_recipe<C>(
    db: &C,
    recipe_id: i64,
    changes: RecipeChanges,
) -> Result<MutationResult>
where
    C: ConnectionTrait,
{
    let update = recipe::ActiveModel {
        title: Set(changes.title),
        ingredients: Set(join_ingredients(&changes.ingredients)),
        description: Set(changes.description),
        notes: Set(changes.notes),
        image_path: Set(changes.image_path),
        liked: Set(changes.liked),
        ..Default::default()
    };

    let result = Recipe::update_many()
        .set(update)
        .filter(recipe::Column::Id.eq(recipe_id))
        .exec(db)
        .await?;

    tracing::debug!(
        "Updated recipe {}: {} row(s) affected",
        recipe_id,
        result.rows_affected
    );
    Ok(MutationResult {
        changes: result.rows_affected,
    })
}

/// Deletes every recipe whose id is in `recipe_ids`.
///
/// The image referenced by a deleted recipe is left alone; clients remove it
/// with a separate call.
pub async fn delete_recipes<C>(db: &C, recipe_ids: &[i64]) -> Result<MutationResult>
where
    C: ConnectionTrait,
{
    let result = Recipe::delete_many()
        .filter(recipe::Column::Id.is_in(recipe_ids.iter().copied()))
        .exec(db)
        .await?;

    tracing::info!(
        "Deleted recipes {:?}: {} row(s) removed",
        recipe_ids,
        result.rows_affected
    );
    Ok(MutationResult {
        changes: result.rows_affected,
    })
}
