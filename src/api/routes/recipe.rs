//! Recipe endpoints - search, lookup, recipe of the day, create, edit and delete.
//!
//! Request bodies use the field names the frontend sends: ingredients arrive as
//! `ingredients_array: [{ "text": ... }]` and `liked` may be a boolean or a 0/1 flag.

use crate::{
    api::AppState,
    core::{
        recipe::{self, MutationResult, NewRecipe, RecipeChanges, RecipeFilter},
        rotation,
    },
    entities::recipe::Model as RecipeModel,
    errors::Result,
};
use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Deserializer};
use tracing::instrument;

/// One ingredient line as sent by the frontend.
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientInput {
    /// Ingredient text, e.g. `"2 eggs"`
    pub text: String,
}

/// Body of `POST /api/recipe/get`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    /// Text to search for; missing or blank lists every recipe
    #[serde(default)]
    pub query: Option<String>,
    /// Restrict to liked or not-liked recipes
    #[serde(default, deserialize_with = "optional_flag")]
    pub liked: Option<bool>,
}

/// Body of `POST /api/recipe/create`.
#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    /// Recipe title
    pub title: String,
    /// Ingredient lines in order
    #[serde(default)]
    pub ingredients_array: Vec<IngredientInput>,
    /// Preparation steps
    #[serde(default)]
    pub description: String,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
    /// Path returned by a previous upload
    #[serde(default)]
    pub image_path: Option<String>,
}

/// Body of `POST /api/recipe/edit`.
#[derive(Debug, Deserialize)]
pub struct EditRecipeRequest {
    /// Recipe to overwrite
    pub id: i64,
    /// Recipe title
    pub title: String,
    /// Ingredient lines in order
    #[serde(default)]
    pub ingredients_array: Vec<IngredientInput>,
    /// Preparation steps
    #[serde(default)]
    pub description: String,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
    /// Image path; omitted clears it
    #[serde(default)]
    pub image_path: Option<String>,
    /// Favourite flag
    #[serde(default, deserialize_with = "flag")]
    pub liked: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

impl From<Flag> for bool {
    fn from(value: Flag) -> Self {
        match value {
            Flag::Bool(b) => b,
            Flag::Int(n) => n != 0,
        }
    }
}

fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Flag::deserialize(deserializer).map(Into::into)
}

fn optional_flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Flag>::deserialize(deserializer).map(|f| f.map(Into::into))
}

fn ingredient_lines(ingredients: Vec<IngredientInput>) -> Vec<String> {
    ingredients.into_iter().map(|i| i.text).collect()
}

impl From<CreateRecipeRequest> for NewRecipe {
    fn from(request: CreateRecipeRequest) -> Self {
        Self {
            title: request.title,
            ingredients: ingredient_lines(request.ingredients_array),
            description: request.description,
            notes: request.notes,
            image_path: request.image_path,
        }
    }
}

impl From<EditRecipeRequest> for RecipeChanges {
    fn from(request: EditRecipeRequest) -> Self {
        Self {
            title: request.title,
            ingredients: ingredient_lines(request.ingredients_array),
            description: request.description,
            notes: request.notes,
            image_path: request.image_path,
            liked: request.liked,
        }
    }
}

/// `POST /api/recipe/get` - recipes matching the search body.
#[instrument(skip(state))]
pub async fn search_recipes(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<RecipeModel>>> {
    let filter = RecipeFilter {
        query: request.query,
        liked: request.liked,
    };
    let recipes = recipe::get_all_recipes(&state.database, &filter).await?;
    Ok(Json(recipes))
}

/// `GET /api/recipe/get/:recipe_id` - one recipe, or `null` if it does not exist.
#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<i64>,
) -> Result<Json<Option<RecipeModel>>> {
    let recipe = recipe::get_recipe_by_id(&state.database, recipe_id).await?;
    Ok(Json(recipe))
}

/// `GET /api/recipe/rotd` - today's three featured recipes.
#[instrument(skip(state))]
pub async fn recipes_of_the_day(State(state): State<AppState>) -> Result<Json<Vec<RecipeModel>>> {
    let recipes = rotation::recipes_of_the_day(&state.database).await?;
    Ok(Json(recipes))
}

/// `POST /api/recipe/create` - inserts a recipe and returns it with its new id.
#[instrument(skip(state))]
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(request): Json<CreateRecipeRequest>,
) -> Result<Json<RecipeModel>> {
    let created = recipe::create_recipe(&state.database, request.into()).await?;
    Ok(Json(created))
}

/// `POST /api/recipe/edit` - overwrites a recipe by id.
#[instrument(skip(state))]
pub async fn edit_recipe(
    State(state): State<AppState>,
    Json(request): Json<EditRecipeRequest>,
) -> Result<Json<MutationResult>> {
    let recipe_id = request.id;
    let result = recipe::update_recipe(&state.database, recipe_id, request.into()).await?;
    Ok(Json(result))
}

/// `DELETE /api/recipe/delete/:recipe_id` - removes a recipe. Its image is not touched.
#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<i64>,
) -> Result<Json<MutationResult>> {
    let result = recipe::delete_recipes(&state.database, &[recipe_id]).await?;
    Ok(Json(result))
}
