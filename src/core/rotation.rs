//! Recipe-of-the-day rotation.
//!
//! Three recipes are featured per calendar day. The selection and the moment it
//! was last checked are kept as one JSON record in the `system_state` table:
//!
//! ```json
//! { "recipe_ids": [4, 9, 17], "lastCheckedDate": "2024-03-05T08:12:44.512Z" }
//! ```
//!
//! Each request evaluates the record against today's local date:
//!
//! 1. Same day with a valid selection: the same three recipes, shuffled.
//! 2. New day with a valid selection: three random recipes none of which was featured
//!    the previous time.
//! 3. Anything else (first run, damaged record, deleted recipes, too few candidates):
//!    three random recipes from the whole table.
//!
//! The record is rewritten on every request inside the same database transaction
//! that read it, so the timestamp always reflects the latest check.

use crate::{
    core::recipe,
    entities::{SystemState, recipe::Model as RecipeModel, system_state},
    errors::{Error, Result},
};
use chrono::{DateTime, Local, NaiveDate, Utc};
use sea_orm::{Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

const ROTATION_STATE_KEY: &str = "recipe_of_the_day";

/// Number of recipes featured per day.
pub const ROTATION_SIZE: usize = 3;
const ROTATION_LIMIT: u64 = ROTATION_SIZE as u64;

/// Persisted rotation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    /// Ids featured by the last check; empty or exactly [`ROTATION_SIZE`] entries
    pub recipe_ids: Vec<i64>,
    /// When the selection was last checked
    #[serde(rename = "lastCheckedDate")]
    pub last_checked_date: DateTime<Utc>,
}

impl RotationState {
    /// Whether the record holds a complete selection.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.recipe_ids.len() == ROTATION_SIZE
    }

    /// Local calendar date of the last check.
    #[must_use]
    pub fn checked_on(&self) -> NaiveDate {
        self.last_checked_date.with_timezone(&Local).date_naive()
    }
}

/// Which branch of the rotation applies to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Same calendar day, keep the current selection
    SameDay,
    /// A new calendar day, rotate away from the previous selection
    NewDay,
    /// No usable previous selection
    Fresh,
}

/// Decides the transition for `today` given the stored state.
///
/// Dates are compared in full, so a record from the same day of a previous month
/// counts as a new day.
#[must_use]
pub fn classify(state: Option<&RotationState>, today: NaiveDate) -> Transition {
    match state {
        Some(state) if state.is_valid() && state.checked_on() == today => Transition::SameDay,
        Some(state) if state.is_valid() => Transition::NewDay,
        _ => Transition::Fresh,
    }
}

/// Reads the rotation record.
///
/// A record that cannot be parsed is logged and reported as absent, which makes
/// the next selection start fresh.
pub async fn load_rotation_state<C>(db: &C) -> Result<Option<RotationState>>
where
    C: ConnectionTrait,
{
    let row = SystemState::find()
        .filter(system_state::Column::Key.eq(ROTATION_STATE_KEY))
        .one(db)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    match serde_json::from_str::<RotationState>(&row.value) {
        Ok(state) => Ok(Some(state)),
        Err(e) => {
            warn!("Ignoring unreadable rotation state '{}': {}", row.value, e);
            Ok(None)
        }
    }
}

/// Writes the rotation record, inserting it on first use.
pub async fn save_rotation_state<C>(db: &C, state: &RotationState) -> Result<()>
where
    C: ConnectionTrait,
{
    let value = serde_json::to_string(state).map_err(|e| Error::Rotation {
        message: format!("Failed to encode rotation state: {e}"),
    })?;
    let now = Utc::now().naive_utc();

    let existing = SystemState::find()
        .filter(system_state::Column::Key.eq(ROTATION_STATE_KEY))
        .one(db)
        .await?;

    if let Some(row) = existing {
        let mut active_model: system_state::ActiveModel = row.into();
        active_model.value = Set(value);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_state = system_state::ActiveModel {
            key: Set(ROTATION_STATE_KEY.to_string()),
            value: Set(value),
            updated_at: Set(now),
            ..Default::default()
        };
        new_state.insert(db).await?;
    }

    Ok(())
}

/// Returns today's featured recipes, rotating the selection if the day changed.
pub async fn recipes_of_the_day(db: &DatabaseConnection) -> Result<Vec<RecipeModel>> {
    recipes_of_the_day_at(db, Local::now()).await
}

/// Same as [`recipes_of_the_day`] with an explicit clock.
#[instrument(skip(db))]
pub async fn recipes_of_the_day_at(
    db: &DatabaseConnection,
    now: DateTime<Local>,
) -> Result<Vec<RecipeModel>> {
    let txn = db.begin().await?;

    let state = load_rotation_state(&txn).await?;
    let transition = classify(state.as_ref(), now.date_naive());
    let previous = state.map(|s| s.recipe_ids).unwrap_or_default();
    debug!("Rotation transition {:?} from {:?}", transition, previous);

    let recipes = match transition {
        Transition::SameDay => {
            let recipes =
                recipe::random_recipes(&txn, ROTATION_LIMIT, Some(previous.as_slice()), &[])
                    .await?;
            if recipes.len() == ROTATION_SIZE {
                recipes
            } else {
                warn!("Featured recipes {:?} no longer all exist, picking again", previous);
                recipe::random_recipes(&txn, ROTATION_LIMIT, None, &[]).await?
            }
        }
        Transition::NewDay => {
            let recipes = recipe::random_recipes(&txn, ROTATION_LIMIT, None, &previous).await?;
            if recipes.len() == ROTATION_SIZE {
                recipes
            } else {
                info!("Not enough recipes to rotate away from {:?}", previous);
                recipe::random_recipes(&txn, ROTATION_LIMIT, None, &[]).await?
            }
        }
        Transition::Fresh => recipe::random_recipes(&txn, ROTATION_LIMIT, None, &[]).await?,
    };

    let recipe_ids = if recipes.len() == ROTATION_SIZE {
        recipes.iter().map(|r| r.id).collect()
    } else {
        Vec::new()
    };
    save_rotation_state(
        &txn,
        &RotationState {
            recipe_ids,
            last_checked_date: now.with_timezone(&Utc),
        },
    )
    .await?;

    txn.commit().await?;

    info!(
        "Recipes of the day: {:?}",
        recipes.iter().map(|r| r.id).collect::<Vec<_>>()
    );
    Ok(recipes)
}
