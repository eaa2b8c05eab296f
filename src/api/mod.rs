//! HTTP layer - axum router, shared state and request handlers.
//!
//! This module exposes the cookbook as a JSON API under `/api`, and serves the
//! single-page frontend plus uploaded images as static files from the public
//! directory for every other path.

/// Conversion of crate errors into HTTP responses
pub mod error;
/// Route handlers (recipes, files, root)
pub mod routes;

use crate::{config::server::ServerConfig, errors::Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use sea_orm::DatabaseConnection;
use std::path::PathBuf;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

/// Shared data available to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub database: DatabaseConnection,
    /// Root of the statically served files; uploads are stored below it
    pub public_dir: PathBuf,
}

impl AppState {
    /// Creates the handler state from a database connection and the public directory.
    #[must_use]
    pub const fn new(database: DatabaseConnection, public_dir: PathBuf) -> Self {
        Self {
            database,
            public_dir,
        }
    }
}

/// Builds the application router.
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    let static_files = ServeDir::new(&state.public_dir);

    Router::new()
        .route("/", get(routes::general::index))
        .route("/api/recipe/get", post(routes::recipe::search_recipes))
        .route("/api/recipe/get/:recipe_id", get(routes::recipe::get_recipe))
        .route("/api/recipe/rotd", get(routes::recipe::recipes_of_the_day))
        .route("/api/recipe/create", post(routes::recipe::create_recipe))
        .route("/api/recipe/edit", post(routes::recipe::edit_recipe))
        .route(
            "/api/recipe/delete/:recipe_id",
            delete(routes::recipe::delete_recipe),
        )
        .route("/api/upload", post(routes::files::upload_file))
        .route("/api/files/delete", post(routes::files::delete_file))
        .with_state(state)
        .fallback_service(static_files)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Binds the configured address and serves requests until the process stops.
pub async fn serve(database: DatabaseConnection, config: &ServerConfig) -> Result<()> {
    tokio::fs::create_dir_all(&config.public_dir).await?;

    let addr = config.socket_addr()?;
    let state = AppState::new(database, config.public_dir.clone());
    let app = create_router(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::routes::files::{MessageResponse, UploadResponse};
    use super::*;
    use crate::{
        core::{image::upload_dir_for, recipe::MutationResult},
        entities::recipe::Model as RecipeModel,
        test_utils::*,
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use chrono::Local;
    use serde::de::DeserializeOwned;
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const LIMIT: usize = 1024 * 1024;

    async fn setup() -> (AppState, TempDir) {
        let db = setup_test_db().await.unwrap();
        let public = TempDir::new().unwrap();
        (AppState::new(db, public.path().to_path_buf()), public)
    }

    async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = create_router(state.clone(), LIMIT)
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn send_json<T: DeserializeOwned>(
        state: &AppState,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, T) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let (status, bytes) = send(state, request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn multipart_upload(file_name: &str, content: &[u8]) -> Request<Body> {
        let boundary = "cookbookboundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::post("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_index() {
        let (state, _public) = setup().await;

        let (status, body) = send(&state, Request::get("/").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Silence is golden");
    }

    #[tokio::test]
    async fn test_create_joins_ingredients() {
        let (state, _public) = setup().await;

        let (status, created): (_, RecipeModel) = send_json(
            &state,
            "POST",
            "/api/recipe/create",
            Some(json!({
                "title": "Seasoning",
                "ingredients_array": [{"text": "salt"}, {"text": "pepper"}],
                "description": "Mix well",
                "notes": "",
                "image_path": null
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(created.ingredients, "salt,pepper");

        let (_, fetched): (_, Option<RecipeModel>) = send_json(
            &state,
            "GET",
            &format!("/api/recipe/get/{}", created.id),
            None,
        )
        .await;
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_get_unknown_recipe_returns_null() {
        let (state, _public) = setup().await;

        let (status, body): (_, Value) =
            send_json(&state, "GET", "/api/recipe/get/4242", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_search() {
        let (state, _public) = setup().await;
        create_custom_recipe(&state.database, "Tomato soup", &["tomato"])
            .await
            .unwrap();
        create_test_recipe(&state.database, "Pancakes").await.unwrap();

        let (status, all): (_, Vec<RecipeModel>) =
            send_json(&state, "POST", "/api/recipe/get", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.len(), 2);

        let (_, soups): (_, Vec<RecipeModel>) = send_json(
            &state,
            "POST",
            "/api/recipe/get",
            Some(json!({"query": "tomato"})),
        )
        .await;
        assert_eq!(soups.len(), 1);
        assert_eq!(soups[0].title, "Tomato soup");
    }

    #[tokio::test]
    async fn test_edit_and_delete() {
        let (state, _public) = setup().await;
        let recipe = create_test_recipe(&state.database, "Bread").await.unwrap();

        let (status, edited): (_, MutationResult) = send_json(
            &state,
            "POST",
            "/api/recipe/edit",
            Some(json!({
                "id": recipe.id,
                "title": "Rye bread",
                "ingredients_array": [{"text": "rye"}],
                "description": "Bake",
                "notes": "",
                "liked": 1
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(edited.changes, 1);

        let (_, fetched): (_, Option<RecipeModel>) = send_json(
            &state,
            "GET",
            &format!("/api/recipe/get/{}", recipe.id),
            None,
        )
        .await;
        let fetched = fetched.unwrap();
        assert_eq!(fetched.title, "Rye bread");
        assert!(fetched.liked);

        let (status, deleted): (_, MutationResult) = send_json(
            &state,
            "DELETE",
            &format!("/api/recipe/delete/{}", recipe.id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted.changes, 1);

        let (_, gone): (_, Value) = send_json(
            &state,
            "GET",
            &format!("/api/recipe/get/{}", recipe.id),
            None,
        )
        .await;
        assert_eq!(gone, Value::Null);
    }

    #[tokio::test]
    async fn test_rotd_is_stable_within_a_day() {
        let (state, _public) = setup().await;
        create_test_recipes(&state.database, 8).await.unwrap();

        let (status, first): (_, Vec<RecipeModel>) =
            send_json(&state, "GET", "/api/recipe/rotd", None).await;
        let (_, second): (_, Vec<RecipeModel>) =
            send_json(&state, "GET", "/api/recipe/rotd", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(first.len(), 3);
        let mut first_ids: Vec<i64> = first.iter().map(|r| r.id).collect();
        let mut second_ids: Vec<i64> = second.iter().map(|r| r.id).collect();
        first_ids.sort_unstable();
        second_ids.sort_unstable();
        assert_eq!(first_ids, second_ids);
    }

    #[tokio::test]
    async fn test_upload_then_serve_then_delete() {
        let (state, public) = setup().await;

        let (status, bytes) = send(&state, multipart_upload("cake.jpg", b"jpeg bytes")).await;
        assert_eq!(status, StatusCode::OK);
        let upload: UploadResponse = serde_json::from_slice(&bytes).unwrap();

        let today_dir = upload_dir_for(Local::now().date_naive());
        assert!(upload.path.starts_with(&today_dir));
        assert!(upload.path.ends_with("-cake.jpg"));
        assert!(public.path().join(&upload.path).is_file());

        let (status, served) = send(
            &state,
            Request::get(format!("/{}", upload.path))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(served, b"jpeg bytes");

        let (_, removed): (_, MessageResponse) = send_json(
            &state,
            "POST",
            "/api/files/delete",
            Some(json!({"image_path": upload.path})),
        )
        .await;
        assert_eq!(removed.message, "ok");

        let (_, again): (_, MessageResponse) = send_json(
            &state,
            "POST",
            "/api/files/delete",
            Some(json!({"image_path": upload.path})),
        )
        .await;
        assert_eq!(again.message, "error");
    }

    #[tokio::test]
    async fn test_upload_without_file_field_is_rejected() {
        let (state, _public) = setup().await;
        let request = Request::post("/api/upload")
            .header(
                header::CONTENT_TYPE,
                "multipart/form-data; boundary=cookbookboundary",
            )
            .body(Body::from("--cookbookboundary--\r\n"))
            .unwrap();

        let (status, _) = send(&state, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_file_without_path_is_ok() {
        let (state, _public) = setup().await;

        let (status, body): (_, MessageResponse) =
            send_json(&state, "POST", "/api/files/delete", Some(json!({}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.message, "ok");
    }
}
