use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::errors::{FoodError, StoreError};
use crate::services::food_service::{FoodFields, FoodService};
use crate::state::food::Food;

/// Build the /foods routes.
pub fn routes(service: FoodService) -> Router {
    Router::new()
        .route("/foods", get(list_foods).post(create_food))
        .route(
            "/foods/:id",
            get(get_food)
                .put(update_food)
                .delete(delete_food),
        )
        .with_state(service)
}

/// Plain-text error response.
///
/// A missing id is 404 on read but 400 on update and delete; the route
/// picks which status NOT_FOUND maps to.
struct ApiError {
    error: FoodError,
    not_found: StatusCode,
}

impl ApiError {
    fn read(error: FoodError) -> Self {
        Self {
            error,
            not_found: StatusCode::NOT_FOUND,
        }
    }

    fn write(error: FoodError) -> Self {
        Self {
            error,
            not_found: StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.error {
            FoodError::NotFound(_) => self.not_found,
            FoodError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            FoodError::Unavailable(e) => {
                tracing::error!("Request failed, store unavailable: {e}");
                return (StatusCode::SERVICE_UNAVAILABLE, "storage unavailable").into_response();
            }
        };

        (status, self.error.to_string()).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Run a store-touching call off the async workers.
///
/// Writes fsync the snapshot while holding the store lock, so they must not
/// occupy a tokio worker thread.
async fn blocking<T, F>(call: F) -> Result<T, FoodError>
where
    F: FnOnce() -> Result<T, FoodError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| FoodError::Unavailable(StoreError::Worker(e.to_string())))?
}

//
// ─────────────────────────────────────────────────────────────
// POST /foods
// Create a food with a generated id
// ─────────────────────────────────────────────────────────────
//
async fn create_food(
    State(service): State<FoodService>,
    Json(fields): Json<FoodFields>,
) -> ApiResult<Food>
{
    blocking(move || service.create(fields))
        .await
        .map(Json)
        .map_err(ApiError::write)
}

//
// ─────────────────────────────────────────────────────────────
// GET /foods
// Return every stored food
// ─────────────────────────────────────────────────────────────
//
async fn list_foods(
    State(service): State<FoodService>,
) -> ApiResult<Vec<Food>>
{
    blocking(move || service.list())
        .await
        .map(Json)
        .map_err(ApiError::read)
}

//
// ─────────────────────────────────────────────────────────────
// GET /foods/{id}
// Return one food or 404
// ─────────────────────────────────────────────────────────────
//
async fn get_food(
    Path(id): Path<String>,
    State(service): State<FoodService>,
) -> ApiResult<Food>
{
    blocking(move || service.get(&id))
        .await
        .map(Json)
        .map_err(ApiError::read)
}

//
// ─────────────────────────────────────────────────────────────
// PUT /foods/{id}
// Merge fields into an existing food, 400 if missing
// ─────────────────────────────────────────────────────────────
//
async fn update_food(
    Path(id): Path<String>,
    State(service): State<FoodService>,
    Json(fields): Json<FoodFields>,
) -> ApiResult<Food>
{
    blocking(move || service.update(&id, fields))
        .await
        .map(Json)
        .map_err(ApiError::write)
}

//
// ─────────────────────────────────────────────────────────────
// DELETE /foods/{id}
// Remove a food and return its last state, 400 if missing
// ─────────────────────────────────────────────────────────────
//
async fn delete_food(
    Path(id): Path<String>,
    State(service): State<FoodService>,
) -> ApiResult<Food>
{
    blocking(move || service.delete(&id))
        .await
        .map(Json)
        .map_err(ApiError::write)
}
