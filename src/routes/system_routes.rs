use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::services::food_service::FoodService;

#[derive(Clone)]
struct SystemState {
    version: String,
    service: FoodService,
}

#[derive(Serialize)]
struct VersionResponse {
    version: String,
}

#[derive(Serialize)]
struct StatusResponse {
    version: String,
    foods: usize,
    data_path: String,
}

pub fn routes(version: String, service: FoodService) -> Router {
    Router::new()
        .route("/alive", get(is_alive))
        .route("/version", get(version_info))
        .route("/status", get(status))
        .with_state(SystemState { version, service })
}

/// GET /system/alive
async fn is_alive() -> &'static str {
    "OK"
}

/// GET /system/version
async fn version_info(State(state): State<SystemState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        version: state.version,
    })
}

/// GET /system/status
///
/// Version, number of stored foods and the snapshot file in use.
async fn status(
    State(state): State<SystemState>,
) -> Result<Json<StatusResponse>, (StatusCode, &'static str)> {
    let store = state.service.store();
    let foods = store.len().map_err(|e| {
        tracing::error!("Status check failed: {e}");
        (StatusCode::SERVICE_UNAVAILABLE, "storage unavailable")
    })?;

    Ok(Json(StatusResponse {
        version: state.version,
        foods,
        data_path: store.path().display().to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::store::FoodStore;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn status_is_503_when_store_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = FoodStore::open(dir.path().join("foods.json")).unwrap();
        let app = routes("1.0".to_string(), FoodService::new(store.clone()));
        store.poison();

        let status = |uri: &'static str| {
            let app = app.clone();
            async move {
                let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
                app.oneshot(request).await.unwrap().status()
            }
        };

        assert_eq!(status("/status").await, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status("/alive").await, StatusCode::OK);
    }
}
