use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::path::Path;
use tower::ServiceExt;

use foods_store::{build_app, FoodService, FoodStore};

fn app_at(path: &Path) -> Router {
    let store = FoodStore::open(path).unwrap();
    build_app(FoodService::new(store), "test-version".to_string())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn rice_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_at(&dir.path().join("foods.json"));

    let (status, created) = send_json(
        &app,
        "POST",
        "/foods",
        Some(json!({ "name": "Rice", "type": "grain", "price": "2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert!(created["createdAt"].is_string());
    assert_eq!(created["updatedAt"], Value::Null);
    assert_eq!(created["name"], "Rice");

    let (status, fetched) = send_json(&app, "GET", &format!("/foods/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) =
        send_json(&app, "PUT", &format!("/foods/{id}"), Some(json!({ "price": "3" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_eq!(updated["name"], "Rice");
    assert_eq!(updated["type"], "grain");
    assert_eq!(updated["price"], "3");
    assert!(updated["updatedAt"].is_string());

    let (status, deleted) = send_json(&app, "DELETE", &format!("/foods/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, updated);

    let (status, body) = send(&app, "GET", &format!("/foods/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(String::from_utf8(body).unwrap().contains(&id));
}

#[tokio::test]
async fn missing_ids_map_to_404_on_read_and_400_on_write() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_at(&dir.path().join("foods.json"));

    let (status, body) = send(&app, "GET", "/foods/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(String::from_utf8(body).unwrap(), "Food with id 'ghost' not found");

    let (status, body) = send(&app, "PUT", "/foods/ghost", Some(json!({ "price": "1" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8(body).unwrap().contains("ghost"));

    let (status, body) = send(&app, "DELETE", "/foods/ghost", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8(body).unwrap().contains("ghost"));

    let (status, all) = send_json(&app, "GET", "/foods", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn create_rejects_missing_fields() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_at(&dir.path().join("foods.json"));

    let (status, _) = send(&app, "POST", "/foods", Some(json!({ "name": "Rice" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, all) = send_json(&app, "GET", "/foods", None).await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn list_returns_every_record() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_at(&dir.path().join("foods.json"));

    let mut ids = Vec::new();
    for name in ["Rice", "Beans", "Corn"] {
        let (_, created) = send_json(
            &app,
            "POST",
            "/foods",
            Some(json!({ "name": name, "type": "staple", "price": "1" })),
        )
        .await;
        ids.push(created["id"].as_str().unwrap().to_string());
    }
    send(&app, "DELETE", &format!("/foods/{}", ids[0]), None).await;

    let (status, all) = send_json(&app, "GET", "/foods", None).await;
    assert_eq!(status, StatusCode::OK);
    let mut names: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Beans", "Corn"]);
}

#[tokio::test]
async fn records_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foods.json");

    let (kept, dropped) = {
        let app = app_at(&path);
        let (_, kept) = send_json(
            &app,
            "POST",
            "/foods",
            Some(json!({ "name": "Rice", "type": "grain", "price": "2" })),
        )
        .await;
        let (_, dropped) = send_json(
            &app,
            "POST",
            "/foods",
            Some(json!({ "name": "Oats", "type": "grain", "price": "4" })),
        )
        .await;
        let id = kept["id"].as_str().unwrap();
        let (_, kept) = send_json(&app, "PUT", &format!("/foods/{id}"), Some(json!({ "price": "3" }))).await;
        let id = dropped["id"].as_str().unwrap();
        send(&app, "DELETE", &format!("/foods/{id}"), None).await;
        (kept, dropped)
    };

    let app = app_at(&path);
    let (status, all) = send_json(&app, "GET", "/foods", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all, json!([kept.clone()]));

    let id = dropped["id"].as_str().unwrap();
    let (status, _) = send(&app, "GET", &format!("/foods/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn system_routes_report_health_and_status() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_at(&dir.path().join("foods.json"));

    let (status, body) = send(&app, "GET", "/system/alive", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");

    let (status, version) = send_json(&app, "GET", "/system/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(version, json!({ "version": "test-version" }));

    send(
        &app,
        "POST",
        "/foods",
        Some(json!({ "name": "Rice", "type": "grain", "price": "2" })),
    )
    .await;
    let (_, info) = send_json(&app, "GET", "/system/status", None).await;
    assert_eq!(info["foods"], 1);
    assert_eq!(info["version"], "test-version");
    let data_path = info["data_path"].as_str().unwrap();
    assert!(data_path.ends_with("foods.json"), "{data_path}");
    assert_eq!(Path::new(data_path), dir.path().join("foods.json"));
}

#[tokio::test]
async fn unwritable_snapshot_maps_to_503_and_keeps_store_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foods.json");
    let app = app_at(&path);

    let (_, existing) = send_json(
        &app,
        "POST",
        "/foods",
        Some(json!({ "name": "Rice", "type": "grain", "price": "2" })),
    )
    .await;
    let id = existing["id"].as_str().unwrap().to_string();

    // Swap the snapshot file for a non-empty directory so every later write fails.
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("keep"), "x").unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/foods",
        Some(json!({ "name": "Oats", "type": "grain", "price": "4" })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(String::from_utf8(body).unwrap(), "storage unavailable");

    let (status, _) = send(&app, "PUT", &format!("/foods/{id}"), Some(json!({ "price": "9" }))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = send(&app, "DELETE", &format!("/foods/{id}"), None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, all) = send_json(&app, "GET", "/foods", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all, json!([existing]));
}

#[tokio::test]
async fn unwritable_snapshot_on_empty_store_leaves_list_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foods.json");
    let app = app_at(&path);

    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("keep"), "x").unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/foods",
        Some(json!({ "name": "Rice", "type": "grain", "price": "2" })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, all) = send_json(&app, "GET", "/foods", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn numeric_attributes_are_accepted_as_given() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_at(&dir.path().join("foods.json"));

    let (status, created) = send_json(
        &app,
        "POST",
        "/foods",
        Some(json!({ "name": "Rice", "type": "grain", "price": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["price"], 2);

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send_json(&app, "GET", &format!("/foods/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}
