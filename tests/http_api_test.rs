mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use packshop_api::cms::CmsClient;
use packshop_api::config::AppConfig;
use packshop_api::events::EventSender;
use packshop_api::handlers::AppServices;
use packshop_api::migrator::Migrator;
use packshop_api::{api_v1_routes, AppState};

async fn test_app() -> Router {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.expect("db connects");
    Migrator::up(&db, None).await.expect("migrations apply");
    let db = Arc::new(db);

    let (tx, mut rx) = mpsc::channel(16);
    // Drain events so sends never block on a full channel
    tokio::spawn(async move { while rx.recv().await.is_some() {} });
    let event_sender = EventSender::new(tx);

    let cms = Arc::new(
        CmsClient::new("http://localhost:1/api", None, Duration::from_secs(1))
            .expect("client builds"),
    );

    let services = AppServices::new(db.clone(), Arc::new(event_sender.clone()), cms);
    let state = AppState {
        db,
        config: AppConfig::new("sqlite::memory:", "http://localhost:1/api", "127.0.0.1", 0, "test"),
        event_sender,
        services,
    };

    Router::new()
        .route("/health", get(packshop_api::handlers::health::health))
        .nest("/api/v1", api_v1_routes())
        .with_state(state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn health_reports_up() {
    let app = test_app().await;
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "up");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn order_create_and_fetch_over_http() {
    let app = test_app().await;
    let request = common::checkout_request(None);
    let payload = serde_json::to_value(&request).unwrap();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/orders", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    assert_eq!(created["success"], true);
    let id = created["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(
        created["data"]["order_number"].as_str().unwrap(),
        id[..8].to_uppercase()
    );
    assert_eq!(created["data"]["currency"], "GBP");
    assert_eq!(created["data"]["status"], "pending");

    let response = app
        .oneshot(
            Request::get(format!("/api/v1/orders/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["data"]["id"], id.as_str());
    assert_eq!(fetched["data"]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_order_maps_to_404_payload() {
    let app = test_app().await;
    let response = app
        .oneshot(
            Request::get(format!("/api/v1/orders/{}", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Not Found");
    assert!(body["message"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn user_order_listing_is_always_200() {
    let app = test_app().await;
    let user_id = Uuid::new_v4();

    let mut request = common::checkout_request(Some(user_id));
    request.stripe_session_id = None;
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/orders",
            serde_json::to_value(&request).unwrap(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(
            Request::get(format!("/api/v1/users/{}/orders", user_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // An unknown user still renders an empty dashboard, never an error
    let response = app
        .oneshot(
            Request::get(format!("/api/v1/users/{}/orders", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn illegal_status_transition_is_400() {
    let app = test_app().await;
    let request = common::checkout_request(None);
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/orders",
            serde_json::to_value(&request).unwrap(),
        ))
        .await
        .unwrap();
    let created = body_json(response).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/orders/{}/status", id),
            serde_json::json!({"status": "delivered"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
