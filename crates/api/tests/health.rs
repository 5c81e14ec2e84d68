mod common;

use axum::http::StatusCode;
use common::{body_json, get};

#[tokio::test]
async fn test_health_reports_ok_with_memory_store() {
    let app = common::build_test_app(common::test_store());
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["store"], "memory");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["request_timeout_secs"], 30);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = common::build_test_app(common::test_store());
    let response = get(app, "/health").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = common::build_test_app(common::test_store());
    let response = get(app, "/customers").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Route not found");
}
