//! Router-level integration tests driven directly with `tower::oneshot`,
//! backed by the in-memory store. No network involved.

use auth::TokenService;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use database::MemoryStore;
use events::WsMessage;
use http_body_util::BodyExt;
use profile_service::ProfileService;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::broadcast;
use tower::ServiceExt;
use web_server::{AppState, build_router};

const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";

fn test_state() -> Arc<AppState> {
    let (events, _) = broadcast::channel(16);
    Arc::new(AppState {
        service: ProfileService::new(Arc::new(MemoryStore::new())),
        tokens: TokenService::new(TEST_SECRET.to_string(), 1),
        events,
        credentials: configuration::Auth {
            secret_key: TEST_SECRET.to_string(),
            token_ttl_hours: 1,
            admin_username: "admin".to_string(),
            admin_password: "password".to_string(),
        },
    })
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_user(state: &Arc<AppState>, name: &str, balance: i64) -> Value {
    let response = build_router(state.clone())
        .oneshot(json_request(
            "POST",
            "/api/users",
            json!({ "name": name, "age": 30, "balance": balance }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await
}

async fn bearer_token(state: &Arc<AppState>) -> String {
    let response = build_router(state.clone())
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "username": "admin", "password": "password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let response = build_router(test_state())
        .oneshot(get_request("/api/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn created_users_can_be_fetched_back() {
    let state = test_state();
    let created = create_user(&state, "Ana", 500).await;
    assert_eq!(created["tier"], "Basic");

    let response = build_router(state.clone())
        .oneshot(get_request(&format!(
            "/api/users/{}",
            created["id"].as_str().unwrap()
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["name"], "Ana");
}

#[tokio::test]
async fn invalid_profiles_are_rejected_with_400() {
    let state = test_state();
    for body in [
        json!({ "name": "", "balance": 10 }),
        json!({ "name": "   ", "balance": 10 }),
        json!({ "name": "Ana", "balance": -1 }),
    ] {
        let response = build_router(state.clone())
            .oneshot(json_request("POST", "/api/users", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn missing_users_are_404() {
    let state = test_state();
    let uri = format!("/api/users/{}", uuid::Uuid::new_v4());

    let response = build_router(state.clone())
        .oneshot(get_request(&uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = build_router(state.clone())
        .oneshot(json_request(
            "PUT",
            &uri,
            json!({ "name": "Ana", "balance": 10 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = build_router(state)
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bad_credentials_do_not_get_a_token() {
    let response = build_router(test_state())
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "username": "admin", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let state = test_state();

    let response = build_router(state.clone())
        .oneshot(get_request("/api/analytics/summary"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = build_router(state.clone())
        .oneshot(
            Request::builder()
                .uri("/api/analytics/summary")
                .header(header::AUTHORIZATION, "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = bearer_token(&state).await;
    let response = build_router(state)
        .oneshot(
            Request::builder()
                .uri("/api/analytics/summary")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn recording_income_promotes_the_tier() {
    let state = test_state();
    let created = create_user(&state, "Ana", 800).await;
    let user_id = created["id"].as_str().unwrap().to_string();
    let token = bearer_token(&state).await;

    let response = build_router(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/transactions/{}/add", user_id))
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::from(
                    json!({ "amount": 200, "description": "salary", "kind": "Income" })
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = build_router(state)
        .oneshot(get_request(&format!("/api/users/{}", user_id)))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["tier"], "Silver");
    let balance: Decimal = body["balance"].as_str().unwrap().parse().unwrap();
    assert_eq!(balance, dec!(1000));
}

#[tokio::test]
async fn invalid_balance_ranges_are_rejected() {
    let response = build_router(test_state())
        .oneshot(get_request(
            "/api/users/by-balance-range?min_balance=100&max_balance=50",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn successful_writes_are_broadcast_to_subscribers() {
    let state = test_state();
    let mut events = state.events.subscribe();

    let created = create_user(&state, "Ana", 500).await;

    let event = events.try_recv().unwrap();
    let WsMessage::UserCreated(profile) = event else {
        panic!("expected a UserCreated event");
    };
    assert_eq!(profile.id.to_string(), created["id"].as_str().unwrap());
}
