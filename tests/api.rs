use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use eventhub_server::auth::AuthKeys;
use eventhub_server::models::user::Role;
use eventhub_server::routes::create_routes;
use eventhub_server::state::AppState;

const TEST_SECRET: &[u8] = b"integration-test-secret";

/// Router over a lazily-connected pool. These tests only exercise behavior
/// that is decided before the first database round-trip (authentication,
/// role checks, input validation), so no server is needed.
fn test_app() -> Router {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://postgres@localhost/eventhub_test")
        .expect("Failed to build lazy pool");

    create_routes(AppState::new(pool, AuthKeys::new(TEST_SECRET, 24)))
}

fn bearer(role: Role) -> String {
    let token = AuthKeys::new(TEST_SECRET, 24)
        .issue(Uuid::new_v4(), role)
        .expect("Failed to issue test token");
    format!("Bearer {}", token)
}

fn json_request(method: &str, uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public_and_carries_security_headers() {
    let response = test_app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn profile_requires_a_token() {
    let response = test_app()
        .oneshot(Request::get("/api/profile").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "AUTH_ERROR");
}

#[tokio::test]
async fn profile_rejects_a_garbage_token() {
    let response = test_app()
        .oneshot(
            Request::get("/api/profile")
                .header(header::AUTHORIZATION, "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "AUTH_ERROR");
}

#[tokio::test]
async fn profile_rejects_a_non_bearer_scheme() {
    let response = test_app()
        .oneshot(
            Request::get("/api/profile")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwdw==")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let expired = AuthKeys::new(TEST_SECRET, -2)
        .issue(Uuid::new_v4(), Role::Student)
        .unwrap();

    let response = test_app()
        .oneshot(
            Request::get("/api/profile")
                .header(header::AUTHORIZATION, format!("Bearer {}", expired))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "Token has expired");
}

#[tokio::test]
async fn create_event_requires_the_organizer_role() {
    let request = json_request(
        "POST",
        "/api/events",
        Some(&bearer(Role::Student)),
        json!({
            "title": "Rust Meetup",
            "description": "Monthly meetup",
            "date": "2999-01-01T18:00:00Z",
            "location": "Main hall"
        }),
    );

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn create_event_rejects_a_past_date() {
    let request = json_request(
        "POST",
        "/api/events",
        Some(&bearer(Role::Organizer)),
        json!({
            "title": "Rust Meetup",
            "description": "Monthly meetup",
            "date": "2020-01-01T18:00:00Z",
            "location": "Main hall"
        }),
    );

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "Event date must be in the future");
}

#[tokio::test]
async fn create_event_rejects_blank_required_fields() {
    let request = json_request(
        "POST",
        "/api/events",
        Some(&bearer(Role::Organizer)),
        json!({
            "title": "   ",
            "description": "Monthly meetup",
            "date": "2999-01-01T18:00:00Z",
            "location": "Main hall"
        }),
    );

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn create_event_rejects_a_negative_price() {
    let request = json_request(
        "POST",
        "/api/events",
        Some(&bearer(Role::Organizer)),
        json!({
            "title": "Rust Meetup",
            "description": "Monthly meetup",
            "date": "2999-01-01T18:00:00Z",
            "location": "Main hall",
            "price": -5
        }),
    );

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "Price cannot be negative");
}

#[tokio::test]
async fn register_rejects_blank_fields() {
    let request = json_request(
        "POST",
        "/api/register",
        None,
        json!({
            "name": "   ",
            "email": "ada@example.com",
            "password": "hunter2"
        }),
    );

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn rsvp_requires_a_token() {
    let request = json_request(
        "POST",
        "/api/rsvp",
        None,
        json!({ "event_id": Uuid::new_v4() }),
    );

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn add_comment_rejects_blank_content() {
    let uri = format!("/api/events/{}/comments", Uuid::new_v4());
    let request = json_request(
        "POST",
        &uri,
        Some(&bearer(Role::Student)),
        json!({ "content": "   " }),
    );

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "Comment content is required");
}

#[tokio::test]
async fn delete_comment_requires_a_token() {
    let uri = format!("/api/comments/{}", Uuid::new_v4());
    let response = test_app()
        .oneshot(Request::delete(uri.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn update_profile_rejects_a_blank_name() {
    let request = json_request(
        "PUT",
        "/api/profile",
        Some(&bearer(Role::Student)),
        json!({ "name": "" }),
    );

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "Name cannot be empty");
}

#[tokio::test]
async fn organizer_listing_requires_the_organizer_role() {
    let response = test_app()
        .oneshot(
            Request::get("/api/organizer/events")
                .header(header::AUTHORIZATION, bearer(Role::Student))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn organizer_listing_requires_a_token() {
    let response = test_app()
        .oneshot(
            Request::get("/api/organizer/events")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
