//! API integration tests against an in-memory database.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use helphub_api::{create_router, ApiConfig, AppState, BootstrapAdmin};
use helphub_db::Database;
use serde_json::{json, Value};
use tower::ServiceExt;

const CLEANING: i64 = 1;
const COOKING: i64 = 2;

async fn create_test_router_with(config: ApiConfig) -> (Router, AppState) {
    let db = Database::open_in_memory().await.unwrap();
    let state = AppState::new(config, db).unwrap();
    (create_router(state.clone(), None), state)
}

async fn create_test_router() -> Router {
    create_test_router_with(ApiConfig::default()).await.0
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn register_user(app: &Router, email: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/users/register",
        Some(json!({
            "name": "Ann Lee",
            "email": email,
            "password": "secret1",
            "address": "1 Main St"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["user_id"].as_i64().unwrap()
}

async fn register_worker(app: &Router, email: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/workers/register",
        Some(json!({
            "name": "Bob Smith",
            "email": email,
            "password": "secret1",
            "phone": "5550001111",
            "bio": "Ten years of experience"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["worker_id"].as_i64().unwrap()
}

/// A worker offering cleaning at 30/h, free on Monday mornings.
async fn setup_worker(app: &Router, email: &str) -> i64 {
    let worker_id = register_worker(app, email).await;

    let (status, body) = send(
        app,
        Method::POST,
        &format!("/api/workers/{worker_id}/services"),
        Some(json!({ "services": [
            { "id": CLEANING, "selected": true, "rate": 30.0 },
            { "id": COOKING, "selected": false, "rate": 99.0 }
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Worker services updated successfully");

    let (status, body) = send(
        app,
        Method::POST,
        &format!("/api/workers/{worker_id}/availability"),
        Some(json!({ "availability": { "monday": { "morning": true, "evening": false } } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Worker availability updated successfully");

    worker_id
}

async fn book(app: &Router, user_id: i64, worker_id: i64, service_id: i64) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/api/bookings",
        Some(json!({
            "userId": user_id,
            "serviceId": service_id,
            "workerId": worker_id,
            "bookingDate": "2024-01-01",
            "bookingTime": "09:00",
            "durationHours": 2.0,
            "address": "1 Main St",
            "notes": "Ring twice"
        })),
    )
    .await
}

const MONDAY_MORNING: &str = "/api/workers/available?serviceId=1&date=2024-01-01&time=09:00";

#[tokio::test]
async fn test_health_endpoints() {
    let app = create_test_router().await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"]["status"], "ok");
}

#[tokio::test]
async fn test_metrics_route_absent_when_disabled() {
    let app = create_test_router().await;
    let (status, _) = send(&app, Method::GET, "/metrics", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_services_catalog() {
    let app = create_test_router().await;

    let (status, body) = send(&app, Method::GET, "/api/services", None).await;
    assert_eq!(status, StatusCode::OK);
    let services = body.as_array().unwrap();
    assert_eq!(services.len(), 6);
    assert_eq!(services[0]["name"], "Cleaning");
}

#[tokio::test]
async fn test_register_rejects_duplicate_email_per_role() {
    let app = create_test_router().await;
    register_user(&app, "ann@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users/register",
        Some(json!({ "name": "Ann Again", "email": "ANN@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User with this email already exists");

    // The same email may hold a worker account.
    register_worker(&app, "ann@example.com").await;
}

#[tokio::test]
async fn test_register_response_shape() {
    let app = create_test_router().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users/register",
        Some(json!({ "name": "Jane Doe", "email": "jane@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["name"], "Jane Doe");
    assert!(body["profile_pic"]
        .as_str()
        .unwrap()
        .starts_with("https://ui-avatars.com/api/?name=Jane"));
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_register_validation() {
    let app = create_test_router().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/workers/register",
        Some(json!({ "name": "Bob", "email": "bob@example.com", "password": "secret1", "phone": "123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Phone number must be at least 10 characters");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users/register",
        Some(json!({ "name": "Ann", "email": "not-an-email", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid email address");
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let app = create_test_router().await;
    let user_id = register_user(&app, "ann@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users/login",
        Some(json!({ "email": "ann@example.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], user_id);
    assert!(body.get("password").is_none());

    let wrong_password = send(
        &app,
        Method::POST,
        "/api/users/login",
        Some(json!({ "email": "ann@example.com", "password": "wrong-password" })),
    )
    .await;
    let unknown_email = send(
        &app,
        Method::POST,
        "/api/users/login",
        Some(json!({ "email": "nobody@example.com", "password": "secret1" })),
    )
    .await;

    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password.1["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_booking_lifecycle() {
    let app = create_test_router().await;
    let user_id = register_user(&app, "ann@example.com").await;
    let worker_id = setup_worker(&app, "bob@example.com").await;

    let (status, body) = send(&app, Method::GET, MONDAY_MORNING, None).await;
    assert_eq!(status, StatusCode::OK);
    let workers = body.as_array().unwrap();
    assert_eq!(workers.len(), 1);
    assert_eq!(workers[0]["worker_id"], worker_id);
    assert_eq!(workers[0]["price_per_hour"], 30.0);

    let (status, body) = book(&app, user_id, worker_id, CLEANING).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["message"], "Booking created successfully");
    assert_eq!(body["ticketNumber"], "000001");
    let booking_id = body["bookingId"].as_i64().unwrap();

    let (_, requests) =
        send(&app, Method::GET, &format!("/api/workers/{worker_id}/requests"), None).await;
    assert_eq!(requests.as_array().unwrap().len(), 1);
    assert_eq!(requests[0]["status"], "pending");

    let (_, notes) = send(
        &app,
        Method::GET,
        &format!("/api/workers/{worker_id}/notifications"),
        None,
    )
    .await;
    assert_eq!(
        notes[0]["message"],
        "New booking request #000001 for Cleaning from Ann Lee on 2024-01-01 at 09:00."
    );

    let accept_uri = format!("/api/bookings/{booking_id}/accept");
    let (status, body) = send(
        &app,
        Method::PUT,
        &accept_uri,
        Some(json!({ "workerId": worker_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Booking accepted successfully");

    let (status, body) = send(
        &app,
        Method::PUT,
        &accept_uri,
        Some(json!({ "workerId": worker_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Booking not found or already processed");

    let (status, booking) =
        send(&app, Method::GET, &format!("/api/bookings/{booking_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["status"], "confirmed");
    assert_eq!(booking["total_price"], 60.0);
    assert_eq!(booking["worker_name"], "Bob Smith");

    // The confirmed booking now blocks that exact slot.
    let (_, body) = send(&app, Method::GET, MONDAY_MORNING, None).await;
    assert!(body.as_array().unwrap().is_empty());

    let (_, notes) =
        send(&app, Method::GET, &format!("/api/users/{user_id}/notifications"), None).await;
    assert_eq!(
        notes[0]["message"],
        "Your booking #000001 for Cleaning has been confirmed by Bob Smith."
    );

    let (_, bookings) =
        send(&app, Method::GET, &format!("/api/users/{user_id}/bookings"), None).await;
    assert_eq!(bookings.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_booking_unoffered_service_persists_nothing() {
    let app = create_test_router().await;
    let user_id = register_user(&app, "ann@example.com").await;
    let worker_id = setup_worker(&app, "bob@example.com").await;

    let (status, body) = book(&app, user_id, worker_id, COOKING).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Worker does not provide this service");

    let (_, bookings) =
        send(&app, Method::GET, &format!("/api/users/{user_id}/bookings"), None).await;
    assert!(bookings.as_array().unwrap().is_empty());

    let (_, notes) = send(
        &app,
        Method::GET,
        &format!("/api/workers/{worker_id}/notifications"),
        None,
    )
    .await;
    assert!(notes.as_array().unwrap().is_empty());

    // The failed attempt did not use up a ticket number.
    let (_, body) = book(&app, user_id, worker_id, CLEANING).await;
    assert_eq!(body["ticketNumber"], "000001");
}

#[tokio::test]
async fn test_booking_input_validation() {
    let app = create_test_router().await;
    let user_id = register_user(&app, "ann@example.com").await;
    let worker_id = setup_worker(&app, "bob@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/bookings",
        Some(json!({
            "userId": user_id,
            "serviceId": CLEANING,
            "workerId": worker_id,
            "bookingDate": "2024-01-01",
            "bookingTime": "09:00",
            "durationHours": 0,
            "address": "1 Main St"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Duration must be a positive number of hours");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/bookings",
        Some(json!({
            "userId": user_id,
            "serviceId": CLEANING,
            "workerId": worker_id,
            "bookingDate": "2024-01-01",
            "bookingTime": "09:00",
            "durationHours": 1e308,
            "address": "1 Main St"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Booking duration is too long");

    let (status, body) = send(&app, Method::GET, &format!("/api/users/{user_id}/bookings"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_reject_flow_and_missing_booking() {
    let app = create_test_router().await;
    let user_id = register_user(&app, "ann@example.com").await;
    let worker_id = setup_worker(&app, "bob@example.com").await;

    let (status, body) = send(&app, Method::PUT, "/api/bookings/999/reject", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Booking not found");

    let (_, body) = book(&app, user_id, worker_id, CLEANING).await;
    let booking_id = body["bookingId"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/bookings/{booking_id}/reject"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Booking rejected successfully");

    let (_, requests) =
        send(&app, Method::GET, &format!("/api/workers/{worker_id}/requests"), None).await;
    assert!(requests.as_array().unwrap().is_empty());

    let (_, notes) =
        send(&app, Method::GET, &format!("/api/users/{user_id}/notifications"), None).await;
    assert_eq!(
        notes[0]["message"],
        "Your booking #000001 for Cleaning has been rejected."
    );
}

#[tokio::test]
async fn test_get_missing_booking() {
    let app = create_test_router().await;
    let (status, body) = send(&app, Method::GET, "/api/bookings/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Booking not found");
}

#[tokio::test]
async fn test_empty_service_selection_keeps_previous_set() {
    let app = create_test_router().await;
    let worker_id = setup_worker(&app, "bob@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/workers/{worker_id}/services"),
        Some(json!({ "services": [{ "id": CLEANING, "selected": false, "rate": 30.0 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No services selected");

    let (status, profile) =
        send(&app, Method::GET, &format!("/api/workers/{worker_id}/profile"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["services"][0]["service_id"], CLEANING);
    assert_eq!(profile["availability"].as_array().unwrap().len(), 21);
}

#[tokio::test]
async fn test_malformed_requests_get_message_bodies() {
    let app = create_test_router().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/bookings")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].is_string());

    let (status, body) = send(&app, Method::GET, "/api/bookings/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, body) = send(&app, Method::GET, "/api/workers/available?serviceId=1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/workers/available?serviceId=1&date=01/01/2024&time=09:00",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_profile_update() {
    let app = create_test_router().await;
    let user_id = register_user(&app, "ann@example.com").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/users/{user_id}/profile"),
        Some(json!({ "name": "Ann Marie", "phone": "5551234567", "address": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ann Marie");
    assert_eq!(body["phone"], "5551234567");
    assert!(body["address"].is_null());

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/users/999/profile",
        Some(json!({ "name": "Nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let (status, body) = send(&app, Method::GET, "/api/workers/999/profile", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Worker not found");
}

#[tokio::test]
async fn test_admin_reports() {
    let (app, state) = create_test_router_with(ApiConfig::default()).await;
    state
        .accounts
        .ensure_bootstrap_admin(&BootstrapAdmin {
            name: "Root".into(),
            email: "root@example.com".into(),
            password: "changeme".into(),
        })
        .await
        .unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/admins/login",
        Some(json!({ "email": "root@example.com", "password": "changeme" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Root");

    let user_id = register_user(&app, "ann@example.com").await;
    let worker_id = setup_worker(&app, "bob@example.com").await;
    let (_, body) = book(&app, user_id, worker_id, CLEANING).await;
    let booking_id = body["bookingId"].as_i64().unwrap();
    send(
        &app,
        Method::PUT,
        &format!("/api/bookings/{booking_id}/accept"),
        Some(json!({ "workerId": worker_id })),
    )
    .await;

    let (status, dashboard) = send(&app, Method::GET, "/api/admin/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["statistics"]["users"], 1);
    assert_eq!(dashboard["statistics"]["workers"], 1);
    assert_eq!(dashboard["statistics"]["confirmed"], 1);
    assert_eq!(dashboard["statistics"]["revenue"], 60.0);
    assert_eq!(dashboard["recentBookings"][0]["ticket_number"], "000001");

    let (_, users) = send(&app, Method::GET, "/api/admin/users", None).await;
    assert_eq!(users[0]["booking_count"], 1);
    assert!(users[0].get("password").is_none());

    let (_, workers) = send(&app, Method::GET, "/api/admin/workers", None).await;
    assert_eq!(workers[0]["booking_count"], 1);

    let (_, bookings) = send(&app, Method::GET, "/api/admin/bookings", None).await;
    assert_eq!(bookings.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_response_headers() {
    let app = create_test_router().await;

    let request = Request::builder()
        .uri("/health")
        .header("X-Request-ID", "abc-123")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_rate_limiting() {
    let config = ApiConfig {
        rate_limit_rps: 1,
        rate_limit_burst: 2,
        ..ApiConfig::default()
    };
    let (app, _) = create_test_router_with(config).await;

    let request = || {
        Request::builder()
            .uri("/api/services")
            .header("X-Forwarded-For", "192.168.1.100")
            .body(Body::empty())
            .unwrap()
    };

    for _ in 0..2 {
        let response = app.clone().oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()["retry-after"], "1");

    // Health probes are not rate limited.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Forwarded-For", "192.168.1.100")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
