use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use tourbook_api::{app, AppState, PaymentSettings};
use tourbook_core::identity::AdminPolicy;
use tourbook_core::payment::{PaymentGateway, PaymentIntent, PaymentStatus};
use tourbook_core::CoreResult;
use tourbook_store::identity_provider::{SharedSecretVerifier, TokenClaims};
use tourbook_store::Repositories;

const SECRET: &str = "test-secret";
const ADMIN_EMAIL: &str = "admin@example.com";

struct FakeGateway;

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        _method_types: &[&str],
    ) -> CoreResult<PaymentIntent> {
        Ok(PaymentIntent {
            id: "pi_test".into(),
            amount,
            currency: currency.into(),
            status: PaymentStatus::RequiresPaymentMethod,
            client_secret: Some(format!("pi_test_secret_{amount}")),
        })
    }
}

fn test_app() -> Router {
    app(AppState {
        repos: Repositories::in_memory(),
        verifier: Arc::new(SharedSecretVerifier::new(SECRET)),
        admin_policy: Arc::new(AdminPolicy::new(vec![ADMIN_EMAIL.to_string()], None)),
        gateway: Arc::new(FakeGateway),
        payments: PaymentSettings {
            currency: "usd".into(),
        },
    })
}

fn token_for(email: &str) -> String {
    let claims = TokenClaims {
        sub: format!("uid-{email}"),
        email: Some(email.to_string()),
        role: None,
        exp: (jsonwebtoken::get_current_timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

fn application(email: &str) -> Value {
    json!({
        "name": "Rahim",
        "email": email,
        "title": "Hill tracks",
        "reason": "Local knowledge",
        "photo": "https://img.example.com/rahim.png",
        "cv": "https://cv.example.com/rahim.pdf",
    })
}

fn booking(user: &str, guide: &str) -> Value {
    json!({
        "packageId": "65a1f0c2e4b0a1b2c3d4e5f6",
        "guideId": "65a1f0c2e4b0a1b2c3d4e5f7",
        "packageName": "Sundarbans Safari",
        "tourGuideEmail": guide,
        "userEmail": user,
        "price": "250",
        "tourDate": "2026-03-01T00:00:00.000Z",
        "touristName": "Karim",
    })
}

#[tokio::test]
async fn test_liveness() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Server is running"));
}

#[tokio::test]
async fn test_application_requires_every_field() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/tourGuideApplication",
        Some(application("rahim@example.com")),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Application submitted successfully");
    assert!(body["insertedId"].is_string());

    let mut without_cv = application("other@example.com");
    without_cv["cv"] = json!("");
    let (status, body) = send(&app, Method::POST, "/tourGuideApplication", Some(without_cv), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields");

    let (_, page) = send(&app, Method::GET, "/tourGuideApplication?page=1&limit=5", None, None).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/packages")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_package_lookup() {
    let app = test_app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/addPackage",
        Some(json!({ "tourType": "Adventure", "price": 120, "email": "ops@example.com" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["insertedId"].as_str().unwrap().to_string();

    let (status, package) = send(&app, Method::GET, &format!("/packages/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(package["tourType"], "Adventure");

    let (status, body) = send(&app, Method::GET, "/packages/65a1f0c2e4b0a1b2c3d4e5f6", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Package not found");

    let (status, body) = send(&app, Method::GET, "/packages/not-an-id", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid ID");
}

#[tokio::test]
async fn test_booking_cancel_removes_assignment() {
    let app = test_app();
    let user = "karim@example.com";
    let guide = "rahim@example.com";

    let (status, created) = send(&app, Method::POST, "/bookings", Some(booking(user, guide)), None).await;
    assert_eq!(status, StatusCode::CREATED);
    let booking_id = created["insertedId"].as_str().unwrap().to_string();

    let (_, assigned) = send(
        &app,
        Method::POST,
        "/assignedTours",
        Some(json!({
            "userEmail": user,
            "packageName": "Sundarbans Safari",
            "tourGuideEmail": guide,
        })),
        None,
    )
    .await;
    assert_eq!(assigned["success"], true);

    let (_, tours) = send(&app, Method::GET, &format!("/assignedTours/{guide}"), None, None).await;
    assert_eq!(tours.as_array().unwrap().len(), 1);
    assert_eq!(tours[0]["status"], "pending");

    let (status, body) = send(&app, Method::DELETE, &format!("/bookingsData/{booking_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Booking and assigned tour deleted successfully.");

    let (_, tours) = send(&app, Method::GET, "/assignedTours", None, None).await;
    assert!(tours.as_array().unwrap().is_empty());

    let (status, body) = send(&app, Method::DELETE, &format!("/bookingsData/{booking_id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Booking not found.");
}

#[tokio::test]
async fn test_payment_moves_booking_into_review() {
    let app = test_app();
    let user = "karim@example.com";
    let guide = "rahim@example.com";

    let (_, created) = send(&app, Method::POST, "/bookings", Some(booking(user, guide)), None).await;
    let booking_id = created["insertedId"].as_str().unwrap().to_string();
    send(
        &app,
        Method::POST,
        "/assignedTours",
        Some(json!({ "userEmail": user, "packageName": "Sundarbans Safari", "tourGuideEmail": guide })),
        None,
    )
    .await;

    let (status, intent) = send(
        &app,
        Method::POST,
        "/create-payment-intent",
        Some(json!({ "id": booking_id })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(intent["clientSecret"], "pi_test_secret_25000");
    assert_eq!(intent["bookingData"]["packageName"], "Sundarbans Safari");

    let (status, body) = send(
        &app,
        Method::POST,
        "/create-payment-intent",
        Some(json!({ "id": "65a1f0c2e4b0a1b2c3d4e5f6" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Booking not found");

    let (status, body) = send(
        &app,
        Method::POST,
        "/payments",
        Some(json!({ "transactionId": "pi_test", "bookingId": booking_id, "amount": 250 })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, bookings) = send(&app, Method::GET, &format!("/bookingsData/user/{user}"), None, None).await;
    assert_eq!(bookings[0]["status"], "in review");
    let (_, tours) = send(&app, Method::GET, &format!("/assignedTours/{guide}"), None, None).await;
    assert_eq!(tours[0]["status"], "in-review");
}

#[tokio::test]
async fn test_admin_stats_requires_admin() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/admin/stats", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "unauthorized access");

    let (status, body) = send(&app, Method::GET, "/admin/stats", None, Some("garbage")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "forbidden access");

    let tourist = token_for("karim@example.com");
    let (status, body) = send(&app, Method::GET, "/admin/stats", None, Some(&tourist)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forbidden: admin access required");

    send(&app, Method::POST, "/users", Some(json!({ "email": "karim@example.com" })), None).await;
    send(
        &app,
        Method::POST,
        "/packages",
        Some(json!({ "tourType": "Beach", "price": 80, "email": "ops@example.com" })),
        None,
    )
    .await;

    let admin = token_for(ADMIN_EMAIL);
    let (status, stats) = send(&app, Method::GET, "/admin/stats", None, Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalPackages"], 1);
    assert_eq!(stats["totalClients"], 1);
    assert_eq!(stats["totalTourGuides"], 0);
    assert_eq!(stats["totalStories"], 0);
    assert_eq!(stats["totalPayments"], 0.0);
}

#[tokio::test]
async fn test_accepted_guide_story_lifecycle() {
    let app = test_app();
    let guide = "rahim@example.com";

    let (_, submitted) = send(&app, Method::POST, "/tourGuideApplication", Some(application(guide)), None).await;
    let application_id = submitted["insertedId"].as_str().unwrap().to_string();

    let (status, accepted) = send(
        &app,
        Method::PATCH,
        &format!("/tourGuideApplication/{application_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["addedToTourGuides"], true);

    let (status, created) = send(
        &app,
        Method::POST,
        "/tourGuide/stories",
        Some(json!({
            "email": guide,
            "title": "Monsoon trek",
            "storyText": "Rain all week",
            "imageLinks": ["https://img.example.com/1.png"],
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let story_id = created["story"]["_id"].as_str().unwrap().to_string();

    let (_, stories) = send(&app, Method::GET, &format!("/tourGuide/stories?email={guide}"), None, None).await;
    assert_eq!(stories.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/tourGuide/stories/{story_id}?email={guide}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Story deleted successfully.");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/tourGuide/stories/{story_id}?email={guide}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_story_for_unknown_user() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/users/stories",
        Some(json!({
            "email": "ghost@example.com",
            "title": "Nope",
            "storyText": "Never registered",
            "imageLinks": ["https://img.example.com/x.png"],
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let (status, body) = send(
        &app,
        Method::POST,
        "/users/stories",
        Some(json!({ "email": "ghost@example.com", "title": "No images", "storyText": "x" })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields or image links");
}

#[tokio::test]
async fn test_user_directory_pages_merged_profiles() {
    let app = test_app();

    for name in ["Anika", "Babul", "Chayan"] {
        let email = format!("{}@example.com", name.to_lowercase());
        let (_, saved) = send(
            &app,
            Method::PUT,
            &format!("/usersInfo/{email}"),
            Some(json!({ "name": name, "role": "user" })),
            None,
        )
        .await;
        assert_eq!(saved["success"], true);
    }
    let (_, created) = send(
        &app,
        Method::POST,
        "/admin/profile",
        Some(json!({ "email": ADMIN_EMAIL, "name": "Admin" })),
        None,
    )
    .await;
    assert_eq!(created["success"], true);
    let (_, again) = send(
        &app,
        Method::POST,
        "/admin/profile",
        Some(json!({ "email": ADMIN_EMAIL, "name": "Admin" })),
        None,
    )
    .await;
    assert_eq!(again["message"], "Already exists");

    let (_, page) = send(&app, Method::GET, "/users?page=2&limit=2", None, None).await;
    assert_eq!(page["total"], 4);
    let names: Vec<&str> = page["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Babul", "Chayan"]);

    let (_, filtered) = send(&app, Method::GET, "/users?search=anik", None, None).await;
    assert_eq!(filtered["total"], 1);
    assert_eq!(filtered["users"][0]["name"], "Anika");
}

#[tokio::test]
async fn test_admin_profile_lookup() {
    let app = test_app();

    let (status, missing) = send(&app, Method::GET, "/admin/profile/nobody@example.com", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(missing, json!({}));

    send(&app, Method::POST, "/admin/profile", Some(json!({ "email": ADMIN_EMAIL })), None).await;
    let (_, updated) = send(
        &app,
        Method::PATCH,
        &format!("/admin/profile/{ADMIN_EMAIL}"),
        Some(json!({ "name": "Head Admin", "photoURL": "https://img.example.com/a.png" })),
        None,
    )
    .await;
    assert_eq!(updated["success"], true);

    let (_, profile) = send(&app, Method::GET, &format!("/admin/profile/{ADMIN_EMAIL}"), None, None).await;
    assert_eq!(profile["name"], "Head Admin");
}

#[tokio::test]
async fn test_application_listing_huge_page_is_empty() {
    let app = test_app();
    send(&app, Method::POST, "/tourGuideApplication", Some(application("rahim@example.com")), None).await;

    let (status, page) = send(
        &app,
        Method::GET,
        "/tourGuideApplication?page=18446744073709551615&limit=10",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert!(page["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_payment_for_unknown_booking_writes_nothing() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/payments",
        Some(json!({
            "transactionId": "pi_test",
            "bookingId": "65a1f0c2e4b0a1b2c3d4e5f6",
            "amount": 250,
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Booking not found");

    let admin = token_for(ADMIN_EMAIL);
    let (_, stats) = send(&app, Method::GET, "/admin/stats", None, Some(&admin)).await;
    assert_eq!(stats["totalPayments"], 0.0);
}

#[tokio::test]
async fn test_user_directory_pages_are_one_based() {
    let app = test_app();
    for name in ["Anika", "Babul", "Chayan"] {
        let email = format!("{}@example.com", name.to_lowercase());
        send(
            &app,
            Method::PUT,
            &format!("/usersInfo/{email}"),
            Some(json!({ "name": name })),
            None,
        )
        .await;
    }

    let names = |page: &Value| -> Vec<String> {
        page["users"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["name"].as_str().unwrap().to_string())
            .collect()
    };

    let (_, page_zero) = send(&app, Method::GET, "/users?page=0&limit=2", None, None).await;
    let (_, page_one) = send(&app, Method::GET, "/users?page=1&limit=2", None, None).await;
    let (_, page_two) = send(&app, Method::GET, "/users?page=2&limit=2", None, None).await;
    assert_eq!(names(&page_zero), ["Anika", "Babul"]);
    assert_eq!(names(&page_one), names(&page_zero));
    assert_eq!(names(&page_two), ["Chayan"]);
    assert_eq!(page_two["total"], 3);
}
