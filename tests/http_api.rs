use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tower::util::ServiceExt;

use driverbook::config::AppConfig;
use driverbook::db;
use driverbook::models::CityDirectory;
use driverbook::services::messaging::MessagingProvider;
use driverbook::state::AppState;

struct NullProvider;

#[async_trait]
impl MessagingProvider for NullProvider {
    async fn send_message(&self, _to: &str, _body: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        port: 0,
        database_url: ":memory:".to_string(),
        admin_token: "secret".to_string(),
        business_name: "PIESHIP".to_string(),
        slot_capacity: 30,
        excluded_weekday: Weekday::Fri,
        utc_offset_hours: 3,
        reminder_lead_minutes: 300,
        reminder_window_minutes: 15,
        reminder_interval_minutes: None,
        city_config_path: None,
        relay_url: None,
        mora_api_key: String::new(),
        mora_username: String::new(),
        mora_sender: String::new(),
    }
}

fn test_app() -> Router {
    let config = test_config();
    let conn = db::init_db(":memory:").unwrap();
    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config,
        cities: CityDirectory::builtin(),
        messaging: Box::new(NullProvider),
    });
    driverbook::app(state)
}

/// A bookable date: two days out, pushed past Friday if needed.
fn future_date() -> NaiveDate {
    let mut date = chrono::Utc::now().date_naive() + Duration::days(2);
    if date.weekday() == Weekday::Fri {
        date += Duration::days(1);
    }
    date
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn reserve_request(mobile: &str, date: NaiveDate) -> Request<Body> {
    let payload = serde_json::json!({
        "city": "riyadh",
        "booking_date": date.format("%Y-%m-%d").to_string(),
        "time_slot": "14:00",
        "full_name": "Ahmed Ali",
        "mobile": mobile,
    });
    Request::builder()
        .method("POST")
        .uri("/api/bookings")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_reserve_then_remaining() {
    let app = test_app();
    let date = future_date();

    let response = app
        .clone()
        .oneshot(reserve_request("0512345678", date))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["booking"]["city"], "riyadh");
    assert!(body["booking"]["id"].as_str().is_some());

    let uri = format!(
        "/api/slots/remaining?city=riyadh&date={}&time=14:00",
        date.format("%Y-%m-%d")
    );
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["remaining"], 29);
}

#[tokio::test]
async fn test_duplicate_booking_conflict() {
    let app = test_app();
    let date = future_date();

    let response = app
        .clone()
        .oneshot(reserve_request("0512345678", date))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(reserve_request("0512345678", date))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["errorCode"], "DuplicateBooking");
}

#[tokio::test]
async fn test_invalid_mobile_rejected() {
    let app = test_app();
    let response = app
        .oneshot(reserve_request("512345678", future_date()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["errorCode"], "InvalidMobile");
}

#[tokio::test]
async fn test_admin_requires_token() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/bookings")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/bookings")
                .header(header::AUTHORIZATION, "Bearer secret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_summary_shape() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(reserve_request("0512345678", future_date()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/summary")
                .header(header::AUTHORIZATION, "Bearer secret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["capacity"], 30);
    assert_eq!(body["days"].as_array().unwrap().len(), 10);
    assert_eq!(body["grandTotal"], 1);
}

#[tokio::test]
async fn test_reminder_trigger_requires_token() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/jobs/sms-reminders")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/jobs/sms-reminders")
                .header(header::AUTHORIZATION, "Bearer secret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["candidates"].as_u64().is_some());
    assert!(body["sent"].as_u64().is_some());
    assert!(body["failed"].as_u64().is_some());
}
