mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::{TestApp, ADMIN_TOKEN};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn future_date(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days)).format("%Y-%m-%d").to_string()
}

async fn create_booking(app: &TestApp, service_id: &str, date: &str, time: &str, email: &str) -> String {
    let res = app.book(service_id, date, time, email).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["booking_id"].as_str().unwrap().to_string()
}

async fn set_status(app: &TestApp, booking_id: &str, status: &str) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("PUT")
            .uri(format!("/api/v1/admin/bookings/{}", booking_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"status": status}).to_string())).unwrap()
    ).await.unwrap()
}

async fn payment_outcome(app: &TestApp, booking_id: &str, outcome: &str) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri("/api/v1/payments/outcome")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"booking_id": booking_id, "outcome": outcome}).to_string())).unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_pending_to_confirmed_to_completed() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Facial", 60, 8000).await;
    let booking_id = create_booking(&app, &service_id, &future_date(7), "10:00", "flow@example.com").await;

    let res = set_status(&app, &booking_id, "CONFIRMED").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"].as_str().unwrap(), "CONFIRMED");

    let res = set_status(&app, &booking_id, "COMPLETED").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"].as_str().unwrap(), "COMPLETED");
}

#[tokio::test]
async fn test_pending_cannot_jump_to_completed() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Facial", 60, 8000).await;
    let booking_id = create_booking(&app, &service_id, &future_date(7), "10:00", "jump@example.com").await;

    let res = set_status(&app, &booking_id, "COMPLETED").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_completed_is_terminal() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Facial", 60, 8000).await;
    let booking_id = create_booking(&app, &service_id, &future_date(7), "10:00", "term@example.com").await;

    assert_eq!(set_status(&app, &booking_id, "CONFIRMED").await.status(), StatusCode::OK);
    assert_eq!(set_status(&app, &booking_id, "COMPLETED").await.status(), StatusCode::OK);

    let res = set_status(&app, &booking_id, "CANCELLED").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_payment_success_promotes_pending_booking() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Facial", 60, 8000).await;
    let booking_id = create_booking(&app, &service_id, &future_date(7), "10:00", "pay@example.com").await;

    let res = payment_outcome(&app, &booking_id, "succeeded").await;
    assert_eq!(res.status(), StatusCode::OK);
    let booking = parse_body(res).await;
    assert_eq!(booking["payment_status"].as_str().unwrap(), "PAID");
    assert_eq!(booking["status"].as_str().unwrap(), "CONFIRMED");
}

#[tokio::test]
async fn test_payment_failure_leaves_status_untouched() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Facial", 60, 8000).await;
    let booking_id = create_booking(&app, &service_id, &future_date(7), "10:00", "fail@example.com").await;

    let res = payment_outcome(&app, &booking_id, "failed").await;
    assert_eq!(res.status(), StatusCode::OK);
    let booking = parse_body(res).await;
    assert_eq!(booking["payment_status"].as_str().unwrap(), "FAILED");
    assert_eq!(booking["status"].as_str().unwrap(), "PENDING");

    // A booking with a failed payment cannot be confirmed.
    let res = set_status(&app, &booking_id, "CONFIRMED").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_refund_forces_cancellation() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Facial", 60, 8000).await;
    let booking_id = create_booking(&app, &service_id, &future_date(7), "10:00", "refund@example.com").await;

    assert_eq!(payment_outcome(&app, &booking_id, "succeeded").await.status(), StatusCode::OK);

    let res = payment_outcome(&app, &booking_id, "refunded").await;
    assert_eq!(res.status(), StatusCode::OK);
    let booking = parse_body(res).await;
    assert_eq!(booking["payment_status"].as_str().unwrap(), "REFUNDED");
    assert_eq!(booking["status"].as_str().unwrap(), "CANCELLED");
}

#[tokio::test]
async fn test_refund_of_completed_booking_rejected() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Facial", 60, 8000).await;
    let booking_id = create_booking(&app, &service_id, &future_date(7), "10:00", "done@example.com").await;

    assert_eq!(payment_outcome(&app, &booking_id, "succeeded").await.status(), StatusCode::OK);
    assert_eq!(set_status(&app, &booking_id, "COMPLETED").await.status(), StatusCode::OK);

    let res = payment_outcome(&app, &booking_id, "refunded").await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_payment_outcome_for_unknown_booking() {
    let app = TestApp::new().await;

    let res = payment_outcome(&app, "no-such-booking", "succeeded").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_customer_cancel_is_idempotent() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Facial", 60, 8000).await;
    let booking_id = create_booking(&app, &service_id, &future_date(7), "10:00", "twice@example.com").await;

    for _ in 0..2 {
        let res = app.router.clone().oneshot(
            Request::builder().method("POST")
                .uri(format!("/api/v1/bookings/{}/cancel", booking_id))
                .body(Body::empty()).unwrap()
        ).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(parse_body(res).await["status"].as_str().unwrap(), "CANCELLED");
    }
}

// Creation over HTTP rejects past start times, so the started appointment
// is seeded straight through the repository.
async fn seed_started_booking(app: &TestApp, service_id: &str) -> String {
    use salon_backend::domain::models::booking::{Booking, NewBookingParams};
    use salon_backend::domain::models::customer::Customer;

    let customer = app
        .state
        .customer_repo
        .upsert_by_email(&Customer::new(
            "Early".to_string(),
            "Bird".to_string(),
            "started@example.com",
            None,
        ))
        .await
        .unwrap();

    let start = Utc::now() - Duration::hours(2);
    let booking = Booking::new(NewBookingParams {
        customer_id: customer.id,
        service_id: service_id.to_string(),
        date: start.date_naive(),
        start,
        duration_min: 60,
        price_cents: 8000,
        notes: None,
    });
    app.state
        .booking_repo
        .create_if_free(&booking)
        .await
        .unwrap()
        .expect("seeded slot should be free")
        .id
}

#[tokio::test]
async fn test_customer_cannot_cancel_started_appointment() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Facial", 60, 8000).await;
    let booking_id = seed_started_booking(&app, &service_id).await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/bookings/{}/cancel", booking_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // The admin surface may still cancel it under the default policy.
    let res = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/admin/bookings/{}/cancel", booking_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"].as_str().unwrap(), "CANCELLED");
}

#[tokio::test]
async fn test_admin_past_cancel_blocked_when_policy_disabled() {
    let app = TestApp::with_admin_cancel_past(false).await;
    let service_id = app.create_service("Facial", 60, 8000).await;
    let booking_id = seed_started_booking(&app, &service_id).await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/admin/bookings/{}/cancel", booking_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_cancel_of_future_booking() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Facial", 60, 8000).await;
    let booking_id = create_booking(&app, &service_id, &future_date(7), "10:00", "adm@example.com").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/admin/bookings/{}/cancel", booking_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"].as_str().unwrap(), "CANCELLED");
}

#[tokio::test]
async fn test_completed_booking_cannot_be_cancelled() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Facial", 60, 8000).await;
    let booking_id = create_booking(&app, &service_id, &future_date(7), "10:00", "nocancel@example.com").await;

    assert_eq!(set_status(&app, &booking_id, "CONFIRMED").await.status(), StatusCode::OK);
    assert_eq!(set_status(&app, &booking_id, "COMPLETED").await.status(), StatusCode::OK);

    let res = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/bookings/{}/cancel", booking_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_reschedule_moves_booking_and_keeps_status() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Facial", 60, 8000).await;
    let date = future_date(7);
    let booking_id = create_booking(&app, &service_id, &date, "10:00", "move@example.com").await;

    assert_eq!(set_status(&app, &booking_id, "CONFIRMED").await.status(), StatusCode::OK);

    let new_date = future_date(8);
    let res = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/bookings/{}/reschedule", booking_id))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"new_date": new_date, "new_time": "15:00"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let booking = parse_body(res).await;
    assert_eq!(booking["status"].as_str().unwrap(), "CONFIRMED");
    assert_eq!(booking["date"].as_str().unwrap(), new_date);
    assert!(booking["start_time"].as_str().unwrap().contains("15:00:00"));
    assert!(booking["end_time"].as_str().unwrap().contains("16:00:00"));

    // The old slot is free again.
    let res = app.book(&service_id, &date, "10:00", "other@example.com").await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_reschedule_into_occupied_slot_conflicts() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Facial", 60, 8000).await;
    let date = future_date(7);

    create_booking(&app, &service_id, &date, "10:00", "holder@example.com").await;
    let booking_id = create_booking(&app, &service_id, &date, "13:00", "mover@example.com").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/bookings/{}/reschedule", booking_id))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"new_date": date, "new_time": "10:30"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Original times survive a failed move.
    let res = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/admin/bookings/{}", booking_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    let booking = parse_body(res).await;
    assert!(booking["start_time"].as_str().unwrap().contains("13:00:00"));
}

#[tokio::test]
async fn test_cancelled_booking_cannot_be_rescheduled() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Facial", 60, 8000).await;
    let date = future_date(7);
    let booking_id = create_booking(&app, &service_id, &date, "10:00", "gone@example.com").await;

    let res = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/bookings/{}/cancel", booking_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.router.clone().oneshot(
        Request::builder().method("POST")
            .uri(format!("/api/v1/bookings/{}/reschedule", booking_id))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"new_date": future_date(8), "new_time": "11:00"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_lifecycle_events_are_dispatched() {
    let app = TestApp::new().await;
    let service_id = app.create_service("Facial", 60, 8000).await;
    let booking_id = create_booking(&app, &service_id, &future_date(7), "10:00", "notify@example.com").await;

    assert_eq!(set_status(&app, &booking_id, "CONFIRMED").await.status(), StatusCode::OK);

    use salon_backend::domain::models::booking::LifecycleEvent;
    let events = app.notifier.events.lock().unwrap().clone();
    let for_booking: Vec<_> = events.iter()
        .filter(|(_, id)| id == &booking_id)
        .map(|(e, _)| *e)
        .collect();
    assert_eq!(for_booking, vec![LifecycleEvent::Created, LifecycleEvent::Confirmed]);

    // The dispatcher's calendar id is persisted on the booking.
    let res = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/admin/bookings/{}", booking_id))
            .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    let booking = parse_body(res).await;
    assert_eq!(
        booking["calendar_event_id"].as_str().unwrap(),
        format!("cal-evt-{}", booking_id)
    );
}
