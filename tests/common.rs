use salon_backend::{
    api::router::create_router,
    config::Config,
    domain::models::booking::{Booking, LifecycleEvent},
    domain::ports::Notifier,
    domain::services::booking_service::BookingService,
    error::AppError,
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_contact_repo::SqliteContactRepo,
        sqlite_customer_repo::SqliteCustomerRepo,
        sqlite_service_repo::SqliteServiceRepo,
    },
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use async_trait::async_trait;
use chrono::NaiveTime;
use serde_json::{json, Value};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Records every dispatched lifecycle event and hands back a calendar id,
/// standing in for the external notification collaborator.
pub struct MockNotifier {
    pub events: Mutex<Vec<(LifecycleEvent, String)>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(
        &self,
        event: LifecycleEvent,
        booking: &Booking,
        _ics: Option<&str>,
    ) -> Result<Option<String>, AppError> {
        self.events
            .lock()
            .unwrap()
            .push((event, booking.id.clone()));
        Ok(Some(format!("cal-evt-{}", booking.id)))
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub notifier: Arc<MockNotifier>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_admin_cancel_past(true).await
    }

    pub async fn with_admin_cancel_past(admin_cancel_past: bool) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: Some(db_url),
            port: 0,
            business_timezone: chrono_tz::UTC,
            business_open: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            business_close: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            slot_interval_min: 30,
            admin_token: ADMIN_TOKEN.to_string(),
            admin_cancel_past,
            notify_webhook_url: String::new(),
        };

        let service_repo = Arc::new(SqliteServiceRepo::new(pool.clone()));
        let customer_repo = Arc::new(SqliteCustomerRepo::new(pool.clone()));
        let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
        let contact_repo = Arc::new(SqliteContactRepo::new(pool.clone()));
        let notifier = Arc::new(MockNotifier::new());

        let booking_service = Arc::new(BookingService::new(
            booking_repo.clone(),
            service_repo.clone(),
            customer_repo.clone(),
            notifier.clone(),
            &config,
        ));

        let state = Arc::new(AppState {
            config,
            service_repo,
            customer_repo,
            booking_repo,
            contact_repo,
            notifier: notifier.clone(),
            booking_service,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            notifier,
        }
    }

    /// Seeds a service through the admin API and returns its id.
    pub async fn create_service(
        &self,
        name: &str,
        duration_min: i32,
        price_cents: i64,
    ) -> String {
        let payload = json!({
            "name": name,
            "description": "Test service",
            "category": "massage",
            "duration_min": duration_min,
            "price_cents": price_cents
        });

        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/admin/services")
                    .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        if !response.status().is_success() {
            panic!("Service creation failed in test helper: {}", response.status());
        }

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        body["id"].as_str().unwrap().to_string()
    }

    /// Books `service_id` for `email` and returns the raw response.
    pub async fn book(
        &self,
        service_id: &str,
        date: &str,
        time: &str,
        email: &str,
    ) -> axum::response::Response {
        let payload = json!({
            "customer_first_name": "Test",
            "customer_last_name": "Customer",
            "customer_email": email,
            "customer_phone": "+46701234567",
            "service_id": service_id,
            "date": date,
            "time": time
        });

        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/bookings")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
