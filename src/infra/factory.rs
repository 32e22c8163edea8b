use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::services::booking_service::BookingService;
use crate::infra::notify::webhook_notifier::WebhookNotifier;
use crate::infra::repositories::{
    memory_booking_repo::MemoryBookingRepo, memory_contact_repo::MemoryContactRepo,
    memory_customer_repo::MemoryCustomerRepo, memory_service_repo::MemoryServiceRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_contact_repo::SqliteContactRepo,
    sqlite_customer_repo::SqliteCustomerRepo, sqlite_service_repo::SqliteServiceRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    let notifier = Arc::new(WebhookNotifier::new(config.notify_webhook_url.clone()));

    if let Some(database_url) = &config.database_url {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let service_repo = Arc::new(SqliteServiceRepo::new(pool.clone()));
        let customer_repo = Arc::new(SqliteCustomerRepo::new(pool.clone()));
        let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
        let contact_repo = Arc::new(SqliteContactRepo::new(pool.clone()));

        let booking_service = Arc::new(BookingService::new(
            booking_repo.clone(),
            service_repo.clone(),
            customer_repo.clone(),
            notifier.clone(),
            config,
        ));

        AppState {
            config: config.clone(),
            service_repo,
            customer_repo,
            booking_repo,
            contact_repo,
            notifier,
            booking_service,
        }
    } else {
        info!("DATABASE_URL not set - using in-memory store");

        let service_repo = Arc::new(MemoryServiceRepo::new());
        let customer_repo = Arc::new(MemoryCustomerRepo::new());
        let booking_repo = Arc::new(MemoryBookingRepo::new());
        let contact_repo = Arc::new(MemoryContactRepo::new());

        let booking_service = Arc::new(BookingService::new(
            booking_repo.clone(),
            service_repo.clone(),
            customer_repo.clone(),
            notifier.clone(),
            config,
        ));

        AppState {
            config: config.clone(),
            service_repo,
            customer_repo,
            booking_repo,
            contact_repo,
            notifier,
            booking_service,
        }
    }
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
