use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// A booking in this status holds its time slot against other requests.
    pub fn occupies_slot(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Completed) | (Confirmed, Cancelled)
        )
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// Outcome reported by the external payment bridge.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentOutcome {
    Succeeded,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelActor {
    Customer,
    Admin,
}

/// Lifecycle transitions pushed to the notification/calendar dispatch.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    Created,
    Confirmed,
    Completed,
    Cancelled,
    Rescheduled,
    PaymentFailed,
    Refunded,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub customer_id: String,
    pub service_id: String,
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub total_price_cents: i64,
    pub payment_status: PaymentStatus,
    pub calendar_event_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub customer_id: String,
    pub service_id: String,
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub duration_min: i32,
    pub price_cents: i64,
    pub notes: Option<String>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let end_time = params.start + Duration::minutes(params.duration_min as i64);
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            customer_id: params.customer_id,
            service_id: params.service_id,
            date: params.date,
            start_time: params.start,
            end_time,
            status: BookingStatus::Pending,
            notes: params.notes,
            total_price_cents: params.price_cents,
            payment_status: PaymentStatus::Pending,
            calendar_event_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Duration snapshotted at creation time; later service edits do not move it.
    pub fn duration_min(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}
