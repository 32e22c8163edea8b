use crate::domain::models::{
    booking::{Booking, BookingStatus, LifecycleEvent, PaymentStatus},
    contact::{Contact, ContactStatus},
    customer::Customer,
    service::Service,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn create(&self, service: &Service) -> Result<Service, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Service>, AppError>;
    /// Active services in creation order.
    async fn list_active(&self) -> Result<Vec<Service>, AppError>;
    async fn list_all(&self) -> Result<Vec<Service>, AppError>;
    async fn update(&self, service: &Service) -> Result<Service, AppError>;
}

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Insert-or-return-existing keyed by the normalized email. Must be a
    /// single atomic operation against the store; an existing row is returned
    /// unchanged (the candidate's name/phone never overwrite stored data).
    async fn upsert_by_email(&self, candidate: &Customer) -> Result<Customer, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>, AppError>;
    async fn list(&self) -> Result<Vec<Customer>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert the booking only if no PENDING/CONFIRMED booking overlaps its
    /// half-open interval on the same day. The overlap check and the insert
    /// execute as one atomic unit; `None` means the slot was taken.
    async fn create_if_free(&self, booking: &Booking) -> Result<Option<Booking>, AppError>;
    /// Move the booking to the times it now carries, re-checking overlap
    /// atomically while excluding the booking's own row. `None` on conflict.
    async fn reschedule_if_free(&self, booking: &Booking) -> Result<Option<Booking>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    /// PENDING/CONFIRMED bookings for a calendar day, ordered by start time.
    async fn list_active_by_date(&self, date: NaiveDate) -> Result<Vec<Booking>, AppError>;
    async fn list_all(&self) -> Result<Vec<Booking>, AppError>;
    /// Persist status / payment_status / updated_at, but only while the row
    /// still carries the expected pair. `None` means a concurrent transition
    /// (or a purge) got there first and nothing was written.
    async fn update_state(
        &self,
        booking: &Booking,
        expected_status: BookingStatus,
        expected_payment: PaymentStatus,
    ) -> Result<Option<Booking>, AppError>;
    /// Record the dispatcher's calendar mirror id without touching any
    /// lifecycle fields.
    async fn set_calendar_event_id(
        &self,
        id: &str,
        calendar_event_id: &str,
    ) -> Result<(), AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(&self, contact: &Contact) -> Result<Contact, AppError>;
    async fn list(&self) -> Result<Vec<Contact>, AppError>;
    async fn update_status(&self, id: &str, status: ContactStatus) -> Result<Contact, AppError>;
}

/// Notification/calendar dispatch. Consumes lifecycle transitions as a side
/// effect; never influences core state. Returns the collaborator's calendar
/// event id when it mirrored the appointment.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        event: LifecycleEvent,
        booking: &Booking,
        ics: Option<&str>,
    ) -> Result<Option<String>, AppError>;
}
