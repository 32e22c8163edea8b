use serde::Deserialize;
use crate::domain::models::{
    booking::{BookingStatus, PaymentOutcome},
    contact::ContactStatus,
    service::ServiceCategory,
};

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    pub service_id: String,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub service_id: String,
    pub date: String,
    pub time: String,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

#[derive(Deserialize)]
pub struct RescheduleBookingRequest {
    pub new_date: String,
    pub new_time: String,
}

#[derive(Deserialize)]
pub struct PaymentOutcomeRequest {
    pub booking_id: String,
    pub outcome: PaymentOutcome,
}

#[derive(Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: String,
    pub category: ServiceCategory,
    pub duration_min: i32,
    pub price_cents: i64,
}

#[derive(Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<ServiceCategory>,
    pub duration_min: Option<i32>,
    pub price_cents: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateContactRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub inquiry_type: String,
    pub message: String,
}

#[derive(Deserialize)]
pub struct UpdateContactStatusRequest {
    pub status: ContactStatus,
}
