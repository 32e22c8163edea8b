use serde::Serialize;
use crate::domain::models::booking::{BookingStatus, PaymentStatus};
use crate::domain::services::availability::SlotInfo;

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub date: String,
    pub slots: Vec<SlotInfo>,
}

#[derive(Serialize)]
pub struct BookingCreatedResponse {
    pub booking_id: String,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub total_price_cents: i64,
}
