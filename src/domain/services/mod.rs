pub mod availability;
pub mod booking_service;
pub mod calendar;
