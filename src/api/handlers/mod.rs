pub mod availability;
pub mod booking;
pub mod contact;
pub mod customer;
pub mod health;
pub mod payment;
pub mod service;
