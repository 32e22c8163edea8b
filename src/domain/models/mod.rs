pub mod booking;
pub mod contact;
pub mod customer;
pub mod service;
