pub mod memory_booking_repo;
pub mod memory_contact_repo;
pub mod memory_customer_repo;
pub mod memory_service_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_contact_repo;
pub mod sqlite_customer_repo;
pub mod sqlite_service_repo;
