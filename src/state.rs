use std::sync::Arc;
use crate::domain::ports::{
    BookingRepository, ContactRepository, CustomerRepository, Notifier, ServiceRepository,
};
use crate::domain::services::booking_service::BookingService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub service_repo: Arc<dyn ServiceRepository>,
    pub customer_repo: Arc<dyn CustomerRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub contact_repo: Arc<dyn ContactRepository>,
    pub notifier: Arc<dyn Notifier>,
    pub booking_service: Arc<BookingService>,
}
