use crate::domain::{models::service::Service, ports::ServiceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
pub struct MemoryServiceRepo {
    rows: Mutex<Vec<Service>>,
}

impl MemoryServiceRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> Result<MutexGuard<'_, Vec<Service>>, AppError> {
        self.rows.lock().map_err(|_| AppError::Internal)
    }
}

#[async_trait]
impl ServiceRepository for MemoryServiceRepo {
    async fn create(&self, service: &Service) -> Result<Service, AppError> {
        self.rows()?.push(service.clone());
        Ok(service.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Service>, AppError> {
        Ok(self.rows()?.iter().find(|s| s.id == id).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Service>, AppError> {
        Ok(self.rows()?.iter().filter(|s| s.is_active).cloned().collect())
    }

    async fn list_all(&self) -> Result<Vec<Service>, AppError> {
        Ok(self.rows()?.clone())
    }

    async fn update(&self, service: &Service) -> Result<Service, AppError> {
        let mut rows = self.rows()?;
        let row = rows
            .iter_mut()
            .find(|s| s.id == service.id)
            .ok_or_else(|| AppError::NotFound("Service not found".into()))?;
        *row = service.clone();
        Ok(row.clone())
    }
}
