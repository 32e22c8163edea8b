use crate::domain::{models::customer::Customer, ports::CustomerRepository};
use crate::error::AppError;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
pub struct MemoryCustomerRepo {
    rows: Mutex<Vec<Customer>>,
}

impl MemoryCustomerRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> Result<MutexGuard<'_, Vec<Customer>>, AppError> {
        self.rows.lock().map_err(|_| AppError::Internal)
    }
}

#[async_trait]
impl CustomerRepository for MemoryCustomerRepo {
    async fn upsert_by_email(&self, candidate: &Customer) -> Result<Customer, AppError> {
        // Emails are stored normalized, so equality is the dedup test.
        let mut rows = self.rows()?;
        if let Some(existing) = rows.iter().find(|c| c.email == candidate.email) {
            return Ok(existing.clone());
        }
        rows.push(candidate.clone());
        Ok(candidate.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>, AppError> {
        Ok(self.rows()?.iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Customer>, AppError> {
        Ok(self.rows()?.clone())
    }
}
