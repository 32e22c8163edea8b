use crate::domain::{models::contact::{Contact, ContactStatus}, ports::ContactRepository};
use crate::error::AppError;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
pub struct MemoryContactRepo {
    rows: Mutex<Vec<Contact>>,
}

impl MemoryContactRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> Result<MutexGuard<'_, Vec<Contact>>, AppError> {
        self.rows.lock().map_err(|_| AppError::Internal)
    }
}

#[async_trait]
impl ContactRepository for MemoryContactRepo {
    async fn create(&self, contact: &Contact) -> Result<Contact, AppError> {
        self.rows()?.push(contact.clone());
        Ok(contact.clone())
    }

    async fn list(&self) -> Result<Vec<Contact>, AppError> {
        let mut all = self.rows()?.clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn update_status(&self, id: &str, status: ContactStatus) -> Result<Contact, AppError> {
        let mut rows = self.rows()?;
        let row = rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound("Contact not found".into()))?;
        row.status = status;
        Ok(row.clone())
    }
}
