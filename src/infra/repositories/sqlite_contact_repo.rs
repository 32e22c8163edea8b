use crate::domain::{models::contact::{Contact, ContactStatus}, ports::ContactRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteContactRepo {
    pool: SqlitePool,
}

impl SqliteContactRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for SqliteContactRepo {
    async fn create(&self, contact: &Contact) -> Result<Contact, AppError> {
        sqlx::query_as::<_, Contact>(
            "INSERT INTO contacts (id, first_name, last_name, email, phone, inquiry_type, message, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&contact.id).bind(&contact.first_name).bind(&contact.last_name).bind(&contact.email)
        .bind(&contact.phone).bind(&contact.inquiry_type).bind(&contact.message)
        .bind(contact.status).bind(contact.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn list(&self) -> Result<Vec<Contact>, AppError> {
        sqlx::query_as::<_, Contact>("SELECT * FROM contacts ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn update_status(&self, id: &str, status: ContactStatus) -> Result<Contact, AppError> {
        sqlx::query_as::<_, Contact>(
            "UPDATE contacts SET status = ? WHERE id = ? RETURNING *",
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Contact not found".into()))
    }
}
