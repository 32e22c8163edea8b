use crate::domain::{models::customer::Customer, ports::CustomerRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteCustomerRepo {
    pool: SqlitePool,
}

impl SqliteCustomerRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for SqliteCustomerRepo {
    async fn upsert_by_email(&self, candidate: &Customer) -> Result<Customer, AppError> {
        // The unique index on email makes this a true upsert: concurrent
        // requests for the same address resolve to one row. The no-op
        // DO UPDATE lets RETURNING hand back the existing record unchanged.
        sqlx::query_as::<_, Customer>(
            "INSERT INTO customers (id, first_name, last_name, email, phone, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(email) DO UPDATE SET email = excluded.email
             RETURNING *",
        )
        .bind(&candidate.id).bind(&candidate.first_name).bind(&candidate.last_name)
        .bind(&candidate.email).bind(&candidate.phone).bind(candidate.is_active)
        .bind(candidate.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>, AppError> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list(&self) -> Result<Vec<Customer>, AppError> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }
}
