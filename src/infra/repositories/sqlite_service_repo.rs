use crate::domain::{models::service::Service, ports::ServiceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteServiceRepo {
    pool: SqlitePool,
}

impl SqliteServiceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRepository for SqliteServiceRepo {
    async fn create(&self, service: &Service) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(
            "INSERT INTO services (id, name, description, category, duration_min, price_cents, is_active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&service.id).bind(&service.name).bind(&service.description).bind(service.category)
        .bind(service.duration_min).bind(service.price_cents).bind(service.is_active).bind(service.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Service>, AppError> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list_active(&self) -> Result<Vec<Service>, AppError> {
        sqlx::query_as::<_, Service>(
            "SELECT * FROM services WHERE is_active = 1 ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn list_all(&self) -> Result<Vec<Service>, AppError> {
        sqlx::query_as::<_, Service>("SELECT * FROM services ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn update(&self, service: &Service) -> Result<Service, AppError> {
        sqlx::query_as::<_, Service>(
            "UPDATE services SET name = ?, description = ?, category = ?, duration_min = ?, price_cents = ?, is_active = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&service.name).bind(&service.description).bind(service.category)
        .bind(service.duration_min).bind(service.price_cents).bind(service.is_active)
        .bind(&service.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Service not found".into()))
    }
}
