use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ServiceCategory {
    Facial,
    Massage,
    Manicure,
    Pedicure,
    Hair,
    Makeup,
    Waxing,
    Other,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: ServiceCategory,
    pub duration_min: i32,
    pub price_cents: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewServiceParams {
    pub name: String,
    pub description: String,
    pub category: ServiceCategory,
    pub duration_min: i32,
    pub price_cents: i64,
}

impl Service {
    pub fn new(params: NewServiceParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            description: params.description,
            category: params.category,
            duration_min: params.duration_min,
            price_cents: params.price_cents,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
