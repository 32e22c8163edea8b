use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Dedup key for the customer directory: trimmed, lowercased.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Customer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(first_name: String, last_name: String, email: &str, phone: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            first_name,
            last_name,
            email: normalize_email(email),
            phone,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}
