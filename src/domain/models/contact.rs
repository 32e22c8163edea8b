use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactStatus {
    New,
    Read,
    Replied,
    Archived,
}

/// Inquiry message from the public contact form. No scheduling logic attached.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Contact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub inquiry_type: String,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
}

pub struct NewContactParams {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub inquiry_type: String,
    pub message: String,
}

impl Contact {
    pub fn new(params: NewContactParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            first_name: params.first_name,
            last_name: params.last_name,
            email: params.email,
            phone: params.phone,
            inquiry_type: params.inquiry_type,
            message: params.message,
            status: ContactStatus::New,
            created_at: Utc::now(),
        }
    }
}
