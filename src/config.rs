use std::env;
use chrono::NaiveTime;
use chrono_tz::Tz;
use crate::domain::services::availability::BusinessHours;

#[derive(Clone)]
pub struct Config {
    /// Unset means "run against the in-memory store" (local/offline mode).
    pub database_url: Option<String>,
    pub port: u16,
    pub business_timezone: Tz,
    pub business_open: NaiveTime,
    pub business_close: NaiveTime,
    pub slot_interval_min: i64,
    pub admin_token: String,
    /// Policy flag: may an admin cancel an appointment that already started?
    pub admin_cancel_past: bool,
    /// Empty means lifecycle events are logged instead of delivered.
    pub notify_webhook_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").ok(),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            business_timezone: env::var("BUSINESS_TIMEZONE").unwrap_or_else(|_| "UTC".to_string()).parse().expect("BUSINESS_TIMEZONE must be a valid IANA timezone"),
            business_open: parse_hhmm(&env::var("BUSINESS_OPEN").unwrap_or_else(|_| "09:00".to_string()), "BUSINESS_OPEN"),
            business_close: parse_hhmm(&env::var("BUSINESS_CLOSE").unwrap_or_else(|_| "18:00".to_string()), "BUSINESS_CLOSE"),
            slot_interval_min: env::var("SLOT_INTERVAL_MIN").unwrap_or_else(|_| "30".to_string()).parse().expect("SLOT_INTERVAL_MIN must be a number"),
            admin_token: env::var("ADMIN_TOKEN").expect("ADMIN_TOKEN must be set"),
            admin_cancel_past: env::var("ADMIN_CANCEL_PAST").map(|v| v == "true" || v == "1").unwrap_or(true),
            notify_webhook_url: env::var("NOTIFY_WEBHOOK_URL").unwrap_or_default(),
        }
    }

    pub fn business_hours(&self) -> BusinessHours {
        BusinessHours {
            open: self.business_open,
            close: self.business_close,
        }
    }
}

fn parse_hhmm(raw: &str, var: &str) -> NaiveTime {
    NaiveTime::parse_from_str(raw, "%H:%M").unwrap_or_else(|_| panic!("{} must be HH:MM", var))
}
