use crate::domain::{
    models::booking::{Booking, BookingStatus, PaymentStatus},
    ports::BookingRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Mutex, MutexGuard};

/// In-process substitute for the SQLite store, for running without a
/// configured database. One mutex spans every check-then-write sequence,
/// which gives the same atomicity the SQL statements provide.
#[derive(Default)]
pub struct MemoryBookingRepo {
    rows: Mutex<Vec<Booking>>,
}

impl MemoryBookingRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> Result<MutexGuard<'_, Vec<Booking>>, AppError> {
        self.rows.lock().map_err(|_| AppError::Internal)
    }
}

fn overlaps(rows: &[Booking], candidate: &Booking, exclude_id: Option<&str>) -> bool {
    rows.iter().any(|b| {
        Some(b.id.as_str()) != exclude_id
            && b.date == candidate.date
            && b.status.occupies_slot()
            && b.start_time < candidate.end_time
            && candidate.start_time < b.end_time
    })
}

#[async_trait]
impl BookingRepository for MemoryBookingRepo {
    async fn create_if_free(&self, booking: &Booking) -> Result<Option<Booking>, AppError> {
        let mut rows = self.rows()?;
        if overlaps(&rows, booking, None) {
            return Ok(None);
        }
        rows.push(booking.clone());
        Ok(Some(booking.clone()))
    }

    async fn reschedule_if_free(&self, booking: &Booking) -> Result<Option<Booking>, AppError> {
        let mut rows = self.rows()?;
        if overlaps(&rows, booking, Some(&booking.id)) {
            return Ok(None);
        }
        match rows.iter_mut().find(|b| b.id == booking.id) {
            Some(row) => {
                row.date = booking.date;
                row.start_time = booking.start_time;
                row.end_time = booking.end_time;
                row.updated_at = booking.updated_at;
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        Ok(self.rows()?.iter().find(|b| b.id == id).cloned())
    }

    async fn list_active_by_date(&self, date: NaiveDate) -> Result<Vec<Booking>, AppError> {
        let mut matches: Vec<Booking> = self
            .rows()?
            .iter()
            .filter(|b| b.date == date && b.status.occupies_slot())
            .cloned()
            .collect();
        matches.sort_by_key(|b| b.start_time);
        Ok(matches)
    }

    async fn list_all(&self) -> Result<Vec<Booking>, AppError> {
        let mut all = self.rows()?.clone();
        all.sort_by_key(|b| b.start_time);
        Ok(all)
    }

    async fn update_state(
        &self,
        booking: &Booking,
        expected_status: BookingStatus,
        expected_payment: PaymentStatus,
    ) -> Result<Option<Booking>, AppError> {
        let mut rows = self.rows()?;
        let Some(row) = rows.iter_mut().find(|b| b.id == booking.id) else {
            return Ok(None);
        };
        if row.status != expected_status || row.payment_status != expected_payment {
            return Ok(None);
        }
        row.status = booking.status;
        row.payment_status = booking.payment_status;
        row.updated_at = booking.updated_at;
        Ok(Some(row.clone()))
    }

    async fn set_calendar_event_id(
        &self,
        id: &str,
        calendar_event_id: &str,
    ) -> Result<(), AppError> {
        let mut rows = self.rows()?;
        if let Some(row) = rows.iter_mut().find(|b| b.id == id) {
            row.calendar_event_id = Some(calendar_event_id.to_string());
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut rows = self.rows()?;
        let before = rows.len();
        rows.retain(|b| b.id != id);
        if rows.len() == before {
            return Err(AppError::NotFound("Booking not found".into()));
        }
        Ok(())
    }
}
