use crate::domain::{
    models::booking::{Booking, BookingStatus, PaymentStatus},
    ports::BookingRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::NaiveDate;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create_if_free(&self, booking: &Booking) -> Result<Option<Booking>, AppError> {
        // Single statement: the overlap predicate and the insert are atomic,
        // so two racing requests for one slot cannot both pass the check.
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, customer_id, service_id, date, start_time, end_time, status, notes, total_price_cents, payment_status, calendar_event_id, created_at, updated_at)
             SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
             WHERE NOT EXISTS (
                 SELECT 1 FROM bookings
                 WHERE date = ? AND status IN ('PENDING', 'CONFIRMED')
                   AND start_time < ? AND end_time > ?
             )
             RETURNING *",
        )
        .bind(&booking.id).bind(&booking.customer_id).bind(&booking.service_id).bind(booking.date)
        .bind(booking.start_time).bind(booking.end_time).bind(booking.status).bind(&booking.notes)
        .bind(booking.total_price_cents).bind(booking.payment_status).bind(&booking.calendar_event_id)
        .bind(booking.created_at).bind(booking.updated_at)
        .bind(booking.date).bind(booking.end_time).bind(booking.start_time)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn reschedule_if_free(&self, booking: &Booking) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET date = ?, start_time = ?, end_time = ?, updated_at = ?
             WHERE id = ? AND NOT EXISTS (
                 SELECT 1 FROM bookings b
                 WHERE b.id != ? AND b.date = ? AND b.status IN ('PENDING', 'CONFIRMED')
                   AND b.start_time < ? AND b.end_time > ?
             )
             RETURNING *",
        )
        .bind(booking.date).bind(booking.start_time).bind(booking.end_time).bind(booking.updated_at)
        .bind(&booking.id)
        .bind(&booking.id).bind(booking.date).bind(booking.end_time).bind(booking.start_time)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list_active_by_date(&self, date: NaiveDate) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE date = ? AND status IN ('PENDING', 'CONFIRMED') ORDER BY start_time ASC",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn list_all(&self) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY start_time ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn update_state(
        &self,
        booking: &Booking,
        expected_status: BookingStatus,
        expected_payment: PaymentStatus,
    ) -> Result<Option<Booking>, AppError> {
        // Compare-and-set: the row must still carry the state the caller
        // read, so two racing transitions cannot both land.
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = ?, payment_status = ?, updated_at = ?
             WHERE id = ? AND status = ? AND payment_status = ?
             RETURNING *",
        )
        .bind(booking.status).bind(booking.payment_status).bind(booking.updated_at)
        .bind(&booking.id).bind(expected_status).bind(expected_payment)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn set_calendar_event_id(
        &self,
        id: &str,
        calendar_event_id: &str,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE bookings SET calendar_event_id = ? WHERE id = ?")
            .bind(calendar_event_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Booking not found".into()));
        }
        Ok(())
    }
}
