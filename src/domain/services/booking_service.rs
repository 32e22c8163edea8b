use std::sync::Arc;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::models::booking::{
    Booking, BookingStatus, CancelActor, LifecycleEvent, NewBookingParams, PaymentOutcome,
    PaymentStatus,
};
use crate::domain::models::customer::Customer;
use crate::domain::ports::{BookingRepository, CustomerRepository, Notifier, ServiceRepository};
use crate::domain::services::availability::BusinessHours;
use crate::domain::services::calendar::generate_ics;
use crate::error::AppError;

pub struct CreateBookingArgs {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub notes: Option<String>,
}

/// State machine for a single appointment: creation, status and payment
/// transitions, rescheduling, cancellation and purge. All slot-conflict
/// checks are delegated to the repository so they run atomically against
/// the store; the availability grid a client saw earlier is advisory only.
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    services: Arc<dyn ServiceRepository>,
    customers: Arc<dyn CustomerRepository>,
    notifier: Arc<dyn Notifier>,
    tz: Tz,
    hours: BusinessHours,
    admin_cancel_past: bool,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        services: Arc<dyn ServiceRepository>,
        customers: Arc<dyn CustomerRepository>,
        notifier: Arc<dyn Notifier>,
        config: &Config,
    ) -> Self {
        Self {
            bookings,
            services,
            customers,
            notifier,
            tz: config.business_timezone,
            hours: config.business_hours(),
            admin_cancel_past: config.admin_cancel_past,
        }
    }

    pub async fn create_booking(&self, args: CreateBookingArgs) -> Result<Booking, AppError> {
        let service = self
            .services
            .find_by_id(&args.service_id)
            .await?
            .filter(|s| s.is_active)
            .ok_or_else(|| AppError::Validation("Unknown or inactive service".into()))?;

        let start = self.to_utc(args.date, args.time)?;
        if start <= Utc::now() {
            return Err(AppError::Validation("Cannot book in the past".into()));
        }
        if !self.fits_business_hours(args.time, service.duration_min as i64) {
            return Err(AppError::Validation(
                "Requested time falls outside business hours".into(),
            ));
        }

        let candidate = Customer::new(args.first_name, args.last_name, &args.email, args.phone);
        let customer = self.customers.upsert_by_email(&candidate).await?;

        let booking = Booking::new(NewBookingParams {
            customer_id: customer.id,
            service_id: service.id.clone(),
            date: args.date,
            start,
            duration_min: service.duration_min,
            price_cents: service.price_cents,
            notes: args.notes,
        });

        let created = self
            .bookings
            .create_if_free(&booking)
            .await?
            .ok_or_else(|| {
                AppError::Conflict("Requested time overlaps an existing appointment".into())
            })?;

        info!("Booking created: {} ({} on {})", created.id, service.name, created.date);
        self.dispatch(LifecycleEvent::Created, &created, false).await;
        Ok(created)
    }

    pub async fn update_status(
        &self,
        booking_id: &str,
        new_status: BookingStatus,
    ) -> Result<Booking, AppError> {
        let mut booking = self.require(booking_id).await?;

        if !booking.status.can_transition_to(new_status) {
            return Err(AppError::InvalidTransition(format!(
                "Cannot move booking from {:?} to {:?}",
                booking.status, new_status
            )));
        }
        if new_status == BookingStatus::Confirmed
            && !matches!(booking.payment_status, PaymentStatus::Pending | PaymentStatus::Paid)
        {
            return Err(AppError::InvalidTransition(
                "Cannot confirm a booking whose payment has failed or been refunded".into(),
            ));
        }

        let (prior_status, prior_payment) = (booking.status, booking.payment_status);
        booking.status = new_status;
        booking.updated_at = Utc::now();
        let updated = self.persist_transition(&booking, prior_status, prior_payment).await?;

        let event = match new_status {
            BookingStatus::Confirmed => Some((LifecycleEvent::Confirmed, true)),
            BookingStatus::Completed => Some((LifecycleEvent::Completed, false)),
            BookingStatus::Cancelled => Some((LifecycleEvent::Cancelled, false)),
            BookingStatus::Pending => None,
        };
        if let Some((ev, with_ics)) = event {
            self.dispatch(ev, &updated, with_ics).await;
        }
        Ok(updated)
    }

    pub async fn record_payment_outcome(
        &self,
        booking_id: &str,
        outcome: PaymentOutcome,
    ) -> Result<Booking, AppError> {
        let mut booking = self.require(booking_id).await?;
        let (prior_status, prior_payment) = (booking.status, booking.payment_status);

        match outcome {
            PaymentOutcome::Succeeded => {
                booking.payment_status = PaymentStatus::Paid;
                let promoted = booking.status == BookingStatus::Pending;
                if promoted {
                    booking.status = BookingStatus::Confirmed;
                }
                booking.updated_at = Utc::now();
                let updated = self.persist_transition(&booking, prior_status, prior_payment).await?;
                if promoted {
                    self.dispatch(LifecycleEvent::Confirmed, &updated, true).await;
                }
                Ok(updated)
            }
            PaymentOutcome::Failed => {
                // Status stays put so the customer can retry payment.
                booking.payment_status = PaymentStatus::Failed;
                booking.updated_at = Utc::now();
                let updated = self.persist_transition(&booking, prior_status, prior_payment).await?;
                self.dispatch(LifecycleEvent::PaymentFailed, &updated, false).await;
                Ok(updated)
            }
            PaymentOutcome::Refunded => {
                if booking.status == BookingStatus::Completed {
                    return Err(AppError::InvalidTransition(
                        "Cannot refund a completed appointment".into(),
                    ));
                }
                booking.payment_status = PaymentStatus::Refunded;
                booking.status = BookingStatus::Cancelled;
                booking.updated_at = Utc::now();
                let updated = self.persist_transition(&booking, prior_status, prior_payment).await?;
                self.dispatch(LifecycleEvent::Refunded, &updated, false).await;
                Ok(updated)
            }
        }
    }

    pub async fn reschedule(
        &self,
        booking_id: &str,
        new_date: NaiveDate,
        new_time: NaiveTime,
    ) -> Result<Booking, AppError> {
        let mut booking = self.require(booking_id).await?;

        if booking.status.is_terminal() {
            return Err(AppError::InvalidTransition(format!(
                "Cannot reschedule a {:?} booking",
                booking.status
            )));
        }

        let new_start = self.to_utc(new_date, new_time)?;
        if new_start <= Utc::now() {
            return Err(AppError::Validation("New start time must be in the future".into()));
        }
        let duration = booking.duration_min();
        if !self.fits_business_hours(new_time, duration) {
            return Err(AppError::Validation(
                "Requested time falls outside business hours".into(),
            ));
        }

        booking.date = new_date;
        booking.start_time = new_start;
        booking.end_time = new_start + Duration::minutes(duration);
        booking.updated_at = Utc::now();

        let updated = self
            .bookings
            .reschedule_if_free(&booking)
            .await?
            .ok_or_else(|| {
                AppError::Conflict("Target time overlaps an existing appointment".into())
            })?;

        info!("Booking rescheduled: {} -> {} {}", updated.id, new_date, new_time);
        self.dispatch(LifecycleEvent::Rescheduled, &updated, true).await;
        Ok(updated)
    }

    pub async fn cancel(&self, booking_id: &str, actor: CancelActor) -> Result<Booking, AppError> {
        let mut booking = self.require(booking_id).await?;

        if booking.status == BookingStatus::Cancelled {
            return Ok(booking);
        }
        if booking.status == BookingStatus::Completed {
            return Err(AppError::InvalidTransition(
                "Cannot cancel a completed appointment".into(),
            ));
        }
        if booking.start_time <= Utc::now() {
            let admin_bypass = actor == CancelActor::Admin && self.admin_cancel_past;
            if !admin_bypass {
                return Err(AppError::InvalidTransition(
                    "Appointment has already started".into(),
                ));
            }
        }

        let (prior_status, prior_payment) = (booking.status, booking.payment_status);
        booking.status = BookingStatus::Cancelled;
        booking.updated_at = Utc::now();
        let updated = self.persist_transition(&booking, prior_status, prior_payment).await?;

        info!("Booking cancelled: {} (by {:?})", updated.id, actor);
        self.dispatch(LifecycleEvent::Cancelled, &updated, false).await;
        Ok(updated)
    }

    /// Hard purge, distinct from cancellation. Admin surface only.
    pub async fn delete(&self, booking_id: &str) -> Result<(), AppError> {
        self.bookings.delete(booking_id).await?;
        info!("Booking purged: {}", booking_id);
        Ok(())
    }

    /// Compare-and-set write of a lifecycle transition. A `None` from the
    /// store means another transition landed between our read and write.
    async fn persist_transition(
        &self,
        booking: &Booking,
        expected_status: BookingStatus,
        expected_payment: PaymentStatus,
    ) -> Result<Booking, AppError> {
        self.bookings
            .update_state(booking, expected_status, expected_payment)
            .await?
            .ok_or_else(|| {
                AppError::Conflict("Booking was modified concurrently, retry".into())
            })
    }

    async fn require(&self, booking_id: &str) -> Result<Booking, AppError> {
        self.bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))
    }

    fn to_utc(&self, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>, AppError> {
        self.tz
            .from_local_datetime(&date.and_time(time))
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| {
                AppError::Validation("Invalid local time (ambiguous or skipped due to DST)".into())
            })
    }

    fn fits_business_hours(&self, start: NaiveTime, duration_min: i64) -> bool {
        let start_idx = (start.hour() * 60 + start.minute()) as i64;
        let open_idx = (self.hours.open.hour() * 60 + self.hours.open.minute()) as i64;
        let close_idx = (self.hours.close.hour() * 60 + self.hours.close.minute()) as i64;
        start_idx >= open_idx && start_idx + duration_min <= close_idx
    }

    /// Fire-and-forget dispatch to the notification/calendar collaborators.
    /// Failures are logged, never bubbled into the lifecycle operation.
    async fn dispatch(&self, event: LifecycleEvent, booking: &Booking, with_ics: bool) {
        let ics = if with_ics {
            match self.services.find_by_id(&booking.service_id).await {
                Ok(Some(service)) => Some(generate_ics(&service, booking)),
                _ => None,
            }
        } else {
            None
        };

        match self.notifier.notify(event, booking, ics.as_deref()).await {
            Ok(Some(calendar_event_id))
                if booking.calendar_event_id.as_deref() != Some(&calendar_event_id) =>
            {
                if let Err(e) = self
                    .bookings
                    .set_calendar_event_id(&booking.id, &calendar_event_id)
                    .await
                {
                    warn!("Failed to record calendar event id for {}: {:?}", booking.id, e);
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Notification dispatch failed for booking {}: {:?}", booking.id, e);
            }
        }
    }
}
