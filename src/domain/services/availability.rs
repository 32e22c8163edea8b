use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use crate::domain::models::booking::Booking;

#[derive(Debug, Serialize, Clone)]
pub struct SlotInfo {
    pub time: String,
    pub available: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct BusinessHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

/// Computes the candidate slot grid for one business day.
///
/// The grid runs from open to close at the configured step, restricted to
/// slots whose full duration fits before close. Each candidate carries an
/// `available` flag: false when its half-open interval overlaps a
/// PENDING/CONFIRMED booking or when the slot start is not in the future.
/// A date in the past yields an empty grid, not an error.
pub fn calculate_slots(
    date: NaiveDate,
    duration_min: i64,
    hours: BusinessHours,
    interval_min: i64,
    existing_bookings: &[Booking],
    now: DateTime<Utc>,
    tz: Tz,
) -> Vec<SlotInfo> {
    if duration_min <= 0 || interval_min <= 0 {
        return Vec::new();
    }
    if date < now.with_timezone(&tz).date_naive() {
        return Vec::new();
    }

    let open_idx = (hours.open.hour() * 60 + hours.open.minute()) as i64;
    let close_idx = (hours.close.hour() * 60 + hours.close.minute()) as i64;

    let occupied: Vec<&Booking> = existing_bookings
        .iter()
        .filter(|b| b.status.occupies_slot())
        .collect();

    let mut slots = Vec::new();
    let mut cursor = open_idx;

    while cursor + duration_min <= close_idx {
        let hour = (cursor / 60) as u32;
        let minute = (cursor % 60) as u32;

        if let Some(nt) = NaiveTime::from_hms_opt(hour, minute, 0)
            && let Some(slot_tz) = tz.from_local_datetime(&date.and_time(nt)).single()
        {
            let slot_start = slot_tz.with_timezone(&Utc);
            let slot_end = slot_start + Duration::minutes(duration_min);

            let overlaps = occupied
                .iter()
                .any(|b| slot_start < b.end_time && b.start_time < slot_end);

            slots.push(SlotInfo {
                time: format!("{:02}:{:02}", hour, minute),
                available: !overlaps && slot_start > now,
            });
        }
        cursor += interval_min;
    }

    slots
}
