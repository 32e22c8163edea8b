use crate::domain::models::{booking::Booking, service::Service};
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};

/// Generates an iCalendar (.ics) string for a booking, used by the
/// best-effort calendar mirror. The booking id doubles as the event UID.
pub fn generate_ics(service: &Service, booking: &Booking) -> String {
    let mut calendar = Calendar::new();

    let ical_event = IcalEvent::new()
        .summary(&service.name)
        .description(&service.description)
        .starts(booking.start_time)
        .ends(booking.end_time)
        .uid(&booking.id)
        .done();

    calendar.push(ical_event);
    calendar.to_string()
}
