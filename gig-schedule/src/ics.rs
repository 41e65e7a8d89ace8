use chrono::NaiveDateTime;
use ics::properties::{DtEnd, DtStart, Location, Status, Summary};

use crate::{Agenda, Booking, Error, EventStatus};

const ICS_DATE_TIME: &str = "%Y%m%dT%H%M%S";

impl Agenda {
    pub fn to_ics(&self) -> Result<ics::ICalendar<'_>, Error> {
        let mut icalendar = ics::ICalendar::new("2.0", &self.name);

        for booking in &self.bookings {
            icalendar.add_event(booking.to_ics()?);
        }

        Ok(icalendar)
    }
}

impl Booking {
    /// Times are floating local time; a booking running past midnight
    /// ends on the following date.
    pub fn to_ics(&self) -> Result<ics::Event<'_>, Error> {
        let span = self.span()?;
        let start = format_date_time(span.start);
        let end = format_date_time(span.end);

        let id = match self.id {
            Some(id) => format!("booking-{id}"),
            None => format!("{}_{}", start, self.title.replace(' ', "-")),
        };

        let mut ics_event = ics::Event::new(id, start.clone());

        ics_event.push(DtStart::new(start));
        ics_event.push(DtEnd::new(end));
        ics_event.push(Summary::new(&self.title));
        ics_event.push(Status::new(self.status.ics_status()));

        if let Some(venue) = &self.venue {
            ics_event.push(Location::new(venue));
        }

        Ok(ics_event)
    }
}

impl EventStatus {
    fn ics_status(self) -> &'static str {
        match self {
            EventStatus::Pending => "TENTATIVE",
            EventStatus::Cancelled => "CANCELLED",
            EventStatus::Confirmed | EventStatus::InProgress | EventStatus::Completed => {
                "CONFIRMED"
            }
        }
    }
}

fn format_date_time(date_time: NaiveDateTime) -> String {
    date_time.format(ICS_DATE_TIME).to_string()
}
