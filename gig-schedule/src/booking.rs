use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Error, Interval, Span, TimeOfDay};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EventStatus {
    #[default]
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

/// A contracted event on a given date.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Booking {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub id: Option<u64>,
    pub title: String,
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: EventStatus,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub venue: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Agenda {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bookings: Vec<Booking>,
}

/// A slot to check against an [`Agenda`]. `id` is set when an existing
/// booking is being moved, so it is not reported as conflicting with
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleRequest {
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub id: Option<u64>,
}

impl Booking {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }

    pub fn span(&self) -> Result<Span, Error> {
        self.interval().on(self.date)
    }

    pub fn billable_hours(&self) -> u32 {
        self.interval().billable_hours()
    }

    /// Cancelled bookings free their slot.
    pub fn blocks_schedule(&self) -> bool {
        self.status != EventStatus::Cancelled
    }
}

impl ScheduleRequest {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }

    pub fn span(&self) -> Result<Span, Error> {
        self.interval().on(self.date)
    }
}

impl From<&Booking> for ScheduleRequest {
    fn from(booking: &Booking) -> Self {
        Self {
            date: booking.date,
            start: booking.start,
            end: booking.end,
            id: booking.id,
        }
    }
}

impl Agenda {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            bookings: Vec::new(),
        }
    }

    /// Bookings whose time overlaps the requested slot. Dates are taken
    /// into account, so a booking running past midnight also collides
    /// with early slots on the following date.
    ///
    /// Fails when the request itself cannot be pinned to its date. Stored
    /// bookings that cannot be pinned are skipped with a warning.
    pub fn conflicts<'a>(
        &'a self,
        request: &ScheduleRequest,
    ) -> Result<impl Iterator<Item = &'a Booking> + 'a, Error> {
        let span = request.span()?;
        let own_id = request.id;

        Ok(self.bookings.iter().filter(move |booking| {
            if !booking.blocks_schedule() || (own_id.is_some() && booking.id == own_id) {
                return false;
            }

            match booking.span() {
                Ok(booking_span) => booking_span.overlaps(&span),
                Err(err) => {
                    tracing::warn!(
                        id = ?booking.id,
                        title = %booking.title,
                        "skipping booking: {err}"
                    );
                    false
                }
            }
        }))
    }

    pub fn validate_schedule(&self, request: &ScheduleRequest) -> Result<(), Error> {
        tracing::debug!(
            date = %request.date,
            interval = %request.interval(),
            bookings = self.bookings.len(),
            "validating schedule"
        );

        match self.conflicts(request)?.next() {
            None => Ok(()),
            Some(booking) => {
                tracing::debug!(
                    id = ?booking.id,
                    title = %booking.title,
                    "schedule conflict"
                );

                Err(Error::ScheduleConflict {
                    id: booking.id,
                    title: booking.title.clone(),
                    date: booking.date,
                    start: booking.start,
                    end: booking.end,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn booking(id: u64, day: u32, start: &str, end: &str) -> Booking {
        Booking {
            id: Some(id),
            title: format!("Event {id}"),
            date: date(day),
            start: start.parse().unwrap(),
            end: end.parse().unwrap(),
            status: EventStatus::Confirmed,
            venue: None,
        }
    }

    fn request(day: u32, start: &str, end: &str) -> ScheduleRequest {
        ScheduleRequest {
            date: date(day),
            start: start.parse().unwrap(),
            end: end.parse().unwrap(),
            id: None,
        }
    }

    fn agenda(bookings: Vec<Booking>) -> Agenda {
        Agenda {
            name: "Test".into(),
            bookings,
        }
    }

    #[test]
    fn free_slot_validates() {
        let agenda = agenda(vec![booking(1, 15, "18:00", "22:00")]);

        assert_eq!(agenda.validate_schedule(&request(15, "12:00", "16:00")), Ok(()));
        assert_eq!(agenda.validate_schedule(&request(15, "22:00", "23:00")), Ok(()));
        assert_eq!(agenda.validate_schedule(&request(16, "18:00", "22:00")), Ok(()));
    }

    #[test]
    fn overlapping_slot_is_rejected() {
        let agenda = agenda(vec![booking(1, 15, "18:00", "22:00")]);

        assert_eq!(
            agenda.validate_schedule(&request(15, "21:00", "23:00")),
            Err(Error::ScheduleConflict {
                id: Some(1),
                title: "Event 1".into(),
                date: date(15),
                start: "18:00".parse().unwrap(),
                end: "22:00".parse().unwrap(),
            })
        );
    }

    #[test]
    fn late_booking_blocks_next_morning() {
        let agenda = agenda(vec![booking(1, 15, "22:00", "02:00")]);

        assert!(agenda.validate_schedule(&request(16, "01:00", "03:00")).is_err());
        assert!(agenda.validate_schedule(&request(16, "02:00", "03:00")).is_ok());
        assert!(agenda.validate_schedule(&request(14, "01:00", "03:00")).is_ok());
    }

    #[test]
    fn late_request_collides_with_next_morning() {
        let agenda = agenda(vec![booking(1, 16, "00:30", "04:00")]);

        assert!(agenda.validate_schedule(&request(15, "21:00", "01:00")).is_err());
        assert!(agenda.validate_schedule(&request(15, "21:00", "00:30")).is_ok());
    }

    #[test]
    fn cancelled_bookings_do_not_block() {
        let mut cancelled = booking(1, 15, "18:00", "22:00");
        cancelled.status = EventStatus::Cancelled;
        let agenda = agenda(vec![cancelled]);

        assert!(agenda.validate_schedule(&request(15, "19:00", "20:00")).is_ok());
    }

    #[test]
    fn moving_a_booking_ignores_itself() {
        let agenda = agenda(vec![
            booking(1, 15, "18:00", "22:00"),
            booking(2, 15, "12:00", "14:00"),
        ]);

        let mut moved = ScheduleRequest::from(&agenda.bookings[0]);
        moved.start = "17:00".parse().unwrap();
        assert!(agenda.validate_schedule(&moved).is_ok());

        moved.start = "13:00".parse().unwrap();
        assert_eq!(
            agenda
                .conflicts(&moved)
                .unwrap()
                .map(|booking| booking.id)
                .collect::<Vec<_>>(),
            vec![Some(2)]
        );
    }

    #[test]
    fn unsaved_bookings_never_match_by_id() {
        let mut unsaved = booking(1, 15, "18:00", "22:00");
        unsaved.id = None;
        let agenda = agenda(vec![unsaved]);

        assert!(agenda.validate_schedule(&request(15, "19:00", "20:00")).is_err());
    }

    #[test]
    fn reports_every_conflict() {
        let agenda = agenda(vec![
            booking(1, 15, "10:00", "12:00"),
            booking(2, 15, "13:00", "15:00"),
            booking(3, 15, "16:00", "18:00"),
        ]);

        let ids = agenda
            .conflicts(&request(15, "11:00", "16:30"))
            .unwrap()
            .map(|booking| booking.id)
            .collect::<Vec<_>>();

        assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn unpinnable_booking_is_skipped() {
        let mut last = booking(1, 15, "22:00", "02:00");
        last.date = NaiveDate::MAX;
        let agenda = agenda(vec![last, booking(2, 15, "18:00", "20:00")]);

        assert!(agenda.validate_schedule(&request(15, "10:00", "11:00")).is_ok());
        assert!(agenda.validate_schedule(&request(15, "19:00", "21:00")).is_err());
    }

    #[test]
    fn unpinnable_request_fails() {
        let agenda = agenda(vec![booking(1, 15, "18:00", "22:00")]);
        let mut late = request(15, "23:00", "01:00");
        late.date = NaiveDate::MAX;

        assert_eq!(
            agenda.validate_schedule(&late),
            Err(Error::DateOutOfRange(NaiveDate::MAX))
        );
    }

    #[test]
    fn booking_hours() {
        assert_eq!(booking(1, 15, "21:00", "01:45").billable_hours(), 5);
    }
}
