//! Scheduling math for event contracts: billable durations, midnight
//! crossing and time-conflict detection over wall-clock intervals.

mod billing;
mod booking;
mod error;
mod interval;
mod time;

#[cfg(feature = "ics")]
mod ics;

pub use billing::{format_duration, Quote};
pub use booking::{Agenda, Booking, EventStatus, ScheduleRequest};
pub use error::Error;
pub use interval::{compute_duration_hours, intervals_overlap, Interval, Span};
pub use time::TimeOfDay;
