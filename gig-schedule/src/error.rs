use chrono::NaiveDate;
use thiserror::Error;

use crate::TimeOfDay;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid time `{0}`, expected HH:MM")]
    InvalidTimeFormat(String),

    #[error("{0} has no following day")]
    DateOutOfRange(NaiveDate),

    #[error("schedule conflict with `{title}` on {date} ({start}-{end})")]
    ScheduleConflict {
        id: Option<u64>,
        title: String,
        date: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
    },

    #[error("deposit of {deposit} exceeds total of {total}")]
    DepositExceedsTotal { deposit: u64, total: u64 },

    #[error("amount overflow")]
    AmountOverflow,
}
