#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{Error, Interval};

/// Price of an event billed by the hour. Amounts are in minor currency
/// units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Quote {
    pub hours: u32,
    pub hourly_rate: u64,
    pub total: u64,
    pub deposit: u64,
    pub remaining: u64,
}

impl Quote {
    pub fn new(interval: Interval, hourly_rate: u64, deposit: u64) -> Result<Self, Error> {
        let hours = interval.billable_hours();
        let total = hourly_rate
            .checked_mul(u64::from(hours))
            .ok_or(Error::AmountOverflow)?;

        let remaining = total
            .checked_sub(deposit)
            .ok_or(Error::DepositExceedsTotal { deposit, total })?;

        Ok(Self {
            hours,
            hourly_rate,
            total,
            deposit,
            remaining,
        })
    }
}

pub fn format_duration(hours: u32) -> String {
    if hours == 1 {
        return "1 hora".to_string();
    }

    format!("{hours} horas")
}
