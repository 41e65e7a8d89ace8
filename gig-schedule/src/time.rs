use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};

#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

/// A wall-clock time with minute precision and no date or timezone.
///
/// Parsed from zero-padded 24-hour `HH:MM`. The `HH:MM:SS` form some
/// backends emit is accepted too, with the seconds dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    pub fn minute(self) -> u32 {
        self.0.minute()
    }
}

impl From<TimeOfDay> for NaiveTime {
    fn from(time: TimeOfDay) -> Self {
        time.0
    }
}

impl FromStr for TimeOfDay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hm(s)
            .map(Self)
            .ok_or_else(|| Error::InvalidTimeFormat(s.to_string()))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

fn parse_hm(s: &str) -> Option<NaiveTime> {
    let bytes = s.as_bytes();

    let second = match bytes.len() {
        5 => 0,
        8 if bytes[5] == b':' => two_digits(&bytes[6..8])?,
        _ => return None,
    };

    if bytes[2] != b':' || second > 59 {
        return None;
    }

    let hour = two_digits(&bytes[0..2])?;
    let minute = two_digits(&bytes[3..5])?;

    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn two_digits(pair: &[u8]) -> Option<u32> {
    match *pair {
        [tens @ b'0'..=b'9', ones @ b'0'..=b'9'] => {
            Some(u32::from(tens - b'0') * 10 + u32::from(ones - b'0'))
        }
        _ => None,
    }
}

#[cfg(feature = "serde")]
impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn parses_zero_padded_times() {
        assert_eq!(time("00:00"), TimeOfDay::from_hm(0, 0).unwrap());
        assert_eq!(time("09:05"), TimeOfDay::from_hm(9, 5).unwrap());
        assert_eq!(time("23:59"), TimeOfDay::from_hm(23, 59).unwrap());
    }

    #[test]
    fn drops_seconds() {
        assert_eq!(time("18:30:00"), time("18:30"));
        assert_eq!(time("18:30:59"), time("18:30"));
        assert_eq!(time("18:30:59").to_string(), "18:30");
    }

    #[test]
    fn rejects_malformed_input() {
        for raw in [
            "", "9:00", "09:0", "0900", "24:00", "12:60", "ab:cd", "12-30", " 12:30", "12:30 ",
            "12:30:60", "12:30:0", "12:30-00", "１２:３０",
        ] {
            assert_eq!(
                raw.parse::<TimeOfDay>(),
                Err(Error::InvalidTimeFormat(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn orders_by_clock() {
        assert!(time("08:00") < time("20:00"));
        assert!(time("23:59") > time("00:00"));
    }

    #[test]
    fn displays_as_hh_mm() {
        assert_eq!(time("07:03").to_string(), "07:03");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_hh_mm_strings() {
        let parsed: TimeOfDay = serde_json::from_str("\"21:15:00\"").unwrap();
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"21:15\"");
        assert!(serde_json::from_str::<TimeOfDay>("\"25:00\"").is_err());
    }
}
