use std::fmt;
use std::sync::Mutex;

use chrono::{Duration, Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Format used for every timestamp stored in an account document
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%y %H:%M";
pub const DATE_FORMAT: &str = "%d-%m-%y";
pub const TIME_FORMAT: &str = "%H:%M";

/// A minute-precision server timestamp, rendered as `dd-mm-yy HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn new(at: NaiveDateTime) -> Self {
        let truncated = at
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(at);
        Timestamp(truncated)
    }

    pub fn parse(raw: &str) -> Result<Self, chrono::ParseError> {
        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map(Timestamp)
    }

    pub fn plus_days(&self, days: i64) -> Self {
        Timestamp(self.0 + Duration::days(days))
    }

    /// The `dd-mm-yy` component
    pub fn date_part(&self) -> String {
        self.0.format(DATE_FORMAT).to_string()
    }

    /// The `HH:MM` component
    pub fn time_part(&self) -> String {
        self.0.format(TIME_FORMAT).to_string()
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Source of the current server time
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Local wall clock of the server
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(Local::now().naive_local())
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(*self.now.lock().unwrap_or_else(|e| e.into_inner()))
    }
}
