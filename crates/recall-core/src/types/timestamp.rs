// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use chrono::DateTime;
use chrono::NaiveDateTime;
use chrono::ParseError;
use chrono::SecondsFormat;
use chrono::TimeDelta;
use chrono::Utc;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

/// Formats accepted for timestamps written without an offset.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

const MILLISECONDS_PER_DAY: f64 = 86_400_000.0;

/// An instant in UTC.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(ts: DateTime<Utc>) -> Self {
        Self(ts)
    }

    #[cfg(feature = "clock")]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }

    /// Parses an RFC 3339 timestamp, converting it to UTC. Text without an
    /// offset is taken to be UTC already.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let s = s.trim();
        let err = match DateTime::parse_from_rfc3339(s) {
            Ok(ts) => return Ok(Self(ts.with_timezone(&Utc))),
            Err(e) => e,
        };
        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Self(naive.and_utc()));
            }
        }
        Err(err)
    }

    /// Fractional days elapsed since `earlier`, floored at zero.
    pub fn days_since(self, earlier: Timestamp) -> f64 {
        let millis = (self.0 - earlier.0).num_milliseconds() as f64;
        (millis / MILLISECONDS_PER_DAY).max(0.0)
    }

    /// Saturates at the latest representable instant.
    pub fn plus_minutes(self, minutes: u32) -> Self {
        self.plus(TimeDelta::minutes(minutes as i64))
    }

    /// Saturates at the latest representable instant.
    pub fn plus_days(self, days: u32) -> Self {
        self.plus(TimeDelta::days(days as i64))
    }

    fn plus(self, delta: TimeDelta) -> Self {
        Self(
            self.0
                .checked_add_signed(delta)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        )
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl FromStr for Timestamp {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timestamp::parse(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        Timestamp::parse(&string).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn noon() -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_parse_rfc3339() {
        assert_eq!(Timestamp::parse("2026-01-15T12:00:00Z").unwrap(), noon());
        assert_eq!(Timestamp::parse("2026-01-15T14:00:00+02:00").unwrap(), noon());
    }

    #[test]
    fn test_parse_without_offset_is_utc() {
        assert_eq!(Timestamp::parse("2026-01-15T12:00:00").unwrap(), noon());
        assert_eq!(Timestamp::parse("2026-01-15 12:00:00").unwrap(), noon());
        assert_eq!(Timestamp::parse(" 2026-01-15T12:00:00.000 ").unwrap(), noon());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(Timestamp::parse("yesterday").is_err());
        assert!(Timestamp::parse("").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(noon().to_string(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn test_days_since() {
        let later = noon().plus_days(10);
        assert_eq!(later.days_since(noon()), 10.0);
        assert_eq!(noon().plus_minutes(720).days_since(noon()), 0.5);
    }

    #[test]
    fn test_days_since_floored_at_zero() {
        let later = noon().plus_days(1);
        assert_eq!(noon().days_since(later), 0.0);
    }

    #[test]
    fn test_plus_saturates() {
        let latest = Timestamp::new(DateTime::<Utc>::MAX_UTC);
        assert_eq!(noon().plus_days(u32::MAX), latest);
        assert_eq!(latest.plus_minutes(1), latest);
        assert_eq!(noon().plus_days(1).days_since(noon()), 1.0);
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&noon()).unwrap();
        assert_eq!(json, "\"2026-01-15T12:00:00Z\"");
        let ts: Timestamp = serde_json::from_str("\"2026-01-15T12:00:00\"").unwrap();
        assert_eq!(ts, noon());
    }
}
