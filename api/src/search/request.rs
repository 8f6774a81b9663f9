use booking_common::{DEFAULT_MAX_AGE, DEFAULT_MIN_AGE};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Flat "list activities" request, exactly as received from the transport.
///
/// Every field is optional and kept as raw text. Accessors parse on demand;
/// a value that fails to parse is treated as if it had not been sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, clap::Args)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterRequest {
    /// Lower bound of the date range (RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` or `YYYY-MM-DD`)
    #[arg(long)]
    pub start_date_time: Option<String>,
    /// Upper bound of the date range
    #[arg(long)]
    pub end_date_time: Option<String>,
    /// Lower bound of the time of day (`HH:MM[:SS]`, UTC)
    #[arg(long)]
    pub start_time: Option<String>,
    /// Upper bound of the time of day
    #[arg(long)]
    pub end_time: Option<String>,
    /// Places that must still be free
    #[arg(long)]
    pub capacity: Option<String>,
    #[arg(long)]
    pub min_age: Option<String>,
    #[arg(long)]
    pub max_age: Option<String>,
    /// Comma-separated educator ids
    #[arg(long)]
    pub educators: Option<String>,
    /// Comma-separated activity types
    #[arg(long)]
    pub activity_types: Option<String>,
    /// Comma-separated facility types
    #[arg(long)]
    pub facility_types: Option<String>,
    #[arg(long)]
    pub today: Option<String>,
    #[arg(long)]
    pub tomorrow: Option<String>,
    #[arg(long)]
    pub this_week: Option<String>,
    /// Comma-separated days of week, 0 = Sunday .. 6 = Saturday
    #[arg(long)]
    pub days_of_week: Option<String>,
    #[arg(long)]
    pub is_private: Option<String>,
    /// Minimum average rating
    #[arg(long)]
    pub rating: Option<String>,
}

/// One end of a date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    /// A bare calendar date
    Day(NaiveDate),
    /// A date with a time of day
    Instant(DateTime<Utc>),
}

impl DateBound {
    pub fn date(&self) -> NaiveDate {
        match self {
            DateBound::Day(date) => *date,
            DateBound::Instant(instant) => instant.date_naive(),
        }
    }
}

impl FilterRequest {
    pub fn start_date(&self) -> Option<DateBound> {
        parse_field("startDateTime", self.start_date_time.as_deref(), parse_date_bound)
    }

    pub fn end_date(&self) -> Option<DateBound> {
        parse_field("endDateTime", self.end_date_time.as_deref(), parse_date_bound)
    }

    pub fn start_time(&self) -> Option<NaiveTime> {
        parse_field("startTime", self.start_time.as_deref(), parse_time)
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        parse_field("endTime", self.end_time.as_deref(), parse_time)
    }

    pub fn capacity(&self) -> Option<i64> {
        parse_field("capacity", self.capacity.as_deref(), parse_count)
    }

    /// Lower age bound. The default counts as unset on its own, whatever
    /// the upper bound holds.
    pub fn min_age(&self) -> Option<i64> {
        parse_field("minAge", self.min_age.as_deref(), parse_count)
            .filter(|age| *age != DEFAULT_MIN_AGE)
    }

    /// Upper age bound. The default counts as unset on its own, whatever
    /// the lower bound holds.
    pub fn max_age(&self) -> Option<i64> {
        parse_field("maxAge", self.max_age.as_deref(), parse_count)
            .filter(|age| *age != DEFAULT_MAX_AGE)
    }

    pub fn educators(&self) -> Vec<String> {
        split_list(self.educators.as_deref())
    }

    pub fn activity_types(&self) -> Vec<String> {
        split_list(self.activity_types.as_deref())
    }

    pub fn facility_types(&self) -> Vec<String> {
        split_list(self.facility_types.as_deref())
    }

    pub fn today(&self) -> bool {
        parse_field("today", self.today.as_deref(), parse_bool).unwrap_or(false)
    }

    pub fn tomorrow(&self) -> bool {
        parse_field("tomorrow", self.tomorrow.as_deref(), parse_bool).unwrap_or(false)
    }

    pub fn this_week(&self) -> bool {
        parse_field("thisWeek", self.this_week.as_deref(), parse_bool).unwrap_or(false)
    }

    pub fn days_of_week(&self) -> Vec<Weekday> {
        split_list(self.days_of_week.as_deref())
            .iter()
            .filter_map(|day| {
                let parsed = day.parse::<u8>().ok().and_then(weekday_from_sunday);
                if parsed.is_none() {
                    tracing::debug!("Ignoring unparseable day of week: {}", day);
                }
                parsed
            })
            .collect()
    }

    pub fn is_private(&self) -> Option<bool> {
        parse_field("isPrivate", self.is_private.as_deref(), parse_bool)
    }

    pub fn min_rating(&self) -> Option<f64> {
        parse_field("rating", self.rating.as_deref(), |v| {
            v.parse::<f64>().ok().filter(|r| r.is_finite())
        })
    }

    /// True when any constraint on the occurrence itself survives parsing
    pub fn has_occurrence_filters(&self) -> bool {
        self.start_date().is_some()
            || self.end_date().is_some()
            || self.start_time().is_some()
            || self.end_time().is_some()
            || self.capacity().is_some()
            || self.today()
            || self.tomorrow()
            || self.this_week()
            || !self.days_of_week().is_empty()
    }

    /// True when any constraint on the activity template survives parsing
    pub fn has_activity_filters(&self) -> bool {
        self.min_age().is_some()
            || self.max_age().is_some()
            || self.is_private().is_some()
            || !self.activity_types().is_empty()
            || !self.facility_types().is_empty()
            || !self.educators().is_empty()
    }
}

fn parse_field<T>(name: &str, raw: Option<&str>, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = parse(raw);
    if parsed.is_none() {
        tracing::debug!("Ignoring malformed {} value: {}", name, raw);
    }
    parsed
}

fn parse_date_bound(value: &str) -> Option<DateBound> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(DateBound::Instant(instant.with_timezone(&Utc)));
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(DateBound::Instant(naive.and_utc()));
        }
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .map(DateBound::Day)
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
}

fn parse_count(value: &str) -> Option<i64> {
    value.parse::<i64>().ok().filter(|n| *n >= 0)
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// 0 = Sunday .. 6 = Saturday
fn weekday_from_sunday(day: u8) -> Option<Weekday> {
    match day {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}
