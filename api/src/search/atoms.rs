//! Atomic specifications, one constructor per filter dimension.
//!
//! Each constructor returns a single-condition [`Specification`] that can be
//! evaluated in-process and also carries its SQL form for the joined
//! occurrence query (see [`crate::database::types`] for the aliases).
//! Set-valued filters are built from repeated equality atoms; grouping them
//! is the compiler's job.

use crate::database::types::{
    ACTIVITY_ALIAS as A, FACILITY_ALIAS as F, OCCURRENCE_ALIAS as O, SQL_DATE_FORMAT,
    SQL_DATE_TIME_FORMAT, SQL_TIME_FORMAT,
};
use booking_common::{Activity, ActivityOccurrence, Specification, SqlValue};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};

pub type OccurrenceSpec = Specification<ActivityOccurrence>;
pub type ActivitySpec = Specification<Activity>;

fn sql_date(date: NaiveDate) -> SqlValue {
    SqlValue::String(date.format(SQL_DATE_FORMAT).to_string())
}

fn sql_time(time: NaiveTime) -> SqlValue {
    SqlValue::String(time.format(SQL_TIME_FORMAT).to_string())
}

/// Keeps sub-second precision so string comparison against stored whole
/// seconds orders the same way as comparing instants.
fn sql_instant(instant: DateTime<Utc>) -> SqlValue {
    SqlValue::String(
        instant
            .format(&format!("{}%.f", SQL_DATE_TIME_FORMAT))
            .to_string(),
    )
}

// Occurrence criteria

/// Starts strictly after `instant`
pub fn after(instant: DateTime<Utc>) -> OccurrenceSpec {
    Specification::atomic(format!("dateTime > {}", instant), move |o: &ActivityOccurrence| {
        o.date_time > instant
    })
    .with_sql(format!("{O}.date_time > ?"), vec![sql_instant(instant)])
}

/// Starts strictly before `instant`
pub fn before(instant: DateTime<Utc>) -> OccurrenceSpec {
    Specification::atomic(format!("dateTime < {}", instant), move |o: &ActivityOccurrence| {
        o.date_time < instant
    })
    .with_sql(format!("{O}.date_time < ?"), vec![sql_instant(instant)])
}

pub fn date_more_or_equal(date: NaiveDate) -> OccurrenceSpec {
    Specification::atomic(format!("date >= {}", date), move |o: &ActivityOccurrence| {
        o.date() >= date
    })
    .with_sql(format!("date({O}.date_time) >= ?"), vec![sql_date(date)])
}

pub fn date_less_or_equal(date: NaiveDate) -> OccurrenceSpec {
    Specification::atomic(format!("date <= {}", date), move |o: &ActivityOccurrence| {
        o.date() <= date
    })
    .with_sql(format!("date({O}.date_time) <= ?"), vec![sql_date(date)])
}

pub fn date_equal(date: NaiveDate) -> OccurrenceSpec {
    Specification::atomic(format!("date = {}", date), move |o: &ActivityOccurrence| {
        o.date() == date
    })
    .with_sql(format!("date({O}.date_time) = ?"), vec![sql_date(date)])
}

/// Starts exactly at `instant`, sub-seconds included
pub fn date_time_equal(instant: DateTime<Utc>) -> OccurrenceSpec {
    Specification::atomic(format!("dateTime = {}", instant), move |o: &ActivityOccurrence| {
        o.date_time == instant
    })
    .with_sql(format!("{O}.date_time = ?"), vec![sql_instant(instant)])
}

pub fn time_more_or_equal(time: NaiveTime) -> OccurrenceSpec {
    Specification::atomic(format!("time >= {}", time), move |o: &ActivityOccurrence| {
        o.time() >= time
    })
    .with_sql(format!("time({O}.date_time) >= ?"), vec![sql_time(time)])
}

pub fn time_less_or_equal(time: NaiveTime) -> OccurrenceSpec {
    Specification::atomic(format!("time <= {}", time), move |o: &ActivityOccurrence| {
        o.time() <= time
    })
    .with_sql(format!("time({O}.date_time) <= ?"), vec![sql_time(time)])
}

pub fn time_equal(time: NaiveTime) -> OccurrenceSpec {
    Specification::atomic(format!("time = {}", time), move |o: &ActivityOccurrence| {
        o.time() == time
    })
    .with_sql(format!("time({O}.date_time) = ?"), vec![sql_time(time)])
}

pub fn day_of_week_equal(day: Weekday) -> OccurrenceSpec {
    Specification::atomic(format!("dayOfWeek = {}", day), move |o: &ActivityOccurrence| {
        o.day_of_week() == day
    })
    .with_sql(
        format!("CAST(strftime('%w', {O}.date_time) AS INTEGER) = ?"),
        vec![SqlValue::Integer(i64::from(day.num_days_from_sunday()))],
    )
}

/// Dates within the Monday-start week containing `today`
pub fn this_week(today: NaiveDate) -> OccurrenceSpec {
    let week = today.week(Weekday::Mon);
    let (first, last) = (week.first_day(), week.last_day());
    Specification::atomic(
        format!("date in [{}, {}]", first, last),
        move |o: &ActivityOccurrence| {
            let date = o.date();
            first <= date && date <= last
        },
    )
    .with_sql(
        format!("date({O}.date_time) BETWEEN ? AND ?"),
        vec![sql_date(first), sql_date(last)],
    )
}

/// Facility capacity minus reserved places is at least `requested`.
/// Needs the activity and its facility loaded to match in-process.
pub fn available_capacity_at_least(requested: i64) -> OccurrenceSpec {
    Specification::atomic(
        format!("availablePlaces >= {}", requested),
        move |o: &ActivityOccurrence| {
            o.available_places()
                .is_some_and(|available| available >= requested)
        },
    )
    .with_sql(
        format!("({F}.maximum_capacity - {O}.reserved_places) >= ?"),
        vec![SqlValue::Integer(requested)],
    )
}

pub fn belongs_to_activity(activity_id: i64) -> OccurrenceSpec {
    Specification::atomic(
        format!("activityId = {}", activity_id),
        move |o: &ActivityOccurrence| o.activity_id == activity_id,
    )
    .with_sql(
        format!("{O}.activity_id = ?"),
        vec![SqlValue::Integer(activity_id)],
    )
}

// Activity criteria

/// Recommended age is at least `min_age`
pub fn age_more_or_equal(min_age: i64) -> ActivitySpec {
    Specification::atomic(format!("recommendedAge >= {}", min_age), move |a: &Activity| {
        a.recommended_age >= min_age
    })
    .with_sql(
        format!("{A}.recommended_age >= ?"),
        vec![SqlValue::Integer(min_age)],
    )
}

/// Recommended age is at most `max_age`
pub fn age_less_or_equal(max_age: i64) -> ActivitySpec {
    Specification::atomic(format!("recommendedAge <= {}", max_age), move |a: &Activity| {
        a.recommended_age <= max_age
    })
    .with_sql(
        format!("{A}.recommended_age <= ?"),
        vec![SqlValue::Integer(max_age)],
    )
}

pub fn activity_type_equal(activity_type: &str) -> ActivitySpec {
    let expected = activity_type.to_string();
    Specification::atomic(format!("type = {}", activity_type), move |a: &Activity| {
        a.activity_type == expected
    })
    .with_sql(format!("{A}.activity_type = ?"), vec![activity_type.into()])
}

/// Needs the facility loaded to match in-process
pub fn facility_type_equal(facility_type: &str) -> ActivitySpec {
    let expected = facility_type.to_string();
    Specification::atomic(
        format!("facilityType = {}", facility_type),
        move |a: &Activity| {
            a.facility
                .as_ref()
                .is_some_and(|facility| facility.facility_type == expected)
        },
    )
    .with_sql(format!("{F}.facility_type = ?"), vec![facility_type.into()])
}

pub fn educator_equal(educator_id: &str) -> ActivitySpec {
    let expected = educator_id.to_string();
    Specification::atomic(format!("educator = {}", educator_id), move |a: &Activity| {
        a.educator_id == expected
    })
    .with_sql(format!("{A}.educator_id = ?"), vec![educator_id.into()])
}

pub fn privacy_equal(is_private: bool) -> ActivitySpec {
    Specification::atomic(format!("isPrivate = {}", is_private), move |a: &Activity| {
        a.is_private == is_private
    })
    .with_sql(format!("{A}.is_private = ?"), vec![SqlValue::Bool(is_private)])
}
