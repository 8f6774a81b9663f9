use super::atoms::{self, ActivitySpec, OccurrenceSpec};
use super::request::{DateBound, FilterRequest};
use crate::error::SearchError;
use booking_common::Specification;
use chrono::{DateTime, NaiveTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Which listing is being served. Selects the base predicate every
/// compiled occurrence filter starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseCase {
    /// Occurrences that have not started yet
    Upcoming,
    /// Occurrences that already started
    Past,
    /// No time restriction
    All,
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UseCase::Upcoming => write!(f, "upcoming"),
            UseCase::Past => write!(f, "past"),
            UseCase::All => write!(f, "all"),
        }
    }
}

impl FromStr for UseCase {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upcoming" => Ok(UseCase::Upcoming),
            "past" => Ok(UseCase::Past),
            "all" => Ok(UseCase::All),
            _ => Err(SearchError::InvalidUseCase(s.to_string())),
        }
    }
}

/// Specification trees produced for one request, split per entity
#[derive(Debug, Clone)]
pub enum CompiledQuery {
    /// Nothing to filter on: fetch everything
    Unfiltered,
    /// Only the occurrence itself is constrained
    Occurrences(OccurrenceSpec),
    /// The activity reached from each occurrence is constrained too
    WithActivity {
        occurrences: OccurrenceSpec,
        activities: ActivitySpec,
    },
}

#[derive(Debug, Clone)]
pub struct CompiledFilter {
    pub query: CompiledQuery,
    /// Applied after the store returns, against each activity's average
    /// rating. Not part of the specification trees.
    pub min_rating: Option<f64>,
}

/// Turns a flat [`FilterRequest`] into specification trees.
///
/// Independent dimensions are ANDed together. Alternatives within a
/// dimension (a list of types, several days) are ORed into one group that
/// is then ANDed in once. Relative dates ("today", "this week", the base
/// predicate) are resolved against the compiler's clock.
#[derive(Debug, Clone, Copy)]
pub struct FilterCompiler {
    now: DateTime<Utc>,
}

impl Default for FilterCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterCompiler {
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn compile(&self, request: &FilterRequest, use_case: UseCase) -> CompiledFilter {
        let base = self.base_specification(use_case);

        let occurrences = if request.has_occurrence_filters() {
            self.compile_occurrence_filters(request, base)
        } else {
            tracing::debug!("No occurrence filters for {} listing, using base predicate", use_case);
            base
        };

        let activities = if request.has_activity_filters() {
            compile_activity_filters(request)
        } else {
            tracing::debug!("No activity filters for {} listing", use_case);
            None
        };

        let query = match (occurrences, activities) {
            (None, None) => CompiledQuery::Unfiltered,
            (Some(occurrences), None) => CompiledQuery::Occurrences(occurrences),
            (occurrences, Some(activities)) => CompiledQuery::WithActivity {
                occurrences: occurrences.unwrap_or_else(Specification::always),
                activities,
            },
        };

        match &query {
            CompiledQuery::Unfiltered => tracing::debug!("Compiled {} listing: unfiltered", use_case),
            CompiledQuery::Occurrences(spec) => {
                tracing::debug!("Compiled {} listing: occurrences {}", use_case, spec)
            }
            CompiledQuery::WithActivity {
                occurrences,
                activities,
            } => tracing::debug!(
                "Compiled {} listing: occurrences {} with activity {}",
                use_case,
                occurrences,
                activities
            ),
        }

        CompiledFilter {
            query,
            min_rating: request.min_rating(),
        }
    }

    fn base_specification(&self, use_case: UseCase) -> Option<OccurrenceSpec> {
        match use_case {
            UseCase::Upcoming => Some(atoms::after(self.now)),
            UseCase::Past => Some(atoms::before(self.now)),
            UseCase::All => None,
        }
    }

    fn compile_occurrence_filters(
        &self,
        request: &FilterRequest,
        base: Option<OccurrenceSpec>,
    ) -> Option<OccurrenceSpec> {
        let mut spec = base;

        if let Some(range) = date_range(request.start_date(), request.end_date()) {
            spec = Specification::fold_and(spec, range);
        }
        if let Some(range) = time_range(request.start_time(), request.end_time()) {
            spec = Specification::fold_and(spec, range);
        }
        if let Some(capacity) = request.capacity() {
            spec = Specification::fold_and(spec, atoms::available_capacity_at_least(capacity));
        }

        // Today, tomorrow, this week and explicit weekdays are alternative
        // ways of naming dates and share one OR group.
        let today = self.now.date_naive();
        let mut days: Option<OccurrenceSpec> = None;
        if request.today() {
            days = Specification::fold_or(days, atoms::date_equal(today));
        }
        if request.tomorrow() {
            if let Some(tomorrow) = today.succ_opt() {
                days = Specification::fold_or(days, atoms::date_equal(tomorrow));
            }
        }
        if request.this_week() {
            days = Specification::fold_or(days, atoms::this_week(today));
        }
        for day in request.days_of_week() {
            days = Specification::fold_or(days, atoms::day_of_week_equal(day));
        }
        if let Some(days) = days {
            spec = Specification::fold_and(spec, days);
        }

        spec
    }
}

fn compile_activity_filters(request: &FilterRequest) -> Option<ActivitySpec> {
    let mut spec: Option<ActivitySpec> = None;

    if let Some(min_age) = request.min_age() {
        spec = Specification::fold_and(spec, atoms::age_more_or_equal(min_age));
    }
    if let Some(max_age) = request.max_age() {
        spec = Specification::fold_and(spec, atoms::age_less_or_equal(max_age));
    }
    if let Some(is_private) = request.is_private() {
        spec = Specification::fold_and(spec, atoms::privacy_equal(is_private));
    }

    let groups = [
        any_of(&request.activity_types(), atoms::activity_type_equal),
        any_of(&request.facility_types(), atoms::facility_type_equal),
        any_of(&request.educators(), atoms::educator_equal),
    ];
    for group in groups.into_iter().flatten() {
        spec = Specification::fold_and(spec, group);
    }

    spec
}

/// OR of one equality atom per value, `None` for an empty list
fn any_of(values: &[String], atom: fn(&str) -> ActivitySpec) -> Option<ActivitySpec> {
    values
        .iter()
        .fold(None, |acc, value| Specification::fold_or(acc, atom(value)))
}

/// Equal ends collapse to a single equality; otherwise each present end
/// bounds the calendar date.
fn date_range(start: Option<DateBound>, end: Option<DateBound>) -> Option<OccurrenceSpec> {
    match (start, end) {
        (Some(start), Some(end)) if start == end => Some(match start {
            DateBound::Day(date) => atoms::date_equal(date),
            DateBound::Instant(instant) => atoms::date_time_equal(instant),
        }),
        (start, end) => {
            let mut spec = None;
            if let Some(start) = start {
                spec = Specification::fold_and(spec, atoms::date_more_or_equal(start.date()));
            }
            if let Some(end) = end {
                spec = Specification::fold_and(spec, atoms::date_less_or_equal(end.date()));
            }
            spec
        }
    }
}

fn time_range(start: Option<NaiveTime>, end: Option<NaiveTime>) -> Option<OccurrenceSpec> {
    match (start, end) {
        (Some(start), Some(end)) if start == end => Some(atoms::time_equal(start)),
        (start, end) => {
            let mut spec = None;
            if let Some(start) = start {
                spec = Specification::fold_and(spec, atoms::time_more_or_equal(start));
            }
            if let Some(end) = end {
                spec = Specification::fold_and(spec, atoms::time_less_or_equal(end));
            }
            spec
        }
    }
}
