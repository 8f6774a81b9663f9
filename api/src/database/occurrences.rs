use super::repository::{Includes, NavigationPath, Related, Repository};
use super::types::{Database, SQL_DATE_TIME_FORMAT};
use anyhow::{Context, Result};
use async_trait::async_trait;
use booking_common::{
    Activity, ActivityOccurrence, Educator, Facility, Specification, SqlCondition, SqlValue,
};
use chrono::NaiveDateTime;

/// Occurrences joined with everything the filters can reach. Column
/// qualifiers match `types::{OCCURRENCE_ALIAS, ACTIVITY_ALIAS, FACILITY_ALIAS}`.
const OCCURRENCE_QUERY: &str = r#"SELECT o.id, o.activity_id, o.date_time, o.reserved_places,
       a.name AS activity_name, a.activity_type, a.recommended_age, a.is_private,
       a.educator_id, a.facility_id,
       f.name AS facility_name, f.facility_type, f.maximum_capacity,
       e.full_name AS educator_name
FROM activity_occurrences o
JOIN activities a ON a.id = o.activity_id
JOIN facilities f ON f.id = a.facility_id
LEFT JOIN educators e ON e.id = a.educator_id"#;

#[derive(Debug, sqlx::FromRow)]
struct OccurrenceRow {
    id: i64,
    activity_id: i64,
    date_time: String,
    reserved_places: i64,
    activity_name: String,
    activity_type: String,
    recommended_age: i64,
    is_private: bool,
    educator_id: String,
    facility_id: i64,
    facility_name: String,
    facility_type: String,
    maximum_capacity: i64,
    educator_name: Option<String>,
}

impl OccurrenceRow {
    fn into_occurrence(self) -> Result<ActivityOccurrence> {
        let date_time = NaiveDateTime::parse_from_str(&self.date_time, SQL_DATE_TIME_FORMAT)
            .with_context(|| {
                format!(
                    "Invalid date_time '{}' for occurrence {}",
                    self.date_time, self.id
                )
            })?
            .and_utc();
        let educator = self.educator_name.map(|full_name| Educator {
            id: self.educator_id.clone(),
            full_name,
        });
        Ok(ActivityOccurrence {
            id: self.id,
            activity_id: self.activity_id,
            date_time,
            reserved_places: self.reserved_places,
            activity: Some(Activity {
                id: self.activity_id,
                name: self.activity_name,
                activity_type: self.activity_type,
                recommended_age: self.recommended_age,
                is_private: self.is_private,
                educator_id: self.educator_id,
                facility_id: self.facility_id,
                facility: Some(Facility {
                    id: self.facility_id,
                    name: self.facility_name,
                    facility_type: self.facility_type,
                    maximum_capacity: self.maximum_capacity,
                }),
                educator,
            }),
        })
    }
}

impl Database {
    /// Run the joined occurrence query, optionally restricted by a lowered
    /// specification
    async fn fetch_occurrences(
        &self,
        condition: Option<&SqlCondition>,
    ) -> Result<Vec<ActivityOccurrence>> {
        let mut query = String::from(OCCURRENCE_QUERY);
        if let Some(condition) = condition {
            query.push_str(" WHERE ");
            query.push_str(&condition.clause);
        }
        query.push_str(" ORDER BY o.date_time ASC, o.id ASC");

        let mut query_builder = sqlx::query_as::<_, OccurrenceRow>(&query);
        if let Some(condition) = condition {
            for value in &condition.binds {
                query_builder = match value {
                    SqlValue::String(s) => query_builder.bind(s.clone()),
                    SqlValue::Integer(i) => query_builder.bind(*i),
                    SqlValue::Float(f) => query_builder.bind(*f),
                    SqlValue::Bool(b) => query_builder.bind(*b),
                };
            }
        }

        let rows = query_builder.fetch_all(&self.pool).await?;
        rows.into_iter().map(OccurrenceRow::into_occurrence).collect()
    }
}

fn strip_all(
    mut occurrences: Vec<ActivityOccurrence>,
    includes: &[NavigationPath],
) -> Vec<ActivityOccurrence> {
    let includes = Includes::from_paths(includes);
    for occurrence in &mut occurrences {
        includes.strip_occurrence(occurrence);
    }
    occurrences
}

#[async_trait]
impl Repository<ActivityOccurrence> for Database {
    async fn find_by_specification(
        &self,
        spec: &Specification<ActivityOccurrence>,
        includes: &[NavigationPath],
    ) -> Result<Vec<ActivityOccurrence>> {
        let occurrences = match spec.to_sql() {
            Some(condition) => {
                tracing::debug!("Filtering occurrences in SQL: {}", condition.clause);
                self.fetch_occurrences(Some(&condition)).await?
            }
            None => {
                tracing::debug!("Filtering occurrences in memory: {}", spec);
                self.fetch_occurrences(None)
                    .await?
                    .into_iter()
                    .filter(|o| spec.is_satisfied_by(o))
                    .collect()
            }
        };
        Ok(strip_all(occurrences, includes))
    }

    async fn find_by_specification_with_related<R>(
        &self,
        spec: &Specification<ActivityOccurrence>,
        related_spec: &Specification<R>,
        path_to_related: NavigationPath,
        includes: &[NavigationPath],
    ) -> Result<Vec<ActivityOccurrence>>
    where
        ActivityOccurrence: Related<R>,
        R: Send + Sync + 'static,
    {
        if !<ActivityOccurrence as Related<R>>::reaches(path_to_related) {
            tracing::debug!(
                "Navigation {} does not lead to the related entity, nothing matches",
                path_to_related
            );
            return Ok(Vec::new());
        }

        // The joined query already reaches every navigation target, so both
        // trees can share one WHERE clause.
        let lowered = spec
            .to_sql()
            .zip(related_spec.to_sql())
            .map(|(own, related)| own.and(related));
        let occurrences = match lowered {
            Some(condition) => {
                tracing::debug!(
                    "Filtering occurrences with {} in SQL: {}",
                    path_to_related,
                    condition.clause
                );
                self.fetch_occurrences(Some(&condition)).await?
            }
            None => {
                tracing::debug!(
                    "Filtering occurrences in memory: {} with {} {}",
                    spec,
                    path_to_related,
                    related_spec
                );
                self.fetch_occurrences(None)
                    .await?
                    .into_iter()
                    .filter(|o| {
                        spec.is_satisfied_by(o)
                            && <ActivityOccurrence as Related<R>>::related(o, path_to_related)
                                .is_some_and(|related| related_spec.is_satisfied_by(related))
                    })
                    .collect()
            }
        };
        Ok(strip_all(occurrences, includes))
    }

    async fn find_all(&self, includes: &[NavigationPath]) -> Result<Vec<ActivityOccurrence>> {
        let occurrences = self.fetch_occurrences(None).await?;
        Ok(strip_all(occurrences, includes))
    }
}
