//! "List activities": compiles a filter request, runs it against a
//! repository and shapes the matches into view rows.

use crate::database::{NavigationPath, Repository};
use crate::error::SearchError;
use crate::search::{atoms, CompiledQuery, FilterCompiler, FilterRequest, UseCase};
use anyhow::Result;
use async_trait::async_trait;
use booking_common::{Activity, ActivityOccurrence};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

/// Navigations every listing row needs
pub const LISTING_INCLUDES: &[NavigationPath] =
    &[NavigationPath::Facility, NavigationPath::Educator];

/// Average review score of an activity, 0.0 when it has no reviews
#[async_trait]
pub trait RatingService: Send + Sync {
    async fn average_rating(&self, activity_id: i64) -> Result<f64>;
}

/// Display image of an activity, if any
#[async_trait]
pub trait ImageService: Send + Sync {
    async fn image_url(&self, activity_id: i64) -> Result<Option<String>>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityOccurrenceView {
    pub occurrence_id: i64,
    pub activity_id: i64,
    pub activity_name: String,
    pub activity_type: String,
    pub date_time: DateTime<Utc>,
    pub recommended_age: i64,
    pub is_private: bool,
    pub educator_id: String,
    pub educator_name: Option<String>,
    pub facility_name: Option<String>,
    pub facility_type: Option<String>,
    pub available_places: Option<i64>,
    pub average_rating: f64,
    pub image_url: Option<String>,
    pub is_new: bool,
}

pub struct ActivityListing<R> {
    repository: Arc<R>,
    ratings: Arc<dyn RatingService>,
    images: Arc<dyn ImageService>,
    now: Option<DateTime<Utc>>,
}

impl<R> ActivityListing<R>
where
    R: Repository<ActivityOccurrence>,
{
    pub fn new(
        repository: Arc<R>,
        ratings: Arc<dyn RatingService>,
        images: Arc<dyn ImageService>,
    ) -> Self {
        Self {
            repository,
            ratings,
            images,
            now: None,
        }
    }

    /// Pin the clock used for relative dates instead of reading it per call
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    fn compiler(&self) -> FilterCompiler {
        self.now.map(FilterCompiler::at).unwrap_or_default()
    }

    pub async fn list(
        &self,
        request: &FilterRequest,
        use_case: UseCase,
    ) -> Result<Vec<ActivityOccurrenceView>, SearchError> {
        let compiler = self.compiler();
        let compiled = compiler.compile(request, use_case);

        let mut occurrences = self.execute(&compiled.query).await?;
        occurrences.sort_by(|a, b| a.date_time.cmp(&b.date_time).then(a.id.cmp(&b.id)));

        // Ratings are aggregated from reviews, outside the trees, so the
        // threshold runs on the materialized result.
        let mut ratings = HashMap::new();
        for occurrence in &occurrences {
            if let Entry::Vacant(slot) = ratings.entry(occurrence.activity_id) {
                slot.insert(self.ratings.average_rating(occurrence.activity_id).await?);
            }
        }
        if let Some(min_rating) = compiled.min_rating {
            let before = occurrences.len();
            occurrences
                .retain(|o| ratings.get(&o.activity_id).copied().unwrap_or(0.0) >= min_rating);
            tracing::debug!(
                "Rating threshold {} kept {} of {} occurrences",
                min_rating,
                occurrences.len(),
                before
            );
        }

        let mut novelty = HashMap::new();
        let mut images = HashMap::new();
        let mut views = Vec::with_capacity(occurrences.len());
        for occurrence in occurrences {
            let Some(activity) = occurrence.activity.as_ref() else {
                tracing::warn!(
                    "Occurrence {} returned without its activity, skipping",
                    occurrence.id
                );
                continue;
            };
            if let Entry::Vacant(slot) = novelty.entry(activity.id) {
                slot.insert(self.is_new_at(activity.id, compiler.now()).await?);
            }
            if let Entry::Vacant(slot) = images.entry(activity.id) {
                slot.insert(self.images.image_url(activity.id).await?);
            }
            views.push(project(
                &occurrence,
                activity,
                ratings.get(&activity.id).copied().unwrap_or(0.0),
                images.get(&activity.id).cloned().flatten(),
                novelty.get(&activity.id).copied().unwrap_or(false),
            ));
        }

        tracing::info!("Listed {} {} occurrences", views.len(), use_case);
        Ok(views)
    }

    /// An activity is new when it has exactly one occurrence and that
    /// occurrence has not started yet
    pub async fn is_new(&self, activity_id: i64) -> Result<bool, SearchError> {
        self.is_new_at(activity_id, self.compiler().now()).await
    }

    async fn is_new_at(&self, activity_id: i64, now: DateTime<Utc>) -> Result<bool, SearchError> {
        let occurrences = self
            .repository
            .find_by_specification(&atoms::belongs_to_activity(activity_id), &[])
            .await?;
        Ok(matches!(occurrences.as_slice(), [only] if only.date_time > now))
    }

    async fn execute(&self, query: &CompiledQuery) -> Result<Vec<ActivityOccurrence>> {
        match query {
            CompiledQuery::Unfiltered => self.repository.find_all(LISTING_INCLUDES).await,
            CompiledQuery::Occurrences(spec) => {
                self.repository
                    .find_by_specification(spec, LISTING_INCLUDES)
                    .await
            }
            CompiledQuery::WithActivity {
                occurrences,
                activities,
            } => {
                self.repository
                    .find_by_specification_with_related::<Activity>(
                        occurrences,
                        activities,
                        NavigationPath::Activity,
                        LISTING_INCLUDES,
                    )
                    .await
            }
        }
    }
}

fn project(
    occurrence: &ActivityOccurrence,
    activity: &Activity,
    average_rating: f64,
    image_url: Option<String>,
    is_new: bool,
) -> ActivityOccurrenceView {
    ActivityOccurrenceView {
        occurrence_id: occurrence.id,
        activity_id: activity.id,
        activity_name: activity.name.clone(),
        activity_type: activity.activity_type.clone(),
        date_time: occurrence.date_time,
        recommended_age: activity.recommended_age,
        is_private: activity.is_private,
        educator_id: activity.educator_id.clone(),
        educator_name: activity.educator.as_ref().map(|e| e.full_name.clone()),
        facility_name: activity.facility.as_ref().map(|f| f.name.clone()),
        facility_type: activity.facility.as_ref().map(|f| f.facility_type.clone()),
        available_places: occurrence.available_places(),
        average_rating,
        image_url,
        is_new,
    }
}
