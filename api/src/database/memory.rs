use super::repository::{Includes, NavigationPath, Related, Repository};
use crate::listing::{ImageService, RatingService};
use anyhow::Result;
use async_trait::async_trait;
use booking_common::{Activity, ActivityOccurrence, Educator, Facility, Review, Specification};

/// Reference store holding the whole entity graph in memory.
///
/// Entities are kept with their navigation properties unset and are
/// related by id when queried.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    facilities: Vec<Facility>,
    educators: Vec<Educator>,
    activities: Vec<Activity>,
    occurrences: Vec<ActivityOccurrence>,
    reviews: Vec<Review>,
    images: Vec<(i64, String)>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_facility(&mut self, facility: Facility) {
        self.facilities.push(facility);
    }

    pub fn add_educator(&mut self, educator: Educator) {
        self.educators.push(educator);
    }

    pub fn add_activity(&mut self, activity: Activity) {
        self.activities.push(activity);
    }

    pub fn add_occurrence(&mut self, occurrence: ActivityOccurrence) {
        self.occurrences.push(occurrence);
    }

    pub fn add_review(&mut self, review: Review) {
        self.reviews.push(review);
    }

    pub fn add_image(&mut self, activity_id: i64, url: impl Into<String>) {
        self.images.push((activity_id, url.into()));
    }

    fn load_activity(&self, activity: &Activity) -> Activity {
        let mut loaded = activity.clone();
        loaded.facility = self
            .facilities
            .iter()
            .find(|f| f.id == activity.facility_id)
            .cloned();
        loaded.educator = self
            .educators
            .iter()
            .find(|e| e.id == activity.educator_id)
            .cloned();
        loaded
    }

    fn load_occurrence(&self, occurrence: &ActivityOccurrence) -> ActivityOccurrence {
        let mut loaded = occurrence.clone();
        loaded.activity = self
            .activities
            .iter()
            .find(|a| a.id == occurrence.activity_id)
            .map(|a| self.load_activity(a));
        loaded
    }

    fn occurrences_where(
        &self,
        keep: impl Fn(&ActivityOccurrence) -> bool,
        includes: &[NavigationPath],
    ) -> Vec<ActivityOccurrence> {
        let includes = Includes::from_paths(includes);
        self.occurrences
            .iter()
            .map(|o| self.load_occurrence(o))
            .filter(|o| keep(o))
            .map(|mut o| {
                includes.strip_occurrence(&mut o);
                o
            })
            .collect()
    }

    fn activities_where(
        &self,
        keep: impl Fn(&Activity) -> bool,
        includes: &[NavigationPath],
    ) -> Vec<Activity> {
        let includes = Includes::from_paths(includes);
        self.activities
            .iter()
            .map(|a| self.load_activity(a))
            .filter(|a| keep(a))
            .map(|mut a| {
                includes.strip_activity(&mut a);
                a
            })
            .collect()
    }
}

#[async_trait]
impl Repository<ActivityOccurrence> for InMemoryRepository {
    async fn find_by_specification(
        &self,
        spec: &Specification<ActivityOccurrence>,
        includes: &[NavigationPath],
    ) -> Result<Vec<ActivityOccurrence>> {
        Ok(self.occurrences_where(|o| spec.is_satisfied_by(o), includes))
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
        Ok(self.occurrences_where(
            |o| {
                spec.is_satisfied_by(o)
                    && <ActivityOccurrence as Related<R>>::related(o, path_to_related)
                        .is_some_and(|related| related_spec.is_satisfied_by(related))
            },
            includes,
        ))
    }

    async fn find_all(&self, includes: &[NavigationPath]) -> Result<Vec<ActivityOccurrence>> {
        Ok(self.occurrences_where(|_| true, includes))
    }
}

#[async_trait]
impl Repository<Activity> for InMemoryRepository {
    async fn find_by_specification(
        &self,
        spec: &Specification<Activity>,
        includes: &[NavigationPath],
    ) -> Result<Vec<Activity>> {
        Ok(self.activities_where(|a| spec.is_satisfied_by(a), includes))
    }

    async fn find_by_specification_with_related<R>(
        &self,
        spec: &Specification<Activity>,
        related_spec: &Specification<R>,
        path_to_related: NavigationPath,
        includes: &[NavigationPath],
    ) -> Result<Vec<Activity>>
    where
        Activity: Related<R>,
        R: Send + Sync + 'static,
    {
        Ok(self.activities_where(
            |a| {
                spec.is_satisfied_by(a)
                    && <Activity as Related<R>>::related(a, path_to_related)
                        .is_some_and(|related| related_spec.is_satisfied_by(related))
            },
            includes,
        ))
    }

    async fn find_all(&self, includes: &[NavigationPath]) -> Result<Vec<Activity>> {
        Ok(self.activities_where(|_| true, includes))
    }
}

#[async_trait]
impl RatingService for InMemoryRepository {
    async fn average_rating(&self, activity_id: i64) -> Result<f64> {
        let ratings: Vec<i64> = self
            .reviews
            .iter()
            .filter(|r| r.activity_id == activity_id)
            .map(|r| r.rating)
            .collect();
        if ratings.is_empty() {
            return Ok(0.0);
        }
        Ok(ratings.iter().sum::<i64>() as f64 / ratings.len() as f64)
    }
}

#[async_trait]
impl ImageService for InMemoryRepository {
    async fn image_url(&self, activity_id: i64) -> Result<Option<String>> {
        Ok(self
            .images
            .iter()
            .find(|(id, _)| *id == activity_id)
            .map(|(_, url)| url.clone()))
    }
}
