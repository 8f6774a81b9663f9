use anyhow::Result;
use async_trait::async_trait;
use booking_common::{Activity, ActivityOccurrence, Educator, Facility, Specification};
use std::fmt;
use std::str::FromStr;

/// Route from an entity to a related one, used both to eagerly load
/// navigation properties and to scope a specification on the related entity.
///
/// Paths are named from the occurrence side. Starting from an occurrence,
/// `Facility` and `Educator` are reached through the activity and imply it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationPath {
    Activity,
    Facility,
    Educator,
}

impl NavigationPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationPath::Activity => "activity",
            NavigationPath::Facility => "activity.facility",
            NavigationPath::Educator => "activity.educator",
        }
    }
}

impl fmt::Display for NavigationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NavigationPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "activity" => Ok(NavigationPath::Activity),
            "activity.facility" | "facility" => Ok(NavigationPath::Facility),
            "activity.educator" | "educator" => Ok(NavigationPath::Educator),
            _ => Err(format!("Unknown navigation path: {}", s)),
        }
    }
}

/// Navigation properties to keep populated on returned entities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Includes {
    pub activity: bool,
    pub facility: bool,
    pub educator: bool,
}

impl Includes {
    pub fn from_paths(paths: &[NavigationPath]) -> Self {
        let mut includes = Includes::default();
        for path in paths {
            match path {
                NavigationPath::Activity => includes.activity = true,
                NavigationPath::Facility => {
                    includes.activity = true;
                    includes.facility = true;
                }
                NavigationPath::Educator => {
                    includes.activity = true;
                    includes.educator = true;
                }
            }
        }
        includes
    }

    /// Drop every loaded navigation that was not asked for
    pub fn strip_occurrence(&self, occurrence: &mut ActivityOccurrence) {
        if !self.activity {
            occurrence.activity = None;
        } else if let Some(activity) = occurrence.activity.as_mut() {
            self.strip_activity(activity);
        }
    }

    pub fn strip_activity(&self, activity: &mut Activity) {
        if !self.facility {
            activity.facility = None;
        }
        if !self.educator {
            activity.educator = None;
        }
    }
}

/// Access to a related entity along a navigation path
pub trait Related<R> {
    /// Whether `path` leads to an `R` at all
    fn reaches(path: NavigationPath) -> bool;

    fn related(&self, path: NavigationPath) -> Option<&R>;
}

impl Related<Activity> for ActivityOccurrence {
    fn reaches(path: NavigationPath) -> bool {
        path == NavigationPath::Activity
    }

    fn related(&self, path: NavigationPath) -> Option<&Activity> {
        match path {
            NavigationPath::Activity => self.activity.as_ref(),
            _ => None,
        }
    }
}

impl Related<Facility> for ActivityOccurrence {
    fn reaches(path: NavigationPath) -> bool {
        path == NavigationPath::Facility
    }

    fn related(&self, path: NavigationPath) -> Option<&Facility> {
        match path {
            NavigationPath::Facility => self.activity.as_ref()?.facility.as_ref(),
            _ => None,
        }
    }
}

impl Related<Educator> for ActivityOccurrence {
    fn reaches(path: NavigationPath) -> bool {
        path == NavigationPath::Educator
    }

    fn related(&self, path: NavigationPath) -> Option<&Educator> {
        match path {
            NavigationPath::Educator => self.activity.as_ref()?.educator.as_ref(),
            _ => None,
        }
    }
}

impl Related<Facility> for Activity {
    fn reaches(path: NavigationPath) -> bool {
        path == NavigationPath::Facility
    }

    fn related(&self, path: NavigationPath) -> Option<&Facility> {
        match path {
            NavigationPath::Facility => self.facility.as_ref(),
            _ => None,
        }
    }
}

impl Related<Educator> for Activity {
    fn reaches(path: NavigationPath) -> bool {
        path == NavigationPath::Educator
    }

    fn related(&self, path: NavigationPath) -> Option<&Educator> {
        match path {
            NavigationPath::Educator => self.educator.as_ref(),
            _ => None,
        }
    }
}

/// Read-only query access to a collection of `T`.
///
/// Specifications are evaluated against fully related entities whatever
/// `includes` says; `includes` only controls which navigation properties
/// stay populated on the returned entities. Store failures are returned
/// as is.
#[async_trait]
pub trait Repository<T: Send + Sync + 'static>: Send + Sync {
    async fn find_by_specification(
        &self,
        spec: &Specification<T>,
        includes: &[NavigationPath],
    ) -> Result<Vec<T>>;

    /// Like [`Repository::find_by_specification`], additionally requiring
    /// the entity reached through `path_to_related` to satisfy
    /// `related_spec`. Entities without that related entity never match.
    async fn find_by_specification_with_related<R>(
        &self,
        spec: &Specification<T>,
        related_spec: &Specification<R>,
        path_to_related: NavigationPath,
        includes: &[NavigationPath],
    ) -> Result<Vec<T>>
    where
        T: Related<R>,
        R: Send + Sync + 'static;

    async fn find_all(&self, includes: &[NavigationPath]) -> Result<Vec<T>>;
}
