use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// A place activities are held in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: i64,
    pub name: String,
    pub facility_type: String,
    pub maximum_capacity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Educator {
    pub id: String,
    pub full_name: String,
}

/// Activity template: what is offered, for whom and where
///
/// `facility` and `educator` are navigation properties. They are only
/// populated when the repository was asked to eagerly load them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub name: String,
    pub activity_type: String,
    pub recommended_age: i64,
    pub is_private: bool,
    pub educator_id: String,
    pub facility_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility: Option<Facility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub educator: Option<Educator>,
}

/// A dated occurrence of an activity, the unit that gets reserved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityOccurrence {
    pub id: i64,
    pub activity_id: i64,
    /// Start of the occurrence, always UTC
    pub date_time: DateTime<Utc>,
    pub reserved_places: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<Activity>,
}

impl ActivityOccurrence {
    pub fn date(&self) -> NaiveDate {
        self.date_time.date_naive()
    }

    pub fn time(&self) -> NaiveTime {
        self.date_time.time()
    }

    pub fn day_of_week(&self) -> Weekday {
        self.date_time.weekday()
    }

    /// Places still free, computed from the facility reached through the
    /// activity. `None` when that navigation is not loaded.
    pub fn available_places(&self) -> Option<i64> {
        let facility = self.activity.as_ref()?.facility.as_ref()?;
        Some(facility.maximum_capacity - self.reserved_places)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub activity_id: i64,
    /// 1 to 5 stars
    pub rating: i64,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn occurrence(reserved_places: i64, capacity: Option<i64>) -> ActivityOccurrence {
        ActivityOccurrence {
            id: 1,
            activity_id: 7,
            date_time: Utc.with_ymd_and_hms(2024, 6, 1, 10, 30, 0).unwrap(),
            reserved_places,
            activity: capacity.map(|maximum_capacity| Activity {
                id: 7,
                name: "Pintura".to_string(),
                activity_type: "Arte".to_string(),
                recommended_age: 8,
                is_private: false,
                educator_id: "edu-1".to_string(),
                facility_id: 3,
                facility: Some(Facility {
                    id: 3,
                    name: "Sala 1".to_string(),
                    facility_type: "Aula".to_string(),
                    maximum_capacity,
                }),
                educator: None,
            }),
        }
    }

    #[test]
    fn test_date_time_components() {
        let occ = occurrence(0, None);
        assert_eq!(occ.date(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(occ.time(), NaiveTime::from_hms_opt(10, 30, 0).unwrap());
        assert_eq!(occ.day_of_week(), Weekday::Sat);
    }

    #[test]
    fn test_available_places() {
        assert_eq!(occurrence(16, Some(20)).available_places(), Some(4));
        assert_eq!(occurrence(0, None).available_places(), None);
    }

    #[test]
    fn test_unloaded_navigation_is_not_serialized() {
        let json = serde_json::to_value(occurrence(0, None)).unwrap();
        assert!(json.get("activity").is_none());
        assert_eq!(json["reserved_places"], 0);
    }
}
