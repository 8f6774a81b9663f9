//! One small catalog, loadable into both repository implementations.
//!
//! The clock is pinned to Wednesday 2024-06-05 12:00 UTC; the week runs
//! Monday 2024-06-03 to Sunday 2024-06-09.

use crate::database::test_helpers::{
    insert_activity, insert_educator, insert_facility, insert_image, insert_occurrence,
    insert_review, setup_test_db,
};
use crate::database::{Database, InMemoryRepository};
use booking_common::{Activity, ActivityOccurrence, Educator, Facility, Review};
use chrono::{DateTime, TimeZone, Utc};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 5, 12, 0, 0).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn facilities() -> Vec<Facility> {
    vec![
        Facility {
            id: 1,
            name: "Sala Arte".to_string(),
            facility_type: "Aula".to_string(),
            maximum_capacity: 20,
        },
        Facility {
            id: 2,
            name: "Pista".to_string(),
            facility_type: "Deportiva".to_string(),
            maximum_capacity: 30,
        },
    ]
}

pub fn educators() -> Vec<Educator> {
    vec![
        Educator {
            id: "edu-ana".to_string(),
            full_name: "Ana Ruiz".to_string(),
        },
        Educator {
            id: "edu-luis".to_string(),
            full_name: "Luis Gil".to_string(),
        },
    ]
}

fn activity(
    id: i64,
    name: &str,
    activity_type: &str,
    recommended_age: i64,
    is_private: bool,
    educator_id: &str,
    facility_id: i64,
) -> Activity {
    Activity {
        id,
        name: name.to_string(),
        activity_type: activity_type.to_string(),
        recommended_age,
        is_private,
        educator_id: educator_id.to_string(),
        facility_id,
        facility: None,
        educator: None,
    }
}

pub fn activities() -> Vec<Activity> {
    vec![
        activity(1, "Pintura", "Arte", 8, false, "edu-ana", 1),
        activity(2, "Fútbol", "Deporte", 10, false, "edu-luis", 2),
        activity(3, "Danza", "Danza", 14, true, "edu-ana", 1),
        activity(4, "Ajedrez", "Ciencia", 12, false, "edu-luis", 1),
    ]
}

fn occurrence(id: i64, activity_id: i64, date_time: DateTime<Utc>, reserved: i64) -> ActivityOccurrence {
    ActivityOccurrence {
        id,
        activity_id,
        date_time,
        reserved_places: reserved,
        activity: None,
    }
}

/// | id | activity | when (UTC)            | free |
/// |----|----------|-----------------------|------|
/// | 1  | 1        | Sat 2024-06-01 10:00  | 4    |
/// | 2  | 1        | Wed 2024-06-05 15:00  | 10   |
/// | 3  | 2        | Thu 2024-06-06 09:30  | 30   |
/// | 4  | 2        | Mon 2024-06-10 10:00  | 1    |
/// | 5  | 3        | Sun 2024-06-09 18:00  | 15   |
/// | 6  | 1        | Sat 2024-06-01 16:00  | 20   |
/// | 7  | 4        | Mon 2024-05-20 17:00  | 20   |
pub fn occurrences() -> Vec<ActivityOccurrence> {
    vec![
        occurrence(1, 1, at(2024, 6, 1, 10, 0), 16),
        occurrence(2, 1, at(2024, 6, 5, 15, 0), 10),
        occurrence(3, 2, at(2024, 6, 6, 9, 30), 0),
        occurrence(4, 2, at(2024, 6, 10, 10, 0), 29),
        occurrence(5, 3, at(2024, 6, 9, 18, 0), 5),
        occurrence(6, 1, at(2024, 6, 1, 16, 0), 0),
        occurrence(7, 4, at(2024, 5, 20, 17, 0), 0),
    ]
}

/// Activity 1 averages 4.5, activity 2 averages 2.0, the rest have none
pub fn reviews() -> Vec<Review> {
    vec![
        Review {
            id: 1,
            activity_id: 1,
            rating: 5,
            comment: Some("Genial".to_string()),
        },
        Review {
            id: 2,
            activity_id: 1,
            rating: 4,
            comment: None,
        },
        Review {
            id: 3,
            activity_id: 2,
            rating: 2,
            comment: None,
        },
    ]
}

pub const PINTURA_IMAGE: &str = "https://img.example/pintura.jpg";

pub fn memory_repository() -> InMemoryRepository {
    let mut repo = InMemoryRepository::new();
    facilities().into_iter().for_each(|f| repo.add_facility(f));
    educators().into_iter().for_each(|e| repo.add_educator(e));
    activities().into_iter().for_each(|a| repo.add_activity(a));
    occurrences().into_iter().for_each(|o| repo.add_occurrence(o));
    reviews().into_iter().for_each(|r| repo.add_review(r));
    repo.add_image(1, PINTURA_IMAGE);
    repo
}

pub async fn sqlite_database() -> Database {
    let db = setup_test_db().await;
    for f in facilities() {
        insert_facility(&db, f.id, &f.name, &f.facility_type, f.maximum_capacity).await;
    }
    for e in educators() {
        insert_educator(&db, &e.id, &e.full_name).await;
    }
    for a in activities() {
        insert_activity(
            &db,
            a.id,
            &a.name,
            &a.activity_type,
            a.recommended_age,
            a.is_private,
            &a.educator_id,
            a.facility_id,
        )
        .await;
    }
    for o in occurrences() {
        insert_occurrence(&db, o.id, o.activity_id, o.date_time, o.reserved_places).await;
    }
    for r in reviews() {
        insert_review(&db, r.id, r.activity_id, r.rating).await;
    }
    insert_image(&db, 1, PINTURA_IMAGE, 0).await;
    db
}
