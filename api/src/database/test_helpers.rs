/// Shared test helpers for database tests
use super::Database;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;

/// Fresh in-memory catalog with all migrations applied.
/// A single connection keeps every query on the same in-memory database.
pub async fn setup_test_db() -> Database {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    Database::from_pool(pool)
        .await
        .expect("Failed to run migrations")
}

pub async fn insert_facility(db: &Database, id: i64, name: &str, facility_type: &str, capacity: i64) {
    sqlx::query(
        "INSERT INTO facilities (id, name, facility_type, maximum_capacity) VALUES (?, ?, ?, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(facility_type)
    .bind(capacity)
    .execute(db.pool())
    .await
    .expect("Failed to insert facility");
}

pub async fn insert_educator(db: &Database, id: &str, full_name: &str) {
    sqlx::query("INSERT INTO educators (id, full_name) VALUES (?, ?)")
        .bind(id)
        .bind(full_name)
        .execute(db.pool())
        .await
        .expect("Failed to insert educator");
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_activity(
    db: &Database,
    id: i64,
    name: &str,
    activity_type: &str,
    recommended_age: i64,
    is_private: bool,
    educator_id: &str,
    facility_id: i64,
) {
    sqlx::query(
        "INSERT INTO activities (id, name, activity_type, recommended_age, is_private, educator_id, facility_id)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(activity_type)
    .bind(recommended_age)
    .bind(is_private)
    .bind(educator_id)
    .bind(facility_id)
    .execute(db.pool())
    .await
    .expect("Failed to insert activity");
}

pub async fn insert_occurrence(
    db: &Database,
    id: i64,
    activity_id: i64,
    date_time: DateTime<Utc>,
    reserved_places: i64,
) {
    sqlx::query(
        "INSERT INTO activity_occurrences (id, activity_id, date_time, reserved_places) VALUES (?, ?, ?, ?)",
    )
    .bind(id)
    .bind(activity_id)
    .bind(date_time.format(super::types::SQL_DATE_TIME_FORMAT).to_string())
    .bind(reserved_places)
    .execute(db.pool())
    .await
    .expect("Failed to insert occurrence");
}

pub async fn insert_review(db: &Database, id: i64, activity_id: i64, rating: i64) {
    sqlx::query("INSERT INTO reviews (id, activity_id, rating) VALUES (?, ?, ?)")
        .bind(id)
        .bind(activity_id)
        .bind(rating)
        .execute(db.pool())
        .await
        .expect("Failed to insert review");
}

pub async fn insert_image(db: &Database, activity_id: i64, url: &str, position: i64) {
    sqlx::query("INSERT INTO activity_images (activity_id, url, position) VALUES (?, ?, ?)")
        .bind(activity_id)
        .bind(url)
        .bind(position)
        .execute(db.pool())
        .await
        .expect("Failed to insert image");
}
