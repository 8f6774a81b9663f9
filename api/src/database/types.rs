use sqlx::SqlitePool;

/// Storage format of `activity_occurrences.date_time` (UTC)
pub const SQL_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const SQL_DATE_FORMAT: &str = "%Y-%m-%d";
pub const SQL_TIME_FORMAT: &str = "%H:%M:%S";

/// Column qualifiers of the joined occurrence query. Lowered specifications
/// refer to columns through these.
pub const OCCURRENCE_ALIAS: &str = "o";
pub const ACTIVITY_ALIAS: &str = "a";
pub const FACILITY_ALIAS: &str = "f";

#[derive(Clone)]
pub struct Database {
    pub(crate) pool: SqlitePool,
}
