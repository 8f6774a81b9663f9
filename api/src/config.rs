use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./booking.db?mode=rwc";
pub const DEFAULT_USE_CASE: &str = "upcoming";

/// Runtime settings, read from the environment (after `.env` is loaded)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    /// Use-case selector applied when the caller does not pass one
    pub default_use_case: String,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let default_use_case = env::var("BOOKING_USE_CASE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USE_CASE.to_string());
        Self {
            database_url,
            default_use_case,
        }
    }
}
