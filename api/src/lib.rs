pub mod config;
pub mod database;
pub mod error;
pub mod listing;
pub mod search;

pub use error::SearchError;

#[cfg(test)]
mod test_fixtures;
