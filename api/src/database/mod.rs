pub mod core;
pub mod memory;
pub mod occurrences;
pub mod repository;
pub mod reviews;
pub mod types;

// Re-export main types
pub use memory::InMemoryRepository;
pub use repository::{Includes, NavigationPath, Related, Repository};
pub use types::Database;

#[cfg(test)]
pub mod test_helpers;
