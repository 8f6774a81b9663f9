pub mod entities;
pub mod specification;

pub use entities::*;
pub use specification::{Criterion, Specification, SpecificationVisitor, SqlCondition, SqlValue};

/// Recommended age assumed when a request leaves the lower age bound unset
pub const DEFAULT_MIN_AGE: i64 = 2;
/// Recommended age assumed when a request leaves the upper age bound unset
pub const DEFAULT_MAX_AGE: i64 = 17;
