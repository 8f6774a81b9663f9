use std::fmt;

/// Failures visible to callers of the activity search
#[derive(Debug)]
pub enum SearchError {
    /// The use-case selector is not one of the known values
    InvalidUseCase(String),
    /// The store or one of the collaborating services failed
    Backend(anyhow::Error),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SearchError::InvalidUseCase(value) => write!(
                f,
                "Invalid argument: unknown use case '{}' (expected one of: upcoming, past, all)",
                value
            ),
            SearchError::Backend(e) => write!(f, "Backend error: {:#}", e),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::InvalidUseCase(_) => None,
            SearchError::Backend(e) => Some(e.as_ref()),
        }
    }
}

impl From<anyhow::Error> for SearchError {
    fn from(error: anyhow::Error) -> Self {
        SearchError::Backend(error)
    }
}
