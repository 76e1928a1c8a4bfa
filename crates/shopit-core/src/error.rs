use thiserror::Error;

/// Failures a single search can surface to its caller.
///
/// None of these are fatal to the process. History persistence failures are
/// not represented here; the cache logs them and keeps working in memory.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// A request parameter was missing or out of range. Not retried.
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// No origin coordinate is known for the user.
    #[error("location access is required to search for nearby stores; enable location services and try again")]
    LocationUnavailable,

    /// The engine or its storage could not be reached.
    #[error("search is temporarily unavailable: {0}")]
    EngineUnavailable(String),
}

impl SearchError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Text suitable for showing to an end user.
    ///
    /// Engine failures hide their cause behind a generic retry prompt.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput { .. } | Self::LocationUnavailable => self.to_string(),
            Self::EngineUnavailable(_) => {
                "Failed to search for product. Please try again.".to_string()
            }
        }
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::EngineUnavailable(_))
    }
}
