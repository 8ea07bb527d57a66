/// Errors surfaced by journal actions.
///
/// Every variant carries the user-facing message; the CLI prints it as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WeatherError {
    /// Input rejected before any network access (empty location, bad date range).
    #[error("{0}")]
    Validation(String),

    /// Nothing matched: geocoding returned no result, or an id is unknown.
    #[error("{0}")]
    NotFound(String),

    /// Network failure or unexpected response shape from a weather service.
    #[error("{0}")]
    Upstream(String),

    /// The records file could not be written.
    #[error("{0}")]
    Storage(String),
}

impl WeatherError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream(err.to_string())
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
