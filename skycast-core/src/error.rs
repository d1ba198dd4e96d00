use std::fmt;

/// Coarse failure category surfaced to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Fetch,
    Unexpected,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Fetch => "fetch",
            ErrorKind::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures a weather load can end with.
///
/// The variants carry detail for logging only; what the user sees is chosen
/// from [`ErrorKind`].
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("place '{place}' could not be resolved")]
    NotFound { place: String },

    #[error("weather data unavailable: {0}")]
    Fetch(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::NotFound { .. } => ErrorKind::NotFound,
            WeatherError::Fetch(_) => ErrorKind::Fetch,
            WeatherError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    pub(crate) fn fetch(err: anyhow::Error) -> Self {
        WeatherError::Fetch(format!("{err:#}"))
    }
}
