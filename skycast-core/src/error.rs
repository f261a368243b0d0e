use thiserror::Error;

use crate::geo::LocationError;

/// Why a weather query did not produce a report.
///
/// Every variant ends the current query; none of them leave the widget unusable.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("city name is empty")]
    EmptyInput,

    #[error("provider could not resolve location (code {code}): {message}")]
    NotFound { code: String, message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("geolocation is not supported")]
    GeolocationUnsupported,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to weather provider failed")]
    Http(#[from] reqwest::Error),

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error("provider rejected request (code {code}): {message}")]
    Rejected { code: String, message: String },

    #[error("could not determine location")]
    Location(#[source] LocationError),
}

impl From<LocationError> for QueryError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::Unsupported => QueryError::GeolocationUnsupported,
            other => QueryError::Transport(TransportError::Location(other)),
        }
    }
}
