use std::time::Duration;

use thiserror::Error;

use crate::{
    model::{LocalizeError, LocationKind},
    store::StoreError,
};

/// Request validation failures. Always raised before any storage access.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("search term must not be empty")]
    EmptyTerm,
    #[error("search term must be at least {min} characters")]
    TermTooShort { min: usize },
    #[error("page must be >= 1, got {page}")]
    PageOutOfRange { page: usize },
    #[error("limit must be between 1 and {max}, got {limit}")]
    LimitOutOfRange { limit: usize, max: usize },
    #[error("radius must be between {min} and {max} km, got {radius_km}")]
    RadiusOutOfRange { radius_km: f64, min: f64, max: f64 },
    #[error("invalid coordinates: lat {lat}, lng {lng}")]
    InvalidCoordinates { lat: f64, lng: f64 },
}

#[derive(Error, Debug)]
pub enum GazetteerError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("{kind} with id {id} not found")]
    NotFound { kind: LocationKind, id: String },
    #[error("storage query failed: {0}")]
    Store(#[from] StoreError),
    #[error("{kind} sub-search timed out after {timeout:?}")]
    SubSearchTimeout { kind: LocationKind, timeout: Duration },
    #[error("all autocomplete sub-searches failed")]
    AutocompleteUnavailable,
    #[error("localization error: {0}")]
    Localize(#[from] LocalizeError),
    #[error("failed to initialise logging: {0}")]
    InitLogging(#[from] tracing_subscriber::filter::ParseError),
}

impl GazetteerError {
    pub(crate) fn not_found(kind: LocationKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GazetteerError>;
