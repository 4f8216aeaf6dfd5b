//! Error types for tour planning.

use thiserror::Error;

/// Category of a failed distance lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Network or transport failure.
    Transport,
    /// Credentials rejected. Fatal for the whole search.
    Unauthorized,
    /// Provider throttled the request.
    RateLimited,
    /// No route exists between the two points.
    NoRoute,
    /// Provider rejected the coordinates.
    InvalidCoordinates,
    /// Provider answered with a negative or non-finite cost.
    InvalidCost,
    /// Any other provider failure.
    Other,
}

impl ProviderErrorKind {
    /// Classifies an HTTP status; `None` means the request never got a response.
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(401) | Some(403) => ProviderErrorKind::Unauthorized,
            Some(429) => ProviderErrorKind::RateLimited,
            Some(404) => ProviderErrorKind::NoRoute,
            Some(400) => ProviderErrorKind::InvalidCoordinates,
            Some(_) => ProviderErrorKind::Other,
            None => ProviderErrorKind::Transport,
        }
    }
}

/// A single leg's cost could not be obtained.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind:?}: {reason}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub reason: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    pub fn transport(reason: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, reason)
    }

    pub fn no_route(reason: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::NoRoute, reason)
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unauthorized, reason)
    }

    /// Fatal errors abort the search instead of excluding one candidate.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind, ProviderErrorKind::Unauthorized)
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        let kind = ProviderErrorKind::from_status(err.status().map(|status| status.as_u16()));
        ProviderError::new(kind, err.to_string())
    }
}

/// Top-level failure of a route search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// Every candidate route failed evaluation.
    #[error("no feasible route: all {failed} of {evaluated} candidates failed")]
    NoFeasibleRoute { evaluated: usize, failed: usize },

    /// Invalid input, detected before any provider call.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The cancellation token fired between candidates.
    #[error("search was cancelled")]
    Cancelled,

    /// A fatal provider failure aborted the search.
    #[error("provider failure: {0}")]
    Provider(ProviderError),
}

pub type Result<T> = std::result::Result<T, SearchError>;
