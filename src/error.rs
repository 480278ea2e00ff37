//! Error types for pokeview.
//!
//! `FetchError` is what the API client hands back for a single backend call;
//! `PokeviewError` covers startup failures (templates, building the HTTP
//! client).

use thiserror::Error;

use crate::fetcher::Operation;

/// Why a backend call produced no data.
///
/// The three causes are kept apart for logging only. Callers that go through
/// the sentinel layer see a single "fetch failed" outcome.
#[derive(Debug, Error)]
pub enum FetchErrorKind {
    /// Connection refused, DNS failure, reset mid-response and similar.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {0}")]
    Status(reqwest::StatusCode),

    /// The body was not the JSON shape the operation declares.
    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// A failed backend call, tagged with the operation that made it.
#[derive(Debug, Error)]
#[error("{operation} failed: {kind}")]
pub struct FetchError {
    pub operation: Operation,
    #[source]
    pub kind: FetchErrorKind,
}

impl FetchError {
    pub fn new(operation: Operation, kind: FetchErrorKind) -> Self {
        Self { operation, kind }
    }
}

/// Result of a single backend call.
pub type FetchResult<T> = Result<T, FetchError>;

/// Application-level errors.
///
/// The `#[from]` conversions let startup code use `?` directly.
#[derive(Debug, Error)]
pub enum PokeviewError {
    /// Error loading or rendering a template.
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    /// Error building the outbound HTTP client.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
