//! Error types for the cooperative API client.
//!
//! # Design
//! Transport failures and non-2xx statuses are the same condition to callers:
//! `RequestFailed`. The `Failure` payload keeps enough detail for logs.
//! Validation errors are raised before any request is built.

use crate::validate::ValidationErrors;

/// Why a request did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    /// The server answered with a status outside `200..=299`.
    #[error("HTTP error! status: {status}")]
    Status { status: u16, body: String },

    /// The round-trip never completed.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Errors returned by `ApiClient`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    RequestFailed(Failure),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Input rejected client-side; no request was sent.
    #[error("invalid input: {0}")]
    Validation(ValidationErrors),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed(Failure::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<Failure> for ApiError {
    fn from(failure: Failure) -> Self {
        ApiError::RequestFailed(failure)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}
