//! Generic JSON fetch client for the cooperative API.
//!
//! # Design
//! `ApiClient` holds a base URL and an injected `Transport`, nothing else.
//! Every call is split into `build_request` (pure), `Transport::execute`
//! (I/O) and `parse_response` (pure), so the first and last steps are tested
//! without a network. One request per call: no retry, no backoff.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ApiConfig;
use crate::error::{ApiError, Failure};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};

const JSON: &str = "application/json";

/// Client for the cooperative REST API. Cheap to clone; clones share the
/// transport.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Client over a fresh `UreqTransport`.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(&config.base_url, Arc::new(UreqTransport::new()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = build_request::<()>(&self.base_url, HttpMethod::Get, path, None)?;
        let response = self.send(&request)?;
        parse_response(response)
    }

    pub fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = build_request(&self.base_url, HttpMethod::Post, path, Some(body))?;
        let response = self.send(&request)?;
        parse_response(response)
    }

    pub fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = build_request(&self.base_url, HttpMethod::Put, path, Some(body))?;
        let response = self.send(&request)?;
        parse_response(response)
    }

    /// Any body the server returns on delete is ignored.
    pub fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = build_request::<()>(&self.base_url, HttpMethod::Delete, path, None)?;
        let response = self.send(&request)?;
        check_status(&response)
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.execute(request).map_err(|e| {
            tracing::warn!(method = %request.method, url = %request.url, error = %e, "API request failed");
            Failure::Transport(e.0)
        })?;
        if !response.is_success() {
            tracing::warn!(
                method = %request.method,
                url = %request.url,
                status = response.status,
                "API request failed"
            );
        }
        Ok(response)
    }
}

/// Build a JSON request for `path` relative to `base_url`.
pub fn build_request<B: Serialize + ?Sized>(
    base_url: &str,
    method: HttpMethod,
    path: &str,
    body: Option<&B>,
) -> Result<HttpRequest, ApiError> {
    let body = body
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| ApiError::Serialization(e.to_string()))?;
    Ok(HttpRequest {
        method,
        url: format!("{base_url}{path}"),
        headers: vec![("content-type".to_string(), JSON.to_string())],
        body,
    })
}

/// Check the status and deserialize the body.
pub fn parse_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(Failure::Status {
        status: response.status,
        body: response.body.clone(),
    }
    .into())
}
