//! Base-URL resolution from the environment.

use std::env;

/// Development API host.
pub const DEVELOPMENT_BASE_URL: &str = "http://localhost:5175";

/// Fixed production API host.
pub const PRODUCTION_BASE_URL: &str = "https://localhost:7006";

/// Explicit override, wins over the profile.
pub const BASE_URL_VAR: &str = "CAJA_API_URL";

/// `production` selects `PRODUCTION_BASE_URL`; anything else is development.
pub const PROFILE_VAR: &str = "CAJA_PROFILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::resolve(env::var(BASE_URL_VAR).ok(), env::var(PROFILE_VAR).ok())
    }

    fn resolve(base_url: Option<String>, profile: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            return Self::new(url);
        }
        match profile.as_deref() {
            Some(p) if p.eq_ignore_ascii_case("production") => Self::new(PRODUCTION_BASE_URL),
            _ => Self::new(DEVELOPMENT_BASE_URL),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEVELOPMENT_BASE_URL)
    }
}
