//! Stateless HTTP request builder and response parser for the character API.
//!
//! # Design
//! `CharacterClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the actual HTTP round-trip, keeping
//! the core deterministic and free of I/O dependencies.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Character, PageResponse};

/// Base URL of the public API.
pub const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api";

/// Synchronous, stateless client for the character API.
#[derive(Debug, Clone)]
pub struct CharacterClient {
    base_url: String,
}

impl Default for CharacterClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl CharacterClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/character?page={page}`.
    pub fn build_fetch_page(&self, page: u32) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/character?page={page}", self.base_url),
        }
    }

    /// `GET {base}/character/{id}`.
    pub fn build_fetch_by_id(&self, id: u64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/character/{id}", self.base_url),
        }
    }

    pub fn parse_page(&self, response: HttpResponse) -> Result<PageResponse, ApiError> {
        decode(response).inspect_err(|e| tracing::error!(error = %e, "Error fetching characters"))
    }

    pub fn parse_character(&self, response: HttpResponse) -> Result<Character, ApiError> {
        decode(response).inspect_err(|e| tracing::error!(error = %e, "Error fetching character"))
    }
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Map any status outside `200..=299` to `ApiError::Remote`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Remote {
        status: response.status,
        body: response.body.clone(),
    })
}
