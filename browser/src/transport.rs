//! Executes the core's `HttpRequest` values over the network.

use character_core::{HttpMethod, HttpRequest, HttpResponse, TransportError};

/// Performs one HTTP round-trip. Non-success statuses are returned as data;
/// only a round-trip that could not complete is an error.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by a ureq agent. No retries, no timeouts.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        // Let 4xx/5xx through as responses so the core interprets them.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");
        let mut response = match request.method {
            HttpMethod::Get => self.agent.get(&request.url).call(),
        }
        .map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::new(e.to_string()))?;
        tracing::debug!(status, bytes = body.len(), "response received");
        Ok(HttpResponse::new(status, body))
    }
}
