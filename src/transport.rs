//! reqwest-backed HTTP transport for the Gemini client

use crate::error::{ChronoSnapError, Result};
use chronosnap_common::{HttpRequest, HttpResponse, Transport};
use std::time::Duration;

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ChronoSnapError::Http(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn post_json(&self, request: HttpRequest) -> std::result::Result<HttpResponse, String> {
        // the URL carries the API key; keep it out of error messages
        let response = self
            .client
            .post(&request.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(request.body)
            .send()
            .await
            .map_err(|e| e.without_url().to_string())?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| e.without_url().to_string())?;

        Ok(HttpResponse { status, body })
    }
}
