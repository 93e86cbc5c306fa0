use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::errors::TranslationError;
use crate::translation::provider::TranslationProvider;

/// Client for the public Google Translate endpoint
#[derive(Debug, Clone)]
pub struct GoogleTranslateProvider {
    /// HTTP client for making requests
    client: Client,
    /// Endpoint URL, normally `.../translate_a/single`
    endpoint: String,
}

impl GoogleTranslateProvider {
    /// Create a new client with the given request timeout
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }

    /// Build the request URL for one line
    pub fn request_url(&self, text: &str, target_code: &str) -> Result<Url, TranslationError> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("client", "gtx"),
                ("sl", "en"),
                ("tl", target_code),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|e| TranslationError::RequestFailed(format!("Invalid endpoint '{}': {}", self.endpoint, e)))
    }

    /// Extract the translated text from the nested array response
    ///
    /// The body looks like `[[["translated", "source", ...], ...], ...]`; long
    /// inputs come back split into several segments that are concatenated.
    pub fn extract_text(body: &Value) -> Result<String, TranslationError> {
        let segments = body
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| TranslationError::MalformedResponse("missing segment list".to_string()))?;

        let text: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();

        if text.is_empty() {
            return Err(TranslationError::MalformedResponse("no translated segments".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslateProvider {
    async fn translate(&self, text: &str, target_code: &str) -> Result<String, TranslationError> {
        let url = self.request_url(text, target_code)?;
        debug!("Requesting translation to {} ({} chars)", target_code, text.len());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TranslationError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TranslationError::RateLimitExceeded(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Translation API error ({}): {}", status, message);
            return Err(TranslationError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TranslationError::MalformedResponse(e.to_string()))?;

        Self::extract_text(&body)
    }
}
