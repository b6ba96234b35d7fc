use super::types::ErrorEnvelope;
use crate::error::ProviderErrorKind;
use crate::{Error, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Lightweight Gemini REST client.
pub struct GeminiHttpClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiHttpClient {
    /// Construct a Gemini client.
    ///
    /// `model` should be the bare model ID (for example `gemini-flash-latest`),
    /// not a `models/...`-prefixed path segment.
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

        Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Returns the configured model ID without the `models/` prefix.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Calls Gemini's `generateContent` endpoint.
    pub async fn generate_content<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        request: &Req,
    ) -> Result<Resp> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Gemini: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("Gemini API error (status {}): {}", status, error_text);
            return Err(classify_failure(status, &error_text));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, body);
            Error::provider(
                ProviderErrorKind::Other,
                format!("Failed to parse Gemini response: {}", e),
            )
        })
    }
}

/// Turn a non-2xx Gemini reply into a classified provider error.
pub(crate) fn classify_failure(status: StatusCode, body: &str) -> Error {
    let detail = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);
    let message = detail
        .as_ref()
        .map(|d| d.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());
    let grpc_status = detail.as_ref().and_then(|d| d.status.as_deref());
    let lowered = message.to_ascii_lowercase();

    let kind = match (status, grpc_status) {
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _)
        | (_, Some("UNAUTHENTICATED" | "PERMISSION_DENIED")) => ProviderErrorKind::Auth,
        // Gemini reports a bad key as INVALID_ARGUMENT.
        (StatusCode::BAD_REQUEST, _) if lowered.contains("api key") => ProviderErrorKind::Auth,
        (StatusCode::TOO_MANY_REQUESTS, _) | (_, Some("RESOURCE_EXHAUSTED")) => {
            if lowered.contains("quota") {
                ProviderErrorKind::Quota
            } else {
                ProviderErrorKind::RateLimited
            }
        }
        _ => ProviderErrorKind::Other,
    };

    Error::provider(
        kind,
        format!("Gemini API error (status {}): {}", status.as_u16(), message),
    )
}
