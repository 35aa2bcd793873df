//! Client for the Tally management API.
//!
//! Form and webhook creation go through the [`FormProvider`] trait so the
//! HTTP client is an injected dependency with an explicit lifecycle (built
//! once at startup, shared via `AppState`) and integration tests can swap
//! in a stub.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

/// A failure talking to the form provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Operations this service needs from the external form provider.
#[async_trait]
pub trait FormProvider: Send + Sync {
    /// Create a published form from a block list; returns the provider's form id.
    async fn create_form(&self, blocks: Vec<Value>) -> Result<String, ProviderError>;

    /// Register a webhook for a form; returns the provider's webhook id.
    ///
    /// The signing secret is generated on our side and handed to the
    /// provider, which uses it to sign every delivery.
    async fn create_webhook(
        &self,
        form_id: &str,
        callback_url: &str,
        signing_secret: &str,
    ) -> Result<String, ProviderError>;

    /// Remove a webhook registration on the provider side.
    async fn delete_webhook(&self, webhook_id: &str) -> Result<(), ProviderError>;
}

/// Id-only response body shared by the creation endpoints.
#[derive(Debug, Deserialize)]
struct CreatedResource {
    id: String,
}

/// reqwest-backed [`FormProvider`] implementation.
pub struct TallyClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl TallyClient {
    /// Build a client for the given API base URL and key.
    pub fn new(api_base: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Convert a non-2xx response into a [`ProviderError::Api`].
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ProviderError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl FormProvider for TallyClient {
    async fn create_form(&self, blocks: Vec<Value>) -> Result<String, ProviderError> {
        let response = self
            .http
            .post(format!("{}/forms", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "status": "PUBLISHED",
                "blocks": blocks,
            }))
            .send()
            .await?;

        let created: CreatedResource = Self::check(response).await?.json().await?;
        Ok(created.id)
    }

    async fn create_webhook(
        &self,
        form_id: &str,
        callback_url: &str,
        signing_secret: &str,
    ) -> Result<String, ProviderError> {
        let response = self
            .http
            .post(format!("{}/webhooks", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "formId": form_id,
                "url": callback_url,
                "signingSecret": signing_secret,
                "eventTypes": [crate::tally::types::EVENT_FORM_RESPONSE],
            }))
            .send()
            .await?;

        let created: CreatedResource = Self::check(response).await?.json().await?;
        Ok(created.id)
    }

    async fn delete_webhook(&self, webhook_id: &str) -> Result<(), ProviderError> {
        let response = self
            .http
            .delete(format!("{}/webhooks/{webhook_id}", self.api_base))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}
