//! HTTP client for the REST API
//!
//! [`ApiClient`] is the shared transport: JSON over reqwest, response
//! envelopes, error bodies. [`ResourceClient`] layers the CRUD endpoints of
//! one typed resource on top of it.

use crate::error::{ApiErrorBody, ClientError, ClientResult};
use atelier_core::AppConfig;
use atelier_model::Resource;
use reqwest::{Client, Method, Response, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::marker::PhantomData;
use std::time::Duration;

// ============================================================================
// Envelopes
// ============================================================================

/// List response: `{ "data": { "data": [...] } }`, or `{ "data": [...] }`
#[derive(Debug, Deserialize)]
pub struct ListEnvelope<T> {
    pub data: ListBody<T>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListBody<T> {
    Paged { data: Vec<T> },
    Plain(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub fn into_items(self) -> Vec<T> {
        match self.data {
            ListBody::Paged { data } | ListBody::Plain(data) => data,
        }
    }
}

/// Item response: `{ "data": {...} }`
#[derive(Debug, Deserialize)]
pub struct ItemEnvelope<T> {
    pub data: T,
}

// ============================================================================
// API Client
// ============================================================================

/// Shared JSON client bound to the API base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client from the application configuration
    pub fn new(config: &AppConfig) -> ClientResult<Self> {
        Self::with_base_url(config.base_url(), config.request_timeout())
    }

    /// Create a client for an explicit base URL
    pub fn with_base_url(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            atelier_core::AppError::config(format!("Invalid API URL '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(atelier_core::AppError::config(format!(
                "Invalid API URL '{}'",
                base_url
            ))
            .into());
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the URL for a list of path segments, each percent-encoded
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // ========================================================================
    // Generic request helpers
    // ========================================================================

    /// Send a GET request and deserialise the response
    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> ClientResult<T> {
        let response = self.send::<()>(Method::GET, segments, None).await?;
        Self::decode(response).await
    }

    /// Send a POST request with a JSON body; returns the body if any
    pub async fn post<B: Serialize>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> ClientResult<Option<serde_json::Value>> {
        let response = self.send(Method::POST, segments, Some(body)).await?;
        Self::decode_optional(response).await
    }

    /// Send a PUT request with a JSON body; returns the body if any
    pub async fn put<B: Serialize>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> ClientResult<Option<serde_json::Value>> {
        let response = self.send(Method::PUT, segments, Some(body)).await?;
        Self::decode_optional(response).await
    }

    /// Send a DELETE request
    pub async fn delete(&self, segments: &[&str]) -> ClientResult<()> {
        self.send::<()>(Method::DELETE, segments, None).await?;
        Ok(())
    }

    /// Send a request and turn non-2xx responses into `Api` errors
    async fn send<B: Serialize>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> ClientResult<Response> {
        let url = self.url(segments);
        tracing::debug!(%method, %url, "Sending request");

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(%method, %url, error = %e, "Request failed");
            ClientError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|b| b.message);
        let err = ClientError::from_status(status.as_u16(), message);
        tracing::error!(%method, %url, status = status.as_u16(), error = %err, "API error");
        Err(err)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn decode_optional(response: Response) -> ClientResult<Option<serde_json::Value>> {
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

// ============================================================================
// Resource Client
// ============================================================================

/// Typed CRUD client for a single resource
///
/// `GET/POST {base}/{slug}` and `GET/PUT/DELETE {base}/{slug}/{key}`.
#[derive(Debug, Clone)]
pub struct ResourceClient<R: Resource> {
    api: ApiClient,
    _phantom: PhantomData<fn() -> R>,
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _phantom: PhantomData,
        }
    }

    fn slug() -> &'static str {
        R::KIND.slug()
    }

    pub async fn list(&self) -> ClientResult<Vec<R>> {
        let envelope: ListEnvelope<R> = self.api.get(&[Self::slug()]).await?;
        Ok(envelope.into_items())
    }

    pub async fn get(&self, key: &str) -> ClientResult<R> {
        let envelope: ItemEnvelope<R> = self.api.get(&[Self::slug(), key]).await?;
        Ok(envelope.data)
    }

    /// Create a record; the server's copy is returned when it sends one
    pub async fn create(&self, record: &R) -> ClientResult<R> {
        let body = self.api.post(&[Self::slug()], record).await?;
        Self::echo(body, record)
    }

    /// Replace the record stored under `key`
    pub async fn update(&self, key: &str, record: &R) -> ClientResult<R> {
        let body = self.api.put(&[Self::slug(), key], record).await?;
        Self::echo(body, record)
    }

    pub async fn delete(&self, key: &str) -> ClientResult<()> {
        self.api.delete(&[Self::slug(), key]).await
    }

    fn echo(body: Option<serde_json::Value>, sent: &R) -> ClientResult<R> {
        match body {
            Some(value) if value.get("data").is_some_and(|d| d.is_object()) => {
                serde_json::from_value::<ItemEnvelope<R>>(value)
                    .map(|e| e.data)
                    .map_err(|e| ClientError::Parse(e.to_string()))
            }
            _ => Ok(sent.clone()),
        }
    }
}
