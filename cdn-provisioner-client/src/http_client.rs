//! Generic HTTP execution shared by the vendor API clients.
//!
//! Each API client describes *what* to call; [`HttpTransport`] builds the
//! request, lets the configured [`RequestSigner`] sign it, sends it (retrying
//! idempotent methods on transient failures), logs sanitized bodies, and
//! turns non-success statuses into [`ClientError`] variants.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, Request};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};
use crate::traits::RequestSigner;
use crate::types::ClientConfig;
use crate::utils::log_sanitizer::sanitize_body;

/// Media type for GTM v1.4 payloads.
pub(crate) const GTM_MEDIA_TYPE: &str = "application/vnd.config-gtm.v1.4+json";

/// Signed, retrying HTTP transport bound to one vendor API.
pub(crate) struct HttpTransport {
    api: &'static str,
    client: Client,
    base_url: String,
    max_retries: u32,
    signer: Arc<dyn RequestSigner>,
}

/// A request to send through [`HttpTransport`].
pub(crate) struct ApiRequest<'a> {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<String>,
    pub content_type: &'a str,
    /// Lookup key reported in `NotFound` errors.
    pub key: &'a str,
}

impl<'a> ApiRequest<'a> {
    pub fn new(method: Method, path: impl Into<String>, key: &'a str) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            content_type: "application/json",
            key,
        }
    }

    pub fn query(mut self, pairs: impl IntoIterator<Item = (&'static str, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn content_type(mut self, content_type: &'a str) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn json_body<B: Serialize>(mut self, api: &str, body: &B) -> Result<Self> {
        let text = serde_json::to_string(body).map_err(|e| ClientError::SerializationError {
            api: api.to_string(),
            detail: e.to_string(),
        })?;
        self.body = Some(text);
        Ok(self)
    }
}

impl HttpTransport {
    pub fn new(
        api: &'static str,
        config: &ClientConfig,
        signer: Arc<dyn RequestSigner>,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ClientError::NetworkError {
                api: api.to_string(),
                detail: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            api,
            client,
            base_url: config.normalized_base_url().to_string(),
            max_retries: config.max_retries,
            signer,
        })
    }

    /// Send a request and decode a JSON success body.
    pub async fn send_json<T: DeserializeOwned>(&self, req: ApiRequest<'_>) -> Result<T> {
        let (_, text) = self.send(req).await?;
        parse_json(&text, self.api)
    }

    /// Send a request; success bodies are returned raw (possibly empty).
    pub async fn send(&self, req: ApiRequest<'_>) -> Result<(u16, String)> {
        let url = format!("{}{}", self.base_url, req.path);
        let mut builder = self
            .client
            .request(req.method.clone(), &url)
            .header("Accept", req.content_type);
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(body) = &req.body {
            log::debug!("[{}] Request Body: {}", self.api, sanitize_body(body));
            builder = builder
                .header("Content-Type", req.content_type)
                .body(body.clone());
        }

        let mut request = builder.build().map_err(|e| ClientError::SerializationError {
            api: self.api.to_string(),
            detail: e.to_string(),
        })?;
        self.signer.sign(&mut request)?;

        let (status, text) = self.execute_with_retry(request, &req.method, &url).await?;
        if (200..300).contains(&status) {
            Ok((status, text))
        } else {
            Err(classify_status(self.api, status, text, req.key))
        }
    }

    /// Execute once; transient HTTP statuses become retryable errors.
    async fn execute(&self, request: Request, method: &str, url: &str) -> Result<(u16, String)> {
        let api = self.api;
        log::debug!("[{api}] {method} {url}");

        let response = self.client.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout {
                    api: api.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ClientError::NetworkError {
                    api: api.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        log::debug!("[{api}] Response Status: {status}");

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{api}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(ClientError::RateLimited {
                api: api.to_string(),
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{api}] Server error (HTTP {status})");
            return Err(ClientError::NetworkError {
                api: api.to_string(),
                detail: format!("HTTP {status}: {body}"),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| ClientError::NetworkError {
                api: api.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;
        log::debug!("[{api}] Response Body: {}", sanitize_body(&text));

        Ok((status, text))
    }

    /// Execute with exponential backoff on transport failures.
    ///
    /// Vendor verdicts (404, 400, …) are returned on the first attempt. POST
    /// is sent exactly once: a gateway error does not prove the vendor never
    /// acted on it.
    async fn execute_with_retry(
        &self,
        request: Request,
        method: &Method,
        url: &str,
    ) -> Result<(u16, String)> {
        let method_name = method.as_str();
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            let Some(req) = request.try_clone() else {
                log::warn!("[{}] Cannot clone request, disabling retry", self.api);
                return self.execute(request, method_name, url).await;
            };

            match self.execute(req, method_name, url).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < self.max_retries && is_retryable(method, &e) => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "[{}] Request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        self.api,
                        attempt + 1,
                        self.max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ClientError::NetworkError {
            api: self.api.to_string(),
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }
}

/// Decode a JSON body, logging the sanitized raw text on failure.
pub(crate) fn parse_json<T: DeserializeOwned>(text: &str, api: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| {
        log::error!("[{api}] JSON parse failed: {e}");
        log::error!("[{api}] Raw response: {}", sanitize_body(text));
        ClientError::ParseError {
            api: api.to_string(),
            detail: e.to_string(),
        }
    })
}

/// Map a non-success HTTP status onto the client error taxonomy.
pub(crate) fn classify_status(api: &str, status: u16, body: String, key: &str) -> ClientError {
    let api = api.to_string();
    let raw_message = (!body.is_empty()).then_some(body);
    match status {
        404 => ClientError::NotFound {
            api,
            key: key.to_string(),
            raw_message,
        },
        400 | 409 | 422 => ClientError::Validation {
            api,
            status,
            raw_body: raw_message.unwrap_or_default(),
        },
        401 => ClientError::InvalidCredentials { api, raw_message },
        403 => ClientError::PermissionDenied { api, raw_message },
        _ => ClientError::Api {
            api,
            status,
            raw_body: raw_message.unwrap_or_default(),
        },
    }
}

/// Transient failures of idempotent requests are worth another attempt.
fn is_retryable(method: &Method, error: &ClientError) -> bool {
    method.is_idempotent() && error.is_transport()
}

/// Honour `Retry-After` (capped at 30s) when rate limited, else back off exponentially.
fn retry_delay(error: &ClientError, attempt: u32) -> Duration {
    if let ClientError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(30))
    } else {
        backoff_delay(attempt)
    }
}

/// 100ms, 200ms, 400ms, … capped at 10s.
fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20);
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(10_000))
}
