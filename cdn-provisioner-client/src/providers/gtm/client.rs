//! GTM `RemoteObjectClient` implementation

use async_trait::async_trait;
use reqwest::Method;

use crate::error::Result;
use crate::http_client::{ApiRequest, GTM_MEDIA_TYPE, parse_json};
use crate::traits::RemoteObjectClient;
use crate::types::{ChangeReport, GtmDomain, GtmMutationResponse, ScopeArgs};

use super::{API_NAME, GTM_BASE, GtmClient, domain_path};

impl GtmClient {
    /// Decode a mutation envelope; an empty body (some DELETE responses) counts as pending.
    fn mutation_status(&self, text: &str, name: &str) -> Result<ChangeReport> {
        if text.trim().is_empty() {
            return Ok(ChangeReport::pending(format!("domain {name} change accepted")));
        }
        let envelope: GtmMutationResponse = parse_json(text, API_NAME)?;
        Ok(envelope.status)
    }
}

#[async_trait]
impl RemoteObjectClient for GtmClient {
    type Object = GtmDomain;
    type Payload = GtmDomain;

    fn api(&self) -> &'static str {
        API_NAME
    }

    async fn fetch(&self, key: &str) -> Result<GtmDomain> {
        let req = ApiRequest::new(Method::GET, domain_path(key), key).content_type(GTM_MEDIA_TYPE);
        self.transport.send_json(req).await
    }

    async fn create(&self, payload: &GtmDomain, scope: &ScopeArgs) -> Result<ChangeReport> {
        let req = ApiRequest::new(Method::POST, format!("{GTM_BASE}/domains"), &payload.name)
            .content_type(GTM_MEDIA_TYPE)
            .query([("type", payload.domain_type.clone())])
            .query(scope.to_query_pairs())
            .json_body(API_NAME, payload)?;
        let (_, text) = self.transport.send(req).await?;
        self.mutation_status(&text, &payload.name)
    }

    async fn update(&self, payload: &GtmDomain, scope: &ScopeArgs) -> Result<ChangeReport> {
        let req = ApiRequest::new(Method::PUT, domain_path(&payload.name), &payload.name)
            .content_type(GTM_MEDIA_TYPE)
            .query(scope.to_query_pairs())
            .json_body(API_NAME, payload)?;
        let (_, text) = self.transport.send(req).await?;
        self.mutation_status(&text, &payload.name)
    }

    async fn delete(&self, payload: &GtmDomain, _scope: &ScopeArgs) -> Result<ChangeReport> {
        let req = ApiRequest::new(Method::DELETE, domain_path(&payload.name), &payload.name)
            .content_type(GTM_MEDIA_TYPE);
        let (_, text) = self.transport.send(req).await?;
        self.mutation_status(&text, &payload.name)
    }

    async fn fetch_status(&self, key: &str) -> Result<ChangeReport> {
        let req = ApiRequest::new(
            Method::GET,
            format!("{}/status/current", domain_path(key)),
            key,
        )
        .content_type(GTM_MEDIA_TYPE);
        self.transport.send_json(req).await
    }
}
