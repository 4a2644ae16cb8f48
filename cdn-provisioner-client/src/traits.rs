use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Request;
use reqwest::header::{HeaderName, HeaderValue};

use crate::error::{ClientError, Result};
use crate::types::{ChangeReport, GtmDomain, ScopeArgs, Zone, ZoneCreate};

/// Remote object client for one vendor object family.
///
/// `Object` is what the vendor returns on read; `Payload` is what it accepts
/// on create/update/delete. Mutating calls return the vendor's change report,
/// which the caller may then poll through [`fetch_status`](Self::fetch_status).
#[async_trait]
pub trait RemoteObjectClient: Send + Sync {
    type Object: Send + Sync;
    type Payload: Send + Sync;

    /// Short identifier of the vendor API, used as a log prefix.
    fn api(&self) -> &'static str;

    /// Read the remote object by key. A missing object is
    /// [`ClientError::NotFound`].
    async fn fetch(&self, key: &str) -> Result<Self::Object>;

    async fn create(&self, payload: &Self::Payload, scope: &ScopeArgs) -> Result<ChangeReport>;

    async fn update(&self, payload: &Self::Payload, scope: &ScopeArgs) -> Result<ChangeReport>;

    async fn delete(&self, payload: &Self::Payload, scope: &ScopeArgs) -> Result<ChangeReport>;

    /// Current propagation status of the object's latest change.
    async fn fetch_status(&self, key: &str) -> Result<ChangeReport>;
}

/// Shared handle to a Config-DNS zone client.
pub type ZoneClient = Arc<dyn RemoteObjectClient<Object = Zone, Payload = ZoneCreate>>;

/// Shared handle to a GTM domain client.
pub type DomainClient = Arc<dyn RemoteObjectClient<Object = GtmDomain, Payload = GtmDomain>>;

/// Authenticates an outgoing request before it is sent.
///
/// The vendor's request-signing scheme plugs in here; the clients only
/// require that signing happens once per logical request.
pub trait RequestSigner: Send + Sync {
    fn sign(&self, request: &mut Request) -> Result<()>;
}

/// Signer that attaches a fixed header, e.g. a bearer token or a gateway key.
#[derive(Clone)]
pub struct StaticHeaderSigner {
    name: HeaderName,
    value: HeaderValue,
}

impl StaticHeaderSigner {
    pub fn new(name: &str, value: &str) -> Result<Self> {
        let invalid = |detail: String| ClientError::InvalidCredentials {
            api: "signer".to_string(),
            raw_message: Some(detail),
        };
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| invalid(format!("invalid header name: {e}")))?;
        let mut value =
            HeaderValue::from_str(value).map_err(|e| invalid(format!("invalid header value: {e}")))?;
        value.set_sensitive(true);
        Ok(Self { name, value })
    }

    /// `Authorization: Bearer <token>`.
    pub fn bearer(token: &str) -> Result<Self> {
        Self::new("authorization", &format!("Bearer {token}"))
    }
}

impl std::fmt::Debug for StaticHeaderSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticHeaderSigner")
            .field("name", &self.name)
            .field("value", &"***")
            .finish()
    }
}

impl RequestSigner for StaticHeaderSigner {
    fn sign(&self, request: &mut Request) -> Result<()> {
        request
            .headers_mut()
            .insert(self.name.clone(), self.value.clone());
        Ok(())
    }
}

/// Signer that leaves requests untouched; for gateways that authenticate upstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSigner;

impl RequestSigner for NoopSigner {
    fn sign(&self, _request: &mut Request) -> Result<()> {
        Ok(())
    }
}
