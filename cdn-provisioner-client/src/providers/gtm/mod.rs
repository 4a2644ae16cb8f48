//! GTM v1.4 domain client

mod client;

use std::sync::Arc;

use crate::error::Result;
use crate::http_client::HttpTransport;
use crate::traits::RequestSigner;
use crate::types::ClientConfig;

pub(crate) const GTM_BASE: &str = "/config-gtm/v1";
pub(crate) const API_NAME: &str = "gtm";

/// Client for GTM domains, keyed by domain name.
pub struct GtmClient {
    pub(crate) transport: HttpTransport,
}

impl GtmClient {
    pub fn new(config: &ClientConfig, signer: Arc<dyn RequestSigner>) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new(API_NAME, config, signer)?,
        })
    }
}

pub(crate) fn domain_path(name: &str) -> String {
    format!("{GTM_BASE}/domains/{}", urlencoding::encode(name))
}
