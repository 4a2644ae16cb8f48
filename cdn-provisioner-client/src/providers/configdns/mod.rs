//! Config-DNS v2 zone client

mod client;
mod http;

use std::sync::Arc;

use crate::error::Result;
use crate::http_client::HttpTransport;
use crate::traits::RequestSigner;
use crate::types::ClientConfig;

pub(crate) const CONFIG_DNS_BASE: &str = "/config-dns/v2";
pub(crate) const API_NAME: &str = "configdns";

/// Client for Config-DNS zones, keyed by zone name.
pub struct ConfigDnsClient {
    pub(crate) transport: HttpTransport,
}

impl ConfigDnsClient {
    pub fn new(config: &ClientConfig, signer: Arc<dyn RequestSigner>) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new(API_NAME, config, signer)?,
        })
    }
}
