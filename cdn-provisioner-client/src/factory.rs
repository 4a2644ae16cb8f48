//! Client factory functions.

use std::sync::Arc;

use crate::error::Result;
use crate::traits::{NoopSigner, RequestSigner, StaticHeaderSigner};
#[cfg(feature = "configdns")]
use crate::traits::ZoneClient;
#[cfg(feature = "gtm")]
use crate::traits::DomainClient;
use crate::types::{ClientConfig, Credentials};

#[cfg(feature = "configdns")]
use crate::providers::ConfigDnsClient;
#[cfg(feature = "gtm")]
use crate::providers::GtmClient;

/// Builds the [`RequestSigner`] matching the configured credentials.
pub fn create_signer(credentials: &Credentials) -> Result<Arc<dyn RequestSigner>> {
    Ok(match credentials {
        Credentials::None => Arc::new(NoopSigner),
        Credentials::BearerToken { token } => Arc::new(StaticHeaderSigner::bearer(token)?),
        Credentials::Header { name, value } => Arc::new(StaticHeaderSigner::new(name, value)?),
    })
}

/// Creates a Config-DNS zone client.
///
/// # Examples
///
/// ```rust,no_run
/// use cdn_provisioner_client::{ClientConfig, Credentials, create_zone_client};
///
/// let client = create_zone_client(&ClientConfig {
///     base_url: "https://akab-xxxx.luna.akamaiapis.net".to_string(),
///     credentials: Credentials::BearerToken { token: "your-token".to_string() },
///     ..ClientConfig::default()
/// }).unwrap();
/// ```
#[cfg(feature = "configdns")]
pub fn create_zone_client(config: &ClientConfig) -> Result<ZoneClient> {
    let signer = create_signer(&config.credentials)?;
    Ok(Arc::new(ConfigDnsClient::new(config, signer)?))
}

/// Creates a GTM domain client.
#[cfg(feature = "gtm")]
pub fn create_domain_client(config: &ClientConfig) -> Result<DomainClient> {
    let signer = create_signer(&config.credentials)?;
    Ok(Arc::new(GtmClient::new(config, signer)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    #[test]
    fn bad_header_credentials_rejected() {
        let result = create_signer(&Credentials::Header {
            name: "not a header".to_string(),
            value: "v".to_string(),
        });
        assert!(matches!(result, Err(ClientError::InvalidCredentials { .. })));
    }

    #[cfg(feature = "all-apis")]
    #[test]
    fn clients_report_their_api() {
        let config = ClientConfig::default();
        assert_eq!(create_zone_client(&config).unwrap().api(), "configdns");
        assert_eq!(create_domain_client(&config).unwrap().api(), "gtm");
    }
}
