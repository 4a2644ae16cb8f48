//! Shared helpers for live API tests

#![allow(dead_code)]

use std::env;

use cdn_provisioner_client::{
    ClientConfig, Credentials, DomainClient, ZoneClient, create_domain_client, create_zone_client,
};

/// Skip the test when any required environment variable is missing.
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping: missing environment variable {}", $var);
                return;
            }
        )+
    };
}

/// Unique, clearly disposable GTM domain name under the test suffix.
pub fn generate_test_domain_name(suffix: &str) -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("test-{}.{suffix}", &uuid.to_string()[..8])
}

fn config_from_env() -> Option<ClientConfig> {
    let base_url = env::var("CDN_API_BASE_URL").ok()?;
    let token = env::var("CDN_API_TOKEN").ok()?;
    Some(ClientConfig {
        base_url,
        credentials: Credentials::BearerToken { token },
        ..ClientConfig::default()
    })
}

/// Live test context: clients plus the pre-existing test zone.
pub struct TestContext {
    pub zones: ZoneClient,
    pub domains: DomainClient,
    /// Existing zone used for read-only checks.
    pub zone: String,
}

impl TestContext {
    pub fn from_env() -> Option<Self> {
        let config = config_from_env()?;
        let zone = env::var("TEST_ZONE").ok()?;
        Some(Self {
            zones: create_zone_client(&config).ok()?,
            domains: create_domain_client(&config).ok()?,
            zone,
        })
    }
}
