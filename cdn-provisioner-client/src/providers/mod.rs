//! Vendor API client implementations

#[cfg(feature = "configdns")]
mod configdns;
#[cfg(feature = "gtm")]
mod gtm;

#[cfg(feature = "configdns")]
pub use configdns::ConfigDnsClient;
#[cfg(feature = "gtm")]
pub use gtm::GtmClient;
