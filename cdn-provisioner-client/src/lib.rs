//! # cdn-provisioner-client
//!
//! Remote object clients for a CDN vendor's management APIs. Each client
//! exposes one object family through the [`RemoteObjectClient`] capability
//! set: fetch, create, update, delete and fetch the propagation status of
//! the latest change.
//!
//! ## Supported APIs
//!
//! | API | Feature Flag | Object | Key |
//! |-----|-------------|--------|-----|
//! | Config-DNS v2 | `configdns` | [`Zone`] | zone name |
//! | Global Traffic Management v1.4 | `gtm` | [`GtmDomain`] | domain name |
//!
//! ## Feature Flags
//!
//! - **`all-apis`** *(default)*: enable both clients.
//! - **`native-tls`** *(default)*: use the platform's native TLS implementation.
//! - **`rustls`**: use rustls instead.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cdn_provisioner_client::{ClientConfig, ChangeStatus, create_domain_client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = create_domain_client(&ClientConfig {
//!         base_url: "https://akab-xxxx.luna.akamaiapis.net".to_string(),
//!         ..ClientConfig::default()
//!     })?;
//!
//!     let domain = client.fetch("example.akadns.net").await?;
//!     println!("{} ({})", domain.name, domain.domain_type);
//!
//!     let report = client.fetch_status("example.akadns.net").await?;
//!     if report.status == ChangeStatus::Complete {
//!         println!("propagated");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ClientError>`](ClientError):
//!
//! - [`ClientError::NotFound`] is the only recoverable class
//! - [`ClientError::Validation`] and [`ClientError::Api`] keep the status and raw body
//! - [`ClientError::RateLimited`], [`ClientError::NetworkError`] and
//!   [`ClientError::Timeout`] are retried with exponential backoff before being returned
//!
//! Request signing is pluggable through [`RequestSigner`].

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

pub use error::{ClientError, Result};

pub use factory::create_signer;
#[cfg(feature = "gtm")]
pub use factory::create_domain_client;
#[cfg(feature = "configdns")]
pub use factory::create_zone_client;

pub use traits::{
    DomainClient, NoopSigner, RemoteObjectClient, RequestSigner, StaticHeaderSigner, ZoneClient,
};

pub use types::{
    ChangeReport, ChangeStatus, ClientConfig, Credentials, DomainType, GtmDomain, ScopeArgs, Zone,
    ZoneCreate,
};

pub use utils::datetime;
pub use utils::log_sanitizer;

#[cfg(feature = "configdns")]
pub use providers::ConfigDnsClient;
#[cfg(feature = "gtm")]
pub use providers::GtmClient;
