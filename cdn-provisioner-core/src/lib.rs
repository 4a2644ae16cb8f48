//! CDN Provisioner Core Library
//!
//! Bridges a declarative infrastructure engine to the CDN vendor's management
//! APIs:
//! - Reconciler: declared configuration to outbound payload, and fetched
//!   objects back into declared state
//! - Convergence waiter: bounded, cancellable polling of change propagation
//! - Identity formatting and import parsing
//! - Lifecycle services for DNS zones and GTM domains
//!
//! The engine supplies declared configuration through [`ResourceData`]; the
//! vendor APIs are reached through the remote object clients of
//! `cdn-provisioner-client`.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use cdn_provisioner_client::create_domain_client;
//! use cdn_provisioner_core::{DesiredRecord, GtmDomainService, ProvisionerConfig, ServiceContext};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProvisionerConfig::load()?;
//! let client = create_domain_client(&config.client)?;
//! let service = GtmDomainService::new(Arc::new(ServiceContext::new(config)), client);
//!
//! let mut d = DesiredRecord::new();
//! d.declare("name", "example.akadns.net").declare("type", "weighted");
//! let outcome = service.create(&mut d).await?;
//! println!("created, converged: {}", outcome.is_converged());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod convergence;
pub mod error;
pub mod reconcile;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::{ConfigLoadError, ProvisionerConfig};
pub use convergence::{Convergence, await_convergence};
pub use error::{CoreError, CoreResult, OperationContext};
pub use reconcile::{ErrorTolerancePolicy, MissingObjectPolicy};
pub use services::{DnsZoneService, GtmDomainService, ServiceContext};
pub use traits::ResourceData;
pub use types::{AttrError, AttrValue, DesiredRecord};
