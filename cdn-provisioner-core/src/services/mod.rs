//! Resource lifecycle services
//!
//! One service per object family. Each call runs to completion, including any
//! convergence wait, and holds the resource's lock for its mutating part.

mod dns_zone_service;
mod gtm_domain_service;

pub use dns_zone_service::DnsZoneService;
pub use gtm_domain_service::GtmDomainService;

use cdn_provisioner_client::{ChangeReport, ChangeStatus};
use tokio_util::sync::CancellationToken;

use crate::config::ProvisionerConfig;
use crate::error::{CoreError, CoreResult};
use crate::utils::KeyedLocks;

/// Service context - holds what every lifecycle service shares
pub struct ServiceContext {
    pub config: ProvisionerConfig,
    /// Per-resource locks, shared by both families
    pub locks: KeyedLocks,
    /// Cancels in-flight convergence waits
    pub cancel: CancellationToken,
}

impl ServiceContext {
    #[must_use]
    pub fn new(config: ProvisionerConfig) -> Self {
        Self::with_cancellation(config, CancellationToken::new())
    }

    /// Context whose convergence waits stop when `cancel` fires.
    #[must_use]
    pub fn with_cancellation(config: ProvisionerConfig, cancel: CancellationToken) -> Self {
        Self {
            config,
            locks: KeyedLocks::new(),
            cancel,
        }
    }
}

/// Fail on a mutation the vendor rejected outright.
pub(crate) fn ensure_not_denied(report: &ChangeReport) -> CoreResult<()> {
    if report.status == ChangeStatus::Denied {
        return Err(CoreError::Denied {
            message: report.message.clone(),
        });
    }
    Ok(())
}

/// Log a failed lifecycle call at a level matching its class.
pub(crate) fn log_failure(family: &str, err: CoreError) -> CoreError {
    if err.is_expected() {
        log::warn!("[{family}] {err}");
    } else {
        log::error!("[{family}] {err}");
    }
    err
}
