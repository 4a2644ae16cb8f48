//! DNS zone lifecycle service

use std::sync::Arc;

use cdn_provisioner_client::ZoneClient;

use crate::convergence::{Convergence, await_convergence};
use crate::error::{CoreResult, OperationContext};
use crate::reconcile::{
    MissingObjectPolicy, build_zone_payload, optional_string, populate_zone_state,
    required_string, scope_args, verify_id_unchanged,
};
use crate::services::{ServiceContext, ensure_not_denied, log_failure};
use crate::traits::ResourceData;
use crate::utils::{parse_zone_identity, resource_key, zone_identity};

const FAMILY: &str = "dns_zone";

/// DNS zone lifecycle service
///
/// Attributes: `zone`, `type`, `masters`, `comment`, `signandserve`,
/// `contractid`, `gid`. The identity token is
/// `"{versionId}-{zone}-{zone}"`.
pub struct DnsZoneService {
    ctx: Arc<ServiceContext>,
    client: ZoneClient,
}

impl DnsZoneService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, client: ZoneClient) -> Self {
        Self { ctx, client }
    }

    /// Create the zone, or adopt it when it already exists.
    pub async fn create<D: ResourceData + ?Sized>(&self, d: &mut D) -> CoreResult<Convergence> {
        self.create_zone(d)
            .await
            .in_operation("Zone Create")
            .map_err(|e| log_failure(FAMILY, e))
    }

    /// Refresh declared state and identity from the remote zone.
    pub async fn read<D: ResourceData + ?Sized>(&self, d: &mut D) -> CoreResult<()> {
        let zone_name = match optional_string(d, "zone") {
            Ok(name) if !name.is_empty() => name,
            Ok(_) => parse_zone_identity(d.id()).to_string(),
            Err(e) => return Err(log_failure(FAMILY, e.in_operation("Zone Read"))),
        };
        self.refresh(d, &zone_name)
            .await
            .in_operation("Zone Read")
            .map_err(|e| log_failure(FAMILY, e))
    }

    pub async fn update<D: ResourceData + ?Sized>(&self, d: &mut D) -> CoreResult<Convergence> {
        self.update_zone(d)
            .await
            .in_operation("Zone Update")
            .map_err(|e| log_failure(FAMILY, e))
    }

    /// Submit a delete request for the zone. Deletes are never awaited.
    pub async fn delete<D: ResourceData + ?Sized>(&self, d: &mut D) -> CoreResult<Convergence> {
        self.delete_zone(d)
            .await
            .in_operation("Zone Delete")
            .map_err(|e| log_failure(FAMILY, e))
    }

    pub async fn exists<D: ResourceData + ?Sized>(&self, d: &D) -> CoreResult<bool> {
        self.zone_exists(d)
            .await
            .in_operation("Zone Exists")
            .map_err(|e| log_failure(FAMILY, e))
    }

    /// Import from an identity token or a bare zone name.
    pub async fn import<D: ResourceData + ?Sized>(&self, d: &mut D, token: &str) -> CoreResult<()> {
        let zone_name = parse_zone_identity(token).to_string();
        log::info!("[{FAMILY}] importing zone {zone_name}");
        self.refresh(d, &zone_name)
            .await
            .in_operation("Zone Import")
            .map_err(|e| log_failure(FAMILY, e))
    }

    async fn create_zone<D: ResourceData + ?Sized>(&self, d: &mut D) -> CoreResult<Convergence> {
        let zone_name = required_string(d, "zone")?;
        let scope = scope_args(d, "contractid", "gid")?;
        let _guard = self
            .ctx
            .locks
            .acquire(&resource_key(FAMILY, &zone_name))
            .await;

        log::info!("[{FAMILY}] searching for zone {zone_name}");
        let outcome = match self.client.fetch(&zone_name).await {
            Ok(_) => {
                log::info!("[{FAMILY}] zone {zone_name} already exists, adopting it");
                Convergence::NotAwaited
            }
            Err(e) if e.is_not_found() => {
                let payload = build_zone_payload(d, None)?;
                log::info!("[{FAMILY}] creating {} zone {zone_name}", payload.zone_type);
                let report = self.client.create(&payload, &scope).await?;
                ensure_not_denied(&report)?;
                self.wait(&zone_name).await?
            }
            Err(e) => return Err(e.into()),
        };

        if outcome == Convergence::Cancelled {
            d.set_id(zone_name);
            return Ok(outcome);
        }
        self.refresh(d, &zone_name).await?;
        Ok(outcome)
    }

    async fn zone_exists<D: ResourceData + ?Sized>(&self, d: &D) -> CoreResult<bool> {
        let zone_name = required_string(d, "zone")?;
        match self.client.fetch(&zone_name).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_zone<D: ResourceData + ?Sized>(&self, d: &mut D) -> CoreResult<Convergence> {
        verify_id_unchanged(d, "zone")?;
        let zone_name = required_string(d, "zone")?;
        let scope = scope_args(d, "contractid", "gid")?;
        let _guard = self
            .ctx
            .locks
            .acquire(&resource_key(FAMILY, &zone_name))
            .await;

        let existing = match self.client.fetch(&zone_name).await {
            Ok(zone) => Some(zone),
            Err(e) if e.is_not_found() => match self.ctx.config.dns_zone.on_missing_update {
                MissingObjectPolicy::SeedBlank => {
                    log::warn!("[{FAMILY}] zone {zone_name} not found, updating from a blank zone");
                    None
                }
                MissingObjectPolicy::Fail => return Err(e.into()),
            },
            Err(e) => return Err(e.into()),
        };

        let payload = build_zone_payload(d, existing.as_ref())?;
        log::info!("[{FAMILY}] saving zone {zone_name}");
        let report = self.client.update(&payload, &scope).await?;
        ensure_not_denied(&report)?;

        let outcome = self.wait(&zone_name).await?;
        if outcome != Convergence::Cancelled {
            self.refresh(d, &zone_name).await?;
        }
        Ok(outcome)
    }

    async fn delete_zone<D: ResourceData + ?Sized>(&self, d: &mut D) -> CoreResult<Convergence> {
        let zone_name = required_string(d, "zone")?;
        let scope = scope_args(d, "contractid", "gid")?;
        let _guard = self
            .ctx
            .locks
            .acquire(&resource_key(FAMILY, &zone_name))
            .await;

        let zone = self.client.fetch(&zone_name).await?;
        log::info!("[{FAMILY}] requesting delete of zone {zone_name}");
        let report = self.client.delete(&zone.to_payload(), &scope).await?;
        ensure_not_denied(&report)?;

        d.set_id(String::new());
        Ok(Convergence::NotAwaited)
    }

    async fn wait(&self, zone_name: &str) -> CoreResult<Convergence> {
        if !self.ctx.config.dns_zone.wait_on_complete {
            return Ok(Convergence::NotAwaited);
        }
        let (interval, timeout) = self.ctx.config.dns_zone_wait();
        await_convergence(
            self.client.as_ref(),
            zone_name,
            interval,
            timeout,
            &self.ctx.cancel,
        )
        .await
    }

    async fn refresh<D: ResourceData + ?Sized>(&self, d: &mut D, zone_name: &str) -> CoreResult<()> {
        let zone = self.client.fetch(zone_name).await?;
        populate_zone_state(d, &zone);
        d.set_id(zone_identity(&zone.version_id, &zone.zone, zone_name));
        log::debug!("[{FAMILY}] zone {zone_name} at version {}", zone.version_id);
        Ok(())
    }
}
