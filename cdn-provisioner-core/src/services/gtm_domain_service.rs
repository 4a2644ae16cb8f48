//! GTM domain lifecycle service

use std::sync::Arc;

use cdn_provisioner_client::{ChangeReport, DomainClient};

use crate::convergence::{Convergence, await_convergence};
use crate::error::{CoreError, CoreResult, OperationContext};
use crate::reconcile::{
    MissingObjectPolicy, populate_domain_object, populate_domain_state,
    populate_new_domain_object, required_string, scope_args, verify_id_unchanged,
};
use crate::services::{ServiceContext, ensure_not_denied, log_failure};
use crate::traits::ResourceData;
use crate::types::AttrError;
use crate::utils::{domain_identity, resource_key};

const FAMILY: &str = "gtm_domain";

/// GTM domain lifecycle service
///
/// The identity token is the domain name. Waits are controlled per resource
/// by the `wait_on_complete` attribute (default `true`).
pub struct GtmDomainService {
    ctx: Arc<ServiceContext>,
    client: DomainClient,
}

impl GtmDomainService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, client: DomainClient) -> Self {
        Self { ctx, client }
    }

    pub async fn create<D: ResourceData + ?Sized>(&self, d: &mut D) -> CoreResult<Convergence> {
        self.create_domain(d)
            .await
            .in_operation("Domain Create")
            .map_err(|e| log_failure(FAMILY, e))
    }

    pub async fn read<D: ResourceData + ?Sized>(&self, d: &mut D) -> CoreResult<()> {
        let result = match domain_key(d) {
            Ok(name) => self.refresh(d, &name).await,
            Err(e) => Err(e),
        };
        result
            .in_operation("Domain Read")
            .map_err(|e| log_failure(FAMILY, e))
    }

    pub async fn update<D: ResourceData + ?Sized>(&self, d: &mut D) -> CoreResult<Convergence> {
        self.update_domain(d)
            .await
            .in_operation("Domain Update")
            .map_err(|e| log_failure(FAMILY, e))
    }

    pub async fn delete<D: ResourceData + ?Sized>(&self, d: &mut D) -> CoreResult<Convergence> {
        self.delete_domain(d)
            .await
            .in_operation("Domain Delete")
            .map_err(|e| log_failure(FAMILY, e))
    }

    pub async fn exists<D: ResourceData + ?Sized>(&self, d: &D) -> CoreResult<bool> {
        self.domain_exists(d)
            .await
            .in_operation("Domain Exists")
            .map_err(|e| log_failure(FAMILY, e))
    }

    /// Import by domain name.
    pub async fn import<D: ResourceData + ?Sized>(&self, d: &mut D, token: &str) -> CoreResult<()> {
        log::info!("[{FAMILY}] importing domain {token}");
        self.refresh(d, token)
            .await
            .in_operation("Domain Import")
            .map_err(|e| log_failure(FAMILY, e))
    }

    async fn create_domain<D: ResourceData + ?Sized>(&self, d: &mut D) -> CoreResult<Convergence> {
        let name = required_string(d, "name")?;
        let scope = scope_args(d, "contract", "group")?;
        let wait = wait_on_complete(d)?;
        let policy = self.ctx.config.error_tolerance;
        let _guard = self
            .ctx
            .locks
            .acquire(&resource_key(FAMILY, &name))
            .await;

        match self.client.fetch(&name).await {
            Ok(_) if policy.tolerates_existing_domain() => {
                log::warn!("[{FAMILY}] domain {name} already exists, adopting it");
                self.refresh(d, &name).await?;
                return Ok(Convergence::NotAwaited);
            }
            Ok(_) => {
                return Err(CoreError::Validation(format!(
                    "domain {name} already exists; import it instead"
                )));
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }

        let dom = populate_new_domain_object(d)?;
        log::info!("[{FAMILY}] creating {} domain {name}", dom.domain_type);
        let outcome = match self.client.create(&dom, &scope).await {
            Ok(report) => self.settle(&name, &report, wait).await?,
            Err(e) if policy.tolerates_create_conflict(&e) => {
                log::warn!("[{FAMILY}] domain {name} already exists, ignoring create rejection");
                Convergence::NotAwaited
            }
            Err(e) => return Err(e.into()),
        };

        if outcome == Convergence::Cancelled {
            d.set_id(domain_identity(&name));
            return Ok(outcome);
        }
        self.refresh(d, &name).await?;
        Ok(outcome)
    }

    async fn domain_exists<D: ResourceData + ?Sized>(&self, d: &D) -> CoreResult<bool> {
        let name = domain_key(d)?;
        match self.client.fetch(&name).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_domain<D: ResourceData + ?Sized>(&self, d: &mut D) -> CoreResult<Convergence> {
        verify_id_unchanged(d, "name")?;
        let name = domain_key(d)?;
        let scope = scope_args(d, "contract", "group")?;
        let wait = wait_on_complete(d)?;
        let _guard = self
            .ctx
            .locks
            .acquire(&resource_key(FAMILY, &name))
            .await;

        let dom = match self.client.fetch(&name).await {
            Ok(mut existing) => {
                populate_domain_object(d, &mut existing)?;
                existing
            }
            Err(e) if e.is_not_found() => match self.ctx.config.gtm_domain.on_missing_update {
                MissingObjectPolicy::SeedBlank => {
                    log::warn!("[{FAMILY}] domain {name} not found, updating from a blank domain");
                    populate_new_domain_object(d)?
                }
                MissingObjectPolicy::Fail => return Err(e.into()),
            },
            Err(e) => return Err(e.into()),
        };

        log::info!("[{FAMILY}] updating domain {name}");
        let report = self.client.update(&dom, &scope).await?;
        let outcome = self.settle(&name, &report, wait).await?;
        if outcome != Convergence::Cancelled {
            self.refresh(d, &name).await?;
        }
        Ok(outcome)
    }

    async fn delete_domain<D: ResourceData + ?Sized>(&self, d: &mut D) -> CoreResult<Convergence> {
        let name = domain_key(d)?;
        let scope = scope_args(d, "contract", "group")?;
        let wait = wait_on_complete(d)?;
        let policy = self.ctx.config.error_tolerance;
        let _guard = self
            .ctx
            .locks
            .acquire(&resource_key(FAMILY, &name))
            .await;

        let existing = self.client.fetch(&name).await?;
        log::info!("[{FAMILY}] deleting domain {name}");
        let outcome = match self.client.delete(&existing, &scope).await {
            Ok(report) => match self.settle(&name, &report, wait).await {
                Err(e) if e.is_not_found() => {
                    log::debug!("[{FAMILY}] domain {name} status gone after delete");
                    Convergence::Converged
                }
                settled => settled?,
            },
            Err(e) if policy.tolerates_delete_rejection(&e) => {
                log::warn!("[{FAMILY}] domain {name} delete not supported, ignoring rejection");
                Convergence::NotAwaited
            }
            Err(e) => return Err(e.into()),
        };

        d.set_id(String::new());
        Ok(outcome)
    }

    /// Check a mutation report and wait for it when the resource asks to.
    async fn settle(&self, name: &str, report: &ChangeReport, wait: bool) -> CoreResult<Convergence> {
        log::debug!("[{FAMILY}] {name} change status {}", report.status);
        ensure_not_denied(report)?;
        if !wait {
            return Ok(Convergence::NotAwaited);
        }
        let (interval, timeout) = self.ctx.config.gtm_domain_wait();
        let outcome = await_convergence(
            self.client.as_ref(),
            name,
            interval,
            timeout,
            &self.ctx.cancel,
        )
        .await?;
        if outcome == Convergence::TimedOut {
            log::info!("[{FAMILY}] change on {name} still pending");
        }
        Ok(outcome)
    }

    async fn refresh<D: ResourceData + ?Sized>(&self, d: &mut D, name: &str) -> CoreResult<()> {
        let dom = self.client.fetch(name).await?;
        populate_domain_state(d, &dom);
        d.set_id(domain_identity(&dom.name));
        Ok(())
    }
}

/// Lookup key: the identity when set, otherwise the declared name.
fn domain_key<D: ResourceData + ?Sized>(d: &D) -> CoreResult<String> {
    if d.id().is_empty() {
        required_string(d, "name")
    } else {
        Ok(d.id().to_string())
    }
}

fn wait_on_complete<D: ResourceData + ?Sized>(d: &D) -> CoreResult<bool> {
    match d.get_bool("wait_on_complete") {
        Ok(wait) => Ok(wait),
        Err(AttrError::NotFound(_)) => Ok(true),
        Err(e) => Err(e.into()),
    }
}
