//! Desired-state reconciliation
//!
//! Builds outbound payloads from declared configuration and writes fetched
//! remote objects back into it. Only attributes that are present, or that
//! were explicitly changed, may overwrite remote values.

mod dns_zone;
mod field;
mod gtm_domain;
mod policy;

pub use dns_zone::{build_zone_payload, populate_zone_state};
pub use field::FieldWriter;
pub use gtm_domain::{populate_domain_object, populate_domain_state, populate_new_domain_object};
pub use policy::{ErrorTolerancePolicy, MissingObjectPolicy};

use cdn_provisioner_client::ScopeArgs;

use crate::error::{CoreError, CoreResult};
use crate::traits::ResourceData;
use crate::types::AttrError;

/// A string attribute, with absence read as the empty string.
pub(crate) fn optional_string<D: ResourceData + ?Sized>(d: &D, key: &str) -> CoreResult<String> {
    match d.get_string(key) {
        Ok(v) => Ok(v),
        Err(AttrError::NotFound(_)) => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

/// A string attribute that must be declared.
pub(crate) fn required_string<D: ResourceData + ?Sized>(d: &D, key: &str) -> CoreResult<String> {
    match d.get_string(key) {
        Err(AttrError::NotFound(_)) => Err(CoreError::Validation(format!("{key} not set"))),
        other => other.map_err(Into::into),
    }
}

/// Contract/group scope from the declared configuration.
pub fn scope_args<D: ResourceData + ?Sized>(
    d: &D,
    contract_key: &str,
    group_key: &str,
) -> CoreResult<ScopeArgs> {
    Ok(ScopeArgs::new(
        &optional_string(d, contract_key)?,
        &optional_string(d, group_key)?,
    ))
}

/// Reject an update that renames an existing resource.
///
/// The identity-bearing attribute cannot change in place; the resource has to
/// be replaced instead.
pub fn verify_id_unchanged<D: ResourceData + ?Sized>(d: &D, key: &str) -> CoreResult<()> {
    if d.id().is_empty() || !d.has_change(key) {
        return Ok(());
    }
    match d.get_change(key) {
        (Some(old), new) if !old.is_empty() && Some(old) != new => {
            Err(CoreError::Validation(format!(
                "{key} cannot be changed on an existing resource (id {})",
                d.id()
            )))
        }
        _ => Ok(()),
    }
}
