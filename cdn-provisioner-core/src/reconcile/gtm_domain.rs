//! GTM domain reconciliation

use cdn_provisioner_client::{DomainType, GtmDomain};

use super::field::FieldWriter;
use super::{optional_string, required_string};
use crate::error::{CoreError, CoreResult};
use crate::traits::ResourceData;
use crate::types::AttrValue;

const FAMILY: &str = "gtm_domain";

fn validate_type(raw: &str) -> CoreResult<()> {
    raw.parse::<DomainType>()
        .map(|_| ())
        .map_err(|e| CoreError::Validation(format!("invalid domain type '{raw}': {e}")))
}

/// A new domain object built from the declared configuration.
///
/// `name` and `type` are required; every other attribute left undeclared takes
/// the vendor default.
pub fn populate_new_domain_object<D: ResourceData + ?Sized>(d: &D) -> CoreResult<GtmDomain> {
    let name = required_string(d, "name")?;
    let domain_type = required_string(d, "type")?;
    validate_type(&domain_type)?;
    let mut dom = GtmDomain::new(name, domain_type);
    populate_domain_object(d, &mut dom)?;
    Ok(dom)
}

/// Overwrite fields of `dom` from the declared configuration.
pub fn populate_domain_object<D: ResourceData + ?Sized>(
    d: &D,
    dom: &mut GtmDomain,
) -> CoreResult<()> {
    let name = optional_string(d, "name")?;
    if name != dom.name {
        log::error!(
            "[{FAMILY}] declared name '{name}' does not match remote domain '{}'",
            dom.name
        );
        return Err(CoreError::Validation(
            "state and remote names inconsistent".to_string(),
        ));
    }

    let w = FieldWriter::new(d, FAMILY);
    w.string("type", &mut dom.domain_type)?;
    if !dom.domain_type.is_empty() {
        validate_type(&dom.domain_type)?;
    }

    w.float32(
        "default_unreachable_threshold",
        &mut dom.default_unreachable_threshold,
    )?;
    w.list(
        "email_notification_list",
        &mut dom.email_notification_list,
    )?;
    w.float32(
        "min_pingable_region_fraction",
        &mut dom.min_pingable_region_fraction,
    )?;
    w.int32(
        "default_timeout_penalty",
        &mut dom.default_timeout_penalty,
    )?;
    w.int32(
        "servermonitor_liveness_count",
        &mut dom.servermonitor_liveness_count,
    )?;
    w.string("round_robin_prefix", &mut dom.round_robin_prefix)?;
    w.int32(
        "servermonitor_load_count",
        &mut dom.servermonitor_load_count,
    )?;
    w.int32("ping_interval", &mut dom.ping_interval)?;
    w.int("max_ttl", &mut dom.max_ttl)?;
    w.float(
        "load_imbalance_percentage",
        &mut dom.load_imbalance_percentage,
    )?;
    w.float("default_health_max", &mut dom.default_health_max)?;
    w.int32("map_update_interval", &mut dom.map_update_interval)?;
    w.int32("max_properties", &mut dom.max_properties)?;
    w.int32("max_resources", &mut dom.max_resources)?;
    w.string(
        "default_ssl_client_private_key",
        &mut dom.default_ssl_client_private_key,
    )?;
    w.int32("default_error_penalty", &mut dom.default_error_penalty)?;
    w.float("max_test_timeout", &mut dom.max_test_timeout)?;
    w.bool(
        "cname_coalescing_enabled",
        &mut dom.cname_coalescing_enabled,
    )?;
    w.float(
        "default_health_multiplier",
        &mut dom.default_health_multiplier,
    )?;
    w.string("servermonitor_pool", &mut dom.servermonitor_pool)?;
    w.bool("load_feedback", &mut dom.load_feedback)?;
    w.int("min_ttl", &mut dom.min_ttl)?;
    w.int32(
        "default_max_unreachable_penalty",
        &mut dom.default_max_unreachable_penalty,
    )?;
    w.float(
        "default_health_threshold",
        &mut dom.default_health_threshold,
    )?;
    w.string("comment", &mut dom.modification_comments)?;
    w.int32("min_test_interval", &mut dom.min_test_interval)?;
    w.int32("ping_packet_size", &mut dom.ping_packet_size)?;
    w.string(
        "default_ssl_client_certificate",
        &mut dom.default_ssl_client_certificate,
    )?;
    w.bool(
        "end_user_mapping_enabled",
        &mut dom.end_user_mapping_enabled,
    )?;
    Ok(())
}

/// Write every modelled field of a fetched domain into state.
pub fn populate_domain_state<D: ResourceData + ?Sized>(d: &mut D, dom: &GtmDomain) {
    let values: [(&str, AttrValue); 31] = [
        ("name", dom.name.clone().into()),
        ("type", dom.domain_type.clone().into()),
        (
            "default_unreachable_threshold",
            dom.default_unreachable_threshold.into(),
        ),
        (
            "email_notification_list",
            dom.email_notification_list.clone().into(),
        ),
        (
            "min_pingable_region_fraction",
            dom.min_pingable_region_fraction.into(),
        ),
        ("default_timeout_penalty", dom.default_timeout_penalty.into()),
        (
            "servermonitor_liveness_count",
            dom.servermonitor_liveness_count.into(),
        ),
        ("round_robin_prefix", dom.round_robin_prefix.clone().into()),
        ("servermonitor_load_count", dom.servermonitor_load_count.into()),
        ("ping_interval", dom.ping_interval.into()),
        ("max_ttl", dom.max_ttl.into()),
        ("load_imbalance_percentage", dom.load_imbalance_percentage.into()),
        ("default_health_max", dom.default_health_max.into()),
        ("map_update_interval", dom.map_update_interval.into()),
        ("max_properties", dom.max_properties.into()),
        ("max_resources", dom.max_resources.into()),
        (
            "default_ssl_client_private_key",
            dom.default_ssl_client_private_key.clone().into(),
        ),
        ("default_error_penalty", dom.default_error_penalty.into()),
        ("max_test_timeout", dom.max_test_timeout.into()),
        ("cname_coalescing_enabled", dom.cname_coalescing_enabled.into()),
        ("default_health_multiplier", dom.default_health_multiplier.into()),
        ("servermonitor_pool", dom.servermonitor_pool.clone().into()),
        ("load_feedback", dom.load_feedback.into()),
        ("min_ttl", dom.min_ttl.into()),
        (
            "default_max_unreachable_penalty",
            dom.default_max_unreachable_penalty.into(),
        ),
        ("default_health_threshold", dom.default_health_threshold.into()),
        ("comment", dom.modification_comments.clone().into()),
        ("min_test_interval", dom.min_test_interval.into()),
        ("ping_packet_size", dom.ping_packet_size.into()),
        (
            "default_ssl_client_certificate",
            dom.default_ssl_client_certificate.clone().into(),
        ),
        ("end_user_mapping_enabled", dom.end_user_mapping_enabled.into()),
    ];
    for (key, value) in values {
        d.set(key, value);
    }
    log::debug!("[{FAMILY}] state populated from domain {}", dom.name);
}
