//! DNS zone reconciliation

use cdn_provisioner_client::{Zone, ZoneCreate};

use super::field::FieldWriter;
use super::required_string;
use crate::error::{CoreError, CoreResult};
use crate::traits::ResourceData;
use crate::types::AttrValue;

const FAMILY: &str = "dns_zone";

/// Zone payload from the declared configuration, layered over `base` when the
/// zone already exists.
pub fn build_zone_payload<D: ResourceData + ?Sized>(
    d: &D,
    base: Option<&Zone>,
) -> CoreResult<ZoneCreate> {
    let zone = required_string(d, "zone")?;
    let mut payload = base.map(Zone::to_payload).unwrap_or_default();
    payload.zone = zone;

    let w = FieldWriter::new(d, FAMILY);
    w.string("type", &mut payload.zone_type)?;
    w.list("masters", &mut payload.masters)?;
    w.string("comment", &mut payload.comment)?;
    w.bool("signandserve", &mut payload.sign_and_serve)?;

    if payload.zone_type.is_empty() {
        return Err(CoreError::Validation(format!(
            "type not set for zone {}",
            payload.zone
        )));
    }
    Ok(payload)
}

/// Write the fetched zone into state.
pub fn populate_zone_state<D: ResourceData + ?Sized>(d: &mut D, zone: &Zone) {
    d.set("zone", AttrValue::from(zone.zone.as_str()));
    d.set("type", AttrValue::from(zone.zone_type.as_str()));
    d.set("masters", AttrValue::from(zone.masters.clone()));
    d.set("comment", AttrValue::from(zone.comment.as_str()));
    d.set("signandserve", AttrValue::from(zone.sign_and_serve));
    if !zone.contract_id.is_empty() {
        d.set("contractid", AttrValue::from(zone.contract_id.as_str()));
    }
}
