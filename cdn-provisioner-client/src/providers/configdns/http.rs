//! Config-DNS request helpers

use reqwest::Method;
use serde::Deserialize;

use crate::error::Result;
use crate::http_client::ApiRequest;
use crate::types::{ScopeArgs, ZoneCreate};

use super::{API_NAME, CONFIG_DNS_BASE, ConfigDnsClient};

/// Response of `POST /zones/delete-requests`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeleteRequestStatus {
    pub request_id: String,
}

pub(crate) fn zone_path(zone: &str) -> String {
    format!("{CONFIG_DNS_BASE}/zones/{}", urlencoding::encode(zone))
}

/// Primary zones need an initial change list before records can be served.
pub(crate) fn needs_changelist(payload: &ZoneCreate) -> bool {
    payload.zone_type.eq_ignore_ascii_case("primary")
}

impl ConfigDnsClient {
    pub(crate) async fn post_zone(&self, payload: &ZoneCreate, scope: &ScopeArgs) -> Result<()> {
        let req = ApiRequest::new(Method::POST, format!("{CONFIG_DNS_BASE}/zones"), &payload.zone)
            .query(scope.to_query_pairs())
            .json_body(API_NAME, payload)?;
        self.transport.send(req).await?;
        Ok(())
    }

    /// Create the initial change list for a new zone and submit it.
    pub(crate) async fn save_and_submit_changelist(&self, zone: &str) -> Result<()> {
        let save = ApiRequest::new(Method::POST, format!("{CONFIG_DNS_BASE}/changelists"), zone)
            .query([("zone", zone.to_string())]);
        self.transport.send(save).await?;

        let submit = ApiRequest::new(
            Method::POST,
            format!(
                "{CONFIG_DNS_BASE}/changelists/{}/submit",
                urlencoding::encode(zone)
            ),
            zone,
        );
        self.transport.send(submit).await?;
        log::debug!("[{API_NAME}] Change list submitted for zone {zone}");
        Ok(())
    }

    /// Submit a forced delete request; returns the vendor request id when one is echoed.
    pub(crate) async fn request_delete(&self, zone: &str) -> Result<Option<String>> {
        let body = serde_json::json!({ "zones": [zone] });
        let req = ApiRequest::new(
            Method::POST,
            format!("{CONFIG_DNS_BASE}/zones/delete-requests"),
            zone,
        )
        .query([("force", "true".to_string())])
        .json_body(API_NAME, &body)?;
        let (_, text) = self.transport.send(req).await?;
        Ok(serde_json::from_str::<DeleteRequestStatus>(&text)
            .ok()
            .map(|s| s.request_id))
    }
}
