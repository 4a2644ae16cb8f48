//! Config-DNS `RemoteObjectClient` implementation

use async_trait::async_trait;
use reqwest::Method;

use crate::error::Result;
use crate::http_client::ApiRequest;
use crate::traits::RemoteObjectClient;
use crate::types::{ChangeReport, ScopeArgs, Zone, ZoneCreate};

use super::http::{needs_changelist, zone_path};
use super::{API_NAME, ConfigDnsClient};

#[async_trait]
impl RemoteObjectClient for ConfigDnsClient {
    type Object = Zone;
    type Payload = ZoneCreate;

    fn api(&self) -> &'static str {
        API_NAME
    }

    async fn fetch(&self, key: &str) -> Result<Zone> {
        self.transport
            .send_json(ApiRequest::new(Method::GET, zone_path(key), key))
            .await
    }

    async fn create(&self, payload: &ZoneCreate, scope: &ScopeArgs) -> Result<ChangeReport> {
        self.post_zone(payload, scope).await?;
        if needs_changelist(payload) {
            self.save_and_submit_changelist(&payload.zone).await?;
        }
        Ok(ChangeReport::pending(format!(
            "zone {} created",
            payload.zone
        )))
    }

    async fn update(&self, payload: &ZoneCreate, scope: &ScopeArgs) -> Result<ChangeReport> {
        let req = ApiRequest::new(Method::PUT, zone_path(&payload.zone), &payload.zone)
            .query(scope.to_query_pairs())
            .json_body(API_NAME, payload)?;
        self.transport.send(req).await?;
        Ok(ChangeReport::pending(format!(
            "zone {} updated",
            payload.zone
        )))
    }

    async fn delete(&self, payload: &ZoneCreate, _scope: &ScopeArgs) -> Result<ChangeReport> {
        let request_id = self.request_delete(&payload.zone).await?;
        let mut report = ChangeReport::pending(format!("zone {} delete requested", payload.zone));
        report.change_id = request_id;
        Ok(report)
    }

    async fn fetch_status(&self, key: &str) -> Result<ChangeReport> {
        let zone = self.fetch(key).await?;
        Ok(ChangeReport::new(
            zone.change_status(),
            format!("activationState {}", zone.activation_state),
        ))
    }
}
