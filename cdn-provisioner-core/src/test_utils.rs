//! Test helpers
//!
//! In-memory remote object clients with scripted status sequences and
//! injectable failures.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use cdn_provisioner_client::{
    ChangeReport, ChangeStatus, ClientError, GtmDomain, RemoteObjectClient, Result, ScopeArgs,
    Zone, ZoneCreate,
};
use tokio::sync::Mutex;

use crate::config::ProvisionerConfig;
use crate::services::ServiceContext;

pub const ZONE_VERSION: &str = "ae02357c-693d-4ac4-b33d-8352d9b7c786";

pub fn report(status: ChangeStatus, message: &str) -> ChangeReport {
    ChangeReport::new(status, message)
}

struct MockState<O> {
    objects: HashMap<String, O>,
    statuses: VecDeque<Result<ChangeReport>>,
    status_polls: usize,
    calls: Vec<String>,
    mutation_report: Option<ChangeReport>,
    fetch_error: Option<ClientError>,
    fetch_misses: usize,
    create_error: Option<ClientError>,
    update_error: Option<ClientError>,
    delete_error: Option<ClientError>,
}

// ===== MockRemoteClient =====

/// In-memory remote object store.
///
/// Mutations apply immediately. `fetch_status` pops scripted reports and
/// answers `COMPLETE` once the script is exhausted. Injected errors stay in
/// place until cleared.
pub struct MockRemoteClient<O, P> {
    api: &'static str,
    materialize: fn(&P) -> (String, O),
    state: Mutex<MockState<O>>,
}

pub type MockZoneClient = MockRemoteClient<Zone, ZoneCreate>;
pub type MockDomainClient = MockRemoteClient<GtmDomain, GtmDomain>;

fn zone_from_payload(payload: &ZoneCreate) -> (String, Zone) {
    let zone = Zone {
        zone: payload.zone.clone(),
        zone_type: payload.zone_type.clone(),
        masters: payload.masters.clone(),
        comment: payload.comment.clone(),
        sign_and_serve: payload.sign_and_serve,
        version_id: ZONE_VERSION.to_string(),
        activation_state: "ACTIVE".to_string(),
        ..Zone::default()
    };
    (payload.zone.clone(), zone)
}

fn domain_from_payload(payload: &GtmDomain) -> (String, GtmDomain) {
    (payload.name.clone(), payload.clone())
}

impl MockZoneClient {
    pub fn new() -> Self {
        Self::with_materializer("configdns", zone_from_payload)
    }
}

impl MockDomainClient {
    pub fn new() -> Self {
        Self::with_materializer("gtm", domain_from_payload)
    }
}

impl<O: Clone, P> MockRemoteClient<O, P> {
    fn with_materializer(api: &'static str, materialize: fn(&P) -> (String, O)) -> Self {
        Self {
            api,
            materialize,
            state: Mutex::new(MockState {
                objects: HashMap::new(),
                statuses: VecDeque::new(),
                status_polls: 0,
                calls: Vec::new(),
                mutation_report: None,
                fetch_error: None,
                fetch_misses: 0,
                create_error: None,
                update_error: None,
                delete_error: None,
            }),
        }
    }

    pub async fn seed(&self, key: &str, object: O) {
        self.state
            .lock()
            .await
            .objects
            .insert(key.to_string(), object);
    }

    pub async fn object(&self, key: &str) -> Option<O> {
        self.state.lock().await.objects.get(key).cloned()
    }

    pub async fn push_statuses(&self, statuses: impl IntoIterator<Item = ChangeStatus>) {
        let mut state = self.state.lock().await;
        for status in statuses {
            state.statuses.push_back(Ok(report(status, "")));
        }
    }

    pub async fn push_report(&self, result: Result<ChangeReport>) {
        self.state.lock().await.statuses.push_back(result);
    }

    /// Report returned by create/update/delete (default: `PENDING`).
    pub async fn set_mutation_report(&self, report: ChangeReport) {
        self.state.lock().await.mutation_report = Some(report);
    }

    pub async fn set_fetch_error(&self, err: Option<ClientError>) {
        self.state.lock().await.fetch_error = err;
    }

    /// Answer the next `n` fetches with `NotFound` regardless of the store.
    pub async fn set_fetch_misses(&self, n: usize) {
        self.state.lock().await.fetch_misses = n;
    }

    pub async fn set_create_error(&self, err: Option<ClientError>) {
        self.state.lock().await.create_error = err;
    }

    pub async fn set_update_error(&self, err: Option<ClientError>) {
        self.state.lock().await.update_error = err;
    }

    pub async fn set_delete_error(&self, err: Option<ClientError>) {
        self.state.lock().await.delete_error = err;
    }

    pub async fn status_polls(&self) -> usize {
        self.state.lock().await.status_polls
    }

    /// Mutating calls so far, as `"create:<key>"`, `"update:<key>"`, `"delete:<key>"`.
    pub async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }

    fn not_found(&self, key: &str) -> ClientError {
        ClientError::NotFound {
            api: self.api.to_string(),
            key: key.to_string(),
            raw_message: None,
        }
    }
}

#[async_trait]
impl<O, P> RemoteObjectClient for MockRemoteClient<O, P>
where
    O: Clone + Send + Sync + 'static,
    P: Send + Sync + 'static,
{
    type Object = O;
    type Payload = P;

    fn api(&self) -> &'static str {
        self.api
    }

    async fn fetch(&self, key: &str) -> Result<O> {
        let mut state = self.state.lock().await;
        if let Some(err) = &state.fetch_error {
            return Err(err.clone());
        }
        if state.fetch_misses > 0 {
            state.fetch_misses -= 1;
            return Err(self.not_found(key));
        }
        state
            .objects
            .get(key)
            .cloned()
            .ok_or_else(|| self.not_found(key))
    }

    async fn create(&self, payload: &P, _scope: &ScopeArgs) -> Result<ChangeReport> {
        let (key, object) = (self.materialize)(payload);
        let mut state = self.state.lock().await;
        state.calls.push(format!("create:{key}"));
        if let Some(err) = &state.create_error {
            return Err(err.clone());
        }
        state.objects.insert(key, object);
        Ok(state
            .mutation_report
            .clone()
            .unwrap_or_else(|| ChangeReport::pending("")))
    }

    async fn update(&self, payload: &P, _scope: &ScopeArgs) -> Result<ChangeReport> {
        let (key, object) = (self.materialize)(payload);
        let mut state = self.state.lock().await;
        state.calls.push(format!("update:{key}"));
        if let Some(err) = &state.update_error {
            return Err(err.clone());
        }
        state.objects.insert(key, object);
        Ok(state
            .mutation_report
            .clone()
            .unwrap_or_else(|| ChangeReport::pending("")))
    }

    async fn delete(&self, payload: &P, _scope: &ScopeArgs) -> Result<ChangeReport> {
        let (key, _) = (self.materialize)(payload);
        let mut state = self.state.lock().await;
        state.calls.push(format!("delete:{key}"));
        if let Some(err) = &state.delete_error {
            return Err(err.clone());
        }
        state.objects.remove(&key);
        Ok(state
            .mutation_report
            .clone()
            .unwrap_or_else(|| ChangeReport::pending("")))
    }

    async fn fetch_status(&self, _key: &str) -> Result<ChangeReport> {
        let mut state = self.state.lock().await;
        state.status_polls += 1;
        state
            .statuses
            .pop_front()
            .unwrap_or_else(|| Ok(report(ChangeStatus::Complete, "")))
    }
}

// ===== Factories =====

pub fn create_test_context(config: ProvisionerConfig) -> Arc<ServiceContext> {
    Arc::new(ServiceContext::new(config))
}

/// A GTM domain as the vendor would return it after creation.
pub fn test_domain(name: &str) -> GtmDomain {
    let mut dom = GtmDomain::new(name, "weighted");
    dom.default_timeout_penalty = 25;
    dom.default_error_penalty = 75;
    dom.max_ttl = 172_800;
    dom.min_ttl = 0;
    dom.ping_interval = 60;
    dom.modification_comments = "Managed by provisioner".to_string();
    dom
}

/// Body of the vendor's "domain already exists" rejection.
pub const DOMAIN_CONFLICT_BODY: &str = r#"{"type":"https://problems.luna.akamaiapis.net/config-gtm/v1/domainValidationError","title":"Domain Validation Error","detail":"The proposed domain name example.akadns.net is already in use"}"#;

/// Body of the vendor's "DELETE not supported" rejection.
pub const DOMAIN_DELETE_BODY: &str =
    r#"{"title":"Bad Request","detail":"DELETE method is not supported for this domain"}"#;
