use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============ Client configuration ============

/// Connection settings shared by every vendor API client.
///
/// # Default
///
/// No base URL, 3 retries, 10s connect timeout, 30s request timeout, no credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "snake_case")]
pub struct ClientConfig {
    /// Vendor API host including scheme, e.g. `https://akab-xxxx.luna.akamaiapis.net`.
    pub base_url: String,
    /// Retries for transient failures (0 disables retry).
    pub max_retries: u32,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// How requests are authenticated.
    pub credentials: Credentials,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            max_retries: 3,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            credentials: Credentials::None,
        }
    }
}

impl ClientConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Base URL without a trailing slash.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Request authentication material.
///
/// Vendor request signing is not implemented here; these variants cover
/// gateways that accept a static token or header.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Credentials {
    #[default]
    None,
    BearerToken {
        token: String,
    },
    Header {
        name: String,
        value: String,
    },
}

// ============ Change status ============

/// Propagation state of a submitted change, as reported by the vendor.
///
/// Unknown strings are kept verbatim in [`Unrecognized`](Self::Unrecognized)
/// instead of failing deserialization, so the waiter can report them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeStatus {
    Pending,
    Complete,
    Denied,
    Unrecognized(String),
}

impl ChangeStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Complete => "COMPLETE",
            Self::Denied => "DENIED",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<&str> for ChangeStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "PENDING" => Self::Pending,
            "COMPLETE" => Self::Complete,
            "DENIED" => Self::Denied,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ChangeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChangeStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

/// Status block returned by mutating calls and by the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeReport {
    #[serde(rename = "propagationStatus")]
    pub status: ChangeStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passing_validation: Option<bool>,
    #[serde(
        default,
        rename = "propagationStatusDate",
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub status_date: Option<DateTime<Utc>>,
}

impl ChangeReport {
    pub fn new(status: ChangeStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            change_id: None,
            passing_validation: None,
            status_date: None,
        }
    }

    pub fn pending(message: impl Into<String>) -> Self {
        Self::new(ChangeStatus::Pending, message)
    }
}

// ============ Scope arguments ============

/// Optional contract/group scope sent as query arguments on mutating calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeArgs {
    pub contract_id: Option<String>,
    pub group_id: Option<String>,
}

impl ScopeArgs {
    /// Build scope arguments, stripping `ctr_` / `grp_` prefixes and dropping empty values.
    pub fn new(contract: &str, group: &str) -> Self {
        let contract = contract.trim();
        let contract = contract.strip_prefix("ctr_").unwrap_or(contract);
        let group = group.trim();
        let group = group.strip_prefix("grp_").unwrap_or(group);
        Self {
            contract_id: (!contract.is_empty()).then(|| contract.to_string()),
            group_id: (!group.is_empty()).then(|| group.to_string()),
        }
    }

    /// Query pairs in the vendor's parameter names.
    pub fn to_query_pairs(&self) -> BTreeMap<&'static str, String> {
        let mut pairs = BTreeMap::new();
        if let Some(contract) = &self.contract_id {
            pairs.insert("contractId", contract.clone());
        }
        if let Some(group) = &self.group_id {
            pairs.insert("gid", group.clone());
        }
        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.contract_id.is_none() && self.group_id.is_none()
    }
}

// ============ Config-DNS zone ============

/// A zone as returned by `GET /config-dns/v2/zones/{zone}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    #[serde(default)]
    pub contract_id: String,
    pub zone: String,
    #[serde(rename = "type", default)]
    pub zone_type: String,
    #[serde(default)]
    pub masters: Vec<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub alias_count: i64,
    #[serde(default)]
    pub sign_and_serve: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_and_serve_algorithm: Option<String>,
    #[serde(default)]
    pub version_id: String,
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
    #[serde(
        default,
        with = "crate::utils::datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_activation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub activation_state: String,
}

impl Zone {
    /// Map the zone activation state onto the common change status.
    pub fn change_status(&self) -> ChangeStatus {
        match self.activation_state.as_str() {
            "ACTIVE" => ChangeStatus::Complete,
            "PENDING" | "NEW" => ChangeStatus::Pending,
            "ERROR" => ChangeStatus::Denied,
            other => ChangeStatus::Unrecognized(other.to_string()),
        }
    }

    /// The writable projection of this zone.
    pub fn to_payload(&self) -> ZoneCreate {
        ZoneCreate {
            zone: self.zone.clone(),
            zone_type: self.zone_type.clone(),
            masters: self.masters.clone(),
            comment: self.comment.clone(),
            sign_and_serve: self.sign_and_serve,
        }
    }
}

/// Request body for zone create/update/delete.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ZoneCreate {
    pub zone: String,
    #[serde(rename = "type")]
    pub zone_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub masters: Vec<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub sign_and_serve: bool,
}

// ============ GTM domain ============

/// GTM domain type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainType {
    Basic,
    Full,
    Weighted,
    Static,
    FailoverOnly,
}

impl DomainType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Full => "full",
            Self::Weighted => "weighted",
            Self::Static => "static",
            Self::FailoverOnly => "failover-only",
        }
    }
}

impl FromStr for DomainType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BASIC" => Ok(Self::Basic),
            "FULL" => Ok(Self::Full),
            "WEIGHTED" => Ok(Self::Weighted),
            "STATIC" => Ok(Self::Static),
            "FAILOVER-ONLY" => Ok(Self::FailoverOnly),
            _ => Err("type must be basic, full, weighted, static, or failover-only".to_string()),
        }
    }
}

impl fmt::Display for DomainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A GTM domain as exchanged with `/config-gtm/v1/domains`.
///
/// Nested collections (datacenters, properties, resources, …) are not modelled;
/// they ride along in `extra` so an update writes them back untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GtmDomain {
    pub name: String,
    #[serde(rename = "type")]
    pub domain_type: String,
    pub default_unreachable_threshold: f32,
    pub email_notification_list: Vec<String>,
    pub min_pingable_region_fraction: f32,
    pub default_timeout_penalty: i32,
    pub servermonitor_liveness_count: i32,
    pub round_robin_prefix: String,
    pub servermonitor_load_count: i32,
    pub ping_interval: i32,
    #[serde(rename = "maxTTL")]
    pub max_ttl: i64,
    pub load_imbalance_percentage: f64,
    pub default_health_max: f64,
    pub map_update_interval: i32,
    pub max_properties: i32,
    pub max_resources: i32,
    pub default_ssl_client_private_key: String,
    pub default_error_penalty: i32,
    pub max_test_timeout: f64,
    pub cname_coalescing_enabled: bool,
    pub default_health_multiplier: f64,
    pub servermonitor_pool: String,
    pub load_feedback: bool,
    #[serde(rename = "minTTL")]
    pub min_ttl: i64,
    pub default_max_unreachable_penalty: i32,
    pub default_health_threshold: f64,
    pub modification_comments: String,
    pub min_test_interval: i32,
    pub ping_packet_size: i32,
    pub default_ssl_client_certificate: String,
    pub end_user_mapping_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GtmDomain {
    /// A blank domain carrying only name and type; everything else takes vendor defaults.
    pub fn new(name: impl Into<String>, domain_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain_type: domain_type.into(),
            ..Self::default()
        }
    }
}

/// Envelope returned by GTM create/update/delete; the echoed `resource` is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GtmMutationResponse {
    pub status: ChangeReport,
}
