//! Reconciliation policies

use std::time::Duration;

use cdn_provisioner_client::ClientError;
use serde::{Deserialize, Serialize};

/// How vendor errors with a known benign meaning are treated.
///
/// `TolerateKnownBenignConflicts` exists for verification-only runs against
/// shared accounts. It must be selected explicitly in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorTolerancePolicy {
    /// Every error fails the operation.
    #[default]
    Strict,
    /// GTM "domain already exists" on create and "DELETE not supported" on
    /// delete are logged and treated as success. Convergence waits are
    /// limited to two polls.
    TolerateKnownBenignConflicts,
}

impl ErrorTolerancePolicy {
    /// GTM create rejected because the proposed domain name is already taken.
    pub fn tolerates_create_conflict(self, err: &ClientError) -> bool {
        self == Self::TolerateKnownBenignConflicts
            && err.status_code() == Some(400)
            && err.raw_body().is_some_and(|body| {
                body.contains("proposed domain name") && body.contains("Domain Validation Error")
            })
    }

    /// GTM delete rejected because the account may not delete domains.
    pub fn tolerates_delete_rejection(self, err: &ClientError) -> bool {
        self == Self::TolerateKnownBenignConflicts
            && err.status_code() == Some(405)
            && err.raw_body().is_some_and(|body| {
                body.contains("Bad Request") && body.contains("DELETE method is not supported")
            })
    }

    /// GTM create found the domain already present; adopt it instead of failing.
    pub fn tolerates_existing_domain(self) -> bool {
        self == Self::TolerateKnownBenignConflicts
    }

    /// Effective convergence timeout under this policy.
    ///
    /// The tolerant budget of two intervals allows one poll, one sleep and a
    /// final poll.
    pub fn wait_timeout(self, interval: Duration, timeout: Duration) -> Duration {
        match self {
            Self::Strict => timeout,
            Self::TolerateKnownBenignConflicts => timeout.min(interval.saturating_mul(2)),
        }
    }
}

/// What update does when the remote object is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingObjectPolicy {
    /// Continue from a blank object built from the declared configuration.
    SeedBlank,
    /// Return the not-found error.
    Fail,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANT: ErrorTolerancePolicy = ErrorTolerancePolicy::TolerateKnownBenignConflicts;

    fn validation(body: &str) -> ClientError {
        ClientError::Validation {
            api: "gtm".to_string(),
            status: 400,
            raw_body: body.to_string(),
        }
    }

    fn api(status: u16, body: &str) -> ClientError {
        ClientError::Api {
            api: "gtm".to_string(),
            status,
            raw_body: body.to_string(),
        }
    }

    const CONFLICT_BODY: &str =
        r#"{"title":"Domain Validation Error","detail":"proposed domain name is in use"}"#;
    const DELETE_BODY: &str = "Bad Request: DELETE method is not supported for this account";

    #[test]
    fn strict_tolerates_nothing() {
        let strict = ErrorTolerancePolicy::Strict;
        assert!(!strict.tolerates_create_conflict(&validation(CONFLICT_BODY)));
        assert!(!strict.tolerates_delete_rejection(&api(405, DELETE_BODY)));
    }

    #[test]
    fn tolerant_matches_exact_signatures() {
        assert!(TOLERANT.tolerates_create_conflict(&validation(CONFLICT_BODY)));
        assert!(TOLERANT.tolerates_delete_rejection(&api(405, DELETE_BODY)));
    }

    #[test]
    fn tolerant_requires_both_markers_and_status() {
        assert!(!TOLERANT.tolerates_create_conflict(&validation("Domain Validation Error")));
        assert!(!TOLERANT.tolerates_create_conflict(&api(409, CONFLICT_BODY)));
        assert!(!TOLERANT.tolerates_delete_rejection(&api(405, "Bad Request")));
        assert!(!TOLERANT.tolerates_delete_rejection(&api(400, DELETE_BODY)));
        let network = ClientError::NetworkError {
            api: "gtm".to_string(),
            detail: "connection reset".to_string(),
        };
        assert!(!TOLERANT.tolerates_create_conflict(&network));
    }

    #[test]
    fn tolerant_clamps_wait_to_two_intervals() {
        let interval = Duration::from_secs(5);
        let timeout = Duration::from_secs(300);
        assert_eq!(
            TOLERANT.wait_timeout(interval, timeout),
            Duration::from_secs(10)
        );
        assert_eq!(
            TOLERANT.wait_timeout(interval, Duration::from_secs(7)),
            Duration::from_secs(7)
        );
        assert_eq!(
            ErrorTolerancePolicy::Strict.wait_timeout(interval, timeout),
            timeout
        );
    }

    #[test]
    fn policies_use_snake_case() {
        let p: ErrorTolerancePolicy =
            serde_json::from_str(r#""tolerate_known_benign_conflicts""#).unwrap();
        assert_eq!(p, TOLERANT);
        let m: MissingObjectPolicy = serde_json::from_str(r#""seed_blank""#).unwrap();
        assert_eq!(m, MissingObjectPolicy::SeedBlank);
    }
}
