//! Provisioner configuration
//!
//! Loaded from a TOML file; every field has a default so an empty file (or
//! no file at all) is a valid configuration.
//!
//! ```toml
//! error_tolerance = "strict"
//!
//! [client]
//! base_url = "https://akab-xxxx.luna.akamaiapis.net"
//! credentials = { kind = "bearer_token", token = "..." }
//!
//! [convergence]
//! poll_interval_secs = 5
//! timeout_secs = 300
//!
//! [dns_zone]
//! wait_on_complete = false
//! on_missing_update = "seed_blank"
//!
//! [gtm_domain]
//! on_missing_update = "fail"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use cdn_provisioner_client::ClientConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reconcile::{ErrorTolerancePolicy, MissingObjectPolicy};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "CDN_PROVISIONER_CONFIG";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionerConfig {
    /// Vendor API connection settings.
    pub client: ClientConfig,
    /// Default convergence wait budget.
    pub convergence: ConvergenceConfig,
    pub dns_zone: DnsZoneConfig,
    pub gtm_domain: GtmDomainConfig,
    pub error_tolerance: ErrorTolerancePolicy,
}

/// Poll interval and overall budget for convergence waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvergenceConfig {
    pub poll_interval_secs: u64,
    pub timeout_secs: u64,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
            timeout_secs: 300,
        }
    }
}

impl ConvergenceConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsZoneConfig {
    /// Wait for zone activation after create/update. Deletes never wait.
    pub wait_on_complete: bool,
    pub on_missing_update: MissingObjectPolicy,
    /// Overrides the top-level `[convergence]` section.
    pub convergence: Option<ConvergenceConfig>,
}

impl Default for DnsZoneConfig {
    fn default() -> Self {
        Self {
            wait_on_complete: false,
            on_missing_update: MissingObjectPolicy::SeedBlank,
            convergence: None,
        }
    }
}

/// GTM waits are controlled per resource by the `wait_on_complete` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GtmDomainConfig {
    pub on_missing_update: MissingObjectPolicy,
    /// Overrides the top-level `[convergence]` section.
    pub convergence: Option<ConvergenceConfig>,
}

impl Default for GtmDomainConfig {
    fn default() -> Self {
        Self {
            on_missing_update: MissingObjectPolicy::Fail,
            convergence: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("error reading \"{}\": {err}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("error parsing \"{}\": {err}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        err: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ProvisionerConfig {
    /// Load from the file named by [`CONFIG_PATH_ENV`], or defaults when it is unset.
    pub fn load() -> Result<Self, ConfigLoadError> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => {
                log::debug!("{CONFIG_PATH_ENV} not set, using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Load a configuration from the given TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents = std::fs::read_to_string(path).map_err(|err| ConfigLoadError::Io {
            path: path.to_path_buf(),
            err,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
            path: path.to_path_buf(),
            err,
        })?;
        config.validate()?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject settings the convergence waiter cannot run with.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let sections = [
            ("convergence", Some(self.convergence)),
            ("dns_zone.convergence", self.dns_zone.convergence),
            ("gtm_domain.convergence", self.gtm_domain.convergence),
        ];
        for (name, section) in sections {
            if section.is_some_and(|c| c.poll_interval_secs == 0) {
                return Err(ConfigLoadError::Invalid(format!(
                    "{name}.poll_interval_secs must be greater than zero"
                )));
            }
        }
        Ok(())
    }

    /// Effective `(interval, timeout)` for DNS zone waits.
    pub fn dns_zone_wait(&self) -> (Duration, Duration) {
        self.wait_budget(self.dns_zone.convergence)
    }

    /// Effective `(interval, timeout)` for GTM domain waits.
    pub fn gtm_domain_wait(&self) -> (Duration, Duration) {
        self.wait_budget(self.gtm_domain.convergence)
    }

    fn wait_budget(&self, family: Option<ConvergenceConfig>) -> (Duration, Duration) {
        let c = family.unwrap_or(self.convergence);
        let interval = c.poll_interval();
        (
            interval,
            self.error_tolerance.wait_timeout(interval, c.timeout()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config: ProvisionerConfig = toml::from_str("").unwrap();
        assert_eq!(config, ProvisionerConfig::default());
        assert_eq!(config.error_tolerance, ErrorTolerancePolicy::Strict);
        assert_eq!(
            config.dns_zone.on_missing_update,
            MissingObjectPolicy::SeedBlank
        );
        assert_eq!(config.gtm_domain.on_missing_update, MissingObjectPolicy::Fail);
        assert!(!config.dns_zone.wait_on_complete);
        assert_eq!(
            config.gtm_domain_wait(),
            (Duration::from_secs(5), Duration::from_secs(300))
        );
    }

    #[test]
    fn family_override_and_tolerance_clamp() {
        let config: ProvisionerConfig = toml::from_str(
            r#"
            error_tolerance = "tolerate_known_benign_conflicts"

            [client]
            base_url = "https://api.example.test/"
            max_retries = 0

            [convergence]
            poll_interval_secs = 10
            timeout_secs = 600

            [dns_zone]
            wait_on_complete = true
            convergence = { poll_interval_secs = 2, timeout_secs = 20 }
            "#,
        )
        .unwrap();
        assert_eq!(config.client.normalized_base_url(), "https://api.example.test");
        assert_eq!(config.client.max_retries, 0);
        assert!(config.dns_zone.wait_on_complete);
        assert_eq!(
            config.dns_zone_wait(),
            (Duration::from_secs(2), Duration::from_secs(4))
        );
        assert_eq!(
            config.gtm_domain_wait(),
            (Duration::from_secs(10), Duration::from_secs(20))
        );
    }

    #[test]
    fn zero_interval_rejected() {
        let config: ProvisionerConfig =
            toml::from_str("[gtm_domain]\nconvergence = { poll_interval_secs = 0 }").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigLoadError::Invalid(msg)) if msg.contains("gtm_domain")
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ProvisionerConfig::from_file(Path::new("/nonexistent/provisioner.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::Io { .. }));
    }

    #[test]
    fn bad_toml_is_parse_error() {
        let path = std::env::temp_dir().join(format!(
            "cdn-provisioner-{}.toml",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, "error_tolerance = 3").unwrap();
        let err = ProvisionerConfig::from_file(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, ConfigLoadError::Parse { .. }));
    }
}
