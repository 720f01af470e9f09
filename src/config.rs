use std::time::Duration;

use crate::geocode::ConfigurationError;

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Shortest pause the Nominatim usage policy allows.
const POLICY_MIN_INTERVAL: Duration = Duration::from_millis(1000);

pub fn default_user_agent() -> String {
    format!("AddressResolver/{}", env!("CARGO_PKG_VERSION"))
}

/// Settings of the geocoding client.
#[derive(Debug, Clone, PartialEq)]
pub struct Cfg {
    pub endpoint: String,
    pub user_agent: String,
    /// Contact address sent as the `email` query parameter.
    pub email: Option<String>,
    pub timeout: Duration,
    /// Pause after every request.
    pub interval: Duration,
}

impl Cfg {
    /// Reject settings the client cannot work with.
    pub fn validate(self) -> Result<Self, ConfigurationError> {
        let endpoint = self.endpoint.trim().to_string();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigurationError::InvalidSetting {
                name: "endpoint",
                reason: format!("'{}' is not an http(s) URL", self.endpoint),
            });
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigurationError::InvalidSetting {
                name: "user-agent",
                reason: "must not be empty".into(),
            });
        }
        if self.timeout.is_zero() {
            return Err(ConfigurationError::InvalidSetting {
                name: "timeout",
                reason: "must be greater than zero".into(),
            });
        }
        if self.interval < POLICY_MIN_INTERVAL {
            log::warn!(
                "Request interval of {:?} exceeds the provider limit of one request per second",
                self.interval
            );
        }
        if self.email.is_none() {
            log::info!("No contact email configured; set GEOCODER_EMAIL to identify yourself");
        }
        Ok(Self {
            endpoint,
            email: self.email.filter(|e| !e.trim().is_empty()),
            ..self
        })
    }
}

impl Default for Cfg {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: default_user_agent(),
            email: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
        }
    }
}
