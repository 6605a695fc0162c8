// Configuration for ConsulClient

use std::{fmt, str::FromStr};

use crate::error::ClientError;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8500;
pub const DEFAULT_SCHEME: &str = "http";

/// Read consistency mode applied to KV and catalog reads
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Consistency {
    /// Leader-served reads without the extra quorum round trip
    #[default]
    Default,
    /// Leader verifies it still holds leadership before answering
    Consistent,
    /// Any server may answer, possibly with stale data
    Stale,
}

impl Consistency {
    /// Query flag sent on reads, `None` for the default mode
    pub fn query_flag(&self) -> Option<&'static str> {
        match self {
            Consistency::Default => None,
            Consistency::Consistent => Some("consistent"),
            Consistency::Stale => Some("stale"),
        }
    }
}

impl fmt::Display for Consistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Consistency::Default => write!(f, "default"),
            Consistency::Consistent => write!(f, "consistent"),
            Consistency::Stale => write!(f, "stale"),
        }
    }
}

impl FromStr for Consistency {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "default" => Ok(Consistency::Default),
            "consistent" => Ok(Consistency::Consistent),
            "stale" => Ok(Consistency::Stale),
            other => Err(ClientError::InvalidConfig(format!(
                "unknown consistency mode: {}",
                other
            ))),
        }
    }
}

/// Configuration for the Consul HTTP client
#[derive(Clone, Debug)]
pub struct ConsulConfig {
    /// Agent host name or IP (default: "localhost")
    pub host: String,
    /// Agent HTTP port (default: 8500)
    pub port: u16,
    /// URL scheme, "http" or "https"
    pub scheme: String,
    /// Read consistency mode
    pub consistency: Consistency,
    /// ACL token passed through as `X-Consul-Token`
    pub token: Option<String>,
    /// Datacenter to target, agent's own datacenter when unset
    pub datacenter: Option<String>,
    /// Connection timeout in milliseconds (default: 5000)
    pub connect_timeout_ms: u64,
    /// Read timeout in milliseconds (default: 30000)
    pub read_timeout_ms: u64,
}

impl Default for ConsulConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            scheme: DEFAULT_SCHEME.to_string(),
            consistency: Consistency::Default,
            token: None,
            datacenter: None,
            connect_timeout_ms: 5000,
            read_timeout_ms: 30000,
        }
    }
}

impl ConsulConfig {
    /// Create a config for a single agent address
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
            ..Default::default()
        }
    }

    /// Set the URL scheme
    pub fn with_scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.to_string();
        self
    }

    /// Set the read consistency mode
    pub fn with_consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = consistency;
        self
    }

    /// Set the ACL token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Set the target datacenter
    pub fn with_datacenter(mut self, datacenter: &str) -> Self {
        self.datacenter = Some(datacenter.to_string());
        self
    }

    /// Set timeouts
    pub fn with_timeouts(mut self, connect_ms: u64, read_ms: u64) -> Self {
        self.connect_timeout_ms = connect_ms;
        self.read_timeout_ms = read_ms;
        self
    }

    /// Base URL of the agent, e.g. `http://localhost:8500`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.host.trim().is_empty() {
            return Err(ClientError::InvalidConfig("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(ClientError::InvalidConfig("port must not be 0".to_string()));
        }
        if self.scheme != "http" && self.scheme != "https" {
            return Err(ClientError::InvalidConfig(format!(
                "unsupported scheme: {}",
                self.scheme
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ConsulConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8500);
        assert_eq!(config.consistency, Consistency::Default);
        assert!(config.token.is_none());
        assert_eq!(config.base_url(), "http://localhost:8500");
    }

    #[test]
    fn test_config_builder() {
        let config = ConsulConfig::new("consul.internal", 6969)
            .with_scheme("https")
            .with_consistency(Consistency::Stale)
            .with_token("secret")
            .with_datacenter("dc2")
            .with_timeouts(1000, 2000);

        assert_eq!(config.base_url(), "https://consul.internal:6969");
        assert_eq!(config.consistency, Consistency::Stale);
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.datacenter.as_deref(), Some("dc2"));
        assert_eq!(config.connect_timeout_ms, 1000);
        assert_eq!(config.read_timeout_ms, 2000);
    }

    #[test]
    fn test_consistency_parse() {
        assert_eq!("default".parse::<Consistency>().unwrap(), Consistency::Default);
        assert_eq!("".parse::<Consistency>().unwrap(), Consistency::Default);
        assert_eq!(
            "Consistent".parse::<Consistency>().unwrap(),
            Consistency::Consistent
        );
        assert_eq!("stale".parse::<Consistency>().unwrap(), Consistency::Stale);
        assert!("eventual".parse::<Consistency>().is_err());
    }

    #[test]
    fn test_consistency_query_flag() {
        assert_eq!(Consistency::Default.query_flag(), None);
        assert_eq!(Consistency::Consistent.query_flag(), Some("consistent"));
        assert_eq!(Consistency::Stale.query_flag(), Some("stale"));
    }

    #[test]
    fn test_validate() {
        assert!(ConsulConfig::default().validate().is_ok());
        assert!(ConsulConfig::new("", 8500).validate().is_err());
        assert!(ConsulConfig::new("localhost", 0).validate().is_err());
        assert!(
            ConsulConfig::default()
                .with_scheme("ftp")
                .validate()
                .is_err()
        );
    }
}
