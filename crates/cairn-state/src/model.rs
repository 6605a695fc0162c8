//! Desired-state definitions for the managed resource kinds
//!
//! The same shapes double as observed state: a store reports what it knows
//! about an existing resource using these structs, leaving unobservable
//! fields as `None`.

use std::{collections::BTreeSet, fmt, str::FromStr};

use cairn_client::constants::SERVICE_CHECK_PREFIX;
use serde::{Deserialize, Serialize};

/// Encoding assumed for file-sourced key values
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Desired state of a KV key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDefinition {
    pub name: String,
    /// Literal value, or the path of the source file when `source_is_file`
    pub value: String,
    pub source_is_file: bool,
    pub encoding: String,
}

impl KeyDefinition {
    pub fn literal(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            source_is_file: false,
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }

    pub fn from_file(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            value: path.to_string(),
            source_is_file: true,
            encoding: DEFAULT_ENCODING.to_string(),
        }
    }

    pub fn with_encoding(mut self, encoding: &str) -> Self {
        self.encoding = encoding.to_string();
        self
    }
}

/// Desired state of an agent service
///
/// `health_check_script` + `check_interval` and `ttl` are alternative health
/// check mechanisms; the agent rejects registrations that mix them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub name: String,
    pub service_id: Option<String>,
    pub port: Option<u16>,
    pub tags: Option<BTreeSet<String>>,
    pub health_check_script: Option<String>,
    pub check_interval: Option<String>,
    pub ttl: Option<String>,
}

impl ServiceDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, service_id: &str) -> Self {
        self.service_id = Some(service_id.to_string());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_script(mut self, script: &str, interval: &str) -> Self {
        self.health_check_script = Some(script.to_string());
        self.check_interval = Some(interval.to_string());
        self
    }

    pub fn with_ttl(mut self, ttl: &str) -> Self {
        self.ttl = Some(ttl.to_string());
        self
    }

    /// ID the agent will use for this service
    pub fn effective_id(&self) -> &str {
        self.service_id.as_deref().unwrap_or(&self.name)
    }
}

/// Desired state of an agent check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDefinition {
    pub name: String,
    pub check_id: Option<String>,
    pub script: Option<String>,
    pub interval: Option<String>,
    pub ttl: Option<String>,
    /// Free text for operators, not interpreted by Consul
    pub notes: Option<String>,
}

impl CheckDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, check_id: &str) -> Self {
        self.check_id = Some(check_id.to_string());
        self
    }

    pub fn with_script(mut self, script: &str, interval: &str) -> Self {
        self.script = Some(script.to_string());
        self.interval = Some(interval.to_string());
        self
    }

    pub fn with_ttl(mut self, ttl: &str) -> Self {
        self.ttl = Some(ttl.to_string());
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    /// ID the agent will use for this check
    pub fn effective_id(&self) -> &str {
        self.check_id.as_deref().unwrap_or(&self.name)
    }
}

/// Heartbeat status of a TTL check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtlStatus {
    Passing,
    Warning,
    Failing,
}

impl TtlStatus {
    pub const ALL: [TtlStatus; 3] = [TtlStatus::Passing, TtlStatus::Warning, TtlStatus::Failing];

    pub fn as_str(&self) -> &'static str {
        match self {
            TtlStatus::Passing => "passing",
            TtlStatus::Warning => "warning",
            TtlStatus::Failing => "failing",
        }
    }

    /// Agent endpoint suffix: /v1/agent/check/{pass|warn|fail}
    pub fn endpoint(&self) -> &'static str {
        match self {
            TtlStatus::Passing => "pass",
            TtlStatus::Warning => "warn",
            TtlStatus::Failing => "fail",
        }
    }
}

impl fmt::Display for TtlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected TTL status string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Status must be one of: passing warning failing")]
pub struct InvalidStatus(pub String);

impl FromStr for TtlStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TtlStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidStatus(s.to_string()))
    }
}

/// Resource a TTL update targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Service,
    Check,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Service => "service",
            TargetKind::Check => "check",
        }
    }

    /// Check ID to update: services expose their TTL check as `service:<name>`
    pub fn check_target(&self, name: &str) -> String {
        match self {
            TargetKind::Service => format!("{}{}", SERVICE_CHECK_PREFIX, name),
            TargetKind::Check => name.to_string(),
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "service" => Ok(TargetKind::Service),
            "check" => Ok(TargetKind::Check),
            other => Err(format!("unknown target kind: {}", other)),
        }
    }
}
