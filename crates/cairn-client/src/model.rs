// Consul API data models
// Field names follow the Consul HTTP API's PascalCase JSON

use std::collections::HashMap;

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// KV entry as returned by GET /v1/kv/{key}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KvPair {
    #[serde(rename = "Key")]
    pub key: String,

    /// Base64-encoded value, `null` for keys created without a body
    #[serde(rename = "Value", default)]
    pub value: Option<String>,

    #[serde(rename = "Flags", default)]
    pub flags: u64,

    #[serde(rename = "CreateIndex", default)]
    pub create_index: u64,

    #[serde(rename = "ModifyIndex", default)]
    pub modify_index: u64,

    #[serde(rename = "LockIndex", default)]
    pub lock_index: u64,

    #[serde(rename = "Session", default)]
    pub session: Option<String>,
}

impl KvPair {
    /// Stored bytes; a `null` value is empty
    pub fn raw_value(&self) -> Result<Vec<u8>, ClientError> {
        let Some(encoded) = self.value.as_deref() else {
            return Ok(Vec::new());
        };
        STANDARD
            .decode(encoded)
            .map_err(|e| ClientError::InvalidValue {
                key: self.key.clone(),
                reason: e.to_string(),
            })
    }

    /// Decode the stored value as UTF-8 text; a `null` value decodes to ""
    pub fn decoded_value(&self) -> Result<String, ClientError> {
        String::from_utf8(self.raw_value()?).map_err(|e| ClientError::InvalidValue {
            key: self.key.clone(),
            reason: e.to_string(),
        })
    }
}

/// Service registration request
/// PUT /v1/agent/service/register
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentServiceRegistration {
    /// Service ID, defaults to Name on the agent side
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,

    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Tags", skip_serializing_if = "Option::is_none", default)]
    pub tags: Option<Vec<String>>,

    #[serde(rename = "Port", skip_serializing_if = "Option::is_none", default)]
    pub port: Option<u16>,

    /// Single health check definition
    #[serde(rename = "Check", skip_serializing_if = "Option::is_none", default)]
    pub check: Option<AgentServiceCheck>,
}

/// Health check definition embedded in a service registration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentServiceCheck {
    /// Command and arguments for script checks
    #[serde(rename = "Args", skip_serializing_if = "Option::is_none", default)]
    pub args: Option<Vec<String>>,

    /// Script check interval (e.g., "10s")
    #[serde(rename = "Interval", skip_serializing_if = "Option::is_none", default)]
    pub interval: Option<String>,

    /// TTL-based check duration (e.g., "30s")
    #[serde(rename = "TTL", skip_serializing_if = "Option::is_none", default)]
    pub ttl: Option<String>,

    #[serde(rename = "Notes", skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,
}

impl AgentServiceCheck {
    /// Build a check from a script/interval pair or a TTL, `None` when neither is set
    pub fn from_parts(
        script: Option<&str>,
        interval: Option<&str>,
        ttl: Option<&str>,
    ) -> Option<Self> {
        if script.is_none() && ttl.is_none() {
            return None;
        }
        Some(Self {
            args: script.map(shell_args),
            interval: interval.map(str::to_string),
            ttl: ttl.map(str::to_string),
            notes: None,
        })
    }
}

/// Wrap a shell command line into the argv form Consul executes
pub fn shell_args(script: &str) -> Vec<String> {
    vec!["/bin/sh".to_string(), "-c".to_string(), script.to_string()]
}

/// Agent service representation (GET /v1/agent/services values)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentService {
    #[serde(rename = "ID")]
    pub id: String,

    #[serde(rename = "Service")]
    pub service: String,

    #[serde(rename = "Tags", default)]
    pub tags: Option<Vec<String>>,

    #[serde(rename = "Port", default)]
    pub port: u16,

    #[serde(rename = "Address", default)]
    pub address: String,

    #[serde(rename = "Meta", default)]
    pub meta: Option<HashMap<String, String>>,

    #[serde(rename = "Datacenter", default)]
    pub datacenter: Option<String>,
}

/// Check registration request
/// PUT /v1/agent/check/register
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckRegistration {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "CheckID", skip_serializing_if = "Option::is_none", default)]
    pub check_id: Option<String>,

    #[serde(rename = "ServiceID", skip_serializing_if = "Option::is_none", default)]
    pub service_id: Option<String>,

    #[serde(rename = "Args", skip_serializing_if = "Option::is_none", default)]
    pub args: Option<Vec<String>>,

    #[serde(rename = "Interval", skip_serializing_if = "Option::is_none", default)]
    pub interval: Option<String>,

    #[serde(rename = "TTL", skip_serializing_if = "Option::is_none", default)]
    pub ttl: Option<String>,

    #[serde(rename = "Notes", skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,
}

/// Agent health check representation (GET /v1/agent/checks values)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentCheck {
    #[serde(rename = "Node", default)]
    pub node: String,

    #[serde(rename = "CheckID")]
    pub check_id: String,

    #[serde(rename = "Name")]
    pub name: String,

    /// passing, warning or critical
    #[serde(rename = "Status", default)]
    pub status: String,

    #[serde(rename = "Notes", default)]
    pub notes: String,

    #[serde(rename = "Output", default)]
    pub output: String,

    #[serde(rename = "ServiceID", default)]
    pub service_id: String,

    #[serde(rename = "ServiceName", default)]
    pub service_name: String,

    /// ttl, script, http, tcp, ...
    #[serde(rename = "Type", default)]
    pub check_type: String,
}

/// Health check entry inside a health query result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthCheck {
    #[serde(rename = "Node")]
    pub node: String,

    #[serde(rename = "CheckID")]
    pub check_id: String,

    #[serde(rename = "Name", default)]
    pub name: String,

    #[serde(rename = "Status")]
    pub status: String,

    #[serde(rename = "ServiceID", default)]
    pub service_id: String,

    #[serde(rename = "ServiceName", default)]
    pub service_name: String,
}

/// One element of GET /v1/health/service/{service}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceEntry {
    #[serde(rename = "Node")]
    pub node: Node,

    #[serde(rename = "Service", default)]
    pub service: Option<AgentService>,

    #[serde(rename = "Checks", default)]
    pub checks: Vec<HealthCheck>,
}

/// Catalog node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "ID", default)]
    pub id: String,

    #[serde(rename = "Node")]
    pub node: String,

    #[serde(rename = "Address")]
    pub address: String,

    #[serde(rename = "Datacenter", default)]
    pub datacenter: String,

    #[serde(rename = "Meta", default)]
    pub meta: Option<HashMap<String, String>>,
}

/// GET /v1/catalog/node/{node} response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogNode {
    #[serde(rename = "Node", default)]
    pub node: Option<Node>,

    #[serde(rename = "Services", default)]
    pub services: HashMap<String, AgentService>,
}
