// Consul HTTP API path constants

pub mod consul_api_path {
    // KV
    pub const KV: &str = "/v1/kv/";

    // Agent services
    pub const AGENT_SERVICES: &str = "/v1/agent/services";
    pub const AGENT_SERVICE_REGISTER: &str = "/v1/agent/service/register";
    pub const AGENT_SERVICE_DEREGISTER: &str = "/v1/agent/service/deregister/";

    // Agent checks
    pub const AGENT_CHECKS: &str = "/v1/agent/checks";
    pub const AGENT_CHECK_REGISTER: &str = "/v1/agent/check/register";
    pub const AGENT_CHECK_DEREGISTER: &str = "/v1/agent/check/deregister/";
    pub const AGENT_CHECK_PASS: &str = "/v1/agent/check/pass/";
    pub const AGENT_CHECK_WARN: &str = "/v1/agent/check/warn/";
    pub const AGENT_CHECK_FAIL: &str = "/v1/agent/check/fail/";

    // Catalog
    pub const CATALOG_SERVICES: &str = "/v1/catalog/services";
    pub const CATALOG_NODES: &str = "/v1/catalog/nodes";
    pub const CATALOG_NODE: &str = "/v1/catalog/node/";
    pub const CATALOG_DATACENTERS: &str = "/v1/catalog/datacenters";

    // Health
    pub const HEALTH_SERVICE: &str = "/v1/health/service/";
}

/// Header carrying the ACL token
pub const TOKEN_HEADER: &str = "X-Consul-Token";

/// Prefix Consul gives to the check attached to a service registration
pub const SERVICE_CHECK_PREFIX: &str = "service:";
