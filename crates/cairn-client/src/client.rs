// ConsulClient - facade for the agent, KV, catalog and health APIs

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use crate::{
    config::ConsulConfig,
    constants::consul_api_path,
    error::{ClientError, Result},
    http::{ConsulHttpClient, api_path},
    model::{
        AgentCheck, AgentService, AgentServiceRegistration, CatalogNode, CheckRegistration,
        KvPair, Node, ServiceEntry,
    },
};

/// Consul HTTP client
pub struct ConsulClient {
    http_client: ConsulHttpClient,
}

impl ConsulClient {
    /// Create a new ConsulClient with the given configuration
    pub fn new(config: ConsulConfig) -> Result<Self> {
        let http_client = ConsulHttpClient::new(config)?;
        Ok(Self { http_client })
    }

    /// Create a new ConsulClient for a single agent address
    pub fn from_address(host: &str, port: u16) -> Result<Self> {
        Self::new(ConsulConfig::new(host, port))
    }

    pub fn config(&self) -> &ConsulConfig {
        self.http_client.config()
    }

    fn kv_path(key: &str) -> Result<String> {
        api_path(consul_api_path::KV, key.trim_start_matches('/').split('/'))
    }

    // ============================================================================
    // KV APIs
    // ============================================================================

    async fn key_pair(&self, key: &str) -> Result<Option<KvPair>> {
        let pairs: Option<Vec<KvPair>> = self
            .http_client
            .get_optional(&Self::kv_path(key)?, &[])
            .await?;
        Ok(pairs.and_then(|p| p.into_iter().next()))
    }

    /// Get the decoded value of a key, `None` when the key does not exist
    pub async fn key_get(&self, key: &str) -> Result<Option<String>> {
        self.key_pair(key)
            .await?
            .map(|pair| pair.decoded_value())
            .transpose()
    }

    /// Get the stored bytes of a key, whatever their encoding
    pub async fn key_get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.key_pair(key)
            .await?
            .map(|pair| pair.raw_value())
            .transpose()
    }

    pub async fn key_exists(&self, key: &str) -> Result<bool> {
        Ok(self.key_pair(key).await?.is_some())
    }

    /// Names of every key under `prefix`, empty when there are none
    pub async fn key_list(&self, prefix: &str) -> Result<Vec<String>> {
        let keys: Option<Vec<String>> = self
            .http_client
            .get_optional(&Self::kv_path(prefix)?, &[("keys", String::new())])
            .await?;
        Ok(keys.unwrap_or_default())
    }

    /// Set the value of a key
    pub async fn key_put(&self, key: &str, value: &str) -> Result<()> {
        let accepted: bool = self
            .http_client
            .put_body(&Self::kv_path(key)?, value.to_string(), &[])
            .await?;

        if !accepted {
            return Err(ClientError::WriteRejected(key.to_string()));
        }
        info!("Put key {}", key);
        Ok(())
    }

    /// Delete a key, or every key under the prefix when `recurse` is set
    pub async fn key_delete(&self, key: &str, recurse: bool) -> Result<bool> {
        let query: Vec<(&str, String)> = if recurse {
            vec![("recurse", String::new())]
        } else {
            Vec::new()
        };

        let deleted: bool = self
            .http_client
            .delete_with_query(&Self::kv_path(key)?, &query)
            .await?;
        info!("Deleted key {} (recurse: {})", key, recurse);
        Ok(deleted)
    }

    // ============================================================================
    // Agent service APIs
    // ============================================================================

    /// Services registered with the local agent, keyed by service ID
    pub async fn agent_services(&self) -> Result<HashMap<String, AgentService>> {
        self.http_client.get(consul_api_path::AGENT_SERVICES).await
    }

    /// List service names, from the agent or from the catalog
    pub async fn service_list(&self, catalog: bool) -> Result<Vec<String>> {
        let names: BTreeSet<String> = if catalog {
            let services: HashMap<String, Vec<String>> = self
                .http_client
                .get(consul_api_path::CATALOG_SERVICES)
                .await?;
            services.into_keys().collect()
        } else {
            self.agent_services()
                .await?
                .into_values()
                .map(|s| s.service)
                .collect()
        };
        Ok(names.into_iter().collect())
    }

    /// Find an agent service by `service_id`, or by `name` when no ID is given
    pub async fn service_get(
        &self,
        name: &str,
        service_id: Option<&str>,
    ) -> Result<Option<AgentService>> {
        let mut services = self.agent_services().await?;

        match service_id {
            Some(id) => Ok(services.remove(id)),
            None => Ok(services.into_values().find(|s| s.service == name)),
        }
    }

    /// Register (or re-register) a service with the local agent
    pub async fn service_register(&self, registration: &AgentServiceRegistration) -> Result<()> {
        self.http_client
            .put_json(consul_api_path::AGENT_SERVICE_REGISTER, registration)
            .await?;
        info!("Registered service {}", registration.name);
        Ok(())
    }

    pub async fn service_deregister(&self, service_id: &str) -> Result<()> {
        let path = api_path(consul_api_path::AGENT_SERVICE_DEREGISTER, [service_id])?;
        self.http_client.put_with_query(&path, &[]).await?;
        info!("Deregistered service {}", service_id);
        Ok(())
    }

    // ============================================================================
    // Agent check APIs
    // ============================================================================

    /// Checks registered with the local agent, keyed by check ID
    pub async fn agent_checks(&self) -> Result<HashMap<String, AgentCheck>> {
        self.http_client.get(consul_api_path::AGENT_CHECKS).await
    }

    /// List check IDs known to the local agent
    pub async fn check_list(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.agent_checks().await?.into_keys().collect();
        ids.sort();
        Ok(ids)
    }

    /// Find a check by ID, falling back to a match on its name
    pub async fn check_get(&self, id_or_name: &str) -> Result<Option<AgentCheck>> {
        let mut checks = self.agent_checks().await?;

        if let Some(check) = checks.remove(id_or_name) {
            return Ok(Some(check));
        }
        Ok(checks.into_values().find(|c| c.name == id_or_name))
    }

    pub async fn check_register(&self, registration: &CheckRegistration) -> Result<()> {
        self.http_client
            .put_json(consul_api_path::AGENT_CHECK_REGISTER, registration)
            .await?;
        info!("Registered check {}", registration.name);
        Ok(())
    }

    pub async fn check_deregister(&self, check_id: &str) -> Result<()> {
        let path = api_path(consul_api_path::AGENT_CHECK_DEREGISTER, [check_id])?;
        self.http_client.put_with_query(&path, &[]).await?;
        info!("Deregistered check {}", check_id);
        Ok(())
    }

    // ============================================================================
    // TTL check APIs
    // ============================================================================

    /// Mark a TTL check as passing
    pub async fn ttl_pass(&self, check_id: &str, notes: Option<&str>) -> Result<()> {
        self.ttl_update(consul_api_path::AGENT_CHECK_PASS, check_id, notes)
            .await
    }

    /// Mark a TTL check as warning
    pub async fn ttl_warn(&self, check_id: &str, notes: Option<&str>) -> Result<()> {
        self.ttl_update(consul_api_path::AGENT_CHECK_WARN, check_id, notes)
            .await
    }

    /// Mark a TTL check as failing
    pub async fn ttl_fail(&self, check_id: &str, notes: Option<&str>) -> Result<()> {
        self.ttl_update(consul_api_path::AGENT_CHECK_FAIL, check_id, notes)
            .await
    }

    async fn ttl_update(&self, endpoint: &str, check_id: &str, notes: Option<&str>) -> Result<()> {
        let path = api_path(endpoint, [check_id])?;
        let query: Vec<(&str, String)> = notes
            .map(|n| vec![("note", n.to_string())])
            .unwrap_or_default();

        self.http_client.put_with_query(&path, &query).await?;
        debug!("Updated TTL check {} via {}", check_id, endpoint);
        Ok(())
    }

    // ============================================================================
    // Health / Catalog APIs
    // ============================================================================

    /// Per-node status of the checks belonging to a service, as `(node, status)` pairs
    pub async fn service_health(
        &self,
        name: &str,
        passing_only: bool,
    ) -> Result<Vec<(String, String)>> {
        let path = api_path(consul_api_path::HEALTH_SERVICE, [name])?;
        let query: Vec<(&str, String)> = if passing_only {
            vec![("passing", String::new())]
        } else {
            Vec::new()
        };

        let entries: Vec<ServiceEntry> = self.http_client.get_with_query(&path, &query).await?;
        Ok(entries
            .into_iter()
            .flat_map(|entry| entry.checks)
            .filter(|check| check.service_name == name)
            .map(|check| (check.node, check.status))
            .collect())
    }

    /// List catalog nodes as `(node, address)` pairs
    pub async fn node_list(&self) -> Result<Vec<(String, String)>> {
        let nodes: Vec<Node> = self.http_client.get(consul_api_path::CATALOG_NODES).await?;
        Ok(nodes.into_iter().map(|n| (n.node, n.address)).collect())
    }

    /// Get a node's catalog entry, `None` when the node is unknown
    pub async fn node_get(&self, name: &str) -> Result<Option<CatalogNode>> {
        let path = api_path(consul_api_path::CATALOG_NODE, [name])?;
        let node: Option<Option<CatalogNode>> = self.http_client.get_optional(&path, &[]).await?;
        Ok(node.flatten().filter(|n| n.node.is_some()))
    }

    /// List known datacenters
    pub async fn dc_list(&self) -> Result<Vec<String>> {
        self.http_client
            .get(consul_api_path::CATALOG_DATACENTERS)
            .await
    }
}
