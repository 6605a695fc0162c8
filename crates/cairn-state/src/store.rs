//! Store capability consumed by the reconcilers
//!
//! Each method maps to exactly one remote operation. "Not found" is `Ok(None)`
//! (or `Ok(false)`), never an error; errors are transport or store failures
//! and are handed back to the caller untouched.

use async_trait::async_trait;

use crate::model::{CheckDefinition, ServiceDefinition, TtlStatus};

#[async_trait]
pub trait ConsulStore: Send + Sync {
    /// Stored bytes of a key, `None` when absent
    async fn get_key(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>>;

    /// Names of the keys under `prefix`, empty when there are none
    async fn list_keys(&self, prefix: &str) -> anyhow::Result<Vec<String>>;

    async fn put_key(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Delete a key, or the whole prefix when `recurse` is set
    async fn delete_key(&self, key: &str, recurse: bool) -> anyhow::Result<()>;

    /// Names of the services registered with the agent
    async fn list_services(&self) -> anyhow::Result<Vec<String>>;

    /// Service with ID `service_id`, or the first one named `name` when no ID is given
    async fn get_service(
        &self,
        name: &str,
        service_id: Option<&str>,
    ) -> anyhow::Result<Option<ServiceDefinition>>;

    /// Register a service; re-registering an existing one updates it in place
    async fn register_service(&self, service: &ServiceDefinition) -> anyhow::Result<()>;

    async fn deregister_service(&self, service_id: &str) -> anyhow::Result<()>;

    /// IDs of the checks registered with the agent
    async fn list_checks(&self) -> anyhow::Result<Vec<String>>;

    /// Check with ID `check_id`, or the one identified by `name` when no ID is given
    async fn get_check(
        &self,
        name: &str,
        check_id: Option<&str>,
    ) -> anyhow::Result<Option<CheckDefinition>>;

    /// Register a check; re-registering an existing one updates it in place
    async fn register_check(&self, check: &CheckDefinition) -> anyhow::Result<()>;

    async fn deregister_check(&self, check_id: &str) -> anyhow::Result<()>;

    /// Push a heartbeat status to a TTL check
    async fn set_check_status(
        &self,
        check_id: &str,
        status: TtlStatus,
        notes: Option<&str>,
    ) -> anyhow::Result<()>;
}
