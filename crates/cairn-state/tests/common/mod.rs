//! In-memory `ConsulStore` that records every call

#![allow(dead_code)]

use std::collections::BTreeMap;

use async_trait::async_trait;
use cairn_state::{CheckDefinition, ConsulStore, ServiceDefinition, TtlStatus};
use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetKey(String),
    ListKeys(String),
    PutKey(String, String),
    DeleteKey(String, bool),
    ListServices,
    GetService(String, Option<String>),
    RegisterService(String),
    DeregisterService(String),
    ListChecks,
    GetCheck(String, Option<String>),
    RegisterCheck(String),
    DeregisterCheck(String),
    SetCheckStatus(String, TtlStatus, Option<String>),
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Call::PutKey(..)
                | Call::DeleteKey(..)
                | Call::RegisterService(..)
                | Call::DeregisterService(..)
                | Call::RegisterCheck(..)
                | Call::DeregisterCheck(..)
                | Call::SetCheckStatus(..)
        )
    }
}

/// Which calls an injected failure applies to
#[derive(Debug, Clone)]
enum Failure {
    All(String),
    Writes(String),
}

#[derive(Default)]
pub struct MemoryStore {
    keys: Mutex<BTreeMap<String, Vec<u8>>>,
    services: Mutex<BTreeMap<String, ServiceDefinition>>,
    checks: Mutex<BTreeMap<String, CheckDefinition>>,
    calls: Mutex<Vec<Call>>,
    failure: Mutex<Option<Failure>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(self, key: &str, value: &str) -> Self {
        self.with_raw_key(key, value.as_bytes())
    }

    pub fn with_raw_key(self, key: &str, value: &[u8]) -> Self {
        self.keys.lock().insert(key.to_string(), value.to_vec());
        self
    }

    /// Seed a service as the agent would report it back
    pub fn with_service(self, service: ServiceDefinition) -> Self {
        let stored = observed_service(&service);
        self.services
            .lock()
            .insert(service.effective_id().to_string(), stored);
        self
    }

    pub fn with_check(self, check: CheckDefinition) -> Self {
        let stored = observed_check(&check);
        self.checks
            .lock()
            .insert(check.effective_id().to_string(), stored);
        self
    }

    /// Make every call fail with a store error
    pub fn failing(self, message: &str) -> Self {
        *self.failure.lock() = Some(Failure::All(message.to_string()));
        self
    }

    /// Let reads through but fail every mutating call
    pub fn failing_writes(self, message: &str) -> Self {
        *self.failure.lock() = Some(Failure::Writes(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn key(&self, key: &str) -> Option<String> {
        self.keys
            .lock()
            .get(key)
            .map(|v| String::from_utf8_lossy(v).into_owned())
    }

    pub fn service(&self, id: &str) -> Option<ServiceDefinition> {
        self.services.lock().get(id).cloned()
    }

    pub fn check(&self, id: &str) -> Option<CheckDefinition> {
        self.checks.lock().get(id).cloned()
    }

    fn record(&self, call: Call) -> anyhow::Result<()> {
        let write = call.is_write();
        self.calls.lock().push(call);
        match &*self.failure.lock() {
            Some(Failure::All(message)) => Err(anyhow::anyhow!(message.clone())),
            Some(Failure::Writes(message)) if write => Err(anyhow::anyhow!(message.clone())),
            _ => Ok(()),
        }
    }
}

/// What the agent reports: the ID is always known, the health check is not
fn observed_service(service: &ServiceDefinition) -> ServiceDefinition {
    ServiceDefinition {
        service_id: Some(service.effective_id().to_string()),
        port: Some(service.port.unwrap_or(0)),
        tags: Some(service.tags.clone().unwrap_or_default()),
        health_check_script: None,
        check_interval: None,
        ttl: None,
        ..service.clone()
    }
}

fn observed_check(check: &CheckDefinition) -> CheckDefinition {
    CheckDefinition {
        check_id: Some(check.effective_id().to_string()),
        notes: Some(check.notes.clone().unwrap_or_default()),
        script: None,
        interval: None,
        ttl: None,
        ..check.clone()
    }
}

#[async_trait]
impl ConsulStore for MemoryStore {
    async fn get_key(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        self.record(Call::GetKey(key.to_string()))?;
        Ok(self.keys.lock().get(key).cloned())
    }

    async fn list_keys(&self, prefix: &str) -> anyhow::Result<Vec<String>> {
        self.record(Call::ListKeys(prefix.to_string()))?;
        Ok(self
            .keys
            .lock()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn put_key(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.record(Call::PutKey(key.to_string(), value.to_string()))?;
        self.keys
            .lock()
            .insert(key.to_string(), value.as_bytes().to_vec());
        Ok(())
    }

    async fn delete_key(&self, key: &str, recurse: bool) -> anyhow::Result<()> {
        self.record(Call::DeleteKey(key.to_string(), recurse))?;
        let mut keys = self.keys.lock();
        if recurse {
            keys.retain(|k, _| !k.starts_with(key));
        } else {
            keys.remove(key);
        }
        Ok(())
    }

    async fn list_services(&self) -> anyhow::Result<Vec<String>> {
        self.record(Call::ListServices)?;
        Ok(self.services.lock().values().map(|s| s.name.clone()).collect())
    }

    async fn get_service(
        &self,
        name: &str,
        service_id: Option<&str>,
    ) -> anyhow::Result<Option<ServiceDefinition>> {
        self.record(Call::GetService(
            name.to_string(),
            service_id.map(str::to_string),
        ))?;
        let services = self.services.lock();
        Ok(match service_id {
            Some(id) => services.get(id).cloned(),
            None => services.values().find(|s| s.name == name).cloned(),
        })
    }

    async fn register_service(&self, service: &ServiceDefinition) -> anyhow::Result<()> {
        self.record(Call::RegisterService(service.effective_id().to_string()))?;
        self.services.lock().insert(
            service.effective_id().to_string(),
            observed_service(service),
        );
        Ok(())
    }

    async fn deregister_service(&self, service_id: &str) -> anyhow::Result<()> {
        self.record(Call::DeregisterService(service_id.to_string()))?;
        self.services.lock().remove(service_id);
        Ok(())
    }

    async fn list_checks(&self) -> anyhow::Result<Vec<String>> {
        self.record(Call::ListChecks)?;
        Ok(self.checks.lock().keys().cloned().collect())
    }

    async fn get_check(
        &self,
        name: &str,
        check_id: Option<&str>,
    ) -> anyhow::Result<Option<CheckDefinition>> {
        self.record(Call::GetCheck(name.to_string(), check_id.map(str::to_string)))?;
        let checks = self.checks.lock();
        Ok(match check_id {
            Some(id) => checks.get(id).cloned(),
            None => checks
                .get(name)
                .or_else(|| checks.values().find(|c| c.name == name))
                .cloned(),
        })
    }

    async fn register_check(&self, check: &CheckDefinition) -> anyhow::Result<()> {
        self.record(Call::RegisterCheck(check.effective_id().to_string()))?;
        self.checks
            .lock()
            .insert(check.effective_id().to_string(), observed_check(check));
        Ok(())
    }

    async fn deregister_check(&self, check_id: &str) -> anyhow::Result<()> {
        self.record(Call::DeregisterCheck(check_id.to_string()))?;
        self.checks.lock().remove(check_id);
        Ok(())
    }

    async fn set_check_status(
        &self,
        check_id: &str,
        status: TtlStatus,
        notes: Option<&str>,
    ) -> anyhow::Result<()> {
        self.record(Call::SetCheckStatus(
            check_id.to_string(),
            status,
            notes.map(str::to_string),
        ))
    }
}
