//! `ConsulStore` backed by the Consul HTTP client

use async_trait::async_trait;
use cairn_client::{
    ConsulClient,
    model::{
        AgentCheck, AgentService, AgentServiceCheck, AgentServiceRegistration, CheckRegistration,
        shell_args,
    },
};

use crate::{
    model::{CheckDefinition, ServiceDefinition, TtlStatus},
    store::ConsulStore,
};

fn observed_service(service: AgentService) -> ServiceDefinition {
    ServiceDefinition {
        name: service.service,
        service_id: Some(service.id),
        port: Some(service.port),
        tags: Some(service.tags.unwrap_or_default().into_iter().collect()),
        // The agent does not echo check definitions back
        health_check_script: None,
        check_interval: None,
        ttl: None,
    }
}

fn observed_check(check: AgentCheck) -> CheckDefinition {
    CheckDefinition {
        name: check.name,
        check_id: Some(check.check_id),
        script: None,
        interval: None,
        ttl: None,
        notes: Some(check.notes),
    }
}

fn service_registration(service: &ServiceDefinition) -> AgentServiceRegistration {
    AgentServiceRegistration {
        id: service.service_id.clone(),
        name: service.name.clone(),
        tags: service
            .tags
            .as_ref()
            .map(|tags| tags.iter().cloned().collect()),
        port: service.port,
        check: AgentServiceCheck::from_parts(
            service.health_check_script.as_deref(),
            service.check_interval.as_deref(),
            service.ttl.as_deref(),
        ),
    }
}

fn check_registration(check: &CheckDefinition) -> CheckRegistration {
    CheckRegistration {
        name: check.name.clone(),
        check_id: check.check_id.clone(),
        service_id: None,
        args: check.script.as_deref().map(shell_args),
        interval: check.interval.clone(),
        ttl: check.ttl.clone(),
        notes: check.notes.clone(),
    }
}

#[async_trait]
impl ConsulStore for ConsulClient {
    async fn get_key(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.key_get_raw(key).await?)
    }

    async fn list_keys(&self, prefix: &str) -> anyhow::Result<Vec<String>> {
        Ok(self.key_list(prefix).await?)
    }

    async fn put_key(&self, key: &str, value: &str) -> anyhow::Result<()> {
        Ok(self.key_put(key, value).await?)
    }

    async fn delete_key(&self, key: &str, recurse: bool) -> anyhow::Result<()> {
        self.key_delete(key, recurse).await?;
        Ok(())
    }

    async fn list_services(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.service_list(false).await?)
    }

    async fn get_service(
        &self,
        name: &str,
        service_id: Option<&str>,
    ) -> anyhow::Result<Option<ServiceDefinition>> {
        Ok(self
            .service_get(name, service_id)
            .await?
            .map(observed_service))
    }

    async fn register_service(&self, service: &ServiceDefinition) -> anyhow::Result<()> {
        Ok(self
            .service_register(&service_registration(service))
            .await?)
    }

    async fn deregister_service(&self, service_id: &str) -> anyhow::Result<()> {
        Ok(self.service_deregister(service_id).await?)
    }

    async fn list_checks(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.check_list().await?)
    }

    async fn get_check(
        &self,
        name: &str,
        check_id: Option<&str>,
    ) -> anyhow::Result<Option<CheckDefinition>> {
        let check = match check_id {
            Some(id) => self.agent_checks().await?.remove(id),
            None => self.check_get(name).await?,
        };
        Ok(check.map(observed_check))
    }

    async fn register_check(&self, check: &CheckDefinition) -> anyhow::Result<()> {
        Ok(self.check_register(&check_registration(check)).await?)
    }

    async fn deregister_check(&self, check_id: &str) -> anyhow::Result<()> {
        Ok(self.check_deregister(check_id).await?)
    }

    async fn set_check_status(
        &self,
        check_id: &str,
        status: TtlStatus,
        notes: Option<&str>,
    ) -> anyhow::Result<()> {
        match status {
            TtlStatus::Passing => self.ttl_pass(check_id, notes).await?,
            TtlStatus::Warning => self.ttl_warn(check_id, notes).await?,
            TtlStatus::Failing => self.ttl_fail(check_id, notes).await?,
        }
        Ok(())
    }
}
