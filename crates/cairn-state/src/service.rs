//! Agent service reconciliation

use tracing::{debug, info};

use crate::{
    compare::service_drift,
    error::Result,
    model::{ServiceDefinition, TargetKind},
    result::StateResult,
    status,
    store::ConsulStore,
};

/// Ensures agent services are registered (or not)
pub struct ServiceState<'a, S: ConsulStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ConsulStore + ?Sized> ServiceState<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Ensure the service is registered with the desired metadata.
    ///
    /// Registration is an upsert, so it is always issued: tags and port are
    /// refreshed on every run. `changed` reports whether the service was
    /// missing or its observable metadata drifted.
    pub async fn present(&self, desired: &ServiceDefinition) -> Result<StateResult> {
        let name = desired.name.as_str();
        let observed = self
            .store
            .get_service(name, desired.service_id.as_deref())
            .await?;
        // a match under another ID is a separate instance; registering creates ours
        let observed = observed.filter(|current| current.effective_id() == desired.effective_id());

        self.store.register_service(desired).await?;

        match observed {
            None => {
                info!("Service {} created", name);
                Ok(StateResult::changed(
                    name,
                    format!("Service \"{}\" created", name),
                ))
            }
            Some(current) => {
                let drift = service_drift(desired, &current);
                if drift.is_empty() {
                    debug!("Service {} already in desired state", name);
                    Ok(StateResult::unchanged(
                        name,
                        format!("Service \"{}\" already in desired state", name),
                    ))
                } else {
                    info!("Service {} updated ({})", name, drift.join(", "));
                    Ok(StateResult::changed(
                        name,
                        format!("Service \"{}\" updated", name),
                    ))
                }
            }
        }
    }

    /// Ensure no service named `name` is registered
    pub async fn absent(&self, name: &str) -> Result<StateResult> {
        let Some(current) = self.store.get_service(name, None).await? else {
            debug!("Service {} already absent", name);
            return Ok(StateResult::unchanged(
                name,
                format!("Service \"{}\" already absent", name),
            ));
        };

        self.store
            .deregister_service(current.effective_id())
            .await?;
        info!("Service {} removed", name);
        Ok(StateResult::changed(
            name,
            format!("Service \"{}\" removed", name),
        ))
    }

    /// Push a heartbeat to the TTL check attached to service `name`
    pub async fn ttl_set(
        &self,
        name: &str,
        status: &str,
        notes: Option<&str>,
    ) -> Result<StateResult> {
        status::set_ttl_status(self.store, name, TargetKind::Service, status, notes).await
    }
}
