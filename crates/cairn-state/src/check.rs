//! Agent check reconciliation

use tracing::{debug, info};

use crate::{
    compare::check_drift,
    error::Result,
    model::{CheckDefinition, TargetKind},
    result::StateResult,
    status,
    store::ConsulStore,
};

/// Ensures agent checks are registered (or not)
pub struct CheckState<'a, S: ConsulStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ConsulStore + ?Sized> CheckState<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Ensure the check is registered; same upsert semantics as services
    pub async fn present(&self, desired: &CheckDefinition) -> Result<StateResult> {
        let name = desired.name.as_str();
        let observed = self
            .store
            .get_check(name, desired.check_id.as_deref())
            .await?;
        // a match under another ID is a separate instance; registering creates ours
        let observed = observed.filter(|current| current.effective_id() == desired.effective_id());

        self.store.register_check(desired).await?;

        let Some(current) = observed else {
            info!("Check {} created", name);
            return Ok(StateResult::changed(
                name,
                format!("Check \"{}\" created", name),
            ));
        };

        let drift = check_drift(desired, &current);
        if drift.is_empty() {
            debug!("Check {} already in desired state", name);
            return Ok(StateResult::unchanged(
                name,
                format!("Check \"{}\" already in desired state", name),
            ));
        }

        info!("Check {} updated ({})", name, drift.join(", "));
        Ok(StateResult::changed(
            name,
            format!("Check \"{}\" updated", name),
        ))
    }

    /// Ensure no check named `name` is registered
    pub async fn absent(&self, name: &str) -> Result<StateResult> {
        match self.store.get_check(name, None).await? {
            None => Ok(StateResult::unchanged(
                name,
                format!("Check \"{}\" already absent", name),
            )),
            Some(current) => {
                self.store.deregister_check(current.effective_id()).await?;
                info!("Check {} removed", name);
                Ok(StateResult::changed(
                    name,
                    format!("Check \"{}\" removed", name),
                ))
            }
        }
    }

    /// Push a heartbeat to TTL check `name`
    pub async fn ttl_set(
        &self,
        name: &str,
        status: &str,
        notes: Option<&str>,
    ) -> Result<StateResult> {
        status::set_ttl_status(self.store, name, TargetKind::Check, status, notes).await
    }
}
