//! Cairn State - idempotent reconciliation of Consul resources
//!
//! This crate provides:
//! - `ConsulStore`: the capability interface the reconcilers consume
//! - Key, service and check reconcilers with `present`/`absent` semantics
//! - TTL heartbeat updates for checks and service checks
//! - `StateResult`: the structured outcome of every reconciliation

pub mod check;
pub mod compare;
pub mod consul;
pub mod error;
pub mod key;
pub mod model;
pub mod result;
pub mod service;
pub mod status;
pub mod store;
pub mod textfile;

pub use check::CheckState;
pub use error::StateError;
pub use key::KeyState;
pub use model::{CheckDefinition, KeyDefinition, ServiceDefinition, TargetKind, TtlStatus};
pub use result::StateResult;
pub use service::ServiceState;
pub use store::ConsulStore;

/// Entry point bundling the per-kind reconcilers over one injected store
pub struct Reconciler<'a, S: ConsulStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ConsulStore + ?Sized> Reconciler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn keys(&self) -> KeyState<'a, S> {
        KeyState::new(self.store)
    }

    pub fn services(&self) -> ServiceState<'a, S> {
        ServiceState::new(self.store)
    }

    pub fn checks(&self) -> CheckState<'a, S> {
        CheckState::new(self.store)
    }
}
