//! Shared TTL status validation and dispatch

use tracing::{info, warn};

use crate::{
    error::Result,
    model::{TargetKind, TtlStatus},
    result::StateResult,
    store::ConsulStore,
};

/// Validate `status` and push it to the TTL check behind `name`.
///
/// An unknown status is reported as a failed result without touching the
/// store. A heartbeat always reports `changed: false`.
pub async fn set_ttl_status<S: ConsulStore + ?Sized>(
    store: &S,
    name: &str,
    kind: TargetKind,
    status: &str,
    notes: Option<&str>,
) -> Result<StateResult> {
    let status: TtlStatus = match status.parse() {
        Ok(s) => s,
        Err(e) => {
            warn!("Rejected TTL status {:?} for {} {}", status, kind, name);
            return Ok(StateResult::failed(name, e.to_string()));
        }
    };

    let target = kind.check_target(name);
    store.set_check_status(&target, status, notes).await?;
    info!("TTL check {} set to {}", target, status);

    let label = match kind {
        TargetKind::Service => "Service",
        TargetKind::Check => "Check",
    };
    Ok(StateResult::unchanged(
        name,
        format!("{} set to {}", label, status),
    ))
}
