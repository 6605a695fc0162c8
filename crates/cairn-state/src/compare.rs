//! Desired vs. observed comparison
//!
//! A field only counts as drift when the caller asked for a value and the
//! store reported a different one. Fields left unset in the desired state are
//! not managed; fields the store cannot report back are not observable.
//! IDs are the exception: an unset ID still registers as the name, so the
//! effective ID is always compared.

use crate::model::{CheckDefinition, ServiceDefinition};

fn differs<T: PartialEq>(desired: &Option<T>, observed: &Option<T>) -> bool {
    matches!((desired, observed), (Some(d), Some(o)) if d != o)
}

/// Names of the service fields that differ from what the store reports
pub fn service_drift(
    desired: &ServiceDefinition,
    observed: &ServiceDefinition,
) -> Vec<&'static str> {
    let mut drift = Vec::new();
    if desired.effective_id() != observed.effective_id() {
        drift.push("id");
    }
    if differs(&desired.port, &observed.port) {
        drift.push("port");
    }
    if differs(&desired.tags, &observed.tags) {
        drift.push("tags");
    }
    if differs(&desired.health_check_script, &observed.health_check_script) {
        drift.push("script");
    }
    if differs(&desired.check_interval, &observed.check_interval) {
        drift.push("interval");
    }
    if differs(&desired.ttl, &observed.ttl) {
        drift.push("ttl");
    }
    drift
}

/// Names of the check fields that differ from what the store reports
pub fn check_drift(desired: &CheckDefinition, observed: &CheckDefinition) -> Vec<&'static str> {
    let mut drift = Vec::new();
    if desired.effective_id() != observed.effective_id() {
        drift.push("id");
    }
    if differs(&desired.script, &observed.script) {
        drift.push("script");
    }
    if differs(&desired.interval, &observed.interval) {
        drift.push("interval");
    }
    if differs(&desired.ttl, &observed.ttl) {
        drift.push("ttl");
    }
    if differs(&desired.notes, &observed.notes) {
        drift.push("notes");
    }
    drift
}
