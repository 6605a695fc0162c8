use serde::{Deserialize, Serialize};

/// Outcome of a reconciliation, reported back to the calling engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateResult {
    /// Name of the managed resource
    pub name: String,
    /// Whether the store was mutated
    pub changed: bool,
    /// Whether the desired state was reached
    pub succeeded: bool,
    /// Human-readable summary for operators
    pub message: String,
}

impl StateResult {
    /// Desired state already held, nothing written
    pub fn unchanged(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            changed: false,
            succeeded: true,
            message: message.into(),
        }
    }

    /// Desired state reached by writing to the store
    pub fn changed(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            changed: true,
            succeeded: true,
            message: message.into(),
        }
    }

    /// Validation failed before the store was contacted
    pub fn failed(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            changed: false,
            succeeded: false,
            message: message.into(),
        }
    }
}
