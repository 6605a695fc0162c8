//! KV key reconciliation

use std::path::Path;

use tracing::{debug, info, warn};

use crate::{
    error::{Result, StateError},
    model::KeyDefinition,
    result::StateResult,
    store::ConsulStore,
    textfile,
};

/// Ensures KV keys hold (or do not hold) a value
pub struct KeyState<'a, S: ConsulStore + ?Sized> {
    store: &'a S,
}

/// Effective value of a key definition, or the validation message that stopped it
enum Resolved {
    Value(String),
    Invalid(String),
}

impl<'a, S: ConsulStore + ?Sized> KeyState<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Ensure `desired.name` holds the desired value.
    ///
    /// File-sourced values are validated before the store is contacted; a
    /// missing or binary file yields a failed result and no store calls.
    pub async fn present(&self, desired: &KeyDefinition) -> Result<StateResult> {
        let name = desired.name.as_str();

        let should = match resolve_value(desired).await? {
            Resolved::Value(v) => v,
            Resolved::Invalid(message) => {
                warn!("Key {} not applied: {}", name, message);
                return Ok(StateResult::failed(name, message));
            }
        };

        match self.store.get_key(name).await? {
            None => {
                self.store.put_key(name, &should).await?;
                info!("Key {} created", name);
                Ok(StateResult::changed(
                    name,
                    format!("Key \"{}\" set with value \"{}\"", name, desired.value),
                ))
            }
            // compared as bytes: a non-UTF-8 stored value always diverges
            Some(current) if current != should.as_bytes() => {
                self.store.put_key(name, &should).await?;
                info!("Key {} updated", name);
                Ok(StateResult::changed(
                    name,
                    format!("Key \"{}\" updated with value \"{}\"", name, desired.value),
                ))
            }
            Some(_) => {
                debug!("Key {} already in desired state", name);
                Ok(StateResult::unchanged(
                    name,
                    "Key already set to defined value",
                ))
            }
        }
    }

    /// Ensure `name` does not exist; with `recurse`, the whole prefix is removed
    pub async fn absent(&self, name: &str, recurse: bool) -> Result<StateResult> {
        let exists = if recurse {
            !self.store.list_keys(name).await?.is_empty()
        } else {
            self.store.get_key(name).await?.is_some()
        };

        if !exists {
            debug!("Key {} already absent", name);
            return Ok(StateResult::unchanged(
                name,
                format!("Key \"{}\" does not exist", name),
            ));
        }

        self.store.delete_key(name, recurse).await?;
        info!("Key {} deleted", name);
        Ok(StateResult::changed(
            name,
            format!("Key \"{}\" deleted", name),
        ))
    }
}

async fn resolve_value(desired: &KeyDefinition) -> Result<Resolved> {
    if !desired.source_is_file {
        return Ok(Resolved::Value(desired.value.clone()));
    }

    let path = Path::new(&desired.value);
    if !path.is_file() {
        return Ok(Resolved::Invalid(format!("{} does not exist", desired.value)));
    }

    let Some(encoding) = textfile::supported_encoding(&desired.encoding) else {
        return Ok(Resolved::Invalid(format!(
            "{} is not a supported encoding",
            desired.encoding
        )));
    };

    let content = tokio::fs::read(path).await.map_err(|source| StateError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if !textfile::is_text(&content) {
        return Ok(Resolved::Invalid(format!(
            "{} is not a text file",
            desired.value
        )));
    }

    match textfile::decode(&content, encoding) {
        Some(text) => Ok(Resolved::Value(text)),
        None => Ok(Resolved::Invalid(format!(
            "{} could not be decoded as {}",
            desired.value, encoding
        ))),
    }
}
