//! Session store shared between connector, request, and pipeline.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use uuid::Uuid;

/// Key-value session shared by reference across requests.
///
/// One instance models one browser's persistent session: the connector caches
/// it and every translated request carries the same `Arc` until the connector
/// is reset. Values use interior mutability so the pipeline can write through
/// the shared handle.
#[derive(Debug)]
pub struct Session {
    id: String,
    config: BTreeMap<String, Value>,
    values: Mutex<BTreeMap<String, Value>>,
}

impl Session {
    /// Builds a session from a `Session` configuration section.
    ///
    /// The section is merged over a `{"defaults": "php"}` baseline, so the
    /// section overrides the baseline on key collision.
    pub fn create(section: BTreeMap<String, Value>) -> Arc<Self> {
        let mut config = BTreeMap::new();
        config.insert("defaults".to_string(), Value::from("php"));
        config.extend(section);
        Arc::new(Session {
            id: Uuid::new_v4().simple().to_string(),
            config,
            values: Mutex::new(BTreeMap::new()),
        })
    }

    /// Session identifier, unique per instance.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Effective session configuration, baseline included.
    #[inline]
    pub fn config(&self) -> &BTreeMap<String, Value> {
        &self.config
    }

    /// Reads a value.
    pub fn read(&self, key: &str) -> Option<Value> {
        self.values.lock().unwrap().get(key).cloned()
    }

    /// Writes a value.
    pub fn write(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.lock().unwrap().insert(key.into(), value.into());
    }

    /// Removes a value, returning it if present.
    pub fn delete(&self, key: &str) -> Option<Value> {
        self.values.lock().unwrap().remove(key)
    }

    /// Whether a value exists under `key`.
    pub fn check(&self, key: &str) -> bool {
        self.values.lock().unwrap().contains_key(key)
    }

    /// Removes every stored value.
    pub fn clear(&self) {
        self.values.lock().unwrap().clear();
    }

    /// Whether the session holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.lock().unwrap().is_empty()
    }
}
