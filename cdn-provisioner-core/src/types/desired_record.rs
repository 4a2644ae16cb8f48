//! In-memory `ResourceData` implementation

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::AttrValue;
use crate::traits::ResourceData;

/// Declared configuration plus last-applied state for one resource instance.
///
/// `declare` and `clear` model the user editing the configuration; `set`
/// (from [`ResourceData`]) models the provider writing state after a read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesiredRecord {
    id: String,
    values: BTreeMap<String, AttrValue>,
    applied: BTreeMap<String, AttrValue>,
    changed: BTreeSet<String>,
}

impl DesiredRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// A record whose last-applied state is `state`, with nothing changed yet.
    pub fn from_state<K, V>(id: impl Into<String>, state: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<AttrValue>,
    {
        let applied: BTreeMap<String, AttrValue> = state
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            id: id.into(),
            values: applied.clone(),
            applied,
            changed: BTreeSet::new(),
        }
    }

    /// Declare a value. Marks the attribute changed when it differs from the applied state.
    pub fn declare(&mut self, key: &str, value: impl Into<AttrValue>) -> &mut Self {
        let value = value.into();
        if self.applied.get(key) == Some(&value) {
            self.changed.remove(key);
        } else {
            self.changed.insert(key.to_string());
        }
        self.values.insert(key.to_string(), value);
        self
    }

    /// Remove a declared value. Marks the attribute changed when it had an applied value.
    pub fn clear(&mut self, key: &str) -> &mut Self {
        self.values.remove(key);
        if self.applied.get(key).is_some_and(|v| !v.is_empty()) {
            self.changed.insert(key.to_string());
        } else {
            self.changed.remove(key);
        }
        self
    }

    /// Names of all changed attributes.
    pub fn changed_keys(&self) -> impl Iterator<Item = &str> {
        self.changed.iter().map(String::as_str)
    }
}

impl ResourceData for DesiredRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn get(&self, key: &str) -> Option<&AttrValue> {
        self.values.get(key)
    }

    fn has_change(&self, key: &str) -> bool {
        self.changed.contains(key)
    }

    fn get_change(&self, key: &str) -> (Option<&AttrValue>, Option<&AttrValue>) {
        (self.applied.get(key), self.values.get(key))
    }

    fn set(&mut self, key: &str, value: AttrValue) {
        self.applied.insert(key.to_string(), value.clone());
        self.values.insert(key.to_string(), value);
        self.changed.remove(key);
    }
}
