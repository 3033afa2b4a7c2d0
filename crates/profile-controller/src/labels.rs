//! Namespace label reconciliation
//!
//! Defaults are floors, not overrides: a default is written only when the
//! namespace doesn't carry the key yet. An empty default value is a removal
//! instruction for that key.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Namespace;
use tracing::debug;

use crate::plugin::{Plugin, PluginConfig};

/// Label key/value mapping
pub type LabelSet = BTreeMap<String, String>;

/// What a reconcile pass did to a label map
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelChanges {
    /// Keys injected from defaults
    pub added: Vec<String>,
    /// Keys removed by an empty default
    pub removed: Vec<String>,
    /// Keys whose existing value differs from the default and was kept
    pub preserved: Vec<String>,
}

impl LabelChanges {
    /// True when the label map was not modified
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Apply `desired` defaults to `current` in place.
///
/// For each desired key: an empty value removes the key, a missing key is
/// added, and an existing key keeps its value. Keys not named in `desired`
/// are never touched.
pub fn reconcile_labels(current: &mut LabelSet, desired: &LabelSet) -> LabelChanges {
    let mut changes = LabelChanges::default();

    for (key, value) in desired {
        if value.is_empty() {
            if current.remove(key).is_some() {
                changes.removed.push(key.clone());
            }
            continue;
        }

        match current.get(key) {
            None => {
                current.insert(key.clone(), value.clone());
                changes.added.push(key.clone());
            }
            Some(existing) if existing != value => changes.preserved.push(key.clone()),
            Some(_) => {}
        }
    }

    changes
}

/// Apply `desired` defaults to a namespace's labels.
pub fn set_namespace_labels(ns: &mut Namespace, desired: &LabelSet) -> LabelChanges {
    let labels = ns.metadata.labels.get_or_insert_with(BTreeMap::new);
    let changes = reconcile_labels(labels, desired);

    if !changes.is_empty() || !changes.preserved.is_empty() {
        debug!(
            namespace = ns.metadata.name.as_deref().unwrap_or_default(),
            added = ?changes.added,
            removed = ?changes.removed,
            preserved = ?changes.preserved,
            "reconciled namespace labels"
        );
    }

    changes
}

/// Combine operator defaults with label requirements contributed by plugins.
///
/// Plugin labels override defaults; later plugins override earlier ones.
pub fn desired_namespace_labels(defaults: &LabelSet, plugins: &[PluginConfig]) -> LabelSet {
    let mut desired = defaults.clone();
    for plugin in plugins {
        desired.extend(plugin.namespace_labels());
    }
    desired
}
