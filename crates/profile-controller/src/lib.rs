//! Reconciliation core for Profile namespaces
//!
//! - `defaults`: loads operator default labels from a file or directory
//! - `labels`: merges defaults into a namespace's labels without clobbering
//!   user-set values
//! - `plugin`: resolves kind-tagged plugin declarations into typed configs
//! - `config`: controller settings shared with the reconcile loop

pub mod config;
pub mod defaults;
pub mod labels;
pub mod plugin;

pub use config::ControllerConfig;
pub use defaults::read_default_labels;
pub use labels::{
    desired_namespace_labels, reconcile_labels, set_namespace_labels, LabelChanges, LabelSet,
};
pub use plugin::{plugins_for_profile, resolve_plugins, Plugin, PluginConfig, PluginRegistry};
