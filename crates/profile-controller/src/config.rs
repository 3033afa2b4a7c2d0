//! Controller configuration
//!
//! Flattened into the controller binary's CLI with `#[command(flatten)]`.
//! Every flag can also be set from the environment so the settings can come
//! from a Deployment's `env` block.

use std::path::PathBuf;

use clap::Args;
use profile_common::{Error, Result};
use serde::Deserialize;
use tracing::info;

use crate::defaults::read_default_labels;
use crate::labels::LabelSet;

/// Where the default namespace labels are mounted
pub const DEFAULT_NAMESPACE_LABELS_PATH: &str = "/etc/profile-controller/namespace-labels.yaml";

/// Settings the reconcile loop hands to the core.
#[derive(Args, Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ControllerConfig {
    /// File or directory holding the default namespace labels
    #[arg(
        long = "namespace-labels-path",
        env = "NAMESPACE_LABELS_PATH",
        default_value = DEFAULT_NAMESPACE_LABELS_PATH
    )]
    #[serde(default = "default_namespace_labels_path")]
    pub default_namespace_labels_path: PathBuf,
}

fn default_namespace_labels_path() -> PathBuf {
    PathBuf::from(DEFAULT_NAMESPACE_LABELS_PATH)
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            default_namespace_labels_path: default_namespace_labels_path(),
        }
    }
}

impl ControllerConfig {
    /// Reject settings the controller can't run with
    pub fn validate(&self) -> Result<()> {
        if self.default_namespace_labels_path.as_os_str().is_empty() {
            return Err(Error::config("namespace labels path must not be empty"));
        }
        Ok(())
    }

    /// Load the default namespace labels from the configured path
    pub fn load_default_labels(&self) -> Result<LabelSet> {
        self.validate()?;
        let labels = read_default_labels(&self.default_namespace_labels_path)?;
        info!(
            path = %self.default_namespace_labels_path.display(),
            count = labels.len(),
            "default namespace labels loaded"
        );
        Ok(labels)
    }
}
