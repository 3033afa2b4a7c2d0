//! Plugin resolution
//!
//! Profiles carry a list of `{kind, spec}` declarations. Each kind maps to a
//! decoder in a [`PluginRegistry`] that turns the opaque spec into one
//! [`PluginConfig`] variant. Resolution is fail-fast and order-preserving:
//! the first unknown kind or malformed body aborts the whole list.
//!
//! Adding a plugin kind means adding a variant, a module implementing
//! [`Plugin`] and a registry entry; [`PluginRegistry::resolve`] does not
//! change.

mod aws;
mod workload_identity;

use std::collections::HashMap;
use std::sync::OnceLock;

use kube::ResourceExt;
use profile_common::crd::{PluginDeclaration, Profile};
use profile_common::{Error, Result, PROFILE_API_VERSION};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::labels::LabelSet;

pub use aws::{
    AwsIamForServiceAccount, KIND_AWS_IAM_FOR_SERVICE_ACCOUNT,
    KIND_AWS_IAM_FOR_SERVICE_ACCOUNT_ALIAS,
};
pub use workload_identity::{GcpWorkloadIdentity, KIND_WORKLOAD_IDENTITY};

/// Behaviour every resolved plugin exposes to the provisioning layer.
pub trait Plugin {
    /// Canonical kind string
    fn kind(&self) -> &'static str;

    /// Plugin spec in its wire form
    fn spec(&self) -> Value;

    /// Annotations to put on the profile's service account
    fn service_account_annotations(&self) -> LabelSet;

    /// Labels this plugin requires on the profile namespace
    fn namespace_labels(&self) -> LabelSet {
        LabelSet::new()
    }
}

/// A resolved, typed plugin configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PluginConfig {
    /// AWS IAM role bound to the profile's service account (IRSA)
    AwsIamForServiceAccount(AwsIamForServiceAccount),
    /// GCP service account bound via workload identity
    WorkloadIdentity(GcpWorkloadIdentity),
}

impl PluginConfig {
    fn as_plugin(&self) -> &dyn Plugin {
        match self {
            Self::AwsIamForServiceAccount(p) => p,
            Self::WorkloadIdentity(p) => p,
        }
    }

    /// Render back into the declaration form stored on a Profile
    pub fn to_declaration(&self) -> PluginDeclaration {
        PluginDeclaration {
            api_version: Some(PROFILE_API_VERSION.to_string()),
            kind: self.kind().to_string(),
            spec: Some(self.spec()),
        }
    }
}

impl Plugin for PluginConfig {
    fn kind(&self) -> &'static str {
        self.as_plugin().kind()
    }

    fn spec(&self) -> Value {
        self.as_plugin().spec()
    }

    fn service_account_annotations(&self) -> LabelSet {
        self.as_plugin().service_account_annotations()
    }

    fn namespace_labels(&self) -> LabelSet {
        self.as_plugin().namespace_labels()
    }
}

/// Turns a plugin spec into a config variant.
pub type PluginDecoder = fn(&Value) -> std::result::Result<PluginConfig, serde_json::Error>;

/// Kind → decoder table.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    decoders: HashMap<String, PluginDecoder>,
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl PluginRegistry {
    /// A registry with no kinds
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry with every built-in kind
    pub fn with_builtin_kinds() -> Self {
        let mut registry = Self::empty();
        registry
            .register(KIND_AWS_IAM_FOR_SERVICE_ACCOUNT, decode_aws_iam)
            .register(KIND_AWS_IAM_FOR_SERVICE_ACCOUNT_ALIAS, decode_aws_iam)
            .register(KIND_WORKLOAD_IDENTITY, decode_workload_identity);
        registry
    }

    /// Process-wide registry of built-in kinds
    pub fn builtin() -> &'static PluginRegistry {
        static BUILTIN: OnceLock<PluginRegistry> = OnceLock::new();
        BUILTIN.get_or_init(Self::with_builtin_kinds)
    }

    /// Register `decoder` for `kind`, replacing any previous entry
    pub fn register(&mut self, kind: impl Into<String>, decoder: PluginDecoder) -> &mut Self {
        self.decoders.insert(kind.into(), decoder);
        self
    }

    /// Whether a decoder is registered for `kind`
    pub fn contains(&self, kind: &str) -> bool {
        self.decoders.contains_key(kind)
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Resolve declarations in order, stopping at the first failure.
    pub fn resolve(&self, declarations: &[PluginDeclaration]) -> Result<Vec<PluginConfig>> {
        declarations
            .iter()
            .enumerate()
            .map(|(index, declaration)| self.decode(index, declaration))
            .collect()
    }

    fn decode(&self, index: usize, declaration: &PluginDeclaration) -> Result<PluginConfig> {
        let kind = declaration.kind.as_str();
        let decoder = self
            .decoders
            .get(kind)
            .ok_or_else(|| Error::unsupported_plugin_kind(index, kind))?;
        let spec = declaration
            .spec
            .as_ref()
            .ok_or_else(|| Error::plugin_decode(index, kind, "plugin spec is missing"))?;
        decoder(spec).map_err(|e| Error::plugin_decode(index, kind, e.to_string()))
    }
}

fn decode_aws_iam(spec: &Value) -> std::result::Result<PluginConfig, serde_json::Error> {
    AwsIamForServiceAccount::deserialize(spec).map(PluginConfig::AwsIamForServiceAccount)
}

fn decode_workload_identity(spec: &Value) -> std::result::Result<PluginConfig, serde_json::Error> {
    GcpWorkloadIdentity::deserialize(spec).map(PluginConfig::WorkloadIdentity)
}

/// Resolve declarations against the built-in registry.
pub fn resolve_plugins(declarations: &[PluginDeclaration]) -> Result<Vec<PluginConfig>> {
    PluginRegistry::builtin().resolve(declarations)
}

/// Resolve the plugins declared on a Profile.
pub fn plugins_for_profile(profile: &Profile) -> Result<Vec<PluginConfig>> {
    let plugins = resolve_plugins(&profile.spec.plugins)?;
    debug!(
        profile = %profile.name_any(),
        count = plugins.len(),
        kinds = ?plugins.iter().map(Plugin::kind).collect::<Vec<_>>(),
        "resolved profile plugins"
    );
    Ok(plugins)
}
