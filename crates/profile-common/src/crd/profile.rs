//! Profile CRD: a user's namespace and the cloud identities bound to it
//!
//! The controller only interprets `spec.plugins`; the remaining fields are
//! carried so a Profile round-trips through serde unchanged.

use kube::CustomResource;
use schemars::schema::{InstanceType, Schema, SchemaObject};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Profile describes a tenant namespace and its identity bindings.
///
/// Example:
/// ```yaml
/// apiVersion: kubeflow.org/v1
/// kind: Profile
/// metadata:
///   name: alice
/// spec:
///   owner:
///     kind: User
///     name: alice@example.com
///   plugins:
///     - kind: WorkloadIdentity
///       spec:
///         gcpServiceAccount: alice@project-id.iam.gserviceaccount.com
/// ```
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "kubeflow.org",
    version = "v1",
    kind = "Profile",
    status = "ProfileStatus",
    printcolumn = r#"{"name":"Owner","type":"string","jsonPath":".spec.owner.name"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSpec {
    /// RBAC subject that owns the profile namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerSubject>,

    /// Cloud identity plugins, applied in list order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<PluginDeclaration>,

    /// ResourceQuota spec applied to the namespace, passed through verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "preserve_unknown_object")]
    pub resource_quota_spec: Option<serde_json::Value>,
}

/// RBAC subject owning a Profile
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSubject {
    /// Subject kind (User, Group, ServiceAccount)
    pub kind: String,
    /// Subject name
    pub name: String,
    /// API group of the subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_group: Option<String>,
}

/// A kind-tagged plugin declaration as stored on the Profile.
///
/// `spec` is opaque until a decoder registered for `kind` interprets it.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PluginDeclaration {
    /// apiVersion of the plugin payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Discriminator selecting the decoder
    pub kind: String,

    /// Plugin-specific body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "preserve_unknown_object")]
    pub spec: Option<serde_json::Value>,
}

impl PluginDeclaration {
    /// Create a declaration of `kind` carrying `spec`
    pub fn new(kind: impl Into<String>, spec: serde_json::Value) -> Self {
        Self {
            api_version: None,
            kind: kind.into(),
            spec: Some(spec),
        }
    }
}

/// Profile status
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStatus {
    /// Conditions reported by the controller
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ProfileCondition>,
}

/// A single status condition
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCondition {
    /// Condition type (e.g. "Ready", "Failed")
    #[serde(rename = "type")]
    pub type_: String,
    /// "True", "False" or "Unknown"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Human-readable detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Schema for free-form objects: the API server keeps unknown fields as-is.
fn preserve_unknown_object(_gen: &mut schemars::gen::SchemaGenerator) -> Schema {
    Schema::Object(SchemaObject {
        instance_type: Some(InstanceType::Object.into()),
        extensions: [(
            "x-kubernetes-preserve-unknown-fields".to_string(),
            serde_json::Value::Bool(true),
        )]
        .into_iter()
        .collect(),
        ..Default::default()
    })
}
