//! Common types for the profile controller: the Profile CRD, errors, and utilities

#![deny(missing_docs)]

pub mod crd;
pub mod error;
pub mod telemetry;
pub mod yaml;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// API group of the Profile CRD
pub const PROFILE_API_GROUP: &str = "kubeflow.org";

/// apiVersion stamped on plugin declarations rendered by the controller
pub const PROFILE_API_VERSION: &str = "kubeflow.org/v1";

/// Standard label naming the higher-level application a namespace belongs to
pub const LABEL_PART_OF: &str = "app.kubernetes.io/part-of";

/// Value of [`LABEL_PART_OF`] on namespaces owned by a Profile
pub const LABEL_PART_OF_PROFILE: &str = "kubeflow-profile";

/// Namespace label naming the cloud identity provider injected into its pods
pub const LABEL_IDENTITY_PROVIDER: &str = "profiles.kubeflow.org/identity-provider";

/// [`LABEL_IDENTITY_PROVIDER`] value for AWS IAM Roles for Service Accounts
pub const IDENTITY_PROVIDER_AWS_IRSA: &str = "aws-irsa";

/// [`LABEL_IDENTITY_PROVIDER`] value for GCP Workload Identity
pub const IDENTITY_PROVIDER_GCP_WORKLOAD_IDENTITY: &str = "gcp-workload-identity";

/// Service account annotation binding it to an AWS IAM role (IRSA)
pub const AWS_ROLE_ARN_ANNOTATION: &str = "eks.amazonaws.com/role-arn";

/// Service account annotation binding it to a GCP service account
pub const GCP_SERVICE_ACCOUNT_ANNOTATION: &str = "iam.gke.io/gcp-service-account";
