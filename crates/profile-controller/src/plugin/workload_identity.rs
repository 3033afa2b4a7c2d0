//! GCP Workload Identity

use profile_common::{
    GCP_SERVICE_ACCOUNT_ANNOTATION, IDENTITY_PROVIDER_GCP_WORKLOAD_IDENTITY, LABEL_IDENTITY_PROVIDER,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::Plugin;
use crate::labels::LabelSet;

/// Kind string stored on Profiles
pub const KIND_WORKLOAD_IDENTITY: &str = "WorkloadIdentity";

/// Binds the profile's service account to a GCP service account.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpWorkloadIdentity {
    /// GCP service account email
    pub gcp_service_account: String,
}

impl Plugin for GcpWorkloadIdentity {
    fn kind(&self) -> &'static str {
        KIND_WORKLOAD_IDENTITY
    }

    fn spec(&self) -> Value {
        json!({ "gcpServiceAccount": self.gcp_service_account })
    }

    fn service_account_annotations(&self) -> LabelSet {
        LabelSet::from([(
            GCP_SERVICE_ACCOUNT_ANNOTATION.to_string(),
            self.gcp_service_account.clone(),
        )])
    }

    fn namespace_labels(&self) -> LabelSet {
        LabelSet::from([(
            LABEL_IDENTITY_PROVIDER.to_string(),
            IDENTITY_PROVIDER_GCP_WORKLOAD_IDENTITY.to_string(),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotates_service_account_with_gcp_account() {
        let plugin = GcpWorkloadIdentity {
            gcp_service_account: "kubeflow2@project-id.iam.gserviceaccount.com".to_string(),
        };
        assert_eq!(
            plugin.service_account_annotations(),
            LabelSet::from([(
                "iam.gke.io/gcp-service-account".to_string(),
                "kubeflow2@project-id.iam.gserviceaccount.com".to_string(),
            )])
        );
    }

    #[test]
    fn marks_namespace_for_workload_identity() {
        let plugin = GcpWorkloadIdentity {
            gcp_service_account: "kubeflow2@project-id.iam.gserviceaccount.com".to_string(),
        };
        assert_eq!(
            plugin.namespace_labels(),
            LabelSet::from([(
                LABEL_IDENTITY_PROVIDER.to_string(),
                "gcp-workload-identity".to_string(),
            )])
        );
    }
}
