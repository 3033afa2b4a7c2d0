//! AWS IAM Roles for Service Accounts (IRSA)

use profile_common::{
    AWS_ROLE_ARN_ANNOTATION, IDENTITY_PROVIDER_AWS_IRSA, LABEL_IDENTITY_PROVIDER,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::Plugin;
use crate::labels::LabelSet;

/// Kind string stored on Profiles
pub const KIND_AWS_IAM_FOR_SERVICE_ACCOUNT: &str = "AwsIamForServiceAccount";

/// Alternate capitalization accepted for the same plugin
pub const KIND_AWS_IAM_FOR_SERVICE_ACCOUNT_ALIAS: &str = "AwsIAMForServiceAccount";

/// Binds the profile's service account to an AWS IAM role.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsIamForServiceAccount {
    /// IAM role ARN, e.g. `arn:aws:iam::123456789012:role/my-role`
    pub aws_iam_role: String,
}

impl Plugin for AwsIamForServiceAccount {
    fn kind(&self) -> &'static str {
        KIND_AWS_IAM_FOR_SERVICE_ACCOUNT
    }

    fn spec(&self) -> Value {
        json!({ "awsIamRole": self.aws_iam_role })
    }

    fn service_account_annotations(&self) -> LabelSet {
        LabelSet::from([(
            AWS_ROLE_ARN_ANNOTATION.to_string(),
            self.aws_iam_role.clone(),
        )])
    }

    fn namespace_labels(&self) -> LabelSet {
        LabelSet::from([(
            LABEL_IDENTITY_PROVIDER.to_string(),
            IDENTITY_PROVIDER_AWS_IRSA.to_string(),
        )])
    }
}
