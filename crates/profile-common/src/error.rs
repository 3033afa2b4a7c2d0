//! Error types for the profile controller
//!
//! Errors carry the context needed to act on them from a reconcile loop:
//! the filesystem path of a broken label source, or the position and kind
//! of a plugin declaration that could not be resolved.

use std::path::Path;

use thiserror::Error;

/// Main error type for profile reconciliation
#[derive(Debug, Error)]
pub enum Error {
    /// A default-label source could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the file or directory being read
        path: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A default-label document is malformed
    #[error("failed to decode label document {source_name}: {message}")]
    Decode {
        /// Where the document came from (usually a file path)
        source_name: String,
        /// Description of what's malformed
        message: String,
    },

    /// A plugin body does not match the shape its kind expects
    #[error("failed to decode plugin #{index} of kind {kind}: {message}")]
    PluginDecode {
        /// Position of the declaration in the profile's plugin list
        index: usize,
        /// Declared plugin kind
        kind: String,
        /// Description of what's malformed
        message: String,
    },

    /// A plugin declares a kind no decoder is registered for
    #[error("unsupported plugin kind {kind} at position {index}")]
    UnsupportedPluginKind {
        /// Position of the declaration in the profile's plugin list
        index: usize,
        /// The unknown kind
        kind: String,
    },

    /// Controller configuration is invalid
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of what's invalid
        message: String,
    },
}

impl Error {
    /// Create an I/O error for the given path
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Create a label document decode error
    pub fn decode(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Decode {
            source_name: source_name.into(),
            message: msg.into(),
        }
    }

    /// Create a plugin decode error for the declaration at `index`
    pub fn plugin_decode(index: usize, kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::PluginDecode {
            index,
            kind: kind.into(),
            message: msg.into(),
        }
    }

    /// Create an unsupported plugin kind error for the declaration at `index`
    pub fn unsupported_plugin_kind(index: usize, kind: impl Into<String>) -> Self {
        Self::UnsupportedPluginKind {
            index,
            kind: kind.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Check if this error is retryable
    ///
    /// Only I/O failures can clear up on their own (a ConfigMap volume that
    /// hasn't been projected yet). Everything else needs an edit to the
    /// Profile or the label documents.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Io { .. } => true,
            Error::Decode { .. } => false,
            Error::PluginDecode { .. } => false,
            Error::UnsupportedPluginKind { .. } => false,
            Error::Config { .. } => false,
        }
    }

    /// Get the plugin position if this error is about a plugin declaration
    pub fn plugin_index(&self) -> Option<usize> {
        match self {
            Error::PluginDecode { index, .. } | Error::UnsupportedPluginKind { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }

    /// Get the plugin kind if this error is about a plugin declaration
    pub fn plugin_kind(&self) -> Option<&str> {
        match self {
            Error::PluginDecode { kind, .. } | Error::UnsupportedPluginKind { kind, .. } => {
                Some(kind)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // Story Tests: What a reconcile loop sees when resolution fails
    // ==========================================================================

    /// Story: a missing label directory names the path and is retried
    ///
    /// The label ConfigMap may not be mounted yet when the controller starts.
    #[test]
    fn story_missing_label_source_is_retryable() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = Error::io("/etc/profile-controller/labels", source);

        assert!(err.to_string().contains("/etc/profile-controller/labels"));
        assert!(err.to_string().contains("no such file"));
        assert!(err.is_retryable());
        assert_eq!(err.plugin_index(), None);
    }

    /// Story: a malformed label document is a permanent failure
    #[test]
    fn story_malformed_label_document_is_not_retryable() {
        let err = Error::decode("labels.yaml", "expected a mapping of labels");
        assert!(err.to_string().contains("labels.yaml"));
        assert!(err.to_string().contains("expected a mapping"));
        assert!(!err.is_retryable());
    }

    /// Story: plugin errors point at the offending declaration
    ///
    /// A profile may list several plugins; the error names which one broke
    /// so the user can fix the right entry.
    #[test]
    fn story_plugin_errors_name_position_and_kind() {
        let err = Error::plugin_decode(2, "WorkloadIdentity", "missing field `gcpServiceAccount`");
        assert!(err.to_string().contains("#2"));
        assert!(err.to_string().contains("WorkloadIdentity"));
        assert_eq!(err.plugin_index(), Some(2));
        assert_eq!(err.plugin_kind(), Some("WorkloadIdentity"));
        assert!(!err.is_retryable());

        let err = Error::unsupported_plugin_kind(0, "AzureWorkloadIdentity");
        assert!(err.to_string().contains("AzureWorkloadIdentity"));
        assert_eq!(err.plugin_index(), Some(0));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("namespace labels path must not be empty");
        assert!(err.to_string().contains("invalid configuration"));
        assert_eq!(err.plugin_kind(), None);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;

        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::io("labels.yaml", source);
        let inner = err.source().expect("io error should expose its source");
        assert!(inner.to_string().contains("denied"));
    }
}
