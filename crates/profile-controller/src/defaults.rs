//! Default namespace labels loaded from disk
//!
//! The path is either a single YAML document of `key: value` pairs or a
//! directory of such documents (typically a mounted ConfigMap). Directory
//! entries are read in lexical order and later files win on key collisions.
//!
//! Only regular files directly inside the directory are read, following
//! symlinks. Subdirectories are skipped, and so are `..`-prefixed entries,
//! which the kubelet uses for ConfigMap volume bookkeeping. A symlink whose
//! target is missing fails the whole load with an I/O error: it means the
//! mount is mid-update, and the reconcile loop retries I/O errors.

use std::fs;
use std::path::{Path, PathBuf};

use profile_common::yaml::parse_string_map;
use profile_common::{Error, Result};
use tracing::{debug, trace};

use crate::labels::LabelSet;

/// Load default labels from a file or a directory of files.
pub fn read_default_labels(path: impl AsRef<Path>) -> Result<LabelSet> {
    let path = path.as_ref();
    let metadata = fs::metadata(path).map_err(|e| Error::io(path, e))?;

    let labels = if metadata.is_dir() {
        read_label_dir(path)?
    } else {
        read_label_file(path)?
    };

    debug!(path = %path.display(), count = labels.len(), "loaded default namespace labels");
    Ok(labels)
}

fn read_label_dir(dir: &Path) -> Result<LabelSet> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();

        if entry.file_name().to_string_lossy().starts_with("..") {
            trace!(path = %path.display(), "skipping volume bookkeeping entry");
            continue;
        }
        if fs::metadata(&path).map_err(|e| Error::io(&path, e))?.is_file() {
            files.push(path);
        }
    }
    files.sort();

    let mut labels = LabelSet::new();
    for file in &files {
        labels.extend(read_label_file(file)?);
    }
    Ok(labels)
}

fn read_label_file(path: &Path) -> Result<LabelSet> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_label_document(&content, &path.display().to_string())
}

/// Decode one YAML label document.
///
/// Values are taken as written: `version: 1.10` is `"1.10"` and
/// `enabled: true` is `"true"`. A null value becomes the empty string,
/// which the reconciler reads as a removal instruction. Nested values are
/// rejected. A key repeated within a document keeps its last value.
pub fn parse_label_document(content: &str, source_name: &str) -> Result<LabelSet> {
    let entries =
        parse_string_map(content).map_err(|e| Error::decode(source_name, e.to_string()))?;

    Ok(entries
        .into_iter()
        .map(|(key, value)| (key, value.unwrap_or_default()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, content).expect("write label file");
        path
    }

    fn labels(pairs: &[(&str, &str)]) -> LabelSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_single_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "single-file.yaml", "test-key: test-value");

        let loaded = read_default_labels(&path).unwrap();
        assert_eq!(loaded, labels(&[("test-key", "test-value")]));
    }

    #[test]
    fn test_directory_of_files_is_unioned() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "multiple-files/file1.yaml", "test-key1: test-value1");
        write(tmp.path(), "multiple-files/file2.yaml", "test-key2: test-value2");

        let loaded = read_default_labels(tmp.path().join("multiple-files")).unwrap();
        assert_eq!(
            loaded,
            labels(&[("test-key1", "test-value1"), ("test-key2", "test-value2")])
        );
    }

    #[test]
    fn test_later_file_wins_in_lexical_order() {
        let tmp = tempfile::tempdir().unwrap();
        // Written out of order on purpose
        write(tmp.path(), "20-override.yaml", "shared: second\nonly-b: b");
        write(tmp.path(), "10-base.yaml", "shared: first\nonly-a: a");

        let loaded = read_default_labels(tmp.path()).unwrap();
        assert_eq!(
            loaded,
            labels(&[("shared", "second"), ("only-a", "a"), ("only-b", "b")])
        );
    }

    #[test]
    fn test_subdirectories_and_volume_entries_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "labels.yaml", "visible: yes");
        write(tmp.path(), ".dotfile.yaml", "dotfile: yes");
        write(tmp.path(), "..data/labels.yaml", "projected: yes");
        write(tmp.path(), "..stray", "stray: yes");
        write(tmp.path(), "nested/labels.yaml", "nested: yes");

        let loaded = read_default_labels(tmp.path()).unwrap();
        assert_eq!(loaded, labels(&[("dotfile", "yes"), ("visible", "yes")]));
    }

    /// Layout the kubelet produces for a ConfigMap volume
    #[cfg(unix)]
    #[test]
    fn test_configmap_volume_layout() {
        use std::os::unix::fs::symlink;

        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "..2024_01_01_00_00_00.1/labels", "istio-injection: enabled");
        symlink("..2024_01_01_00_00_00.1", tmp.path().join("..data")).unwrap();
        symlink("..data/labels", tmp.path().join("labels")).unwrap();

        let loaded = read_default_labels(tmp.path()).unwrap();
        assert_eq!(loaded, labels(&[("istio-injection", "enabled")]));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_io_error() {
        use std::os::unix::fs::symlink;

        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.yaml", "good: label");
        symlink("missing-target", tmp.path().join("b.yaml")).unwrap();

        let err = read_default_labels(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.is_retryable());
        assert!(err.to_string().contains("b.yaml"));
    }

    #[test]
    fn test_empty_file_and_empty_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let empty_dir = tmp.path().join("empty");
        fs::create_dir(&empty_dir).unwrap();
        let empty_file = write(tmp.path(), "empty.yaml", "");
        let comment_file = write(tmp.path(), "comment.yaml", "# managed by the operator\n");

        assert!(read_default_labels(&empty_dir).unwrap().is_empty());
        assert!(read_default_labels(&empty_file).unwrap().is_empty());
        assert!(read_default_labels(&comment_file).unwrap().is_empty());
    }

    #[test]
    fn test_missing_path_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("does-not-exist.yaml");

        let err = read_default_labels(&missing).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("does-not-exist.yaml"));
    }

    #[test]
    fn test_malformed_file_in_directory_fails_whole_load() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.yaml", "good: label");
        write(tmp.path(), "b.yaml", "not: valid: yaml: {{");

        let err = read_default_labels(tmp.path()).unwrap_err();
        match err {
            Error::Decode { source_name, .. } => assert!(source_name.ends_with("b.yaml")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_scalars_are_stringified() {
        let loaded =
            parse_label_document("enabled: true\nreplicas: 3\nremove-me:\n", "inline").unwrap();
        assert_eq!(
            loaded,
            labels(&[("enabled", "true"), ("replicas", "3"), ("remove-me", "")])
        );
    }

    #[test]
    fn test_values_keep_their_written_form() {
        let loaded = parse_label_document(
            "version: 1.10\nhex: 0x1F\nexp: 1e3\nbig: 99999999999999999999\ninf: .inf\n",
            "inline",
        )
        .unwrap();
        assert_eq!(
            loaded,
            labels(&[
                ("version", "1.10"),
                ("hex", "0x1F"),
                ("exp", "1e3"),
                ("big", "99999999999999999999"),
                ("inf", ".inf"),
            ])
        );
    }

    #[test]
    fn test_nested_values_are_rejected() {
        let err = parse_label_document("outer:\n  inner: value\n", "inline").unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
        assert!(err.to_string().contains("'outer' must be a scalar"));
    }

    #[test]
    fn test_top_level_sequence_is_rejected() {
        let err = parse_label_document("- a\n- b\n", "inline").unwrap_err();
        assert!(err.to_string().contains("found sequence"));
    }
}
