//! Persisted index file.
//!
//! The index lives at `.codemap/index.json` under the project root, written
//! pretty-printed to a sibling temp file and renamed into place so a crashed
//! write never leaves a truncated index behind. One writer per invocation is
//! assumed; concurrent writers are last-write-wins.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{CodemapError, Result};
use crate::index::{ProjectIndex, SCHEMA_VERSION};

pub const INDEX_FILE: &str = ".codemap/index.json";

/// Location of the persisted index under a project root.
pub fn index_path(root: &Path) -> PathBuf {
    root.join(INDEX_FILE)
}

/// Write the index to its canonical location under `root`.
pub fn save(index: &ProjectIndex, root: &Path) -> Result<()> {
    let path = index_path(root);
    let parent = path.parent().unwrap_or(root);
    fs::create_dir_all(parent).map_err(|source| CodemapError::IndexIo {
        path: parent.to_path_buf(),
        source,
    })?;

    let json = serde_json::to_string_pretty(index)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|source| CodemapError::IndexIo {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, &path).map_err(|source| CodemapError::IndexIo {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), files = index.metadata.total_files, "index saved");
    Ok(())
}

/// Load the persisted index from under `root`.
///
/// The schema version is probed before full deserialization so an old index
/// reports [`CodemapError::SchemaMismatch`] instead of a shape error.
pub fn load(root: &Path) -> Result<ProjectIndex> {
    let path = index_path(root);
    let raw = fs::read_to_string(&path).map_err(|source| CodemapError::IndexIo {
        path: path.clone(),
        source,
    })?;

    #[derive(Deserialize)]
    struct MetadataProbe {
        #[serde(rename = "schemaVersion")]
        schema_version: u32,
    }
    #[derive(Deserialize)]
    struct DocumentProbe {
        metadata: MetadataProbe,
    }

    let probe: DocumentProbe = serde_json::from_str(&raw)?;
    if probe.metadata.schema_version != SCHEMA_VERSION {
        return Err(CodemapError::SchemaMismatch {
            found: probe.metadata.schema_version,
            expected: SCHEMA_VERSION,
        });
    }

    let index: ProjectIndex = serde_json::from_str(&raw)?;
    debug!(path = %path.display(), files = index.metadata.total_files, "index loaded");
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::extract;
    use crate::index::GraphBuilder;

    fn sample_index() -> ProjectIndex {
        let records = vec![
            (
                "src/a.ts".to_string(),
                extract("import { b } from './b';\nexport const A = 1;\n", "src/a.ts"),
            ),
            ("src/b.ts".to_string(), extract("export const b = 2;\n", "src/b.ts")),
        ];
        GraphBuilder::new("/p").build(records).index
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let index = sample_index();
        save(&index, dir.path()).unwrap();

        let loaded = load(dir.path()).unwrap();
        assert_eq!(loaded.nodes, index.nodes);
        assert_eq!(loaded.edges, index.edges);
        assert_eq!(loaded.files, index.files);
        assert_eq!(loaded.metadata.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn persisted_document_has_expected_top_level_keys() {
        let dir = tempfile::tempdir().unwrap();
        save(&sample_index(), dir.path()).unwrap();

        let raw = fs::read_to_string(index_path(dir.path())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["edges", "files", "metadata", "nodes", "tree"]);
        assert!(value["metadata"]["schemaVersion"].is_u64());
        assert!(value["metadata"]["createdAt"].is_string());
    }

    #[test]
    fn missing_index_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load(dir.path()),
            Err(CodemapError::IndexIo { .. })
        ));
    }

    #[test]
    fn wrong_schema_version_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let index = sample_index();
        save(&index, dir.path()).unwrap();

        let path = index_path(dir.path());
        let raw = fs::read_to_string(&path)
            .unwrap()
            .replace("\"schemaVersion\": 1", "\"schemaVersion\": 99");
        fs::write(&path, raw).unwrap();

        assert!(matches!(
            load(dir.path()),
            Err(CodemapError::SchemaMismatch {
                found: 99,
                expected: SCHEMA_VERSION
            })
        ));
    }

    #[test]
    fn malformed_index_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".codemap")).unwrap();
        fs::write(index_path(dir.path()), "{ not json").unwrap();
        assert!(matches!(
            load(dir.path()),
            Err(CodemapError::MalformedIndex(_))
        ));
    }

    #[test]
    fn no_temp_file_left_after_save() {
        let dir = tempfile::tempdir().unwrap();
        save(&sample_index(), dir.path()).unwrap();
        let tmp = index_path(dir.path()).with_extension("json.tmp");
        assert!(!tmp.exists());
    }
}
