//! Filesystem corpus loader
//!
//! Reads a minecraft-data style `data/pc` directory: every subdirectory
//! holding both `version.json` and `protocol.json` is a candidate version.
//! Directories are visited in sorted order so the loaded corpus does not
//! depend on filesystem iteration order.

#![allow(clippy::result_large_err)]

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use wiregroup_core::model::{ProtocolVersion, SpecDocument, VersionCorpus};
use wiregroup_core::{log_op_end, log_op_error, log_op_start};

use crate::errors::{corpus_read, io_error, Result};

const VERSION_FILE: &str = "version.json";
const PROTOCOL_FILE: &str = "protocol.json";
const COMMON_VERSIONS_FILE: &str = "common/protocolVersions.json";

/// `version.json` contents
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionInfo {
    version: u32,
    minecraft_version: String,
    #[serde(default)]
    release_type: Option<String>,
}

/// Entry of `common/protocolVersions.json`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommonVersion {
    minecraft_version: String,
}

/// Which candidate directories are loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusFilter {
    /// Skip snapshots and pre-releases
    pub release_only: bool,
    /// Skip versions missing from `common/protocolVersions.json` when present
    pub use_common_list: bool,
}

impl Default for CorpusFilter {
    fn default() -> Self {
        Self {
            release_only: true,
            use_common_list: true,
        }
    }
}

/// Why a directory was not loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingFiles,
    NotInCommonList,
    NotRelease,
    /// Another directory already supplied this protocol number
    DuplicateProtocol { kept: PathBuf },
}

/// Output of [`load_corpus`]
#[derive(Debug, Clone, Default)]
pub struct LoadedCorpus {
    pub corpus: VersionCorpus,
    /// Release name of every loaded version
    pub names: BTreeMap<ProtocolVersion, String>,
    pub skipped: Vec<(PathBuf, SkipReason)>,
}

/// Load every candidate version under `data_dir`
///
/// # Errors
///
/// Fails when `data_dir` cannot be listed or a candidate's JSON files
/// cannot be read or parsed. Nothing is returned in that case, so no
/// manifest can be built from a partial corpus.
pub fn load_corpus(data_dir: &Path, filter: &CorpusFilter) -> Result<LoadedCorpus> {
    log_op_start!("load_corpus", data_dir = %data_dir.display());
    let start = std::time::Instant::now();

    let result = load_corpus_impl(data_dir, filter).map_err(|e| {
        log_op_error!(
            "load_corpus",
            e,
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "load_corpus",
        duration_ms = start.elapsed().as_millis() as u64,
        version_count = result.corpus.len(),
        skipped = result.skipped.len()
    );

    Ok(result)
}

fn load_corpus_impl(data_dir: &Path, filter: &CorpusFilter) -> Result<LoadedCorpus> {
    let common = if filter.use_common_list {
        read_common_list(data_dir)?
    } else {
        None
    };

    let mut dirs: Vec<PathBuf> = fs::read_dir(data_dir)
        .map_err(|e| io_error("read_corpus_dir", e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();

    let mut out = LoadedCorpus::default();
    let mut origins: BTreeMap<ProtocolVersion, PathBuf> = BTreeMap::new();

    for dir in dirs {
        let version_path = dir.join(VERSION_FILE);
        let protocol_path = dir.join(PROTOCOL_FILE);
        if !version_path.is_file() || !protocol_path.is_file() {
            skip(&mut out, dir, SkipReason::MissingFiles);
            continue;
        }

        let info: VersionInfo = read_json(&version_path)?;

        if let Some(common) = &common {
            if !common.contains(&info.minecraft_version) {
                skip(&mut out, dir, SkipReason::NotInCommonList);
                continue;
            }
        }
        if filter.release_only && !is_release(&info) {
            skip(&mut out, dir, SkipReason::NotRelease);
            continue;
        }

        let version = ProtocolVersion(info.version);
        let document = SpecDocument::new(read_json::<Value>(&protocol_path)?);

        if let Some(kept) = origins.get(&version) {
            if out.corpus.get(version) != Some(&document) {
                tracing::warn!(
                    version = version.get(),
                    kept = %kept.display(),
                    ignored = %dir.display(),
                    "two release directories define the same protocol version differently"
                );
            }
            let kept = kept.clone();
            skip(&mut out, dir, SkipReason::DuplicateProtocol { kept });
            continue;
        }

        out.corpus.insert(version, document);
        out.names.insert(version, info.minecraft_version);
        origins.insert(version, dir);
    }

    Ok(out)
}

/// Release names are digits and dots only, and not explicitly marked otherwise
fn is_release(info: &VersionInfo) -> bool {
    let numeric = !info.minecraft_version.is_empty()
        && info
            .minecraft_version
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.');
    let marked_release = info
        .release_type
        .as_deref()
        .map_or(true, |t| t == "release");
    numeric && marked_release
}

fn read_common_list(data_dir: &Path) -> Result<Option<HashSet<String>>> {
    let path = data_dir.join(COMMON_VERSIONS_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let entries: Vec<CommonVersion> = read_json(&path)?;
    Ok(Some(entries.into_iter().map(|e| e.minecraft_version).collect()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| io_error("read_corpus_file", e))?;
    serde_json::from_str(&content).map_err(|e| corpus_read(path, &e.to_string()))
}

fn skip(out: &mut LoadedCorpus, dir: PathBuf, reason: SkipReason) {
    tracing::debug!(dir = %dir.display(), reason = ?reason, "skipping corpus directory");
    out.skipped.push((dir, reason));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_version(root: &Path, dir: &str, version: u32, name: &str, protocol: Value) {
        let path = root.join(dir);
        fs::create_dir_all(&path).unwrap();
        fs::write(
            path.join(VERSION_FILE),
            json!({"version": version, "minecraftVersion": name}).to_string(),
        )
        .unwrap();
        fs::write(path.join(PROTOCOL_FILE), protocol.to_string()).unwrap();
    }

    #[test]
    fn test_loads_release_versions() {
        let dir = TempDir::new().unwrap();
        write_version(dir.path(), "1.8", 47, "1.8", json!({"a": 1}));
        write_version(dir.path(), "1.12", 335, "1.12", json!({"a": 2}));

        let loaded = load_corpus(dir.path(), &CorpusFilter::default()).unwrap();

        assert_eq!(loaded.corpus.len(), 2);
        assert_eq!(loaded.names[&ProtocolVersion(47)], "1.8");
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn test_skips_missing_files_and_snapshots() {
        let dir = TempDir::new().unwrap();
        write_version(dir.path(), "1.8", 47, "1.8", json!({}));
        write_version(dir.path(), "17w15a", 317, "17w15a", json!({}));
        fs::create_dir_all(dir.path().join("common")).unwrap();

        let loaded = load_corpus(dir.path(), &CorpusFilter::default()).unwrap();

        assert_eq!(loaded.corpus.len(), 1);
        let reasons: Vec<_> = loaded.skipped.iter().map(|(_, r)| r.clone()).collect();
        assert!(reasons.contains(&SkipReason::NotRelease));
        assert!(reasons.contains(&SkipReason::MissingFiles));
    }

    #[test]
    fn test_release_filter_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        write_version(dir.path(), "17w15a", 317, "17w15a", json!({}));

        let filter = CorpusFilter {
            release_only: false,
            use_common_list: true,
        };
        let loaded = load_corpus(dir.path(), &filter).unwrap();

        assert_eq!(loaded.corpus.len(), 1);
    }

    #[test]
    fn test_common_list_filters_versions() {
        let dir = TempDir::new().unwrap();
        write_version(dir.path(), "1.8", 47, "1.8", json!({}));
        write_version(dir.path(), "0.30c", 7, "0.30", json!({}));
        fs::create_dir_all(dir.path().join("common")).unwrap();
        fs::write(
            dir.path().join(COMMON_VERSIONS_FILE),
            json!([{"minecraftVersion": "1.8", "version": 47}]).to_string(),
        )
        .unwrap();

        let loaded = load_corpus(dir.path(), &CorpusFilter::default()).unwrap();

        assert_eq!(loaded.corpus.versions().collect::<Vec<_>>(), vec![ProtocolVersion(47)]);
        assert!(loaded
            .skipped
            .iter()
            .any(|(_, r)| *r == SkipReason::NotInCommonList));
    }

    #[test]
    fn test_duplicate_protocol_keeps_first_sorted() {
        let dir = TempDir::new().unwrap();
        write_version(dir.path(), "1.8", 47, "1.8", json!({"first": true}));
        write_version(dir.path(), "1.8.9", 47, "1.8.9", json!({"first": false}));

        let loaded = load_corpus(dir.path(), &CorpusFilter::default()).unwrap();

        assert_eq!(
            loaded.corpus.get(ProtocolVersion(47)).unwrap().root(),
            &json!({"first": true})
        );
        assert!(matches!(
            loaded.skipped[0].1,
            SkipReason::DuplicateProtocol { .. }
        ));
    }

    #[test]
    fn test_explicit_release_type() {
        let info = VersionInfo {
            version: 1,
            minecraft_version: "1.20".into(),
            release_type: Some("snapshot".into()),
        };
        assert!(!is_release(&info));
    }

    #[test]
    fn test_malformed_json_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("1.8");
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join(VERSION_FILE), "{not json").unwrap();
        fs::write(path.join(PROTOCOL_FILE), "{}").unwrap();

        let err = load_corpus(dir.path(), &CorpusFilter::default()).unwrap_err();

        assert!(err.message().contains("version.json"));
    }
}
