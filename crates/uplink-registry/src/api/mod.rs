//! Typed view over npm registry metadata documents
//!
//! The fetcher hands back the raw JSON document so that proxies can store it
//! untouched. These types are for callers that want to inspect it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Package metadata document served by an npm registry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PackageMetadata {
    /// Package name
    pub name: String,
    /// Document revision, present on CouchDB-backed registries
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    /// Package description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tag to version mapping, e.g. `latest`
    #[serde(rename = "dist-tags", default)]
    pub dist_tags: BTreeMap<String, String>,
    /// All versions metadata
    #[serde(default)]
    pub versions: BTreeMap<String, VersionMetadata>,
    /// Publish times keyed by version, plus `created` and `modified`
    #[serde(default)]
    pub time: BTreeMap<String, String>,
}

/// Metadata for a specific package version
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VersionMetadata {
    pub version: String,
    pub description: Option<String>,
    pub main: Option<String>,
    pub license: Option<serde_json::Value>,
    pub repository: Option<RepositoryInfo>,
    pub dependencies: Option<BTreeMap<String, String>>,
    #[serde(rename = "devDependencies")]
    pub dev_dependencies: Option<BTreeMap<String, String>>,
    #[serde(rename = "peerDependencies")]
    pub peer_dependencies: Option<BTreeMap<String, String>>,
    pub dist: DistInfo,
}

/// Repository information, either a bare URL or an object
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RepositoryInfo {
    Url(String),
    Detailed {
        #[serde(rename = "type")]
        repo_type: Option<String>,
        url: Option<String>,
    },
}

/// Distribution information for package tarball
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DistInfo {
    /// Tarball download URL
    pub tarball: String,
    /// SHA-1 checksum (legacy)
    pub shasum: Option<String>,
    /// Subresource integrity hash (preferred)
    pub integrity: Option<String>,
}

impl PackageMetadata {
    /// Version the `latest` tag points at
    pub fn latest(&self) -> Option<&VersionMetadata> {
        let version = self.dist_tags.get("latest")?;
        self.versions.get(version)
    }
}
