//! Kubernetes release catalog and local swagger spec cache
//!
//! Specs are published per release under the kubernetes/kubernetes repo.
//! Downloading is left to the user; this module only knows where a release's
//! spec lives upstream and where it is expected on disk.

use crate::swagger::{SwaggerDocument, SwaggerParser};
use kube_swagger_common::{Result, SwaggerError};
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Upstream location of a release's swagger spec; `{version}` is substituted
pub const SPEC_URL_TEMPLATE: &str =
    "https://raw.githubusercontent.com/kubernetes/kubernetes/v{version}/api/openapi-spec/swagger.json";

/// Latest known patch release of each minor version with a published spec
pub const LATEST_PATCH_VERSIONS: &[&str] = &[
    "1.5.8",
    "1.6.13",
    "1.7.16",
    "1.8.15",
    "1.9.11",
    "1.10.13",
    "1.11.10",
    "1.12.10",
    "1.13.12",
    "1.14.10",
    "1.15.12",
    "1.16.15",
    "1.17.17",
    "1.18.20",
    "1.19.16",
    "1.20.15",
    "1.21.14",
    "1.22.12",
    "1.23.9",
    "1.24.3",
    "1.25.0-alpha.2",
];

/// A Kubernetes release version such as `1.23.9` or `1.25.0-alpha.2`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KubeVersion {
    pieces: Vec<String>,
}

impl KubeVersion {
    /// Parse a dot-separated version with at least three pieces
    ///
    /// # Examples
    /// ```
    /// use kube_swagger_parser::KubeVersion;
    ///
    /// assert!(KubeVersion::parse("1.23.9").is_ok());
    /// assert!(KubeVersion::parse("1.23").is_err());
    /// ```
    pub fn parse(version: &str) -> Result<Self> {
        let pieces: Vec<String> = version.split('.').map(str::to_string).collect();
        if pieces.len() < 3 || pieces.iter().any(String::is_empty) {
            return Err(SwaggerError::InvalidVersion(format!(
                "{version:?}: expected at least 3 dot-separated pieces, found {}",
                pieces.len()
            )));
        }
        Ok(Self { pieces })
    }

    /// All entries of [`LATEST_PATCH_VERSIONS`], in release order
    pub fn latest_patches() -> Vec<Self> {
        LATEST_PATCH_VERSIONS
            .iter()
            .filter_map(|version| Self::parse(version).ok())
            .collect()
    }

    pub fn pieces(&self) -> &[String] {
        &self.pieces
    }

    pub fn spec_url(&self) -> String {
        SPEC_URL_TEMPLATE.replace("{version}", &self.to_string())
    }
}

impl FromStr for KubeVersion {
    type Err = SwaggerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for KubeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pieces.join("."))
    }
}

fn compare_piece(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

impl Ord for KubeVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pieces
            .iter()
            .zip(&other.pieces)
            .map(|(a, b)| compare_piece(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| self.pieces.len().cmp(&other.pieces.len()))
    }
}

impl PartialOrd for KubeVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Directory of downloaded specs named `{version}-swagger-spec.json`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCache {
    root: PathBuf,
}

impl SpecCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, version: &KubeVersion) -> PathBuf {
        self.root.join(format!("{version}-swagger-spec.json"))
    }

    pub fn contains(&self, version: &KubeVersion) -> bool {
        self.path_for(version).is_file()
    }

    /// Load the cached spec of a release
    pub fn load(&self, version: &KubeVersion) -> Result<SwaggerDocument> {
        let path = self.path_for(version);
        if !path.is_file() {
            return Err(SwaggerError::SpecNotCached {
                version: version.to_string(),
                path: path.display().to_string(),
                url: version.spec_url(),
            });
        }
        debug!(version = %version, path = %path.display(), "loading cached spec");
        Ok(SwaggerParser::from_file(&path)?.into_document())
    }
}

impl Default for SpecCache {
    fn default() -> Self {
        Self::new("./swagger-data")
    }
}
