//! Common types and utilities for kube-swagger
//!
//! This crate contains the shared data structures, error types, and
//! configuration used across the parser, analyzer, and CLI components.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

mod config;
mod diff;
mod resolved;

pub use config::{DictPolicy, RequiredDiff, ToolConfig};
pub use diff::{DiffKind, DiffRecord, DiffValue};
pub use resolved::{PrimitiveKind, ResolvedObject, ResolvedType};

/// Errors that can occur while loading, resolving, or comparing specs
#[derive(Error, Debug)]
pub enum SwaggerError {
    #[error("Malformed reference {reference:?}: expected #/definitions/<Name>")]
    MalformedRef { reference: String },

    #[error("Reference to unknown definition {name:?}")]
    UnknownDefinition { name: String },

    #[error("Unsupported type {type_name:?} at {path}")]
    UnsupportedType { path: String, type_name: String },

    #[error("'required' found on non-object type {type_name:?} at {path}")]
    RequiredOnNonObject { path: String, type_name: String },

    #[error("Resolution depth limit of {limit} exceeded at {path}")]
    DepthExceeded { limit: usize, path: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid Kubernetes version: {0}")]
    InvalidVersion(String),

    #[error("Spec for Kubernetes {version} not cached at {path} (download from {url})")]
    SpecNotCached {
        version: String,
        path: String,
        url: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for kube-swagger operations
pub type Result<T> = std::result::Result<T, SwaggerError>;

/// A Group/Version/Kind annotation (`x-kubernetes-group-version-kind`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupVersionKind {
    #[serde(default)]
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(group: &str, version: &str, kind: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
        }
    }

    /// Group and version joined with `.`, or just the version for the core group
    ///
    /// # Examples
    /// ```
    /// use kube_swagger_common::GroupVersionKind;
    ///
    /// assert_eq!(GroupVersionKind::new("apps", "v1", "Deployment").group_version(), "apps.v1");
    /// assert_eq!(GroupVersionKind::new("", "v1", "Pod").group_version(), "v1");
    /// ```
    pub fn group_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}.{}", self.group, self.version)
        }
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group_version(), self.kind)
    }
}
