//! Tool configuration loaded from YAML files
//!
//! Everything here has a default, so an absent or partial config file is fine.
//! Command-line flags take precedence over values read from the file.

use crate::{Result, SwaggerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How an object without `properties` is resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DictPolicy {
    /// Always `map[string]string`
    #[default]
    StringValues,
    /// Resolve the declared `additionalProperties` schema, falling back to string
    AdditionalProperties,
}

impl FromStr for DictPolicy {
    type Err = SwaggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "string-values" => Ok(Self::StringValues),
            "additional-properties" => Ok(Self::AdditionalProperties),
            other => Err(SwaggerError::Config(format!(
                "unknown dict policy {other:?} (expected string-values or additional-properties)"
            ))),
        }
    }
}

impl fmt::Display for DictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StringValues => f.write_str("string-values"),
            Self::AdditionalProperties => f.write_str("additional-properties"),
        }
    }
}

/// How two `required` lists are compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequiredDiff {
    /// Index by index: `required.<i>` records
    #[default]
    Positional,
    /// By membership: `required.<name>` records
    Set,
}

impl FromStr for RequiredDiff {
    type Err = SwaggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "positional" => Ok(Self::Positional),
            "set" => Ok(Self::Set),
            other => Err(SwaggerError::Config(format!(
                "unknown required diff mode {other:?} (expected positional or set)"
            ))),
        }
    }
}

impl fmt::Display for RequiredDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positional => f.write_str("positional"),
            Self::Set => f.write_str("set"),
        }
    }
}

fn default_spec_dir() -> PathBuf {
    PathBuf::from("./swagger-data")
}

fn default_versions() -> Vec<String> {
    vec!["1.18.20".to_string(), "1.23.9".to_string()]
}

/// Root structure of a `kube-swagger.yaml` config file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ToolConfig {
    /// Directory holding `<version>-swagger-spec.json` files
    #[serde(default = "default_spec_dir")]
    pub spec_dir: PathBuf,

    /// Kubernetes versions compared when none are given on the command line
    #[serde(default = "default_versions")]
    pub versions: Vec<String>,

    /// Only these kinds are reported (empty means all)
    #[serde(default)]
    pub include_kinds: Vec<String>,

    /// Kinds never reported
    #[serde(default)]
    pub exclude_kinds: Vec<String>,

    /// Maximum explain depth (0 = unlimited)
    #[serde(default)]
    pub depth: usize,

    #[serde(default)]
    pub dict_policy: DictPolicy,

    #[serde(default)]
    pub required_diff: RequiredDiff,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            spec_dir: default_spec_dir(),
            versions: default_versions(),
            include_kinds: Vec::new(),
            exclude_kinds: Vec::new(),
            depth: 0,
            dict_policy: DictPolicy::default(),
            required_diff: RequiredDiff::default(),
        }
    }
}

impl ToolConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SwaggerError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            SwaggerError::Config(format!("Failed to parse config YAML from {:?}: {}", path, e))
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Whether a kind passes the include/exclude lists
    pub fn kind_selected(&self, kind: &str) -> bool {
        (self.include_kinds.is_empty() || self.include_kinds.iter().any(|k| k == kind))
            && !self.exclude_kinds.iter().any(|k| k == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = ToolConfig::from_yaml("").unwrap();
        assert_eq!(config, ToolConfig::default());
        assert_eq!(config.spec_dir, PathBuf::from("./swagger-data"));
        assert_eq!(config.dict_policy, DictPolicy::StringValues);
    }

    #[test]
    fn test_partial_config() {
        let config = ToolConfig::from_yaml(
            "versions: [\"1.20.15\", \"1.24.3\"]\nexclude_kinds: [Status]\ndict_policy: additional-properties\nrequired_diff: set\n",
        )
        .unwrap();
        assert_eq!(config.versions, vec!["1.20.15", "1.24.3"]);
        assert_eq!(config.dict_policy, DictPolicy::AdditionalProperties);
        assert_eq!(config.required_diff, RequiredDiff::Set);
        assert_eq!(config.depth, 0);
        assert!(config.kind_selected("Pod"));
        assert!(!config.kind_selected("Status"));
    }

    #[test]
    fn test_include_list_restricts_kinds() {
        let config = ToolConfig {
            include_kinds: vec!["Deployment".to_string()],
            ..ToolConfig::default()
        };
        assert!(config.kind_selected("Deployment"));
        assert!(!config.kind_selected("Pod"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "spec_dir: /tmp/specs\ndepth: 3").unwrap();

        let config = ToolConfig::load(file.path()).unwrap();
        assert_eq!(config.spec_dir, PathBuf::from("/tmp/specs"));
        assert_eq!(config.depth, 3);
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = ToolConfig::load(Path::new("/nonexistent/kube-swagger.yaml")).unwrap_err();
        assert!(matches!(err, SwaggerError::Config(_)));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("set".parse::<RequiredDiff>().unwrap(), RequiredDiff::Set);
        assert_eq!(
            "additional-properties".parse::<DictPolicy>().unwrap(),
            DictPolicy::AdditionalProperties
        );
        assert!("sorted".parse::<RequiredDiff>().is_err());
    }
}
