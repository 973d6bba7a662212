//! Swagger spec file parser

use super::types::SwaggerDocument;
use kube_swagger_common::{Result, SwaggerError};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Swagger specification parser
///
/// Reads Kubernetes swagger specs from disk or from memory, in JSON or YAML.
pub struct SwaggerParser {
    /// Loaded swagger document
    document: SwaggerDocument,
}

impl SwaggerParser {
    /// Load a swagger spec from a file path
    ///
    /// Files ending in `.yaml` or `.yml` are read as YAML, everything else as JSON.
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = SwaggerParser::from_file("swagger-data/1.23.9-swagger-spec.json")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SwaggerError::Parse(format!(
                "Failed to read swagger file {}: {}",
                path.display(),
                e
            ))
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        debug!(path = %path.display(), is_yaml, "loading swagger spec");

        if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// Parse a swagger spec from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let document: SwaggerDocument = serde_json::from_str(json)
            .map_err(|e| SwaggerError::Parse(format!("Failed to parse swagger JSON: {}", e)))?;

        Ok(Self::from_document(document))
    }

    /// Parse a swagger spec from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let document: SwaggerDocument = serde_yaml::from_str(yaml)
            .map_err(|e| SwaggerError::Parse(format!("Failed to parse swagger YAML: {}", e)))?;

        Ok(Self::from_document(document))
    }

    fn from_document(document: SwaggerDocument) -> Self {
        debug!(
            definitions = document.definitions.len(),
            version = %document.info.version,
            "parsed swagger spec"
        );
        Self { document }
    }

    /// Get reference to the underlying document
    pub fn document(&self) -> &SwaggerDocument {
        &self.document
    }

    /// Take ownership of the parsed document
    pub fn into_document(self) -> SwaggerDocument {
        self.document
    }
}
