//! Swagger (OpenAPI v2) type definitions
//!
//! Simplified representation focusing on the `definitions` section of the
//! Kubernetes API spec.

use crate::gvk_index::GvkIndex;
use kube_swagger_common::GroupVersionKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Swagger document root
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwaggerDocument {
    /// Swagger version (e.g., "2.0")
    #[serde(default)]
    pub swagger: Option<String>,

    /// API metadata
    #[serde(default)]
    pub info: Info,

    /// Named type definitions
    #[serde(default)]
    pub definitions: BTreeMap<String, Definition>,

    #[serde(skip)]
    pub(crate) gvk_index: OnceLock<GvkIndex>,
}

/// API information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Info {
    /// API title
    #[serde(default)]
    pub title: String,

    /// API version (e.g., "v1.23.9")
    #[serde(default)]
    pub version: String,
}

/// `additionalProperties` may be a schema or a plain boolean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// Boolean form (`true` allows arbitrary values)
    Allowed(bool),

    /// Schema for the map values
    Schema(Box<Definition>),
}

/// One named type, or an inline schema nested inside one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    /// Description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Format (e.g., int32, int-or-string, date-time)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,

    /// Type: "", object, array, string, integer, boolean, number
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub type_name: String,

    /// Reference (e.g., "#/definitions/io.k8s.api.core.v1.PodSpec")
    #[serde(rename = "$ref", default, skip_serializing_if = "String::is_empty")]
    pub ref_path: String,

    /// Properties (for object type)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Definition>,

    /// Items schema (for array type)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Definition>>,

    /// Value schema for string-keyed maps
    #[serde(
        rename = "additionalProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    /// Required properties
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Group/Version/Kind annotations
    #[serde(
        rename = "x-kubernetes-group-version-kind",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub gvks: Vec<GroupVersionKind>,

    #[serde(
        rename = "x-kubernetes-list-type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub list_type: Option<String>,

    #[serde(
        rename = "x-kubernetes-list-map-keys",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub list_map_keys: Vec<String>,

    #[serde(
        rename = "x-kubernetes-patch-merge-key",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub patch_merge_key: Option<String>,

    #[serde(
        rename = "x-kubernetes-patch-strategy",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub patch_strategy: Option<String>,
}

impl Definition {
    pub fn has_type(&self) -> bool {
        !self.type_name.is_empty()
    }

    pub fn has_ref(&self) -> bool {
        !self.ref_path.is_empty()
    }

    /// Whether exactly one of `type` and `$ref` is declared
    ///
    /// Description-only definitions are common in older specs and pass.
    pub fn check_shape(&self) -> bool {
        let declared = usize::from(self.has_type()) + usize::from(self.has_ref());
        declared == 1 || !self.description.is_empty()
    }
}

impl SwaggerDocument {
    pub fn new(definitions: BTreeMap<String, Definition>) -> Self {
        Self {
            definitions,
            ..Self::default()
        }
    }

    /// Get a definition by its name in the `definitions` map
    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }
}

/// Extract the definition name from a `$ref` pointer
///
/// Only the `#/definitions/<Name>` shape is understood.
///
/// # Examples
/// ```
/// use kube_swagger_parser::parse_ref;
///
/// assert_eq!(parse_ref("#/definitions/io.k8s.api.core.v1.Pod").unwrap(), "io.k8s.api.core.v1.Pod");
/// assert!(parse_ref("#/components/schemas/Pod").is_err());
/// ```
pub fn parse_ref(reference: &str) -> kube_swagger_common::Result<&str> {
    let pieces: Vec<&str> = reference.split('/').collect();
    match pieces.as_slice() {
        ["#", "definitions", name] if !name.is_empty() => Ok(*name),
        _ => Err(kube_swagger_common::SwaggerError::MalformedRef {
            reference: reference.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ref() {
        assert_eq!(parse_ref("#/definitions/Node").unwrap(), "Node");
        assert!(parse_ref("#/definitions/").is_err());
        assert!(parse_ref("#/definitions/a/b").is_err());
        assert!(parse_ref("Node").is_err());
    }

    #[test]
    fn test_deserialize_definition() {
        let definition: Definition = serde_json::from_value(serde_json::json!({
            "description": "Pod is a collection of containers",
            "type": "object",
            "required": ["spec"],
            "properties": {
                "spec": { "$ref": "#/definitions/PodSpec" },
                "labels": {
                    "type": "object",
                    "additionalProperties": { "type": "string" }
                },
                "finalizers": {
                    "type": "array",
                    "items": { "type": "string" },
                    "x-kubernetes-list-type": "set"
                }
            },
            "x-kubernetes-group-version-kind": [
                { "group": "", "kind": "Pod", "version": "v1" }
            ]
        }))
        .unwrap();

        assert_eq!(definition.type_name, "object");
        assert_eq!(definition.required, vec!["spec"]);
        assert_eq!(definition.properties["spec"].ref_path, "#/definitions/PodSpec");
        assert_eq!(
            definition.properties["finalizers"].list_type.as_deref(),
            Some("set")
        );
        assert!(matches!(
            definition.properties["labels"].additional_properties,
            Some(AdditionalProperties::Schema(_))
        ));
        assert_eq!(definition.gvks, vec![GroupVersionKind::new("", "v1", "Pod")]);
    }

    #[test]
    fn test_boolean_additional_properties() {
        let definition: Definition = serde_json::from_str(
            r#"{"type": "object", "additionalProperties": true}"#,
        )
        .unwrap();
        assert_eq!(
            definition.additional_properties,
            Some(AdditionalProperties::Allowed(true))
        );
    }

    #[test]
    fn test_check_shape() {
        let both = Definition {
            type_name: "object".to_string(),
            ref_path: "#/definitions/X".to_string(),
            ..Definition::default()
        };
        assert!(!both.check_shape());

        let described = Definition {
            description: "legacy untyped field".to_string(),
            ..Definition::default()
        };
        assert!(described.check_shape());
    }
}
