//! Fully resolved type trees
//!
//! A `ResolvedType` is what remains of an OpenAPI definition once every
//! `$ref` has been replaced by its target. Cycles are cut with
//! [`ResolvedType::Circular`] leaves, so every tree is finite.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Scalar OpenAPI types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    Integer,
    Boolean,
    Number,
}

impl PrimitiveKind {
    /// Map an OpenAPI `type` tag to a primitive kind
    ///
    /// # Examples
    /// ```
    /// use kube_swagger_common::PrimitiveKind;
    ///
    /// assert_eq!(PrimitiveKind::from_type_name("integer"), Some(PrimitiveKind::Integer));
    /// assert_eq!(PrimitiveKind::from_type_name("object"), None);
    /// ```
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        match type_name {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "boolean" => Some(Self::Boolean),
            "number" => Some(Self::Number),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Number => "number",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields of a resolved object type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedObject {
    /// Resolved properties, keyed (and therefore iterated) by field name
    pub fields: BTreeMap<String, ResolvedType>,

    /// `required` list, in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Element type declared through `additionalProperties` next to `properties`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<ResolvedType>>,
}

/// A fully dereferenced type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolvedType {
    /// Neither `type` nor `$ref` was declared
    Any,
    Primitive(PrimitiveKind),
    Array(Box<ResolvedType>),
    /// String-keyed map
    Dict(Box<ResolvedType>),
    Object(ResolvedObject),
    /// Back-reference to a definition that was still being resolved
    Circular(String),
}

impl ResolvedType {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }

    pub fn array(element: ResolvedType) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn dict(element: ResolvedType) -> Self {
        Self::Dict(Box::new(element))
    }

    /// The `map[string]string` shape assumed for objects without properties
    pub fn string_dict() -> Self {
        Self::dict(Self::Primitive(PrimitiveKind::String))
    }

    pub fn object<I, K>(fields: I, required: Vec<String>) -> Self
    where
        I: IntoIterator<Item = (K, ResolvedType)>,
        K: Into<String>,
    {
        Self::Object(ResolvedObject {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            required,
            additional_properties: None,
        })
    }

    pub fn circular(target: &str) -> Self {
        Self::Circular(target.to_string())
    }

    /// Human-readable type label used by explain output
    ///
    /// # Examples
    /// ```
    /// use kube_swagger_common::{PrimitiveKind, ResolvedType};
    ///
    /// assert_eq!(ResolvedType::primitive(PrimitiveKind::Boolean).label(), "boolean");
    /// assert_eq!(ResolvedType::string_dict().label(), "map[string]string");
    /// assert_eq!(ResolvedType::circular("JSONSchemaProps").label(), "circular: JSONSchemaProps");
    /// ```
    pub fn label(&self) -> String {
        match self {
            Self::Any => "(any)".to_string(),
            Self::Primitive(kind) => kind.to_string(),
            Self::Array(_) => "array".to_string(),
            Self::Dict(element) => format!("map[string]{}", element.label()),
            Self::Object(_) => "object".to_string(),
            Self::Circular(target) => format!("circular: {target}"),
        }
    }

    /// Name of the variant, independent of its contents
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Primitive(_) => "primitive",
            Self::Array(_) => "array",
            Self::Dict(_) => "dict",
            Self::Object(_) => "object",
            Self::Circular(_) => "circular",
        }
    }

    /// Number of `Circular` leaves anywhere in the tree
    pub fn circular_count(&self) -> usize {
        match self {
            Self::Circular(_) => 1,
            Self::Array(element) | Self::Dict(element) => element.circular_count(),
            Self::Object(object) => {
                object
                    .fields
                    .values()
                    .map(ResolvedType::circular_count)
                    .sum::<usize>()
                    + object
                        .additional_properties
                        .as_ref()
                        .map_or(0, |element| element.circular_count())
            }
            Self::Any | Self::Primitive(_) => 0,
        }
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("string", PrimitiveKind::String)]
    #[case("integer", PrimitiveKind::Integer)]
    #[case("boolean", PrimitiveKind::Boolean)]
    #[case("number", PrimitiveKind::Number)]
    fn test_primitive_round_trips_type_name(#[case] name: &str, #[case] kind: PrimitiveKind) {
        assert_eq!(PrimitiveKind::from_type_name(name), Some(kind));
        assert_eq!(kind.as_str(), name);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ResolvedType::Any.label(), "(any)");
        assert_eq!(
            ResolvedType::array(ResolvedType::primitive(PrimitiveKind::String)).label(),
            "array"
        );
        assert_eq!(ResolvedType::object(Vec::<(String, _)>::new(), vec![]).label(), "object");
        assert_eq!(
            ResolvedType::dict(ResolvedType::primitive(PrimitiveKind::Integer)).label(),
            "map[string]integer"
        );
    }

    #[test]
    fn test_circular_count() {
        let tree = ResolvedType::object(
            [
                ("parent", ResolvedType::circular("Node")),
                (
                    "children",
                    ResolvedType::array(ResolvedType::circular("Node")),
                ),
                ("name", ResolvedType::primitive(PrimitiveKind::String)),
            ],
            vec![],
        );
        assert_eq!(tree.circular_count(), 2);
    }

    #[test]
    fn test_serializes_with_variant_tags() {
        let tree = ResolvedType::object(
            [("replicas", ResolvedType::primitive(PrimitiveKind::Integer))],
            vec!["replicas".to_string()],
        );
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "object": {
                    "fields": { "replicas": { "primitive": "integer" } },
                    "required": ["replicas"]
                }
            })
        );
    }
}
