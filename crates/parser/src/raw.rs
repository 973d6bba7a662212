//! JSON-shaped resolution that keeps the swagger layout
//!
//! Every `$ref` is replaced by its resolved target, nested under the `$ref`
//! key, so two documents can be compared with a plain JSON diff. A reference
//! to a definition that is already open on the current path is written as
//! `"type": "(circular)"` instead of being followed.
//!
//! Nothing is memoized: a definition referenced from several places is
//! expanded at every use.

use crate::resolver::DEFAULT_MAX_DEPTH;
use crate::swagger::{parse_ref, AdditionalProperties, Definition, SwaggerDocument};
use kube_swagger_common::{Result, SwaggerError};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// `type` written in place of a reference that closes a cycle
pub const CIRCULAR_MARKER: &str = "(circular)";

/// Resolves definitions to JSON values with `$ref`s inlined
pub struct RawResolver<'a> {
    document: &'a SwaggerDocument,
    max_depth: usize,
}

impl<'a> RawResolver<'a> {
    pub fn new(document: &'a SwaggerDocument) -> Self {
        Self {
            document,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Longest path, in segments, before resolution is aborted
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolve a kind under every group/version that serves it
    ///
    /// Kinds missing from the GVK index yield an empty map.
    pub fn resolve_kind(&self, kind: &str) -> Result<BTreeMap<String, Value>> {
        let mut resolved = BTreeMap::new();
        let Some(versions) = self.document.gvk_index().group_versions(kind) else {
            debug!(kind, "kind not found in GVK index");
            return Ok(resolved);
        };
        info!(kind, count = versions.len(), "resolving kind to JSON");

        for (group_version, name) in versions {
            let mut path = vec![group_version.clone(), kind.to_string()];
            let value = self.resolve_root(name, &mut path)?;
            resolved.insert(group_version.clone(), value);
        }

        Ok(resolved)
    }

    /// Resolve one definition by name
    pub fn resolve_definition(&self, name: &str) -> Result<Value> {
        let mut path = vec![name.to_string()];
        self.resolve_root(name, &mut path)
    }

    fn resolve_root(&self, name: &str, path: &mut Vec<String>) -> Result<Value> {
        let definition = self.lookup(name)?;
        let mut open = HashSet::from([name.to_string()]);
        self.schema(definition, &mut open, path)
    }

    fn lookup(&self, name: &str) -> Result<&'a Definition> {
        self.document
            .definition(name)
            .ok_or_else(|| SwaggerError::UnknownDefinition {
                name: name.to_string(),
            })
    }

    fn schema(
        &self,
        definition: &Definition,
        open: &mut HashSet<String>,
        path: &mut Vec<String>,
    ) -> Result<Value> {
        if path.len() > self.max_depth {
            return Err(SwaggerError::DepthExceeded {
                limit: self.max_depth,
                path: path.join("."),
            });
        }

        let mut out = Map::new();
        if !definition.description.is_empty() {
            out.insert("description".into(), definition.description.clone().into());
        }
        if !definition.format.is_empty() {
            out.insert("format".into(), definition.format.clone().into());
        }

        if !definition.properties.is_empty() {
            let mut properties = Map::new();
            for (name, property) in &definition.properties {
                let value = self.child(property, &["properties", name.as_str()], open, path)?;
                properties.insert(name.clone(), value);
            }
            out.insert("properties".into(), Value::Object(properties));
        }

        if let Some(items) = &definition.items {
            out.insert("items".into(), self.child(items, &["items"], open, path)?);
        }

        match &definition.additional_properties {
            Some(AdditionalProperties::Schema(schema)) => {
                let value = self.child(schema, &["additionalProperties"], open, path)?;
                out.insert("additionalProperties".into(), value);
            }
            Some(AdditionalProperties::Allowed(allowed)) => {
                out.insert("additionalProperties".into(), Value::Bool(*allowed));
            }
            None => {}
        }

        if definition.has_ref() {
            let target = parse_ref(&definition.ref_path)?;
            if open.contains(target) {
                debug!(target, path = %path.join("."), "circular reference");
                out.insert("type".into(), CIRCULAR_MARKER.into());
            } else {
                let resolved = self.lookup(target)?;
                open.insert(target.to_string());
                let value = self.child(resolved, &["$ref", definition.ref_path.as_str()], open, path);
                open.remove(target);
                out.insert("$ref".into(), value?);
            }
        }

        if !definition.required.is_empty() {
            out.insert("required".into(), definition.required.clone().into());
        }
        if definition.has_type() {
            out.insert("type".into(), definition.type_name.clone().into());
        }

        Ok(Value::Object(out))
    }

    fn child(
        &self,
        definition: &Definition,
        segments: &[&str],
        open: &mut HashSet<String>,
        path: &mut Vec<String>,
    ) -> Result<Value> {
        let depth = path.len();
        path.extend(segments.iter().map(|segment| segment.to_string()));
        let value = self.schema(definition, open, path);
        path.truncate(depth);
        value
    }
}
