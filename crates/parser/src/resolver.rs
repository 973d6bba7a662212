//! Resolves swagger definitions into closed `ResolvedType` trees
//!
//! Resolution is depth-first and memoized per pass. Every named definition
//! moves Unvisited -> InProgress -> Done inside a [`ResolutionState`]; a
//! reference to a definition that is still InProgress becomes a
//! [`ResolvedType::Circular`] leaf instead of being followed again.
//!
//! Each top-level call (one kind under one group/version, or one definition
//! by name) gets a fresh state, so neither memoized trees nor circular
//! markers leak between independent resolutions.

use crate::swagger::{parse_ref, AdditionalProperties, Definition, SwaggerDocument};
use kube_swagger_common::{
    DictPolicy, PrimitiveKind, ResolvedObject, ResolvedType, Result, SwaggerError,
};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

/// Default ceiling on nested `$ref` / property / item hops
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Resolution settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Nesting beyond this many hops aborts resolution
    pub max_depth: usize,

    /// Shape assumed for objects without properties
    pub dict_policy: DictPolicy,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            dict_policy: DictPolicy::default(),
        }
    }
}

/// Notified each time a named definition is actually resolved
///
/// Memoized lookups and circular back-references do not trigger a call.
#[cfg_attr(test, mockall::automock)]
pub trait ResolutionObserver {
    fn definition_resolved(&self, name: &str);
}

/// Progress of one named definition within a resolution pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionStatus {
    Unvisited,
    InProgress,
    Done(ResolvedType),
}

static UNVISITED: ResolutionStatus = ResolutionStatus::Unvisited;

/// Per-pass memo table
#[derive(Debug, Default)]
pub struct ResolutionState {
    statuses: HashMap<String, ResolutionStatus>,
}

impl ResolutionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, name: &str) -> &ResolutionStatus {
        self.statuses.get(name).unwrap_or(&UNVISITED)
    }

    fn begin(&mut self, name: &str) {
        self.statuses
            .insert(name.to_string(), ResolutionStatus::InProgress);
    }

    fn finish(&mut self, name: &str, resolved: ResolvedType) {
        self.statuses
            .insert(name.to_string(), ResolutionStatus::Done(resolved));
    }
}

/// Resolves definitions of one swagger document
pub struct Resolver<'a> {
    document: &'a SwaggerDocument,
    options: ResolverOptions,
    observer: Option<&'a dyn ResolutionObserver>,
}

impl<'a> Resolver<'a> {
    pub fn new(document: &'a SwaggerDocument) -> Self {
        Self {
            document,
            options: ResolverOptions::default(),
            observer: None,
        }
    }

    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_observer(mut self, observer: &'a dyn ResolutionObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Resolve a kind under every group/version that serves it
    ///
    /// Kinds missing from the GVK index yield an empty map.
    pub fn resolve_kind(&self, kind: &str) -> Result<BTreeMap<String, ResolvedType>> {
        let mut resolved = BTreeMap::new();
        let Some(versions) = self.document.gvk_index().group_versions(kind) else {
            debug!(kind, "kind not found in GVK index");
            return Ok(resolved);
        };

        info!(
            kind,
            group_versions = ?versions.keys().collect::<Vec<_>>(),
            "resolving kind"
        );

        for (group_version, name) in versions {
            let mut state = ResolutionState::new();
            let mut path = vec![group_version.clone(), kind.to_string()];
            let tree = self.resolve_named(name, &mut state, &mut path, 0)?;
            resolved.insert(group_version.clone(), tree);
        }

        Ok(resolved)
    }

    /// Resolve one definition by name with a fresh state
    pub fn resolve_definition(&self, name: &str) -> Result<ResolvedType> {
        let mut state = ResolutionState::new();
        self.resolve_one(name, &mut state)
    }

    /// Resolve one definition by name within an existing pass
    pub fn resolve_one(&self, name: &str, state: &mut ResolutionState) -> Result<ResolvedType> {
        let mut path = vec![name.to_string()];
        self.resolve_named(name, state, &mut path, 0)
    }

    fn resolve_named(
        &self,
        name: &str,
        state: &mut ResolutionState,
        path: &mut Vec<String>,
        depth: usize,
    ) -> Result<ResolvedType> {
        match state.status(name) {
            ResolutionStatus::Done(resolved) => return Ok(resolved.clone()),
            ResolutionStatus::InProgress => {
                debug!(name, path = ?path, "circular reference");
                return Ok(ResolvedType::circular(name));
            }
            ResolutionStatus::Unvisited => {}
        }

        let definition =
            self.document
                .definition(name)
                .ok_or_else(|| SwaggerError::UnknownDefinition {
                    name: name.to_string(),
                })?;

        state.begin(name);
        let resolved = self.resolve_schema(definition, state, path, depth)?;
        if let Some(observer) = self.observer {
            observer.definition_resolved(name);
        }
        state.finish(name, resolved.clone());

        Ok(resolved)
    }

    fn resolve_schema(
        &self,
        definition: &Definition,
        state: &mut ResolutionState,
        path: &mut Vec<String>,
        depth: usize,
    ) -> Result<ResolvedType> {
        if depth > self.options.max_depth {
            return Err(SwaggerError::DepthExceeded {
                limit: self.options.max_depth,
                path: path.join("."),
            });
        }
        debug!(path = ?path, "resolving");

        if !definition.check_shape() {
            warn!(
                path = %path.join("."),
                "definition should declare exactly one of 'type' and '$ref'"
            );
        }

        if definition.has_ref() {
            let target = parse_ref(&definition.ref_path)?;
            return self.resolve_named(target, state, path, depth + 1);
        }

        let implicit_object = !definition.has_type() && !definition.properties.is_empty();
        if !definition.required.is_empty() && definition.type_name != "object" && !implicit_object
        {
            return Err(SwaggerError::RequiredOnNonObject {
                path: path.join("."),
                type_name: definition.type_name.clone(),
            });
        }

        match definition.type_name.as_str() {
            "object" => self.resolve_object(definition, state, path, depth),
            "" if implicit_object => self.resolve_object(definition, state, path, depth),
            "" => {
                debug!(path = ?path, "untyped definition; treating as any");
                Ok(ResolvedType::Any)
            }
            "array" => {
                let element = match &definition.items {
                    Some(items) => self.resolve_child(items, "[]", state, path, depth)?,
                    None => {
                        warn!(path = %path.join("."), "array without items");
                        ResolvedType::Any
                    }
                };
                Ok(ResolvedType::array(element))
            }
            other => PrimitiveKind::from_type_name(other)
                .map(ResolvedType::primitive)
                .ok_or_else(|| SwaggerError::UnsupportedType {
                    path: path.join("."),
                    type_name: other.to_string(),
                }),
        }
    }

    fn resolve_object(
        &self,
        definition: &Definition,
        state: &mut ResolutionState,
        path: &mut Vec<String>,
        depth: usize,
    ) -> Result<ResolvedType> {
        if definition.properties.is_empty() {
            let element = self.dict_element(definition, state, path, depth)?;
            return Ok(ResolvedType::dict(element));
        }

        let mut fields = BTreeMap::new();
        for (field_name, property) in &definition.properties {
            let resolved = self.resolve_child(property, field_name, state, path, depth)?;
            fields.insert(field_name.clone(), resolved);
        }

        let additional_properties = match &definition.additional_properties {
            Some(AdditionalProperties::Schema(schema)) => Some(Box::new(self.resolve_child(
                schema,
                "additionalProperties",
                state,
                path,
                depth,
            )?)),
            Some(AdditionalProperties::Allowed(true)) => Some(Box::new(ResolvedType::Any)),
            Some(AdditionalProperties::Allowed(false)) | None => None,
        };

        Ok(ResolvedType::Object(ResolvedObject {
            fields,
            required: definition.required.clone(),
            additional_properties,
        }))
    }

    /// Element type of a property-less object
    fn dict_element(
        &self,
        definition: &Definition,
        state: &mut ResolutionState,
        path: &mut Vec<String>,
        depth: usize,
    ) -> Result<ResolvedType> {
        let string = ResolvedType::primitive(PrimitiveKind::String);
        match (self.options.dict_policy, &definition.additional_properties) {
            (DictPolicy::StringValues, _) => Ok(string),
            (DictPolicy::AdditionalProperties, Some(AdditionalProperties::Schema(schema))) => {
                self.resolve_child(schema, "{}", state, path, depth)
            }
            (DictPolicy::AdditionalProperties, Some(AdditionalProperties::Allowed(true))) => {
                Ok(ResolvedType::Any)
            }
            (DictPolicy::AdditionalProperties, _) => Ok(string),
        }
    }

    fn resolve_child(
        &self,
        definition: &Definition,
        segment: &str,
        state: &mut ResolutionState,
        path: &mut Vec<String>,
        depth: usize,
    ) -> Result<ResolvedType> {
        path.push(segment.to_string());
        let resolved = self.resolve_schema(definition, state, path, depth + 1);
        path.pop();
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;

    fn document(definitions: serde_json::Value) -> SwaggerDocument {
        serde_json::from_value(serde_json::json!({ "definitions": definitions })).unwrap()
    }

    #[test]
    fn test_shared_reference_resolved_once() {
        let document = document(serde_json::json!({
            "Pod": {
                "type": "object",
                "properties": {
                    "a": { "$ref": "#/definitions/Shared" },
                    "b": { "$ref": "#/definitions/Shared" }
                }
            },
            "Shared": {
                "type": "object",
                "properties": { "x": { "type": "string" } }
            }
        }));

        let mut observer = MockResolutionObserver::new();
        let mut sequence = Sequence::new();
        observer
            .expect_definition_resolved()
            .withf(|name| name == "Shared")
            .times(1)
            .in_sequence(&mut sequence)
            .return_const(());
        observer
            .expect_definition_resolved()
            .withf(|name| name == "Pod")
            .times(1)
            .in_sequence(&mut sequence)
            .return_const(());

        let resolved = Resolver::new(&document)
            .with_observer(&observer)
            .resolve_definition("Pod")
            .unwrap();

        let ResolvedType::Object(object) = resolved else {
            panic!("expected object, got {resolved:?}");
        };
        assert_eq!(object.fields["a"], object.fields["b"]);
    }

    #[test]
    fn test_circular_reference_is_not_reported_as_resolution() {
        let document = document(serde_json::json!({
            "Node": {
                "type": "object",
                "properties": { "parent": { "$ref": "#/definitions/Node" } }
            }
        }));

        let mut observer = MockResolutionObserver::new();
        observer
            .expect_definition_resolved()
            .withf(|name| name == "Node")
            .times(1)
            .return_const(());

        let resolved = Resolver::new(&document)
            .with_observer(&observer)
            .resolve_definition("Node")
            .unwrap();
        assert_eq!(resolved.circular_count(), 1);
    }

    #[test]
    fn test_state_transitions() {
        let document = document(serde_json::json!({
            "Leaf": { "type": "integer" }
        }));
        let resolver = Resolver::new(&document);
        let mut state = ResolutionState::new();

        assert_eq!(state.status("Leaf"), &ResolutionStatus::Unvisited);
        resolver.resolve_one("Leaf", &mut state).unwrap();
        assert_eq!(
            state.status("Leaf"),
            &ResolutionStatus::Done(ResolvedType::primitive(PrimitiveKind::Integer))
        );
    }

    #[test]
    fn test_in_progress_name_short_circuits() {
        let document = document(serde_json::json!({
            "Leaf": { "type": "integer" }
        }));
        let resolver = Resolver::new(&document);
        let mut state = ResolutionState::new();
        state.begin("Leaf");

        assert_eq!(
            resolver.resolve_one("Leaf", &mut state).unwrap(),
            ResolvedType::circular("Leaf")
        );
    }
}
