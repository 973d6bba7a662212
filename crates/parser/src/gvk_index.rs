//! Kind -> GroupVersion -> definition index
//!
//! Only definitions carrying exactly one `x-kubernetes-group-version-kind`
//! annotation are indexed. Nested helper types have none, and the handful of
//! legacy types with several (e.g. `DeleteOptions`, `WatchEvent`) are
//! ambiguous; both are still reachable by definition name.

use crate::swagger::{Definition, SwaggerDocument};
use std::collections::BTreeMap;
use tracing::debug;

/// Definition names grouped by kind, then by group/version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GvkIndex {
    kinds: BTreeMap<String, BTreeMap<String, String>>,
}

impl GvkIndex {
    /// Scan every definition of a document
    pub fn build(document: &SwaggerDocument) -> Self {
        let mut kinds: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();

        for (name, definition) in &document.definitions {
            let [gvk] = definition.gvks.as_slice() else {
                if !definition.gvks.is_empty() {
                    debug!(
                        name = %name,
                        count = definition.gvks.len(),
                        "skipping type with multiple group/version/kinds"
                    );
                }
                continue;
            };

            let group_version = gvk.group_version();
            if let Some(previous) = kinds
                .entry(gvk.kind.clone())
                .or_default()
                .insert(group_version.clone(), name.clone())
            {
                debug!(
                    kind = %gvk.kind,
                    group_version = %group_version,
                    previous = %previous,
                    replacement = %name,
                    "duplicate group/version/kind"
                );
            }
        }

        Self { kinds }
    }

    /// Indexed kinds, sorted
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    pub fn contains_kind(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Group/versions serving a kind, mapped to definition names
    pub fn group_versions(&self, kind: &str) -> Option<&BTreeMap<String, String>> {
        self.kinds.get(kind)
    }

    /// Definition name for one kind under one group/version
    pub fn lookup(&self, kind: &str, group_version: &str) -> Option<&str> {
        self.kinds
            .get(kind)
            .and_then(|versions| versions.get(group_version))
            .map(String::as_str)
    }

    /// Number of indexed kinds
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl SwaggerDocument {
    /// GVK index of this document, built on first use
    ///
    /// The index reflects `definitions` at the time of the first call.
    pub fn gvk_index(&self) -> &GvkIndex {
        self.gvk_index.get_or_init(|| GvkIndex::build(self))
    }

    /// Definitions serving `kind`, keyed by group/version
    pub fn definitions_by_group_version(&self, kind: &str) -> BTreeMap<&str, &Definition> {
        let Some(versions) = self.gvk_index().group_versions(kind) else {
            return BTreeMap::new();
        };
        versions
            .iter()
            .filter_map(|(group_version, name)| {
                self.definitions
                    .get(name)
                    .map(|definition| (group_version.as_str(), definition))
            })
            .collect()
    }
}
