//! Which group/versions serve each kind, and how that changes across releases

use kube_swagger_parser::SwaggerDocument;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Membership change of one set between two releases
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SetDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub same: Vec<String>,
}

impl SetDiff {
    /// Compare two sets; all three outputs are sorted
    pub fn between(old: &BTreeSet<String>, new: &BTreeSet<String>) -> Self {
        Self {
            added: new.difference(old).cloned().collect(),
            removed: old.difference(new).cloned().collect(),
            same: old.intersection(new).cloned().collect(),
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

/// Include/exclude lists applied to kinds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindFilter {
    /// Only these kinds, when non-empty
    pub include: BTreeSet<String>,
    pub exclude: BTreeSet<String>,
}

impl KindFilter {
    pub fn new<I, E>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = String>,
        E: IntoIterator<Item = String>,
    {
        Self {
            include: include.into_iter().collect(),
            exclude: exclude.into_iter().collect(),
        }
    }

    pub fn allows(&self, kind: &str) -> bool {
        (self.include.is_empty() || self.include.contains(kind)) && !self.exclude.contains(kind)
    }
}

/// Kind -> group/versions of one release
///
/// Unlike the GVK index, every annotation counts here, including those on
/// types that carry several.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApiVersionCatalog {
    pub version: String,
    pub kinds: BTreeMap<String, BTreeSet<String>>,
}

impl ApiVersionCatalog {
    pub fn from_document(version: &str, document: &SwaggerDocument) -> Self {
        let mut kinds: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (name, definition) in &document.definitions {
            if !definition.gvks.is_empty() {
                debug!(name = %name, gvks = ?definition.gvks, "annotated definition");
            }
            for gvk in &definition.gvks {
                kinds
                    .entry(gvk.kind.clone())
                    .or_default()
                    .insert(gvk.group_version());
            }
        }

        Self {
            version: version.to_string(),
            kinds,
        }
    }

    /// Placeholder for the release before the first one of a sequence
    pub fn empty(version: &str) -> Self {
        Self {
            version: version.to_string(),
            kinds: BTreeMap::new(),
        }
    }

    /// Per-kind changes going from `self` to `next`
    ///
    /// Kinds present on one side only list every group/version as added or
    /// removed.
    pub fn diff(&self, next: &ApiVersionCatalog) -> BTreeMap<String, SetDiff> {
        let empty = BTreeSet::new();
        self.kinds
            .keys()
            .chain(next.kinds.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|kind| {
                let old = self.kinds.get(kind).unwrap_or(&empty);
                let new = next.kinds.get(kind).unwrap_or(&empty);
                (kind.clone(), SetDiff::between(old, new))
            })
            .collect()
    }

    /// Changed kinds passing `filter`
    pub fn changes(
        &self,
        next: &ApiVersionCatalog,
        filter: &KindFilter,
    ) -> BTreeMap<String, SetDiff> {
        self.diff(next)
            .into_iter()
            .filter(|(kind, change)| filter.allows(kind) && change.has_changes())
            .collect()
    }
}
