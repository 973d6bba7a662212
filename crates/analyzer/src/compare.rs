//! Kind-level comparison of two swagger documents

use crate::differ::{diff, DiffOptions};
use kube_swagger_common::{DiffRecord, Result};
use kube_swagger_parser::{Resolver, ResolverOptions, SwaggerDocument};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::info;

/// Differences of one kind between one old and one new group/version
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindComparison {
    pub kind: String,
    pub old_group_version: String,
    pub new_group_version: String,
    pub diffs: Vec<DiffRecord>,
}

impl KindComparison {
    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }
}

/// Inputs shared by every kind compared in one run
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    pub resolver: ResolverOptions,
    pub diff: DiffOptions,

    /// Old-side group/versions to keep; empty keeps all
    pub old_group_versions: Vec<String>,

    /// New-side group/versions to keep; empty keeps all
    pub new_group_versions: Vec<String>,
}

/// Resolve `kind` in both documents and diff every (old, new) group/version pair
///
/// Pairs come out sorted by old group/version, then new. A kind served by
/// neither document produces no comparisons; one served by only one side
/// produces none either, since there is nothing to pair it with.
pub fn compare_kind(
    old: &SwaggerDocument,
    new: &SwaggerDocument,
    kind: &str,
    options: &CompareOptions,
) -> Result<Vec<KindComparison>> {
    let old_resolved = Resolver::new(old)
        .with_options(options.resolver)
        .resolve_kind(kind)?;
    let new_resolved = Resolver::new(new)
        .with_options(options.resolver)
        .resolve_kind(kind)?;

    info!(
        kind,
        old = ?old_resolved.keys().collect::<Vec<_>>(),
        new = ?new_resolved.keys().collect::<Vec<_>>(),
        "group/versions"
    );

    let mut comparisons = Vec::new();
    for (old_group_version, old_type) in
        old_resolved.iter().filter(|(gv, _)| selected(&options.old_group_versions, gv))
    {
        for (new_group_version, new_type) in
            new_resolved.iter().filter(|(gv, _)| selected(&options.new_group_versions, gv))
        {
            comparisons.push(KindComparison {
                kind: kind.to_string(),
                old_group_version: old_group_version.clone(),
                new_group_version: new_group_version.clone(),
                diffs: diff(Some(old_type), Some(new_type), options.diff),
            });
        }
    }

    Ok(comparisons)
}

fn selected(filter: &[String], group_version: &str) -> bool {
    filter.is_empty() || filter.iter().any(|wanted| wanted == group_version)
}

/// Sorted union of the kinds indexed in either document
pub fn kinds_in_either(old: &SwaggerDocument, new: &SwaggerDocument) -> Vec<String> {
    old.gvk_index()
        .kinds()
        .chain(new.gvk_index().kinds())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
