//! Flatten resolved type trees into `(path, label)` entries

use kube_swagger_common::ResolvedType;

/// One enumerated node: its field path and type label
pub type PathEntry = (Vec<String>, String);

/// Enumerate every node of a resolved tree in presentation order
///
/// Objects emit their own entry first, then each field sorted by name,
/// then the `additionalProperties` element if one was declared. Array
/// elements sit under a `[]` segment. Dicts and circular markers are leaves,
/// which keeps enumeration finite on cyclic types.
///
/// # Examples
/// ```
/// use kube_swagger_common::{PrimitiveKind, ResolvedType};
/// use kube_swagger_parser::paths;
///
/// let tree = ResolvedType::object(
///     [("tags", ResolvedType::array(ResolvedType::primitive(PrimitiveKind::String)))],
///     vec![],
/// );
/// let labels: Vec<String> = paths(&tree, &[]).into_iter().map(|(_, label)| label).collect();
/// assert_eq!(labels, ["object", "array", "string"]);
/// ```
pub fn paths(tree: &ResolvedType, context: &[String]) -> Vec<PathEntry> {
    let mut entries = Vec::new();
    let mut path = context.to_vec();
    walk(tree, &mut path, &mut entries);
    entries
}

/// Like [`paths`], keeping only entries at most `depth` segments deeper than
/// `context`; a depth of 0 keeps everything
pub fn paths_to_depth(tree: &ResolvedType, context: &[String], depth: usize) -> Vec<PathEntry> {
    let entries = paths(tree, context);
    if depth == 0 {
        return entries;
    }
    let limit = context.len() + depth;
    entries
        .into_iter()
        .filter(|(path, _)| path.len() <= limit)
        .collect()
}

fn walk(tree: &ResolvedType, path: &mut Vec<String>, entries: &mut Vec<PathEntry>) {
    entries.push((path.clone(), tree.label()));

    match tree {
        ResolvedType::Array(element) => descend(element, "[]", path, entries),
        ResolvedType::Object(object) => {
            for (name, field) in &object.fields {
                descend(field, name, path, entries);
            }
            if let Some(element) = &object.additional_properties {
                descend(element, "additionalProperties", path, entries);
            }
        }
        ResolvedType::Any
        | ResolvedType::Primitive(_)
        | ResolvedType::Dict(_)
        | ResolvedType::Circular(_) => {}
    }
}

fn descend(tree: &ResolvedType, segment: &str, path: &mut Vec<String>, entries: &mut Vec<PathEntry>) {
    path.push(segment.to_string());
    walk(tree, path, entries);
    path.pop();
}
