//! Structural diff of resolved type trees

use kube_swagger_common::{DiffRecord, DiffValue, RequiredDiff, ResolvedObject, ResolvedType};
use std::collections::BTreeSet;
use tracing::debug;

/// Comparison settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// How `required` lists of two objects are compared
    pub required: RequiredDiff,
}

/// Compare two resolved trees from the root
///
/// Records come out in traversal order: fields of `old` by name, then fields
/// only `new` has, then `additionalProperties`, then `required`. A field
/// that exists only in `new` is reported once at its own path and not
/// descended into, so `diff(a, b)` and `diff(b, a)` are not mirror images.
///
/// # Examples
/// ```
/// use kube_swagger_analyzer::{diff, DiffOptions};
/// use kube_swagger_common::{DiffKind, PrimitiveKind, ResolvedType};
///
/// let old = ResolvedType::primitive(PrimitiveKind::String);
/// let new = ResolvedType::primitive(PrimitiveKind::Integer);
/// let records = diff(Some(&old), Some(&new), DiffOptions::default());
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].kind, DiffKind::Changed);
/// ```
pub fn diff(
    old: Option<&ResolvedType>,
    new: Option<&ResolvedType>,
    options: DiffOptions,
) -> Vec<DiffRecord> {
    let mut records = Vec::new();
    diff_into(old, new, &[], options, &mut records);
    records
}

/// Compare two trees at `path`, appending to `records`
///
/// Nothing is recorded when both sides are absent.
pub fn diff_into(
    old: Option<&ResolvedType>,
    new: Option<&ResolvedType>,
    path: &[String],
    options: DiffOptions,
    records: &mut Vec<DiffRecord>,
) {
    let mut path = path.to_vec();
    Differ { options, records }.compare(old, new, &mut path);
}

struct Differ<'r> {
    options: DiffOptions,
    records: &'r mut Vec<DiffRecord>,
}

impl Differ<'_> {
    fn compare(
        &mut self,
        old: Option<&ResolvedType>,
        new: Option<&ResolvedType>,
        path: &mut Vec<String>,
    ) {
        let (old, new) = match (old, new) {
            (None, None) => return,
            (None, Some(new)) => {
                self.push(DiffRecord::added(path.clone(), Some(type_value(new))));
                return;
            }
            (Some(old), None) => {
                self.push(DiffRecord::removed(path.clone(), Some(type_value(old))));
                return;
            }
            (Some(old), Some(new)) => (old, new),
        };

        match (old, new) {
            (ResolvedType::Primitive(a), ResolvedType::Primitive(b)) => {
                if a != b {
                    self.changed(path, old, new);
                }
            }
            (ResolvedType::Array(a), ResolvedType::Array(b)) => {
                self.descend(Some(a.as_ref()), Some(b.as_ref()), "[]", path);
            }
            (ResolvedType::Dict(a), ResolvedType::Dict(b)) => {
                self.descend(Some(a.as_ref()), Some(b.as_ref()), "{}", path);
            }
            (ResolvedType::Object(a), ResolvedType::Object(b)) => self.compare_objects(a, b, path),
            (ResolvedType::Circular(_), ResolvedType::Circular(_))
            | (ResolvedType::Any, ResolvedType::Any) => {}
            _ => {
                debug!(
                    path = %path.join("."),
                    old = old.variant_name(),
                    new = new.variant_name(),
                    "variant changed"
                );
                self.changed(path, old, new);
            }
        }
    }

    fn compare_objects(&mut self, old: &ResolvedObject, new: &ResolvedObject, path: &mut Vec<String>) {
        for (name, field) in &old.fields {
            self.descend(Some(field), new.fields.get(name), name, path);
        }
        for (name, field) in &new.fields {
            if !old.fields.contains_key(name) {
                path.push(name.clone());
                self.push(DiffRecord::added(path.clone(), Some(type_value(field))));
                path.pop();
            }
        }

        self.descend(
            old.additional_properties.as_deref(),
            new.additional_properties.as_deref(),
            "additionalProperties",
            path,
        );

        match self.options.required {
            RequiredDiff::Positional => self.required_by_position(&old.required, &new.required, path),
            RequiredDiff::Set => self.required_by_membership(&old.required, &new.required, path),
        }
    }

    fn required_by_position(&mut self, old: &[String], new: &[String], path: &[String]) {
        for index in 0..old.len().max(new.len()) {
            let at = required_path(path, &index.to_string());
            match (old.get(index), new.get(index)) {
                (Some(a), Some(b)) if a != b => {
                    self.push(DiffRecord::changed(at, name_value(a), name_value(b)));
                }
                (Some(a), None) => self.push(DiffRecord::removed(at, Some(name_value(a)))),
                (None, Some(b)) => self.push(DiffRecord::added(at, Some(name_value(b)))),
                _ => {}
            }
        }
    }

    fn required_by_membership(&mut self, old: &[String], new: &[String], path: &[String]) {
        let old_set: BTreeSet<&String> = old.iter().collect();
        let new_set: BTreeSet<&String> = new.iter().collect();

        for name in old_set.difference(&new_set) {
            self.push(DiffRecord::removed(
                required_path(path, name),
                Some(name_value(name)),
            ));
        }
        for name in new_set.difference(&old_set) {
            self.push(DiffRecord::added(
                required_path(path, name),
                Some(name_value(name)),
            ));
        }
    }

    fn descend(
        &mut self,
        old: Option<&ResolvedType>,
        new: Option<&ResolvedType>,
        segment: &str,
        path: &mut Vec<String>,
    ) {
        path.push(segment.to_string());
        self.compare(old, new, path);
        path.pop();
    }

    fn changed(&mut self, path: &[String], old: &ResolvedType, new: &ResolvedType) {
        self.push(DiffRecord::changed(
            path.to_vec(),
            type_value(old),
            type_value(new),
        ));
    }

    fn push(&mut self, record: DiffRecord) {
        debug!(kind = %record.kind, path = %record.dotted_path(), "diff");
        self.records.push(record);
    }
}

fn type_value(resolved: &ResolvedType) -> DiffValue {
    DiffValue::Type(resolved.clone())
}

fn name_value(name: &str) -> DiffValue {
    DiffValue::Name(name.to_string())
}

fn required_path(path: &[String], last: &str) -> Vec<String> {
    let mut at = path.to_vec();
    at.push("required".to_string());
    at.push(last.to_string());
    at
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube_swagger_common::{DiffKind, PrimitiveKind};

    fn object(required: &[&str]) -> ResolvedType {
        ResolvedType::object(
            Vec::<(String, ResolvedType)>::new(),
            required.iter().map(|name| name.to_string()).collect(),
        )
    }

    fn summary(records: &[DiffRecord]) -> Vec<(DiffKind, String)> {
        records
            .iter()
            .map(|record| (record.kind, record.dotted_path()))
            .collect()
    }

    #[test]
    fn test_positional_required_reports_appended_entries() {
        let records = diff(
            Some(&object(&["a"])),
            Some(&object(&["a", "b"])),
            DiffOptions::default(),
        );
        assert_eq!(summary(&records), [(DiffKind::Added, "required.1".to_string())]);
        assert_eq!(records[0].new, Some(DiffValue::Name("b".to_string())));
    }

    #[test]
    fn test_positional_required_reports_reordering() {
        let records = diff(
            Some(&object(&["a", "b"])),
            Some(&object(&["b", "a"])),
            DiffOptions::default(),
        );
        assert_eq!(
            summary(&records),
            [
                (DiffKind::Changed, "required.0".to_string()),
                (DiffKind::Changed, "required.1".to_string()),
            ]
        );
    }

    #[test]
    fn test_set_required_ignores_reordering() {
        let options = DiffOptions {
            required: RequiredDiff::Set,
        };
        assert!(diff(Some(&object(&["a", "b"])), Some(&object(&["b", "a"])), options).is_empty());

        let records = diff(Some(&object(&["a", "b"])), Some(&object(&["b", "c"])), options);
        assert_eq!(
            summary(&records),
            [
                (DiffKind::Removed, "required.a".to_string()),
                (DiffKind::Added, "required.c".to_string()),
            ]
        );
    }

    #[test]
    fn test_both_absent_is_empty() {
        assert!(diff(None, None, DiffOptions::default()).is_empty());
    }

    #[test]
    fn test_variant_change_is_atomic() {
        let old = ResolvedType::array(ResolvedType::primitive(PrimitiveKind::String));
        let new = ResolvedType::string_dict();
        let records = diff(Some(&old), Some(&new), DiffOptions::default());
        assert_eq!(summary(&records), [(DiffKind::Changed, String::new())]);
    }
}
