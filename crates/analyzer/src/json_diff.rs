//! Diff of raw JSON values
//!
//! Used on JSON-shaped resolutions, where no `ResolvedType` is available. Follows the same add/remove/change rules as
//! the type differ: object keys in sorted order, new-only keys flagged
//! without descending, arrays compared index by index.

use kube_swagger_common::DiffRecord;
use serde_json::Value;
use tracing::debug;

/// Compare two JSON values from the root
///
/// # Examples
/// ```
/// use kube_swagger_analyzer::diff_json;
/// use serde_json::json;
///
/// let records = diff_json(Some(&json!({"a": 1})), Some(&json!({"a": 2, "b": true})));
/// let paths: Vec<String> = records.iter().map(|r| r.dotted_path()).collect();
/// assert_eq!(paths, ["a", "b"]);
/// ```
pub fn diff_json(old: Option<&Value>, new: Option<&Value>) -> Vec<DiffRecord<Value>> {
    let mut records = Vec::new();
    let mut path = Vec::new();
    compare(old, new, &mut path, &mut records);
    records
}

/// Drop records whose last path segment is `description`
///
/// Description text changes between releases without any effect on the
/// schema.
pub fn strip_descriptions<V>(records: &mut Vec<DiffRecord<V>>) {
    records.retain(|record| {
        let description = record.path.last().is_some_and(|last| last == "description");
        if description {
            debug!(path = %record.dotted_path(), "skipping description");
        }
        !description
    });
}

fn compare(
    old: Option<&Value>,
    new: Option<&Value>,
    path: &mut Vec<String>,
    records: &mut Vec<DiffRecord<Value>>,
) {
    let (old, new) = match (old, new) {
        (None, None) => return,
        (None, Some(new)) => {
            records.push(DiffRecord::added(path.clone(), Some(new.clone())));
            return;
        }
        (Some(old), None) => {
            records.push(DiffRecord::removed(path.clone(), Some(old.clone())));
            return;
        }
        (Some(old), Some(new)) => (old, new),
    };

    match (old, new) {
        (Value::Object(a), Value::Object(b)) => {
            let mut keys: Vec<&String> = a.keys().collect();
            keys.sort();
            for key in keys {
                path.push(key.clone());
                compare(a.get(key), b.get(key), path, records);
                path.pop();
            }

            let mut added: Vec<(&String, &Value)> =
                b.iter().filter(|(key, _)| !a.contains_key(*key)).collect();
            added.sort_by(|x, y| x.0.cmp(y.0));
            for (key, value) in added {
                path.push(key.clone());
                records.push(DiffRecord::added(path.clone(), Some(value.clone())));
                path.pop();
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            for index in 0..a.len().max(b.len()) {
                path.push(index.to_string());
                compare(a.get(index), b.get(index), path, records);
                path.pop();
            }
        }
        _ => {
            if old != new {
                records.push(DiffRecord::changed(path.clone(), old.clone(), new.clone()));
            }
        }
    }
}
