//! Structural diff records

use crate::ResolvedType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened at a diff path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Added,
    Removed,
    Changed,
}

impl DiffKind {
    pub fn short(&self) -> &'static str {
        match self {
            Self::Added => "add",
            Self::Removed => "remove",
            Self::Changed => "change",
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short())
    }
}

/// Value carried by a type-tree diff record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiffValue {
    /// A (sub)tree of one of the compared types
    Type(ResolvedType),
    /// An entry of a `required` list
    Name(String),
}

impl fmt::Display for DiffValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(resolved) => write!(f, "{resolved}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// One difference between two documents, addressed by field path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffRecord<V = DiffValue> {
    pub kind: DiffKind,
    pub path: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<V>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<V>,
}

impl<V> DiffRecord<V> {
    pub fn added(path: Vec<String>, new: Option<V>) -> Self {
        Self {
            kind: DiffKind::Added,
            path,
            old: None,
            new,
        }
    }

    pub fn removed(path: Vec<String>, old: Option<V>) -> Self {
        Self {
            kind: DiffKind::Removed,
            path,
            old,
            new: None,
        }
    }

    pub fn changed(path: Vec<String>, old: V, new: V) -> Self {
        Self {
            kind: DiffKind::Changed,
            path,
            old: Some(old),
            new: Some(new),
        }
    }

    /// Path segments joined with `.`
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}
