//! Kubernetes swagger parsing and type resolution
//!
//! This crate turns a Kubernetes OpenAPI v2 document into fully resolved,
//! cycle-safe type trees.
//!
//! ## Pipeline
//!
//! - [`SwaggerParser`] decodes a document (JSON or YAML) into a
//!   [`SwaggerDocument`]
//! - [`GvkIndex`] maps each kind to the group/versions serving it
//! - [`Resolver`] follows `$ref` pointers and produces `ResolvedType` trees,
//!   cutting cycles with circular markers
//! - [`RawResolver`] inlines `$ref`s into JSON values that keep the swagger
//!   layout, for raw comparisons
//! - [`paths`] flattens a tree into `(path, label)` entries for display
//!
//! Release specs are located with [`KubeVersion`] and [`SpecCache`].

pub mod swagger;

mod gvk_index;
mod paths;
mod raw;
mod resolver;
mod source;

pub use gvk_index::GvkIndex;
pub use paths::{paths, paths_to_depth, PathEntry};
pub use raw::{RawResolver, CIRCULAR_MARKER};
pub use resolver::{
    ResolutionObserver, ResolutionState, ResolutionStatus, Resolver, ResolverOptions,
    DEFAULT_MAX_DEPTH,
};
pub use source::{KubeVersion, SpecCache, LATEST_PATCH_VERSIONS, SPEC_URL_TEMPLATE};
pub use swagger::{parse_ref, Definition, SwaggerDocument, SwaggerParser};
