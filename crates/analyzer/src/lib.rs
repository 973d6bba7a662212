//! Comparison of Kubernetes types across swagger documents
//!
//! - [`diff`] compares two resolved type trees structurally
//! - [`diff_json`] applies the same rules to raw JSON values
//! - [`compare_kind`] resolves one kind in two documents and diffs every
//!   pair of group/versions
//! - [`ApiVersionCatalog`] tracks which group/versions serve each kind from
//!   one release to the next
//!
//! # Examples
//!
//! ```no_run
//! use kube_swagger_analyzer::{compare_kind, CompareOptions};
//! use kube_swagger_parser::{KubeVersion, SpecCache};
//!
//! let cache = SpecCache::default();
//! let old = cache.load(&KubeVersion::parse("1.18.20")?)?;
//! let new = cache.load(&KubeVersion::parse("1.23.9")?)?;
//!
//! for comparison in compare_kind(&old, &new, "Ingress", &CompareOptions::default())? {
//!     println!(
//!         "{} -> {}: {} differences",
//!         comparison.old_group_version,
//!         comparison.new_group_version,
//!         comparison.diffs.len()
//!     );
//! }
//! # Ok::<(), kube_swagger_common::SwaggerError>(())
//! ```

mod api_versions;
mod compare;
mod differ;
mod json_diff;

pub use api_versions::{ApiVersionCatalog, KindFilter, SetDiff};
pub use compare::{compare_kind, kinds_in_either, CompareOptions, KindComparison};
pub use differ::{diff, diff_into, DiffOptions};
pub use json_diff::{diff_json, strip_descriptions};
