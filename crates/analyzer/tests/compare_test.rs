//! Integration tests for kind comparison and API-version catalogs

use kube_swagger_analyzer::{
    compare_kind, kinds_in_either, ApiVersionCatalog, CompareOptions, DiffOptions, KindFilter,
};
use kube_swagger_common::{DiffKind, RequiredDiff};
use kube_swagger_parser::{SwaggerDocument, SwaggerParser};

const OLD_SPEC: &str = r##"{
    "swagger": "2.0",
    "info": { "title": "Kubernetes", "version": "v1.18.20" },
    "definitions": {
        "io.k8s.api.extensions.v1beta1.Ingress": {
            "type": "object",
            "properties": {
                "spec": { "$ref": "#/definitions/io.k8s.api.extensions.v1beta1.IngressSpec" }
            },
            "x-kubernetes-group-version-kind": [
                { "group": "extensions", "kind": "Ingress", "version": "v1beta1" }
            ]
        },
        "io.k8s.api.networking.v1beta1.Ingress": {
            "type": "object",
            "properties": {
                "spec": { "$ref": "#/definitions/io.k8s.api.extensions.v1beta1.IngressSpec" }
            },
            "x-kubernetes-group-version-kind": [
                { "group": "networking.k8s.io", "kind": "Ingress", "version": "v1beta1" }
            ]
        },
        "io.k8s.api.extensions.v1beta1.IngressSpec": {
            "type": "object",
            "required": ["rules"],
            "properties": {
                "backend": { "type": "object" },
                "rules": { "type": "array", "items": { "type": "string" } }
            }
        },
        "io.k8s.api.core.v1.Pod": {
            "type": "object",
            "properties": { "status": { "type": "string" } },
            "x-kubernetes-group-version-kind": [
                { "group": "", "kind": "Pod", "version": "v1" }
            ]
        }
    }
}"##;

const NEW_SPEC: &str = r##"{
    "swagger": "2.0",
    "info": { "title": "Kubernetes", "version": "v1.23.9" },
    "definitions": {
        "io.k8s.api.networking.v1.Ingress": {
            "type": "object",
            "properties": {
                "spec": { "$ref": "#/definitions/io.k8s.api.networking.v1.IngressSpec" }
            },
            "x-kubernetes-group-version-kind": [
                { "group": "networking.k8s.io", "kind": "Ingress", "version": "v1" }
            ]
        },
        "io.k8s.api.networking.v1.IngressSpec": {
            "type": "object",
            "required": ["ingressClassName", "rules"],
            "properties": {
                "defaultBackend": { "type": "object" },
                "ingressClassName": { "type": "string" },
                "rules": { "type": "array", "items": { "type": "string" } }
            }
        },
        "io.k8s.api.core.v1.Pod": {
            "type": "object",
            "properties": { "status": { "type": "string" } },
            "x-kubernetes-group-version-kind": [
                { "group": "", "kind": "Pod", "version": "v1" }
            ]
        },
        "io.k8s.api.coordination.v1.Lease": {
            "type": "object",
            "properties": { "holder": { "type": "string" } },
            "x-kubernetes-group-version-kind": [
                { "group": "coordination.k8s.io", "kind": "Lease", "version": "v1" }
            ]
        }
    }
}"##;

fn load(json: &str) -> SwaggerDocument {
    SwaggerParser::from_json(json).unwrap().into_document()
}

#[test]
fn test_compare_kind_cross_product() {
    let old = load(OLD_SPEC);
    let new = load(NEW_SPEC);

    let comparisons = compare_kind(&old, &new, "Ingress", &CompareOptions::default()).unwrap();
    let pairs: Vec<(&str, &str)> = comparisons
        .iter()
        .map(|c| (c.old_group_version.as_str(), c.new_group_version.as_str()))
        .collect();
    assert_eq!(
        pairs,
        [
            ("extensions.v1beta1", "networking.k8s.io.v1"),
            ("networking.k8s.io.v1beta1", "networking.k8s.io.v1"),
        ]
    );

    let paths: Vec<(DiffKind, String)> = comparisons[0]
        .diffs
        .iter()
        .map(|record| (record.kind, record.dotted_path()))
        .collect();
    assert_eq!(
        paths,
        [
            (DiffKind::Removed, "spec.backend".to_string()),
            (DiffKind::Added, "spec.defaultBackend".to_string()),
            (DiffKind::Added, "spec.ingressClassName".to_string()),
            (DiffKind::Changed, "spec.required.0".to_string()),
            (DiffKind::Added, "spec.required.1".to_string()),
        ]
    );
}

#[test]
fn test_compare_kind_with_set_required_and_filter() {
    let old = load(OLD_SPEC);
    let new = load(NEW_SPEC);
    let options = CompareOptions {
        diff: DiffOptions {
            required: RequiredDiff::Set,
        },
        old_group_versions: vec!["networking.k8s.io.v1beta1".to_string()],
        ..CompareOptions::default()
    };

    let comparisons = compare_kind(&old, &new, "Ingress", &options).unwrap();
    assert_eq!(comparisons.len(), 1);

    let required: Vec<String> = comparisons[0]
        .diffs
        .iter()
        .filter(|record| record.path.contains(&"required".to_string()))
        .map(|record| format!("{} {}", record.kind, record.dotted_path()))
        .collect();
    assert_eq!(required, ["add spec.required.ingressClassName"]);
}

#[test]
fn test_unchanged_kind() {
    let old = load(OLD_SPEC);
    let new = load(NEW_SPEC);

    let comparisons = compare_kind(&old, &new, "Pod", &CompareOptions::default()).unwrap();
    assert_eq!(comparisons.len(), 1);
    assert!(comparisons[0].is_empty());
}

#[test]
fn test_one_sided_kind_has_no_pairs() {
    let old = load(OLD_SPEC);
    let new = load(NEW_SPEC);
    assert!(compare_kind(&old, &new, "Lease", &CompareOptions::default())
        .unwrap()
        .is_empty());
}

#[test]
fn test_kinds_in_either() {
    let old = load(OLD_SPEC);
    let new = load(NEW_SPEC);
    assert_eq!(kinds_in_either(&old, &new), ["Ingress", "Lease", "Pod"]);
}

#[test]
fn test_api_version_catalog_across_releases() {
    let old = ApiVersionCatalog::from_document("1.18.20", &load(OLD_SPEC));
    let new = ApiVersionCatalog::from_document("1.23.9", &load(NEW_SPEC));

    let changes = old.changes(&new, &KindFilter::default());
    assert_eq!(changes.keys().collect::<Vec<_>>(), ["Ingress", "Lease"]);

    let ingress = &changes["Ingress"];
    assert_eq!(ingress.added, ["networking.k8s.io.v1"]);
    assert_eq!(ingress.removed, ["extensions.v1beta1", "networking.k8s.io.v1beta1"]);
    assert!(ingress.same.is_empty());

    let first = ApiVersionCatalog::empty("(none)").changes(&old, &KindFilter::default());
    assert_eq!(first["Pod"].added, ["v1"]);
}
