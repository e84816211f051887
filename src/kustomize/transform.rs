//! Transformers applied to a resource collection
//!
//! Each transformer rewrites resources in place. Which fields a label or
//! annotation lands in is described by [`FieldSpec`] tables, so a kind is
//! only touched where its schema expects the value.

use super::kustomization::Kustomization;
use super::resource::{ResMap, Resource};
use crate::error::Result;
use log::debug;
use serde_yaml::Value as YamlValue;
use std::collections::BTreeMap;

/// Kinds that are not namespace-scoped.
const CLUSTER_SCOPED_KINDS: &[&str] = &[
    "APIService",
    "CSIDriver",
    "ClusterRole",
    "ClusterRoleBinding",
    "CustomResourceDefinition",
    "IngressClass",
    "MutatingWebhookConfiguration",
    "Namespace",
    "Node",
    "PersistentVolume",
    "PodSecurityPolicy",
    "PriorityClass",
    "RuntimeClass",
    "StorageClass",
    "ValidatingWebhookConfiguration",
    "VolumeAttachment",
];

/// Kinds whose names are left alone by prefix and suffix.
const NAME_AFFIX_EXCLUDED_KINDS: &[&str] = &["Namespace", "CustomResourceDefinition"];

const WORKLOAD_KINDS: &[&str] = &["Deployment", "ReplicaSet", "StatefulSet", "DaemonSet"];

const POD_TEMPLATE_KINDS: &[&str] = &["Deployment", "ReplicaSet", "StatefulSet", "DaemonSet", "Job"];

/// Whether resources of `kind` live outside any namespace
pub fn is_cluster_scoped(kind: &str) -> bool {
    CLUSTER_SCOPED_KINDS.contains(&kind)
}

/// A mapping field a transformer writes into
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Keys leading to the mapping
    pub path: &'static [&'static str],
    /// Kinds this applies to; `None` means every kind
    pub kinds: Option<&'static [&'static str]>,
    /// Create the mapping when it is missing
    pub create: bool,
}

impl FieldSpec {
    fn applies_to(&self, kind: &str) -> bool {
        self.kinds.map_or(true, |kinds| kinds.contains(&kind))
    }
}

/// Fields that receive common labels.
pub const LABEL_FIELD_SPECS: &[FieldSpec] = &[
    FieldSpec {
        path: &["metadata", "labels"],
        kinds: None,
        create: true,
    },
    FieldSpec {
        path: &["spec", "selector", "matchLabels"],
        kinds: Some(WORKLOAD_KINDS),
        create: true,
    },
    FieldSpec {
        path: &["spec", "selector", "matchLabels"],
        kinds: Some(&["Job"]),
        create: false,
    },
    FieldSpec {
        path: &["spec", "template", "metadata", "labels"],
        kinds: Some(POD_TEMPLATE_KINDS),
        create: true,
    },
    FieldSpec {
        path: &["spec", "jobTemplate", "spec", "template", "metadata", "labels"],
        kinds: Some(&["CronJob"]),
        create: true,
    },
    FieldSpec {
        path: &["spec", "selector"],
        kinds: Some(&["Service", "ReplicationController"]),
        create: true,
    },
];

/// Fields that receive common annotations.
pub const ANNOTATION_FIELD_SPECS: &[FieldSpec] = &[
    FieldSpec {
        path: &["metadata", "annotations"],
        kinds: None,
        create: true,
    },
    FieldSpec {
        path: &["spec", "template", "metadata", "annotations"],
        kinds: Some(POD_TEMPLATE_KINDS),
        create: true,
    },
    FieldSpec {
        path: &["spec", "jobTemplate", "spec", "template", "metadata", "annotations"],
        kinds: Some(&["CronJob"]),
        create: true,
    },
];

/// Only the object's own labels.
pub const METADATA_LABEL_FIELD_SPECS: &[FieldSpec] = &[FieldSpec {
    path: &["metadata", "labels"],
    kinds: None,
    create: true,
}];

/// A rewrite applied to every resource of a collection
pub trait Transformer {
    /// Short name used in log output
    fn name(&self) -> &'static str;

    fn transform(&self, resources: &mut ResMap) -> Result<()>;
}

/// Sets `metadata.namespace` on namespace-scoped resources.
///
/// `ServiceAccount` subjects of role bindings follow along when they have
/// no namespace or the `default` one.
#[derive(Debug, Clone)]
pub struct NamespaceTransformer {
    pub namespace: String,
}

impl NamespaceTransformer {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    fn update_subjects(&self, resource: &mut Resource) {
        let Some(subjects) = resource.sequence_mut(&["subjects"]) else {
            return;
        };
        for subject in subjects.iter_mut().filter_map(YamlValue::as_mapping_mut) {
            if subject.get("kind").and_then(YamlValue::as_str) != Some("ServiceAccount") {
                continue;
            }
            let current = subject.get("namespace").and_then(YamlValue::as_str);
            if current.is_none() || current == Some("default") {
                subject.insert(
                    YamlValue::String("namespace".to_string()),
                    YamlValue::String(self.namespace.clone()),
                );
            }
        }
    }
}

impl Transformer for NamespaceTransformer {
    fn name(&self) -> &'static str {
        "namespace"
    }

    fn transform(&self, resources: &mut ResMap) -> Result<()> {
        for resource in resources.iter_mut() {
            if matches!(resource.kind(), "RoleBinding" | "ClusterRoleBinding") {
                self.update_subjects(resource);
            }
            if is_cluster_scoped(resource.kind()) {
                continue;
            }
            resource.set_string(&["metadata"], "namespace", &self.namespace)?;
        }
        Ok(())
    }
}

/// Adds a prefix and suffix to `metadata.name`.
#[derive(Debug, Clone, Default)]
pub struct NameAffixTransformer {
    pub prefix: String,
    pub suffix: String,
}

impl Transformer for NameAffixTransformer {
    fn name(&self) -> &'static str {
        "name prefix/suffix"
    }

    fn transform(&self, resources: &mut ResMap) -> Result<()> {
        for resource in resources.iter_mut() {
            if NAME_AFFIX_EXCLUDED_KINDS.contains(&resource.kind()) {
                continue;
            }
            let name = format!("{}{}{}", self.prefix, resource.name(), self.suffix);
            resource.set_string(&["metadata"], "name", &name)?;
        }
        Ok(())
    }
}

/// Adds string entries to every mapping selected by a field spec table.
///
/// Used for labels and annotations alike.
#[derive(Debug, Clone)]
pub struct MapEntriesTransformer {
    name: &'static str,
    entries: BTreeMap<String, String>,
    field_specs: &'static [FieldSpec],
}

impl MapEntriesTransformer {
    pub fn labels(entries: BTreeMap<String, String>) -> Self {
        Self {
            name: "common labels",
            entries,
            field_specs: LABEL_FIELD_SPECS,
        }
    }

    pub fn annotations(entries: BTreeMap<String, String>) -> Self {
        Self {
            name: "common annotations",
            entries,
            field_specs: ANNOTATION_FIELD_SPECS,
        }
    }

    /// Labels that stay out of selectors and pod templates
    pub fn metadata_labels(entries: BTreeMap<String, String>) -> Self {
        Self {
            name: "metadata labels",
            entries,
            field_specs: METADATA_LABEL_FIELD_SPECS,
        }
    }
}

impl Transformer for MapEntriesTransformer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn transform(&self, resources: &mut ResMap) -> Result<()> {
        for resource in resources.iter_mut() {
            let kind = resource.kind().to_string();
            for spec in self.field_specs.iter().filter(|s| s.applies_to(&kind)) {
                let Some(mapping) = resource.mapping_mut(spec.path, spec.create)? else {
                    continue;
                };
                for (key, value) in &self.entries {
                    mapping.insert(
                        YamlValue::String(key.clone()),
                        YamlValue::String(value.clone()),
                    );
                }
            }
        }
        Ok(())
    }
}

/// Build the transformers a kustomization declares, in application order.
pub fn from_kustomization(kustomization: &Kustomization) -> Vec<Box<dyn Transformer>> {
    let mut transformers: Vec<Box<dyn Transformer>> = Vec::new();

    if let Some(namespace) = kustomization.namespace.as_deref().filter(|ns| !ns.is_empty()) {
        transformers.push(Box::new(NamespaceTransformer::new(namespace)));
    }

    let prefix = kustomization.name_prefix.clone().unwrap_or_default();
    let suffix = kustomization.name_suffix.clone().unwrap_or_default();
    if !prefix.is_empty() || !suffix.is_empty() {
        transformers.push(Box::new(NameAffixTransformer { prefix, suffix }));
    }

    if !kustomization.common_labels.is_empty() {
        transformers.push(Box::new(MapEntriesTransformer::labels(
            kustomization.common_labels.clone(),
        )));
    }

    if !kustomization.common_annotations.is_empty() {
        transformers.push(Box::new(MapEntriesTransformer::annotations(
            kustomization.common_annotations.clone(),
        )));
    }

    debug!(
        "kustomization declares {} transformer(s): {}",
        transformers.len(),
        transformers
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(", ")
    );

    transformers
}
