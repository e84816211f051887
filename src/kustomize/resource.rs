//! Kubernetes resources and the ordered collection they merge into

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_yaml::{Mapping, Value as YamlValue};
use std::fmt;
use std::path::{Path, PathBuf};

/// Kinds emitted first by the legacy ordering, in this order.
const ORDER_FIRST: &[&str] = &[
    "Namespace",
    "ResourceQuota",
    "StorageClass",
    "CustomResourceDefinition",
    "ServiceAccount",
    "PodSecurityPolicy",
    "Role",
    "ClusterRole",
    "RoleBinding",
    "ClusterRoleBinding",
    "ConfigMap",
    "Secret",
    "Endpoints",
    "Service",
    "LimitRange",
    "PriorityClass",
    "PersistentVolume",
    "PersistentVolumeClaim",
    "Deployment",
    "StatefulSet",
    "CronJob",
    "PodDisruptionBudget",
];

/// Kinds emitted last by the legacy ordering, in this order.
const ORDER_LAST: &[&str] = &[
    "MutatingWebhookConfiguration",
    "ValidatingWebhookConfiguration",
];

/// Rank of a kind under the legacy ordering; unlisted kinds sit in between.
fn legacy_rank(kind: &str) -> usize {
    if let Some(i) = ORDER_FIRST.iter().position(|k| *k == kind) {
        return i;
    }
    if let Some(i) = ORDER_LAST.iter().position(|k| *k == kind) {
        return ORDER_FIRST.len() + 1 + i;
    }
    ORDER_FIRST.len()
}

/// Identity of a resource: group, version, kind, namespace and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResId {
    pub group: String,
    pub version: String,
    pub kind: String,
    pub namespace: Option<String>,
    pub name: String,
}

impl ResId {
    /// Build an id, splitting `api_version` into group and version.
    pub fn new(api_version: &str, kind: &str, namespace: Option<&str>, name: &str) -> Self {
        let (group, version) = match api_version.split_once('/') {
            Some((group, version)) => (group.to_string(), version.to_string()),
            None => (String::new(), api_version.to_string()),
        };
        Self {
            group,
            version,
            kind: kind.to_string(),
            namespace: namespace.map(str::to_string),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for ResId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let group = if self.group.is_empty() {
            "[noGrp]"
        } else {
            &self.group
        };
        let namespace = self.namespace.as_deref().unwrap_or("[noNs]");
        write!(
            f,
            "{}.{}.{}/{}.{}",
            self.kind, self.version, group, self.name, namespace
        )
    }
}

/// A single Kubernetes object loaded from a resource file
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    body: Mapping,
    origin: PathBuf,
}

impl Resource {
    /// Validate a parsed document as a Kubernetes object.
    ///
    /// The document must be a mapping with string `apiVersion` and `kind`
    /// and a `metadata` mapping holding a string `name`.
    pub fn from_value(value: YamlValue, origin: &Path) -> Result<Self> {
        let parse_error = |message: String| Error::Parse {
            path: origin.display().to_string(),
            message,
        };

        let YamlValue::Mapping(body) = value else {
            return Err(parse_error("document is not a mapping".to_string()));
        };

        for field in ["apiVersion", "kind"] {
            match body.get(field) {
                Some(YamlValue::String(s)) if !s.is_empty() => {}
                Some(_) => return Err(parse_error(format!("'{}' must be a string", field))),
                None => return Err(parse_error(format!("missing '{}'", field))),
            }
        }

        let Some(metadata) = body.get("metadata") else {
            return Err(parse_error("missing 'metadata'".to_string()));
        };
        let Some(metadata) = metadata.as_mapping() else {
            return Err(parse_error("'metadata' must be a mapping".to_string()));
        };
        match metadata.get("name") {
            Some(YamlValue::String(s)) if !s.is_empty() => {}
            _ => return Err(parse_error("missing 'metadata.name'".to_string())),
        }
        match metadata.get("namespace") {
            None | Some(YamlValue::String(_)) => {}
            Some(_) => {
                return Err(parse_error(
                    "'metadata.namespace' must be a string".to_string(),
                ))
            }
        }

        Ok(Self {
            body,
            origin: origin.to_path_buf(),
        })
    }

    /// Parse every document in a resource file; empty documents are skipped.
    pub fn parse_documents(origin: &Path, content: &str) -> Result<Vec<Self>> {
        let mut resources = Vec::new();
        for document in serde_yaml::Deserializer::from_str(content) {
            let value = YamlValue::deserialize(document).map_err(|e| Error::Parse {
                path: origin.display().to_string(),
                message: e.to_string(),
            })?;
            if value.is_null() {
                continue;
            }
            resources.push(Self::from_value(value, origin)?);
        }
        Ok(resources)
    }

    fn str_field(&self, path: &[&str]) -> Option<&str> {
        self.get(path).and_then(YamlValue::as_str)
    }

    pub fn api_version(&self) -> &str {
        self.str_field(&["apiVersion"]).unwrap_or_default()
    }

    pub fn kind(&self) -> &str {
        self.str_field(&["kind"]).unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.str_field(&["metadata", "name"]).unwrap_or_default()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.str_field(&["metadata", "namespace"])
    }

    /// File this resource was loaded from
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn id(&self) -> ResId {
        ResId::new(self.api_version(), self.kind(), self.namespace(), self.name())
    }

    /// The whole object as YAML
    pub fn body(&self) -> &Mapping {
        &self.body
    }

    /// Look up a nested value by mapping keys.
    pub fn get(&self, path: &[&str]) -> Option<&YamlValue> {
        let (first, rest) = path.split_first()?;
        let mut current = self.body.get(*first)?;
        for key in rest {
            current = current.as_mapping()?.get(*key)?;
        }
        Some(current)
    }

    /// Look up a nested mapping for modification.
    ///
    /// With `create`, missing or null intermediate entries become empty
    /// mappings. Without it, a missing entry yields `Ok(None)`. A non-mapping
    /// value on the way is a parse error.
    pub fn mapping_mut(&mut self, path: &[&str], create: bool) -> Result<Option<&mut Mapping>> {
        let origin = self.origin.display().to_string();
        let mut current = &mut self.body;
        for (depth, key) in path.iter().enumerate() {
            let key = YamlValue::String((*key).to_string());
            if !current.contains_key(&key) {
                if !create {
                    return Ok(None);
                }
                current.insert(key.clone(), YamlValue::Mapping(Mapping::new()));
            }
            let Some(slot) = current.get_mut(&key) else {
                return Ok(None);
            };
            if slot.is_null() {
                if !create {
                    return Ok(None);
                }
                *slot = YamlValue::Mapping(Mapping::new());
            }
            current = match slot {
                YamlValue::Mapping(mapping) => mapping,
                _ => {
                    return Err(Error::Parse {
                        path: origin,
                        message: format!("expected a mapping at '{}'", path[..=depth].join(".")),
                    })
                }
            };
        }
        Ok(Some(current))
    }

    /// Set a string entry in the mapping at `path`, creating it if needed.
    pub fn set_string(&mut self, path: &[&str], key: &str, value: &str) -> Result<()> {
        if let Some(mapping) = self.mapping_mut(path, true)? {
            mapping.insert(
                YamlValue::String(key.to_string()),
                YamlValue::String(value.to_string()),
            );
        }
        Ok(())
    }

    /// Mutable access to a nested sequence, if present.
    pub fn sequence_mut(&mut self, path: &[&str]) -> Option<&mut Vec<YamlValue>> {
        let (last, parents) = path.split_last()?;
        let parent = self.mapping_mut(parents, false).ok()??;
        parent.get_mut(*last)?.as_sequence_mut()
    }
}

/// Ordered collection of resources produced by a kustomization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResMap {
    resources: Vec<Resource>,
}

impl ResMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resource, rejecting one whose id is already present.
    pub fn append(&mut self, resource: Resource) -> Result<()> {
        let id = resource.id();
        if self.resources.iter().any(|r| r.id() == id) {
            return Err(Error::DuplicateResource { id: id.to_string() });
        }
        self.resources.push(resource);
        Ok(())
    }

    /// Append every resource of `other`, in order.
    pub fn append_all(&mut self, other: ResMap) -> Result<()> {
        for resource in other.resources {
            self.append(resource)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Resource> {
        self.resources.iter_mut()
    }

    /// Sort by kind rank, then group, version and kind, then namespace and
    /// name.
    pub fn sort_legacy(&mut self) {
        self.resources
            .sort_by_cached_key(|r| (legacy_rank(r.kind()), r.id()));
    }
}
