//! Runs a kustomization against the in-memory store
//!
//! Resolution is recursive: a `resources` entry naming a directory is built
//! as a kustomization of its own, and the parent's transformers then apply
//! to its output.

use super::kustomization;
use super::resource::{ResMap, Resource};
use super::transform::{self, MapEntriesTransformer, Transformer};
use crate::error::{Error, Result};
use crate::filesystem::MemoryFS;
use crate::path;
use log::debug;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Label added when [`Options::add_managed_by_label`] is set.
pub const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";

/// Where resource files may be loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadRestrictions {
    /// Files must sit in or below the directory of the kustomization that
    /// lists them. Nested kustomization directories may live anywhere.
    #[default]
    RootOnly,
    /// Any file in the store may be loaded
    None,
}

/// Order of the merged output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reorder {
    /// Sort by kind so dependencies such as namespaces come first
    #[default]
    Legacy,
    /// Keep the order resources were loaded in
    None,
}

/// Engine options; `Options::default()` gives the standard behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    pub load_restrictions: LoadRestrictions,
    pub reorder: Reorder,
    pub add_managed_by_label: bool,
}

/// Builds a merged resource collection from a kustomization root
#[derive(Debug, Clone, Default)]
pub struct Kustomizer {
    options: Options,
}

impl Kustomizer {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// Build the kustomization found in directory `root` of `fs`.
    ///
    /// # Errors
    ///
    /// - `Error::Config` when the kustomization is missing or malformed, or
    ///   when nested kustomizations form a cycle.
    /// - `Error::ResourceNotFound` when a listed path is not in the store.
    /// - `Error::Parse` when a resource document is malformed.
    /// - `Error::DuplicateResource` and `Error::LoadRestriction` as described
    ///   on those variants.
    pub fn run<P: AsRef<Path>>(&self, fs: &MemoryFS, root: P) -> Result<ResMap> {
        let root = path::normalize(root)?;
        let mut stack = Vec::new();
        let mut resources = self.accumulate(fs, &root, &mut stack)?;

        if self.options.add_managed_by_label {
            let labels = BTreeMap::from([(
                MANAGED_BY_LABEL.to_string(),
                format!("{}-{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            )]);
            MapEntriesTransformer::metadata_labels(labels).transform(&mut resources)?;
        }

        if self.options.reorder == Reorder::Legacy {
            resources.sort_legacy();
        }

        Ok(resources)
    }

    fn accumulate(&self, fs: &MemoryFS, dir: &Path, stack: &mut Vec<PathBuf>) -> Result<ResMap> {
        if stack.iter().any(|visited| visited == dir) {
            let cycle = stack
                .iter()
                .chain(std::iter::once(&dir.to_path_buf()))
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(Error::Config {
                path: dir.display().to_string(),
                message: format!("cycle detected in kustomization directories: {}", cycle),
            });
        }

        let (kustomization_path, kustomization) = kustomization::load(fs, dir)?;
        debug!(
            "loaded {} with {} resource entries",
            kustomization_path.display(),
            kustomization.resources.len()
        );

        stack.push(dir.to_path_buf());
        let mut resources = ResMap::new();
        for entry in &kustomization.resources {
            let target = path::resolve(dir, entry).map_err(|_| Error::ResourceNotFound {
                path: dir.join(entry).display().to_string(),
                root: dir.display().to_string(),
            })?;

            if fs.is_file(&target) {
                self.check_restrictions(&target, dir)?;
                for resource in self.load_file(fs, &target)? {
                    resources.append(resource)?;
                }
            } else if fs.is_dir(&target) {
                let nested = self.accumulate(fs, &target, stack)?;
                resources.append_all(nested)?;
            } else {
                return Err(Error::ResourceNotFound {
                    path: target.display().to_string(),
                    root: dir.display().to_string(),
                });
            }
        }
        stack.pop();

        for transformer in transform::from_kustomization(&kustomization) {
            debug!("applying {} transformer in {}", transformer.name(), dir.display());
            transformer.transform(&mut resources)?;
        }

        Ok(resources)
    }

    fn check_restrictions(&self, target: &Path, dir: &Path) -> Result<()> {
        if self.options.load_restrictions == LoadRestrictions::RootOnly
            && !path::is_within(target, dir)
        {
            return Err(Error::LoadRestriction {
                path: target.display().to_string(),
                root: dir.display().to_string(),
            });
        }
        Ok(())
    }

    fn load_file(&self, fs: &MemoryFS, target: &Path) -> Result<Vec<Resource>> {
        let content = fs.read_file(target)?.as_str().map_err(|e| Error::Parse {
            path: target.display().to_string(),
            message: format!("file is not valid UTF-8: {}", e),
        })?;
        let resources = Resource::parse_documents(target, content)?;
        for resource in &resources {
            debug!("loaded resource {} from {}", resource.id(), target.display());
        }
        Ok(resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn fixture_fs() -> MemoryFS {
        let mut fs = MemoryFS::new();
        for (path, content) in fixtures::fixtures() {
            fs.write_file(path, content).unwrap();
        }
        fs
    }

    const CONFIG_MAP: &str = "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: settings\n";

    #[test]
    fn test_run_fixtures() {
        let resources = Kustomizer::default().run(&fixture_fs(), "/").unwrap();
        let kinds: Vec<&str> = resources.iter().map(Resource::kind).collect();
        assert_eq!(kinds, vec!["Service", "Deployment"]);
        assert!(resources
            .iter()
            .all(|r| r.namespace() == Some("my-namespace")));
    }

    #[test]
    fn test_run_without_reorder_keeps_listing_order() {
        let options = Options {
            reorder: Reorder::None,
            ..Default::default()
        };
        let resources = Kustomizer::new(options).run(&fixture_fs(), "/").unwrap();
        let kinds: Vec<&str> = resources.iter().map(Resource::kind).collect();
        assert_eq!(kinds, vec!["Deployment", "Service"]);
    }

    #[test]
    fn test_missing_resource() {
        let mut fs = fixture_fs();
        fs.remove_file(fixtures::SERVICE_PATH).unwrap();
        let err = Kustomizer::default().run(&fs, "/").unwrap_err();
        match err {
            Error::ResourceNotFound { path, root } => {
                assert_eq!(path, "/resources/service.yaml");
                assert_eq!(root, "/");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_entry_above_filesystem_root_is_not_found() {
        let mut fs = MemoryFS::new();
        fs.write_file("/kustomization.yaml", "resources:\n  - ../x.yaml\n")
            .unwrap();
        fs.write_file("/x.yaml", CONFIG_MAP).unwrap();

        match Kustomizer::default().run(&fs, "/").unwrap_err() {
            Error::ResourceNotFound { path, root } => {
                assert_eq!(path, "/../x.yaml");
                assert_eq!(root, "/");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_unsupported_kustomization_field_fails_run() {
        let mut fs = MemoryFS::new();
        fs.write_file(
            "/kustomization.yaml",
            "resources:\n  - cm.yaml\nimages:\n  - name: nginx\n    newTag: \"1.25\"\n",
        )
        .unwrap();
        fs.write_file("/cm.yaml", CONFIG_MAP).unwrap();

        assert!(matches!(
            Kustomizer::default().run(&fs, "/"),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_missing_kustomization() {
        let mut fs = fixture_fs();
        fs.remove_file(fixtures::KUSTOMIZATION_PATH).unwrap();
        assert!(matches!(
            Kustomizer::default().run(&fs, "/"),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_malformed_resource() {
        let mut fs = fixture_fs();
        fs.write_file(fixtures::SERVICE_PATH, "apiVersion: v1\nkind: Service\n")
            .unwrap();
        assert!(matches!(
            Kustomizer::default().run(&fs, "/"),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_nested_kustomization_directory() {
        let mut fs = MemoryFS::new();
        fs.write_file(
            "/base/kustomization.yaml",
            "namePrefix: base-\nresources:\n  - cm.yaml\n",
        )
        .unwrap();
        fs.write_file("/base/cm.yaml", CONFIG_MAP).unwrap();
        fs.write_file(
            "/overlay/kustomization.yaml",
            "namespace: prod\nresources:\n  - ../base\n",
        )
        .unwrap();

        let resources = Kustomizer::default().run(&fs, "/overlay").unwrap();
        let cm = resources.iter().next().unwrap();
        assert_eq!(cm.name(), "base-settings");
        assert_eq!(cm.namespace(), Some("prod"));
        assert_eq!(cm.origin(), Path::new("/base/cm.yaml"));
    }

    #[test]
    fn test_root_only_rejects_files_outside_root() {
        let mut fs = MemoryFS::new();
        fs.write_file("/shared/cm.yaml", CONFIG_MAP).unwrap();
        fs.write_file(
            "/app/kustomization.yaml",
            "resources:\n  - ../shared/cm.yaml\n",
        )
        .unwrap();

        assert!(matches!(
            Kustomizer::default().run(&fs, "/app"),
            Err(Error::LoadRestriction { .. })
        ));

        let options = Options {
            load_restrictions: LoadRestrictions::None,
            ..Default::default()
        };
        let resources = Kustomizer::new(options).run(&fs, "/app").unwrap();
        assert_eq!(resources.len(), 1);
    }

    #[test]
    fn test_cycle_detected() {
        let mut fs = MemoryFS::new();
        fs.write_file("/a/kustomization.yaml", "resources:\n  - ../b\n")
            .unwrap();
        fs.write_file("/b/kustomization.yaml", "resources:\n  - ../a\n")
            .unwrap();

        let err = Kustomizer::default().run(&fs, "/a").unwrap_err();
        assert!(err.to_string().contains("cycle detected"));
    }

    #[test]
    fn test_duplicate_resources_rejected() {
        let mut fs = MemoryFS::new();
        fs.write_file(
            "/kustomization.yaml",
            "resources:\n  - one.yaml\n  - two.yaml\n",
        )
        .unwrap();
        fs.write_file("/one.yaml", CONFIG_MAP).unwrap();
        fs.write_file("/two.yaml", CONFIG_MAP).unwrap();

        assert!(matches!(
            Kustomizer::default().run(&fs, "/"),
            Err(Error::DuplicateResource { .. })
        ));
    }

    #[test]
    fn test_managed_by_label() {
        let options = Options {
            add_managed_by_label: true,
            ..Default::default()
        };
        let resources = Kustomizer::new(options).run(&fixture_fs(), "/").unwrap();
        for resource in resources.iter() {
            let value = resource
                .get(&["metadata", "labels", MANAGED_BY_LABEL])
                .and_then(serde_yaml::Value::as_str)
                .unwrap();
            assert!(value.starts_with("kustomem-"));
        }
    }
}
