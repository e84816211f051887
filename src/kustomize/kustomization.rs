//! Kustomization file schema and loading
//!
//! A directory is a kustomization root when it holds exactly one of the
//! recognized file names. Fields outside the supported set are rejected, so
//! a declared transformation is never silently dropped.

use crate::error::{Error, Result};
use crate::filesystem::MemoryFS;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File names recognized as a kustomization, in lookup order.
pub const KUSTOMIZATION_FILE_NAMES: [&str; 3] =
    ["kustomization.yaml", "kustomization.yml", "Kustomization"];

/// The only `kind` accepted when one is declared.
pub const KUSTOMIZATION_KIND: &str = "Kustomization";

/// Root configuration document of an overlay
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Kustomization {
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    /// Namespace set on every namespace-scoped resource.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Prepended to every resource name.
    #[serde(default)]
    pub name_prefix: Option<String>,
    /// Appended to every resource name.
    #[serde(default)]
    pub name_suffix: Option<String>,
    /// Labels added to resources and, where relevant, their selectors.
    #[serde(default)]
    pub common_labels: BTreeMap<String, String>,
    /// Annotations added to resources and their pod templates.
    #[serde(default)]
    pub common_annotations: BTreeMap<String, String>,
    /// Resource files or nested kustomization directories, relative to the
    /// directory holding this file.
    #[serde(default)]
    pub resources: Vec<String>,
}

/// Parse kustomization text read from `path`.
pub fn parse(path: &Path, content: &str) -> Result<Kustomization> {
    if content.trim().is_empty() {
        return Err(Error::Config {
            path: path.display().to_string(),
            message: "kustomization file is empty".to_string(),
        });
    }

    let kustomization: Kustomization =
        serde_yaml::from_str(content).map_err(|e| Error::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    if let Some(kind) = &kustomization.kind {
        if kind != KUSTOMIZATION_KIND {
            return Err(Error::Config {
                path: path.display().to_string(),
                message: format!("kind must be {}, found {}", KUSTOMIZATION_KIND, kind),
            });
        }
    }

    Ok(kustomization)
}

/// Locate the kustomization file inside `dir`.
pub fn find(fs: &MemoryFS, dir: &Path) -> Result<PathBuf> {
    let found: Vec<PathBuf> = KUSTOMIZATION_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .filter(|candidate| fs.is_file(candidate))
        .collect();

    match found.as_slice() {
        [single] => Ok(single.clone()),
        [] => Err(Error::Config {
            path: dir.display().to_string(),
            message: format!(
                "unable to find one of {} in directory",
                KUSTOMIZATION_FILE_NAMES
                    .iter()
                    .map(|n| format!("'{}'", n))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }),
        _ => Err(Error::Config {
            path: dir.display().to_string(),
            message: "found multiple kustomization files".to_string(),
        }),
    }
}

/// Find and parse the kustomization in `dir`.
pub fn load(fs: &MemoryFS, dir: &Path) -> Result<(PathBuf, Kustomization)> {
    let path = find(fs, dir)?;
    let content = fs.read_file(&path)?.as_str().map_err(|e| Error::Config {
        path: path.display().to_string(),
        message: format!("kustomization is not valid UTF-8: {}", e),
    })?;
    let kustomization = parse(&path, content)?;
    Ok((path, kustomization))
}
