//! Shared test utilities for integration and E2E tests.
//!
//! Add `mod common;` to a test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fs = StoreFixture::embedded().without(fixtures::SERVICE_PATH).build();
//! ```

use kustomem::filesystem::MemoryFS;
use kustomem::fixtures::{self, FixtureSet};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    pub use super::StoreFixture;
    pub use kustomem::fixtures;
}

/// Extra manifests for building alternative fixture sets.
#[allow(dead_code)]
pub mod manifests {
    pub const CONFIG_MAP: &str = r#"
apiVersion: v1
kind: ConfigMap
metadata:
  name: settings
data:
  mode: demo
"#;

    pub const NAMESPACE: &str = r#"
apiVersion: v1
kind: Namespace
metadata:
  name: my-namespace
"#;

    pub const KUSTOMIZATION_WITH_CONFIG_MAP: &str = r#"
apiVersion: kustomize.config.k8s.io/v1beta1
kind: Kustomization
namespace: my-namespace
resources:
  - resources/deployment.yaml
  - resources/service.yaml
  - config/settings.yaml
"#;
}

/// Builder for a fixture set, starting from the embedded manifests.
pub struct StoreFixture {
    files: FixtureSet,
}

#[allow(dead_code)]
impl StoreFixture {
    /// Start from the embedded fixtures.
    pub fn embedded() -> Self {
        Self {
            files: fixtures::fixtures(),
        }
    }

    /// Start from nothing.
    pub fn empty() -> Self {
        Self {
            files: FixtureSet::new(),
        }
    }

    /// Add or replace a file.
    pub fn with_file(mut self, path: &'static str, content: &'static str) -> Self {
        self.files.insert(path, content);
        self
    }

    /// Drop a file from the set.
    pub fn without(mut self, path: &str) -> Self {
        self.files.remove(path);
        self
    }

    /// The fixture set as built so far.
    pub fn files(&self) -> &FixtureSet {
        &self.files
    }

    /// Write the set into a fresh store.
    pub fn build(&self) -> MemoryFS {
        kustomem::pipeline::populate(&self.files).expect("Failed to populate store")
    }
}
