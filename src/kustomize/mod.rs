//! # Kustomization Engine
//!
//! Builds a merged resource collection from a kustomization stored in a
//! [`MemoryFS`](crate::filesystem::MemoryFS).
//!
//! ## Submodules
//!
//! - **`kustomization`**: the root configuration document and how it is
//!   located inside a directory.
//! - **`resource`**: Kubernetes objects as loaded from resource files, their
//!   identities, and the ordered collection they are merged into.
//! - **`transform`**: namespace, name and metadata transformers applied to a
//!   collection.
//! - **`kustomizer`**: resolves the resource list, runs the transformers and
//!   orders the result.
//!
//! ## Example
//!
//! ```
//! use kustomem::filesystem::MemoryFS;
//! use kustomem::kustomize::{Kustomizer, Options};
//!
//! let mut fs = MemoryFS::new();
//! fs.write_file("kustomization.yaml", "namespace: demo\nresources:\n  - cm.yaml\n").unwrap();
//! fs.write_file("cm.yaml", "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: settings\n").unwrap();
//!
//! let resources = Kustomizer::new(Options::default()).run(&fs, "/").unwrap();
//! assert_eq!(resources.len(), 1);
//! assert_eq!(resources.iter().next().unwrap().namespace(), Some("demo"));
//! ```

pub mod kustomization;
pub mod kustomizer;
pub mod resource;
pub mod transform;

pub use kustomization::Kustomization;
pub use kustomizer::{Kustomizer, LoadRestrictions, Options, Reorder};
pub use resource::{ResId, ResMap, Resource};
