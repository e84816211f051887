//! # Kustomem Library
//!
//! This library loads a small set of Kubernetes manifests into an in-memory
//! filesystem, runs a kustomization over them and renders the merged result
//! as YAML. It backs the `kustomem` binary but each stage is usable on its
//! own.
//!
//! ## Quick Example
//!
//! ```
//! use kustomem::{fixtures, pipeline};
//!
//! let yaml = pipeline::execute(&fixtures::fixtures()).unwrap();
//! assert!(yaml.contains("namespace: my-namespace"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Fixtures (`fixtures`)**: the embedded kustomization and resource
//!   manifests.
//! - **In-Memory Filesystem (`filesystem`)**: a `/`-rooted virtual store with
//!   write, glob and walk.
//! - **Traversal (`traversal`)**: logs what the store holds; diagnostic only.
//! - **Kustomization Engine (`kustomize`)**: resolves the resource list,
//!   applies namespace, name and metadata transformers, and orders the
//!   result.
//! - **Output (`output`)**: multi-document YAML rendering.
//! - **Pipeline (`pipeline`)**: runs the stages above in order and stops at
//!   the first error.

pub mod error;
pub mod filesystem;
pub mod fixtures;
pub mod kustomize;
pub mod output;
pub mod path;
pub mod pipeline;
pub mod traversal;

#[cfg(test)]
mod path_proptest;
