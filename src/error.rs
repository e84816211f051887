//! # Error Handling
//!
//! This module defines the single error type shared by every stage of the
//! `kustomem` pipeline. It uses the `thiserror` library to derive display
//! messages that carry the failing operation and the path involved.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of every failure the pipeline can report. Each
//!   variant maps to one failure class:
//!   - store writes and lookups (`Filesystem`)
//!   - a missing or malformed kustomization (`Config`)
//!   - a resource path that is not in the store (`ResourceNotFound`)
//!   - a malformed resource document (`Parse`)
//!   - YAML encoding of the merged output (`Serialization`)
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Every error is fatal. The binary reports the message and exits non-zero
//! on the first one it sees.

use thiserror::Error;

/// Main error type for kustomem operations
#[derive(Error, Debug)]
pub enum Error {
    /// The in-memory store rejected a path or could not find an entry.
    #[error("Filesystem operation error: {path}: {message}")]
    Filesystem { path: String, message: String },

    /// The kustomization file is missing, ambiguous or malformed.
    #[error("Kustomization error in {path}: {message}")]
    Config { path: String, message: String },

    /// A path listed under `resources` does not exist in the store.
    #[error("Resource not found: {path} (listed by kustomization in {root})")]
    ResourceNotFound { path: String, root: String },

    /// A resource document does not have the structure of a Kubernetes object.
    #[error("Resource parsing error in {path}: {message}")]
    Parse { path: String, message: String },

    /// Two resources resolved to the same identity.
    #[error("May not add resource with an already registered id: {id}")]
    DuplicateResource { id: String },

    /// A resource path escapes the directory of the kustomization listing it.
    #[error("Security restriction: {path} is not in or below {root}")]
    LoadRestriction { path: String, root: String },

    /// The merged collection could not be encoded as YAML.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
