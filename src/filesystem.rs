//! In-memory filesystem the kustomization is loaded from
//!
//! Files are keyed by their normalized absolute path. Directories are never
//! stored; they exist whenever some file lives below them, and `/` always
//! exists.

use crate::error::{Error, Result};
use crate::path;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Represents a file with content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// File content as bytes
    pub content: Vec<u8>,
}

impl File {
    /// Create a new file with content
    pub fn new(content: Vec<u8>) -> Self {
        Self { content }
    }

    /// Borrow the content as UTF-8 text
    pub fn as_str(&self) -> std::result::Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.content)
    }
}

/// In-memory filesystem rooted at `/`
#[derive(Debug, Clone, Default)]
pub struct MemoryFS {
    /// Files stored as absolute path -> content, ordered by path
    files: BTreeMap<PathBuf, File>,
}

impl MemoryFS {
    /// Create a new empty filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `content` at `path`, creating parent directories implicitly.
    ///
    /// Overwrites an existing file. Fails when the path cannot be normalized,
    /// names an existing directory, or passes through an existing file.
    pub fn write_file<P, C>(&mut self, path: P, content: C) -> Result<()>
    where
        P: AsRef<Path>,
        C: AsRef<[u8]>,
    {
        let path = path::normalize(path)?;

        if self.is_dir(&path) {
            return Err(Error::Filesystem {
                path: path.display().to_string(),
                message: "is a directory".to_string(),
            });
        }
        let file_ancestor = path
            .ancestors()
            .skip(1)
            .find(|a| self.files.contains_key(*a));
        if let Some(file_ancestor) = file_ancestor {
            return Err(Error::Filesystem {
                path: path.display().to_string(),
                message: format!("{} is not a directory", file_ancestor.display()),
            });
        }

        self.files.insert(path, File::new(content.as_ref().to_vec()));
        Ok(())
    }

    /// Read a file, failing if it does not exist
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<&File> {
        let path = path::normalize(path)?;
        self.files.get(&path).ok_or_else(|| Error::Filesystem {
            path: path.display().to_string(),
            message: "no such file".to_string(),
        })
    }

    /// Get a file by path
    pub fn get_file<P: AsRef<Path>>(&self, path: P) -> Option<&File> {
        let path = path::normalize(path).ok()?;
        self.files.get(&path)
    }

    /// Remove a file
    pub fn remove_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Option<File>> {
        let path = path::normalize(path)?;
        Ok(self.files.remove(&path))
    }

    /// Check if a file exists
    pub fn is_file<P: AsRef<Path>>(&self, path: P) -> bool {
        self.get_file(path).is_some()
    }

    /// Check if a directory exists, either `/` or the parent of some file
    pub fn is_dir<P: AsRef<Path>>(&self, path: P) -> bool {
        let Ok(path) = path::normalize(path) else {
            return false;
        };
        path == Path::new("/")
            || self
                .files
                .keys()
                .any(|file| file != &path && file.starts_with(&path))
    }

    /// List stored files whose absolute path matches a glob pattern.
    ///
    /// Relative patterns are anchored at `/`. Results are sorted; no match is
    /// an empty list, not an error.
    pub fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let pattern = path::compile_glob(pattern)?;

        Ok(self
            .files
            .keys()
            .filter(|file| path::glob_match(&pattern, file))
            .cloned()
            .collect())
    }

    /// Depth-first walk from `root`, calling `visitor(path, is_dir)` once per
    /// entry.
    ///
    /// `root` is visited first, then its children in lexicographic order by
    /// path segment. The first visitor error stops the walk and is returned.
    pub fn walk<P, F>(&self, root: P, mut visitor: F) -> Result<()>
    where
        P: AsRef<Path>,
        F: FnMut(&Path, bool) -> Result<()>,
    {
        let root = path::normalize(root)?;

        if self.files.contains_key(&root) {
            return visitor(&root, false);
        }
        if !self.is_dir(&root) {
            return Err(Error::Filesystem {
                path: root.display().to_string(),
                message: "no such file or directory".to_string(),
            });
        }

        // Path ordering is component-wise, so sorting every entry yields a
        // pre-order traversal with siblings in lexicographic order.
        let mut entries: BTreeMap<PathBuf, bool> = BTreeMap::new();
        entries.insert(root.clone(), true);
        for file in self.files.keys().filter(|f| f.starts_with(&root)) {
            for dir in file.ancestors().skip(1) {
                if !dir.starts_with(&root) {
                    break;
                }
                entries.insert(dir.to_path_buf(), true);
            }
            entries.insert(file.clone(), false);
        }

        for (path, is_dir) in &entries {
            visitor(path, *is_dir)?;
        }
        Ok(())
    }

    /// Get the number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if filesystem is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
