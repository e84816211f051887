//! Path manipulation utilities for the in-memory store
//!
//! Every path the store sees goes through [`normalize`], so stored keys are
//! always absolute, `/`-rooted and free of `.` and `..` segments.

use crate::error::{Error, Result};
use glob::{MatchOptions, Pattern};
use std::path::{Component, Path, PathBuf};

/// Glob options used for store queries: `*` and `?` never cross `/`.
pub const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Normalize a path into its absolute, `/`-rooted form.
///
/// Relative paths are anchored at `/`. Fails when the path is empty, holds a
/// NUL byte, has a platform prefix, or climbs above `/` with `..`.
pub fn normalize<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let display = path.display().to_string();

    if path.as_os_str().is_empty() {
        return Err(Error::Filesystem {
            path: display,
            message: "path is empty".to_string(),
        });
    }
    if display.contains('\0') {
        return Err(Error::Filesystem {
            path: display.replace('\0', "\\0"),
            message: "path contains a NUL byte".to_string(),
        });
    }

    let mut normalized = PathBuf::from("/");
    for component in path.components() {
        match component {
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return Err(Error::Filesystem {
                        path: display,
                        message: "path escapes the filesystem root".to_string(),
                    });
                }
            }
            Component::Normal(segment) => normalized.push(segment),
            Component::Prefix(_) => {
                return Err(Error::Filesystem {
                    path: display,
                    message: "path prefixes are not supported".to_string(),
                });
            }
        }
    }

    Ok(normalized)
}

/// Resolve `target` against the directory `base`, then normalize.
///
/// An absolute `target` ignores `base`.
pub fn resolve<P: AsRef<Path>, Q: AsRef<Path>>(base: P, target: Q) -> Result<PathBuf> {
    normalize(base.as_ref().join(target))
}

/// Compile a glob pattern, anchoring it at `/` when it is relative.
pub fn compile_glob(pattern: &str) -> Result<Pattern> {
    let anchored = if pattern.starts_with('/') {
        pattern.to_string()
    } else {
        format!("/{}", pattern)
    };
    Pattern::new(&anchored).map_err(Error::Glob)
}

/// Match an absolute path against a compiled pattern
pub fn glob_match(pattern: &Pattern, path: &Path) -> bool {
    path.to_str()
        .is_some_and(|s| pattern.matches_with(s, MATCH_OPTIONS))
}

/// Whether `path` is `root` itself or lies below it.
pub fn is_within<P: AsRef<Path>, Q: AsRef<Path>>(path: P, root: Q) -> bool {
    path.as_ref().starts_with(root.as_ref())
}
