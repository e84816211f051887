//! Diagnostic listing of the in-memory store
//!
//! Logs the resource files found by glob and every entry seen by a walk from
//! `/`. Nothing downstream reads the report; it is returned so callers and
//! tests can inspect what was logged.

use crate::error::Result;
use crate::filesystem::MemoryFS;
use log::info;
use std::path::PathBuf;

/// Glob pattern for resource manifests. Store globs are matched against
/// absolute paths.
pub const RESOURCE_GLOB: &str = "/resources/*.yaml";

/// Root the walk starts from.
pub const WALK_ROOT: &str = "/";

/// One entry visited by the walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

/// What the traversal saw
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalReport {
    pub globbed: Vec<PathBuf>,
    pub walked: Vec<WalkEntry>,
}

impl TraversalReport {
    pub fn directories(&self) -> impl Iterator<Item = &WalkEntry> {
        self.walked.iter().filter(|e| e.is_dir)
    }

    pub fn files(&self) -> impl Iterator<Item = &WalkEntry> {
        self.walked.iter().filter(|e| !e.is_dir)
    }
}

/// Glob the resource manifests and walk the store, logging each entry.
pub fn report(fs: &MemoryFS) -> Result<TraversalReport> {
    let globbed = fs.glob(RESOURCE_GLOB)?;
    for path in &globbed {
        info!("glob {}", path.display());
    }

    let mut walked = Vec::new();
    fs.walk(WALK_ROOT, |path, is_dir| {
        if is_dir {
            info!("kfs d {}", path.display());
        } else {
            info!("kfs f {}", path.display());
        }
        walked.push(WalkEntry {
            path: path.to_path_buf(),
            is_dir,
        });
        Ok(())
    })?;

    Ok(TraversalReport { globbed, walked })
}
