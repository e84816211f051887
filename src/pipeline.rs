//! End-to-end pipeline from embedded fixtures to merged YAML
//!
//! Stages run strictly in order and the first failure is returned:
//! 1. Load fixtures into a fresh in-memory store
//! 2. Report the store contents (glob and walk, logging only)
//! 3. Run the kustomization at `/`
//! 4. Render the merged resources as YAML

use crate::error::Result;
use crate::filesystem::MemoryFS;
use crate::fixtures::FixtureSet;
use crate::kustomize::{Kustomizer, Options, ResMap};
use crate::output;
use crate::traversal;
use log::debug;

/// Directory the kustomization is run from.
pub const KUSTOMIZATION_ROOT: &str = "/";

/// Write every fixture into a new store.
pub fn populate(fixtures: &FixtureSet) -> Result<MemoryFS> {
    let mut fs = MemoryFS::new();
    for (path, content) in fixtures {
        fs.write_file(path, content)?;
        debug!("wrote {} ({} bytes)", path, content.len());
    }
    Ok(fs)
}

/// Run the kustomization at the store root with default options.
pub fn build(fs: &MemoryFS) -> Result<ResMap> {
    Kustomizer::new(Options::default()).run(fs, KUSTOMIZATION_ROOT)
}

/// Execute stages 2-4 against an already populated store.
pub fn execute_with_fs(fs: &MemoryFS) -> Result<String> {
    traversal::report(fs)?;
    let resources = build(fs)?;
    debug!("kustomization produced {} resource(s)", resources.len());
    output::to_yaml(&resources)
}

/// Execute the complete pipeline and return the merged YAML.
pub fn execute(fixtures: &FixtureSet) -> Result<String> {
    let fs = populate(fixtures)?;
    execute_with_fs(&fs)
}
