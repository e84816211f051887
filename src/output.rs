//! # Output Formatting
//!
//! Renders a merged [`ResMap`] as a multi-document YAML stream, one document
//! per resource, in collection order, separated by `---`.
//!
//! ## Usage
//!
//! ```
//! use kustomem::kustomize::ResMap;
//! use kustomem::output;
//!
//! let yaml = output::to_yaml(&ResMap::new()).unwrap();
//! assert!(yaml.is_empty());
//! ```

use crate::error::{Error, Result};
use crate::kustomize::ResMap;
use std::io::{self, Write};

/// Separator written between documents.
pub const DOCUMENT_SEPARATOR: &str = "---\n";

/// Serialize every resource to YAML. The same collection always renders to
/// the same text.
pub fn to_yaml(resources: &ResMap) -> Result<String> {
    let documents = resources
        .iter()
        .map(|resource| {
            serde_yaml::to_string(resource.body()).map_err(|e| Error::Serialization {
                message: format!("{}: {}", resource.id(), e),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(documents.join(DOCUMENT_SEPARATOR))
}

/// Write rendered YAML followed by a newline.
pub fn emit<W: Write>(writer: &mut W, yaml: &str) -> io::Result<()> {
    writeln!(writer, "{}", yaml)?;
    writer.flush()
}
