//! Loading an [`AssemblyGraph`] from a JSON metadata dump.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::graph::{AssemblyGraph, RawAssembly};

#[derive(Debug)]
pub enum ReadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Invalid JSON or a document that does not match the metadata shape
    /// (including malformed type signatures).
    Parse(serde_json::Error),
    /// Two types share one full name.
    DuplicateType { name: String },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            ReadError::Parse(err) => write!(f, "malformed assembly metadata: {err}"),
            ReadError::DuplicateType { name } => {
                write!(f, "type '{name}' is defined more than once")
            }
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Io { source, .. } => Some(source),
            ReadError::Parse(err) => Some(err),
            ReadError::DuplicateType { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ReadError {
    fn from(err: serde_json::Error) -> Self {
        ReadError::Parse(err)
    }
}

impl AssemblyGraph {
    pub fn from_json_str(text: &str) -> Result<Self, ReadError> {
        let raw: RawAssembly = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ReadError> {
        let raw: RawAssembly = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }
}

/// Read and index the assembly dump at `path`.
pub fn read_assembly(path: &Path) -> Result<AssemblyGraph, ReadError> {
    let text = std::fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let graph = AssemblyGraph::from_json_str(&text)?;
    tracing::debug!(
        path = %path.display(),
        types = graph.types().len(),
        "read assembly metadata"
    );
    Ok(graph)
}
