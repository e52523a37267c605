use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, generating or persisting a workflow
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A requested generator name has no registry entry
    #[error("can not find generators with name '{name}' (available: {})", available.join(", "))]
    UnknownGenerator { name: String, available: Vec<String> },

    /// A detector tried to add a job that the workflow already defines
    #[error("error adding job: job {job} already exists")]
    JobConflict { job: String },

    /// Discriminator mismatch or a field unknown to the workflow shape
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The persisted document is not valid YAML
    #[error("failed to parse workflow {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A value could not be encoded as YAML
    #[error("failed to serialize workflow: {0}")]
    Encode(#[source] serde_yaml::Error),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl WorkflowError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
