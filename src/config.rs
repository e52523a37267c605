//! Settings for a single `generate` run
//!
//! A [`GenerateConfig`] is assembled from command-line arguments and checked
//! with [`GenerateConfig::validate`] before any detector runs or any file is
//! written.
//!
//! # Example
//!
//! ```no_run
//! use workflow_advisor::{GenerateConfig, RealFileSystem};
//!
//! let config = GenerateConfig::new(
//!     ".cloudbees/workflows/workflow.yaml",
//!     ".",
//!     vec!["go".to_string(), "js".to_string()],
//! );
//! config.validate(&RealFileSystem).expect("Invalid configuration");
//! ```

use crate::fs::FileSystem;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No generators specified. Pass at least one with --generator")]
    NoGenerators,

    #[error("Generator names must not be empty")]
    EmptyGeneratorName,

    #[error("Source directory {0:?} does not exist or is not a directory")]
    InvalidSourceDir(PathBuf),

    #[error("Workflow path {0:?} is a directory")]
    WorkflowIsDirectory(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    /// Workflow document to read and rewrite
    pub workflow_path: PathBuf,

    /// Root of the source tree handed to the detectors
    pub src_dir: PathBuf,

    /// Public detector names, in the order they run
    pub generators: Vec<String>,
}

impl GenerateConfig {
    /// Generator names are trimmed; order and duplicates are kept.
    pub fn new(
        workflow_path: impl Into<PathBuf>,
        src_dir: impl Into<PathBuf>,
        generators: Vec<String>,
    ) -> Self {
        Self {
            workflow_path: workflow_path.into(),
            src_dir: src_dir.into(),
            generators: generators
                .into_iter()
                .map(|g| g.trim().to_string())
                .collect(),
        }
    }

    pub fn validate(&self, fs: &dyn FileSystem) -> Result<(), ConfigError> {
        if self.generators.is_empty() {
            return Err(ConfigError::NoGenerators);
        }

        if self.generators.iter().any(|g| g.is_empty()) {
            return Err(ConfigError::EmptyGeneratorName);
        }

        if !fs.is_dir(&self.src_dir) {
            return Err(ConfigError::InvalidSourceDir(self.src_dir.clone()));
        }

        if fs.is_dir(&self.workflow_path) {
            return Err(ConfigError::WorkflowIsDirectory(self.workflow_path.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    fn mock_tree() -> MockFileSystem {
        let mut fs = MockFileSystem::new();
        fs.add_file("src/go.mod", "module x");
        fs.add_dir(".cloudbees/workflows");
        fs
    }

    fn config(generators: &[&str]) -> GenerateConfig {
        GenerateConfig::new(
            "/mock/.cloudbees/workflows/workflow.yaml",
            "/mock/src",
            generators.iter().map(|g| g.to_string()).collect(),
        )
    }

    #[test]
    fn test_new_trims_generator_names() {
        let config = config(&[" go", "js ", "go"]);
        assert_eq!(config.generators, vec!["go", "js", "go"]);
    }

    #[test]
    fn test_validate_ok() {
        assert!(config(&["go"]).validate(&mock_tree()).is_ok());
    }

    #[test]
    fn test_validate_no_generators() {
        let err = config(&[]).validate(&mock_tree()).unwrap_err();
        assert!(matches!(err, ConfigError::NoGenerators));
    }

    #[test]
    fn test_validate_blank_generator() {
        let err = config(&["go", "  "]).validate(&mock_tree()).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyGeneratorName));
    }

    #[test]
    fn test_validate_missing_source_dir() {
        let mut config = config(&["go"]);
        config.src_dir = PathBuf::from("/mock/nope");

        let err = config.validate(&mock_tree()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSourceDir(_)));
    }

    #[test]
    fn test_validate_source_is_file() {
        let mut config = config(&["go"]);
        config.src_dir = PathBuf::from("/mock/src/go.mod");

        let err = config.validate(&mock_tree()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSourceDir(_)));
    }

    #[test]
    fn test_validate_workflow_is_directory() {
        let mut config = config(&["go"]);
        config.workflow_path = PathBuf::from("/mock/.cloudbees/workflows");

        let err = config.validate(&mock_tree()).unwrap_err();
        assert!(matches!(err, ConfigError::WorkflowIsDirectory(_)));
        assert!(err.to_string().contains("is a directory"));
    }
}
