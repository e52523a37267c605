//! workflow-advisor - CI workflow generation from source tree inspection
//!
//! Ecosystem detectors inspect a source tree and each contributes at most one
//! build job to a shared workflow document, which is then written back in a
//! deterministic YAML form.
//!
//! # Core Concepts
//!
//! - **Workflow**: the persisted document (`apiVersion`, `kind`, `name`, triggers
//!   and jobs). See [`workflow`].
//! - **Detector**: inspects the tree for one ecosystem and owns one job name.
//!   See [`detection::Detector`].
//! - **Registry**: maps public generator names (`go`, `js`, ...) to detectors.
//! - **Pipeline**: runs resolved detectors in order against one workflow,
//!   stopping at the first error.
//!
//! # Example Usage
//!
//! ```no_run
//! use workflow_advisor::{generate, DetectorRegistry, GenerateConfig, RealFileSystem};
//!
//! let config = GenerateConfig::new(
//!     "workflow.yaml",
//!     "./my-service",
//!     vec!["go".to_string(), "python".to_string()],
//! );
//! let outcome = generate(&config, &DetectorRegistry::with_defaults(), &RealFileSystem)?;
//! println!("added: {:?}", outcome.added_jobs);
//! # Ok::<(), workflow_advisor::WorkflowError>(())
//! ```

pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod fs;
pub mod generate;
pub mod util;
pub mod workflow;

pub use config::{ConfigError, GenerateConfig};
pub use detection::{DetectionContext, Detector, DetectorPipeline, DetectorRegistry};
pub use error::{Result, WorkflowError};
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use generate::{generate, GenerateOutcome};
pub use util::{init_logging, LoggingConfig};
pub use workflow::{to_canonical_yaml, Job, Step, Workflow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "workflow-advisor");
    }
}
