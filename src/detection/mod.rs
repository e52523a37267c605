//! Ecosystem detectors and the machinery that runs them
//!
//! A [`Detector`] looks at a source tree and, when it recognises its
//! ecosystem, contributes exactly one job to the workflow. Detectors are
//! registered by public name in a [`DetectorRegistry`] and executed in request
//! order by a [`DetectorPipeline`].

pub mod csharp;
pub mod golang;
pub mod java;
pub mod javascript;
pub mod pipeline;
pub mod python;
pub mod registry;

pub use csharp::CSharpDetector;
pub use golang::GoDetector;
pub use java::JavaDetector;
pub use javascript::JavaScriptDetector;
pub use pipeline::DetectorPipeline;
pub use python::PythonDetector;
pub use registry::DetectorRegistry;

use crate::error::Result;
use crate::fs::FileSystem;
use crate::workflow::{Job, Step, Workflow};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CHECKOUT_ACTION: &str = "cloudbees-io/checkout@v1";
pub const SCAN_ACTION: &str = "cloudbees-io/sonarqube-bundled-sast-scan-code@v2";

/// What a detector may look at
pub struct DetectionContext<'a> {
    pub src_dir: &'a Path,
    pub fs: &'a dyn FileSystem,
}

impl<'a> DetectionContext<'a> {
    pub fn new(src_dir: &'a Path, fs: &'a dyn FileSystem) -> Self {
        Self { src_dir, fs }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.fs.join(self.src_dir, relative)
    }

    /// Whether `relative` exists below the source root
    pub fn has_file(&self, relative: &str) -> Result<bool> {
        self.fs.exists(&self.path(relative))
    }

    /// Path relative to the source root with `/` separators, so generated
    /// commands do not depend on where the tree was checked out
    pub fn display_relative(&self, path: &Path) -> String {
        let relative = path.strip_prefix(self.src_dir).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// One ecosystem's contribution to a workflow.
///
/// Implementations only read the source tree. `detect` returns `None` when the
/// ecosystem is absent; otherwise the steps of the job named by `job_name`.
pub trait Detector: Send + Sync {
    /// Job this detector owns. Fixed per detector, never taken from input.
    fn job_name(&self) -> &'static str;

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Option<Vec<Step>>>;

    /// Add this detector's job to `workflow` if the ecosystem is present.
    ///
    /// Fails with `JobConflict` when the workflow already has the job; the
    /// workflow is not modified in that case or when nothing is detected.
    fn apply(&self, ctx: &DetectionContext<'_>, workflow: &mut Workflow) -> Result<()> {
        let steps = match self.detect(ctx)? {
            Some(steps) => steps,
            None => {
                debug!(job = self.job_name(), "Ecosystem not detected");
                return Ok(());
            }
        };

        workflow.add_job(self.job_name(), Job::new(steps))?;
        info!(job = self.job_name(), "Added job");
        Ok(())
    }
}

pub fn checkout_step() -> Step {
    Step::new("checkout", CHECKOUT_ACTION)
}

pub fn scan_step(name: &str, language: &str) -> Step {
    Step::new(name, SCAN_ACTION).with_param("language", language)
}
