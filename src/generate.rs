//! The `generate` operation: resolve, load, detect, save

use crate::config::GenerateConfig;
use crate::detection::{DetectionContext, DetectorPipeline, DetectorRegistry};
use crate::error::Result;
use crate::fs::FileSystem;
use crate::workflow::{load_or_init, save_workflow, LoadedWorkflow};
use std::time::Instant;
use tracing::info;

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOutcome {
    /// Jobs present after the run that were not there before, sorted
    pub added_jobs: Vec<String>,

    /// Whether the workflow file did not exist before the run
    pub created: bool,
}

/// Apply the configured detectors to the workflow at `config.workflow_path`.
///
/// `fs` is the view of the source tree that detectors and config checks
/// inspect. The workflow document itself is always read and written on
/// disk, and `created` is taken from that same load.
///
/// Nothing is written unless every detector succeeds; on success the whole
/// workflow is rewritten in canonical form, even when no job was added. All
/// generator names are resolved before the workflow file is touched.
pub fn generate(
    config: &GenerateConfig,
    registry: &DetectorRegistry,
    fs: &dyn FileSystem,
) -> Result<GenerateOutcome> {
    let start = Instant::now();
    config.validate(fs)?;

    let pipeline = DetectorPipeline::from_registry(registry, &config.generators)?;

    let LoadedWorkflow {
        mut workflow,
        created,
    } = load_or_init(&config.workflow_path)?;
    let before: Vec<String> = workflow.jobs.keys().cloned().collect();

    let ctx = DetectionContext::new(&config.src_dir, fs);
    pipeline.run(&ctx, &mut workflow)?;

    save_workflow(&config.workflow_path, &workflow)?;

    let added_jobs: Vec<String> = workflow
        .jobs
        .keys()
        .filter(|name| !before.contains(name))
        .cloned()
        .collect();

    info!(
        workflow = %config.workflow_path.display(),
        added = ?added_jobs,
        created,
        elapsed = ?start.elapsed(),
        "Workflow generated"
    );

    Ok(GenerateOutcome {
        added_jobs,
        created,
    })
}
