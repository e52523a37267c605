use super::{DetectionContext, Detector, DetectorRegistry};
use crate::error::Result;
use crate::workflow::Workflow;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Ordered list of detectors applied one after another to a single workflow.
///
/// Execution is strictly sequential: a detector sees every job added by the
/// detectors before it. The first error stops the run and is returned as is;
/// jobs added before the failure stay in the workflow, so callers must not
/// persist a workflow from a failed run.
pub struct DetectorPipeline {
    detectors: Vec<Arc<dyn Detector>>,
}

impl DetectorPipeline {
    pub fn new(detectors: Vec<Arc<dyn Detector>>) -> Self {
        Self { detectors }
    }

    /// Resolve every name up front; an unknown name fails before anything runs
    pub fn from_registry(registry: &DetectorRegistry, names: &[String]) -> Result<Self> {
        let detectors = registry.resolve(names)?;
        debug!(
            generators = ?names,
            detectors = detectors.len(),
            "Pipeline resolved"
        );
        Ok(Self::new(detectors))
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    pub fn run(&self, ctx: &DetectionContext<'_>, workflow: &mut Workflow) -> Result<()> {
        let start = Instant::now();
        info!(
            src = %ctx.src_dir.display(),
            detectors = self.detectors.len(),
            "Running detectors"
        );

        for (index, detector) in self.detectors.iter().enumerate() {
            let job = detector.job_name();
            debug!(index, job, "Detector started");

            let detector_start = Instant::now();
            if let Err(e) = detector.apply(ctx, workflow) {
                warn!(index, job, error = %e, "Detector failed, aborting pipeline");
                return Err(e);
            }

            debug!(index, job, elapsed = ?detector_start.elapsed(), "Detector complete");
        }

        info!(
            jobs = workflow.jobs.len(),
            elapsed = ?start.elapsed(),
            "Pipeline complete"
        );
        Ok(())
    }
}
