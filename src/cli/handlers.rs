use super::commands::GenerateArgs;
use crate::config::GenerateConfig;
use crate::detection::DetectorRegistry;
use crate::fs::RealFileSystem;
use crate::generate::generate;
use anyhow::Context;
use tracing::{debug, error, info};

/// Run `generate` and map the outcome to a process exit code
pub fn handle_generate(args: &GenerateArgs) -> i32 {
    let config = GenerateConfig::new(&args.workflow, &args.src, args.generators.clone());
    debug!(?config, "Generate configuration");

    let registry = DetectorRegistry::with_defaults();
    let result = generate(&config, &registry, &RealFileSystem)
        .with_context(|| format!("failed to generate workflow {}", config.workflow_path.display()));

    match result {
        Ok(outcome) => {
            if outcome.added_jobs.is_empty() {
                info!("No jobs added");
            } else {
                info!(jobs = ?outcome.added_jobs, "Added jobs");
            }
            0
        }
        Err(e) => {
            error!(error = %e, "Generation failed");
            eprintln!("Error: {:#}", e);
            1
        }
    }
}
