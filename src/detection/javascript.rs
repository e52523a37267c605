use super::{checkout_step, scan_step, DetectionContext, Detector};
use crate::error::Result;
use crate::workflow::Step;
use tracing::debug;

const NODE_IMAGE: &str = "docker://node:21-alpine3.19";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    /// Lockfiles checked in priority order; npm is the fallback
    const LOCKFILES: [(&'static str, PackageManager); 2] = [
        ("yarn.lock", PackageManager::Yarn),
        ("pnpm-lock.yaml", PackageManager::Pnpm),
    ];

    pub fn detect(ctx: &DetectionContext<'_>) -> Result<Self> {
        for (lockfile, manager) in Self::LOCKFILES {
            if ctx.has_file(lockfile)? {
                return Ok(manager);
            }
        }
        Ok(PackageManager::Npm)
    }

    pub fn command(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }
}

/// Node projects: `package.json` at the source root
pub struct JavaScriptDetector;

impl Detector for JavaScriptDetector {
    fn job_name(&self) -> &'static str {
        "js-build"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Option<Vec<Step>>> {
        if !ctx.has_file("package.json")? {
            return Ok(None);
        }

        let manager = PackageManager::detect(ctx)?;
        debug!(?manager, "Selected package manager");
        let cmd = manager.command();

        Ok(Some(vec![
            checkout_step(),
            Step::new("get dependencies", NODE_IMAGE).with_run(format!("{} install", cmd)),
            Step::new("build", NODE_IMAGE).with_run(format!("{} run build", cmd)),
            Step::new("test", NODE_IMAGE).with_run(format!("{} run test", cmd)),
            scan_step("scan", "LANGUAGE_JS"),
        ]))
    }
}
