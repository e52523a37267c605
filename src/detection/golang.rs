use super::{checkout_step, scan_step, DetectionContext, Detector};
use crate::error::Result;
use crate::workflow::Step;

const GO_IMAGE: &str = "docker://golang:1.22-alpine3.19";

/// Go modules: both `go.mod` and `go.sum` at the source root
pub struct GoDetector;

impl GoDetector {
    const MODULE_FILES: [&'static str; 2] = ["go.mod", "go.sum"];
}

impl Detector for GoDetector {
    fn job_name(&self) -> &'static str {
        "go-build"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Option<Vec<Step>>> {
        for file in Self::MODULE_FILES {
            if !ctx.has_file(file)? {
                return Ok(None);
            }
        }

        Ok(Some(vec![
            checkout_step(),
            Step::new("test", GO_IMAGE).with_run("go test -cover ./..."),
            Step::new("build", GO_IMAGE).with_run("go build ./..."),
            scan_step("scan", "LANGUAGE_GO"),
        ]))
    }
}
