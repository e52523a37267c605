//! Python projects
//!
//! Any `.py` file in the tree marks the project. Optional steps are derived
//! from `requirements.txt`, `setup.py` and the contents of `tests/`.

use super::{checkout_step, scan_step, DetectionContext, Detector};
use crate::error::Result;
use crate::workflow::Step;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

const PYTHON_IMAGE: &str = "docker://python:3.13.0a4-alpine3.19";
const REQUIREMENTS_TXT: &str = "requirements.txt";
const SETUP_PY: &str = "setup.py";
const TESTS_DIR: &str = "tests";

const INSTALL_RUN: &str = "python -m pip install --upgrade pip\npip install -r requirements.txt";
const BUILD_RUN: &str = "python -m pip install build\npython -m build --sdist\npython -m build --wheel";
const INSTALL_PYTEST: &str = "python -m pip install pytest\n";
const TEST_RUN: &str = "python -m unittest";

fn pytest_requirement() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*pytest\s*(\[[^\]]*\])?\s*($|[=<>!~;@])").expect("valid regex")
    })
}

fn pytest_import() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:import|from)\s+pytest\b").expect("valid regex")
    })
}

/// Strip a trailing `#` comment; whole-line comments come back empty
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn requires_pytest(requirements: &str) -> bool {
    requirements
        .lines()
        .map(strip_comment)
        .any(|line| pytest_requirement().is_match(line))
}

fn imports_pytest(source: &str) -> bool {
    source
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .any(|line| pytest_import().is_match(line))
}

fn is_python_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map_or(false, |n| n.ends_with(".py"))
}

fn is_test_file(path: &Path) -> bool {
    is_python_file(path)
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.contains("test"))
}

pub struct PythonDetector;

impl PythonDetector {
    fn contains_source(ctx: &DetectionContext<'_>) -> Result<bool> {
        let files = ctx.fs.walk_files(ctx.src_dir)?;
        Ok(files.iter().any(|p| is_python_file(p)))
    }

    fn install_step(ctx: &DetectionContext<'_>) -> Result<Option<Step>> {
        if !ctx.has_file(REQUIREMENTS_TXT)? {
            return Ok(None);
        }
        Ok(Some(
            Step::new("install packages", PYTHON_IMAGE).with_run(INSTALL_RUN),
        ))
    }

    fn build_step(ctx: &DetectionContext<'_>) -> Result<Option<Step>> {
        if !ctx.has_file(SETUP_PY)? {
            return Ok(None);
        }
        Ok(Some(Step::new("build", PYTHON_IMAGE).with_run(BUILD_RUN)))
    }

    fn test_step(ctx: &DetectionContext<'_>) -> Result<Option<Step>> {
        let pinned = if ctx.has_file(REQUIREMENTS_TXT)? {
            let raw = ctx.fs.read_bytes(&ctx.path(REQUIREMENTS_TXT))?;
            requires_pytest(&String::from_utf8_lossy(&raw))
        } else {
            false
        };

        if !pinned && !Self::has_pytest_tests(ctx)? {
            return Ok(None);
        }

        let prefix = if pinned { "" } else { INSTALL_PYTEST };
        Ok(Some(
            Step::new("test", PYTHON_IMAGE).with_run(format!("{}{}", prefix, TEST_RUN)),
        ))
    }

    /// A file below `tests/` named like a test module that imports pytest
    fn has_pytest_tests(ctx: &DetectionContext<'_>) -> Result<bool> {
        for path in ctx.fs.walk_files(&ctx.path(TESTS_DIR))? {
            if !is_test_file(&path) {
                continue;
            }
            let raw = ctx.fs.read_bytes(&path)?;
            if imports_pytest(&String::from_utf8_lossy(&raw)) {
                debug!(path = %path.display(), "Found pytest test module");
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Detector for PythonDetector {
    fn job_name(&self) -> &'static str {
        "python-build"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Result<Option<Vec<Step>>> {
        if !Self::contains_source(ctx)? {
            return Ok(None);
        }

        let mut steps = vec![checkout_step()];
        steps.extend(Self::install_step(ctx)?);
        steps.extend(Self::build_step(ctx)?);
        steps.extend(Self::test_step(ctx)?);
        steps.push(scan_step("scan", "LANGUAGE_PYTHON"));
        Ok(Some(steps))
    }
}
