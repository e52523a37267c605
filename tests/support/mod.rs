#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use workflow_advisor::{generate, DetectorRegistry, GenerateConfig, GenerateOutcome, RealFileSystem};

/// A throwaway source tree next to the workflow file it feeds
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("src")).expect("Failed to create src dir");
        Self { dir }
    }

    pub fn src(&self) -> PathBuf {
        self.dir.path().join("src")
    }

    pub fn workflow_path(&self) -> PathBuf {
        self.dir.path().join("workflow.yaml")
    }

    /// Create `relative` below the source root, with parents
    pub fn file(&self, relative: &str, content: &str) -> &Self {
        self.bytes(relative, content.as_bytes())
    }

    /// Like [`Workspace::file`], for contents that are not valid UTF-8
    pub fn bytes(&self, relative: &str, content: &[u8]) -> &Self {
        let path = self.src().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write source file");
        self
    }

    pub fn write_workflow(&self, content: &str) {
        fs::write(self.workflow_path(), content).expect("Failed to write workflow");
    }

    pub fn read_workflow(&self) -> String {
        fs::read_to_string(self.workflow_path()).expect("Failed to read workflow")
    }

    pub fn config(&self, generators: &[&str]) -> GenerateConfig {
        GenerateConfig::new(
            self.workflow_path(),
            self.src(),
            generators.iter().map(|g| g.to_string()).collect(),
        )
    }

    pub fn generate(&self, generators: &[&str]) -> workflow_advisor::Result<GenerateOutcome> {
        generate(
            &self.config(generators),
            &DetectorRegistry::with_defaults(),
            &RealFileSystem,
        )
    }
}

pub fn golden_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("golden")
        .join(name)
}

pub fn golden(name: &str) -> String {
    fs::read_to_string(golden_path(name))
        .unwrap_or_else(|e| panic!("Failed to read golden file {}: {}", name, e))
}

pub fn sdk_project(framework: &str) -> String {
    format!(
        "<Project Sdk=\"Microsoft.NET.Sdk\">\n  <PropertyGroup>\n    <TargetFramework>{}</TargetFramework>\n  </PropertyGroup>\n</Project>\n",
        framework
    )
}
