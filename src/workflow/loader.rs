//! Reading and persisting workflow files
//!
//! Reading is two-phase: the text is first parsed into a generic YAML tree so
//! the discriminator fields can be checked on their own, then the tree is
//! decoded strictly into [`Workflow`]. Fields the model does not know about are
//! rejected instead of being dropped on the next write.

use super::model::Workflow;
use super::serializer::to_canonical_yaml;
use super::{API_VERSION_FIELD, CURRENT_API_VERSION, KIND_FIELD, WORKFLOW_KIND};
use crate::error::{Result, WorkflowError};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Parse a workflow from its textual form. `origin` is only used in errors.
pub fn from_yaml_str(raw: &str, origin: &Path) -> Result<Workflow> {
    let value: Value = serde_yaml::from_str(raw).map_err(|source| WorkflowError::Malformed {
        path: origin.to_path_buf(),
        source,
    })?;

    let mapping = value.as_mapping().ok_or_else(|| {
        WorkflowError::SchemaMismatch(format!(
            "{}: workflow document must be a mapping",
            origin.display()
        ))
    })?;

    check_discriminator(mapping, API_VERSION_FIELD, CURRENT_API_VERSION)?;
    check_discriminator(mapping, KIND_FIELD, WORKFLOW_KIND)?;

    serde_yaml::from_value(value)
        .map_err(|e| WorkflowError::SchemaMismatch(format!("{}: {}", origin.display(), e)))
}

fn check_discriminator(mapping: &Mapping, field: &str, expected: &str) -> Result<()> {
    match mapping.get(field).and_then(Value::as_str) {
        None => Err(WorkflowError::SchemaMismatch(format!(
            "descriptor does not specify field {:?}",
            field
        ))),
        Some(actual) if actual != expected => Err(WorkflowError::SchemaMismatch(format!(
            "unsupported {} {}, expected {}",
            field, actual, expected
        ))),
        Some(_) => Ok(()),
    }
}

/// Read the whole file and decode it
pub fn load_workflow(path: &Path) -> Result<Workflow> {
    let raw = fs::read_to_string(path).map_err(|e| WorkflowError::io(path, e))?;
    from_yaml_str(&raw, path)
}

/// A workflow ready to be edited, and whether it came from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedWorkflow {
    pub workflow: Workflow,

    /// No file existed at the path; `workflow` is [`Workflow::base`]
    pub created: bool,
}

/// Load an existing workflow, or start from [`Workflow::base`] when the file
/// does not exist yet. Nothing is written here.
pub fn load_or_init(path: &Path) -> Result<LoadedWorkflow> {
    match fs::metadata(path) {
        Ok(_) => {
            debug!(path = %path.display(), "Loading existing workflow");
            Ok(LoadedWorkflow {
                workflow: load_workflow(path)?,
                created: false,
            })
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Workflow not found, starting from base workflow");
            Ok(LoadedWorkflow {
                workflow: Workflow::base(),
                created: true,
            })
        }
        Err(e) => Err(WorkflowError::io(path, e)),
    }
}

/// Write the canonical form of `workflow` to `path` in one go
pub fn save_workflow(path: &Path, workflow: &Workflow) -> Result<()> {
    let text = to_canonical_yaml(workflow)?;
    fs::write(path, text).map_err(|e| WorkflowError::io(path, e))?;
    debug!(path = %path.display(), jobs = workflow.jobs.len(), "Workflow written");
    Ok(())
}
