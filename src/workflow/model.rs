//! In-memory workflow document

use super::{CURRENT_API_VERSION, DEFAULT_WORKFLOW_NAME, WORKFLOW_KIND};
use crate::error::{Result, WorkflowError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root of a workflow document.
///
/// Job order carries no meaning in memory; the serializer always writes jobs
/// sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Workflow {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    #[serde(rename = "on", default)]
    pub triggers: Triggers,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub jobs: BTreeMap<String, Job>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Triggers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push: Option<BranchTrigger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<BranchTrigger>,
}

impl Triggers {
    pub fn is_empty(&self) -> bool {
        self.push.is_none() && self.pull_request.is_none()
    }
}

/// Branch glob patterns a trigger reacts to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BranchTrigger {
    #[serde(default)]
    pub branches: Vec<String>,
}

/// A named job is an ordered list of steps. Steps run in the order they were
/// appended and are never reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Job {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// A job without steps is treated as absent when written
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    pub uses: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub with: BTreeMap<String, String>,
}

impl Step {
    pub fn new(name: impl Into<String>, uses: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            uses: uses.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn with_run(mut self, run: impl Into<String>) -> Self {
        self.run = Some(run.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with.insert(key.into(), value.into());
        self
    }
}

impl Workflow {
    /// Fresh document with only triggers populated: pushes on every branch
    pub fn base() -> Self {
        Self {
            api_version: CURRENT_API_VERSION.to_string(),
            kind: WORKFLOW_KIND.to_string(),
            name: DEFAULT_WORKFLOW_NAME.to_string(),
            triggers: Triggers {
                push: Some(BranchTrigger {
                    branches: vec!["**".to_string()],
                }),
                pull_request: None,
            },
            jobs: BTreeMap::new(),
        }
    }

    pub fn has_job(&self, name: &str) -> bool {
        self.jobs.contains_key(name)
    }

    /// Insert a job under a name not yet present.
    ///
    /// An existing entry is a conflict even when it has no steps; the document
    /// is left as it was.
    pub fn add_job(&mut self, name: &str, job: Job) -> Result<()> {
        if self.has_job(name) {
            return Err(WorkflowError::JobConflict {
                job: name.to_string(),
            });
        }
        self.jobs.insert(name.to_string(), job);
        Ok(())
    }

    /// Jobs that will appear in serialized output, in output order
    pub fn visible_jobs(&self) -> impl Iterator<Item = (&String, &Job)> {
        self.jobs.iter().filter(|(_, job)| !job.is_empty())
    }
}
