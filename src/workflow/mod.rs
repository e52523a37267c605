//! Workflow document model and its canonical YAML form

pub mod loader;
pub mod model;
pub mod serializer;

pub use loader::{from_yaml_str, load_or_init, load_workflow, save_workflow, LoadedWorkflow};
pub use model::{BranchTrigger, Job, Step, Triggers, Workflow};
pub use serializer::to_canonical_yaml;

pub const API_VERSION_FIELD: &str = "apiVersion";
pub const KIND_FIELD: &str = "kind";
pub const CURRENT_API_VERSION: &str = "automation.cloudbees.io/v1alpha1";
pub const WORKFLOW_KIND: &str = "workflow";
pub const DEFAULT_WORKFLOW_NAME: &str = "build";
