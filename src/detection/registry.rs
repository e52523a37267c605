use super::{CSharpDetector, Detector, GoDetector, JavaDetector, JavaScriptDetector, PythonDetector};
use crate::error::{Result, WorkflowError};
use std::collections::HashMap;
use std::sync::Arc;

/// Maps a public ecosystem name to the detectors that implement it.
///
/// A name usually maps to one detector, but several may share a name; they
/// run in registration order. The registry is built once and only read
/// afterwards.
pub struct DetectorRegistry {
    detectors: HashMap<String, Vec<Arc<dyn Detector>>>,
}

/// Built-in registrations, in registration order
fn default_detectors() -> Vec<(&'static str, Arc<dyn Detector>)> {
    vec![
        ("csharp", Arc::new(CSharpDetector)),
        ("go", Arc::new(GoDetector)),
        ("java", Arc::new(JavaDetector)),
        ("js", Arc::new(JavaScriptDetector)),
        ("python", Arc::new(PythonDetector)),
    ]
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self {
            detectors: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (name, detector) in default_detectors() {
            registry.register(name, detector);
        }
        registry
    }

    /// Append `detector` to the list registered under `name`
    pub fn register(&mut self, name: impl Into<String>, detector: Arc<dyn Detector>) {
        self.detectors.entry(name.into()).or_default().push(detector);
    }

    pub fn get(&self, name: &str) -> Option<&[Arc<dyn Detector>]> {
        self.detectors.get(name).map(|d| d.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.detectors.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.detectors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Flatten `names` into the detectors to run, in request order.
    ///
    /// Every name is checked before anything is returned, so an unknown name
    /// means no detector runs at all.
    pub fn resolve(&self, names: &[String]) -> Result<Vec<Arc<dyn Detector>>> {
        let mut resolved = Vec::new();
        for name in names {
            let detectors = self
                .get(name)
                .ok_or_else(|| WorkflowError::UnknownGenerator {
                    name: name.clone(),
                    available: self.names().into_iter().map(String::from).collect(),
                })?;
            resolved.extend(detectors.iter().cloned());
        }
        Ok(resolved)
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
