//! Priority functions and the registry that serves them

use extender_core::{ExtenderError, ExtenderResult, HostPriorityList, Node, Pod};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::image_locality::ImageLocalityPriority;

/// A named scoring function the scheduler can call.
///
/// The name is part of the route path and must match the verb configured in the
/// scheduler policy.
pub trait PriorityFunction: Send + Sync {
    /// Name of the priority
    fn name(&self) -> &str;

    /// Score every node for the pod, one entry per node
    fn prioritize(&self, pod: &Pod, nodes: &[Node]) -> ExtenderResult<HostPriorityList>;
}

/// Fixed table of priority functions, keyed by name
#[derive(Default, Clone)]
pub struct PriorityRegistry {
    priorities: BTreeMap<String, Arc<dyn PriorityFunction>>,
}

impl PriorityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in priority
    pub fn with_defaults() -> ExtenderResult<Self> {
        let mut registry = Self::new();
        registry.register(Arc::new(ImageLocalityPriority))?;
        Ok(registry)
    }

    /// Add a priority, rejecting duplicate names
    pub fn register(&mut self, priority: Arc<dyn PriorityFunction>) -> ExtenderResult<()> {
        let name = priority.name().to_string();
        if self.priorities.contains_key(&name) {
            return Err(ExtenderError::DuplicatePriority(name));
        }
        info!(priority = %name, "Registered priority");
        self.priorities.insert(name, priority);
        Ok(())
    }

    /// Look up a priority by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn PriorityFunction>> {
        self.priorities.get(name).cloned()
    }

    /// Iterate priorities in name order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn PriorityFunction>> {
        self.priorities.values()
    }

    pub fn len(&self) -> usize {
        self.priorities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.priorities.is_empty()
    }
}

impl std::fmt::Debug for PriorityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.priorities.keys()).finish()
    }
}
