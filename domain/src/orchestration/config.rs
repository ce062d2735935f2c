//! Collaboration configuration and descriptor registry

use crate::core::error::OrchestrationError;
use crate::core::model::{ModelDescriptor, ModelRole};
use crate::orchestration::topology::{CombinationStrategy, Topology};
use serde::{Deserialize, Serialize};

/// Configuration for one orchestration run (Entity)
///
/// Owns the ordered list of [`ModelDescriptor`]s. The orchestrator only
/// borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollaborationConfig {
    pub topology: Topology,
    pub combination: CombinationStrategy,
    /// Upper bound on dispatched models; `0` means no cap
    pub max_models: usize,
    pub models: Vec<ModelDescriptor>,
}

impl Default for CollaborationConfig {
    fn default() -> Self {
        Self {
            topology: Topology::default(),
            combination: CombinationStrategy::default(),
            max_models: 5,
            models: Vec::new(),
        }
    }
}

impl CollaborationConfig {
    pub fn new(models: Vec<ModelDescriptor>) -> Self {
        Self {
            models,
            ..Default::default()
        }
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_combination(mut self, combination: CombinationStrategy) -> Self {
        self.combination = combination;
        self
    }

    pub fn with_max_models(mut self, max_models: usize) -> Self {
        self.max_models = max_models;
        self
    }

    /// Label identifying the topology + combination pair, e.g. `"parallel+merge"`
    pub fn strategy_label(&self) -> String {
        format!("{}+{}", self.topology, self.combination)
    }

    /// Enabled descriptors in configuration order, capped at `max_models`.
    pub fn enabled_models(&self) -> Vec<&ModelDescriptor> {
        let cap = if self.max_models == 0 {
            usize::MAX
        } else {
            self.max_models
        };
        self.models.iter().filter(|m| m.enabled).take(cap).collect()
    }

    /// Resolve the models a run will dispatch, failing fast on configuration errors.
    ///
    /// Hierarchical runs additionally require exactly one primary among the
    /// enabled models.
    pub fn resolve_models(&self) -> Result<Vec<&ModelDescriptor>, OrchestrationError> {
        let models = self.enabled_models();
        if models.is_empty() {
            return Err(OrchestrationError::NoEnabledModels);
        }

        if self.topology == Topology::Hierarchical {
            match models.iter().filter(|m| m.is_primary()).count() {
                0 => return Err(OrchestrationError::NoPrimaryModel),
                1 => {}
                n => return Err(OrchestrationError::MultiplePrimaryModels(n)),
            }
        }

        Ok(models)
    }

    /// First enabled descriptor with the given role.
    pub fn find_role(&self, role: ModelRole) -> Option<&ModelDescriptor> {
        self.enabled_models().into_iter().find(|m| m.role == role)
    }
}
