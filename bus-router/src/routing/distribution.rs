//! Selection among the live instances of one destination endpoint.

use crate::error::RoutingError;
use crate::message::MessageType;
use crate::observability::events;
use crate::routing::routing_strategy::UnicastRoutingTarget;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

const COMPONENT: &str = "distribution";

/// Chooses which of the candidate instances of an endpoint receive a message.
pub trait DistributionStrategy: Send + Sync {
    fn select_destination(
        &self,
        candidates: &[UnicastRoutingTarget],
    ) -> Result<Vec<UnicastRoutingTarget>, RoutingError>;
}

/// Default strategy: one candidate per message, cycling through the candidate list.
///
/// Each endpoint keeps its own cursor, keyed by the endpoint of the candidates, so sends
/// to one endpoint never shift the rotation of another.
#[derive(Debug, Default)]
pub struct RoundRobinDistributionStrategy {
    cursors: Mutex<HashMap<String, usize>>,
}

impl RoundRobinDistributionStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DistributionStrategy for RoundRobinDistributionStrategy {
    fn select_destination(
        &self,
        candidates: &[UnicastRoutingTarget],
    ) -> Result<Vec<UnicastRoutingTarget>, RoutingError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let endpoint = candidates[0].endpoint();
        let mut cursors = self
            .cursors
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let cursor = cursors.entry(endpoint.to_string()).or_insert(0);
        let position = *cursor % candidates.len();
        *cursor = cursor.wrapping_add(1);

        Ok(vec![candidates[position].clone()])
    }
}

/// Picks exactly the instance whose discriminator matches the requested one.
#[derive(Clone, Debug)]
pub struct SpecificInstanceDistributionStrategy {
    specific_instance: String,
}

impl SpecificInstanceDistributionStrategy {
    pub fn new(specific_instance: &str) -> Self {
        Self {
            specific_instance: specific_instance.to_string(),
        }
    }
}

impl DistributionStrategy for SpecificInstanceDistributionStrategy {
    fn select_destination(
        &self,
        candidates: &[UnicastRoutingTarget],
    ) -> Result<Vec<UnicastRoutingTarget>, RoutingError> {
        match candidates
            .iter()
            .find(|candidate| candidate.discriminator() == Some(self.specific_instance.as_str()))
        {
            Some(target) => Ok(vec![target.clone()]),
            None => {
                warn!(
                    event = events::SPECIFIC_INSTANCE_MISSING,
                    component = COMPONENT,
                    instance = self.specific_instance.as_str(),
                    candidates = candidates.len(),
                    "requested instance is not among the known candidates"
                );
                Err(RoutingError::UnknownSpecificInstance {
                    instance: self.specific_instance.clone(),
                })
            }
        }
    }
}

/// Distribution strategy per message type, with a total default.
#[derive(Clone)]
pub struct DistributionPolicy {
    overrides: HashMap<MessageType, Arc<dyn DistributionStrategy>>,
    default_strategy: Arc<dyn DistributionStrategy>,
}

impl DistributionPolicy {
    pub fn new() -> Self {
        Self::with_default(Arc::new(RoundRobinDistributionStrategy::new()))
    }

    pub fn with_default(default_strategy: Arc<dyn DistributionStrategy>) -> Self {
        Self {
            overrides: HashMap::new(),
            default_strategy,
        }
    }

    pub fn set_distribution_strategy(
        &mut self,
        message_type: MessageType,
        strategy: Arc<dyn DistributionStrategy>,
    ) {
        self.overrides.insert(message_type, strategy);
    }

    pub fn distribution_strategy(&self, message_type: &MessageType) -> Arc<dyn DistributionStrategy> {
        self.overrides
            .get(message_type)
            .cloned()
            .unwrap_or_else(|| self.default_strategy.clone())
    }
}

impl Default for DistributionPolicy {
    fn default() -> Self {
        Self::new()
    }
}
