//! Table-driven unicast destination resolution.

use crate::control_plane::endpoint_instances::EndpointInstances;
use crate::control_plane::route_table::{UnicastRoute, UnicastRoutingTable};
use crate::control_plane::transport_addressing::TransportAddressing;
use crate::error::RoutingError;
use crate::extensions::ContextBag;
use crate::message::MessageType;
use crate::observability::events;
use crate::routing::distribution::DistributionStrategy;
use crate::routing::routing_strategy::{UnicastRoutingStrategy, UnicastRoutingTarget};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

const COMPONENT: &str = "unicast_router";

/// Resolves the physical destinations of a message that has no caller-chosen destination.
///
/// An empty result is a valid answer; callers that need a destination decide what an
/// empty result means for them.
#[async_trait]
pub trait UnicastRouter: Send + Sync {
    async fn route(
        &self,
        message_type: &MessageType,
        distribution_strategy: &dyn DistributionStrategy,
        context: &ContextBag,
    ) -> Result<Vec<UnicastRoutingStrategy>, RoutingError>;
}

/// [`UnicastRouter`] backed by the routing table and the endpoint instances registry.
pub struct TableUnicastRouter {
    routing_table: Arc<UnicastRoutingTable>,
    endpoint_instances: Arc<EndpointInstances>,
    transport_addressing: Arc<dyn TransportAddressing>,
}

impl TableUnicastRouter {
    pub fn new(
        routing_table: Arc<UnicastRoutingTable>,
        endpoint_instances: Arc<EndpointInstances>,
        transport_addressing: Arc<dyn TransportAddressing>,
    ) -> Self {
        Self {
            routing_table,
            endpoint_instances,
            transport_addressing,
        }
    }

    fn target_address(&self, target: &UnicastRoutingTarget) -> String {
        match target {
            UnicastRoutingTarget::Instance(instance) => {
                self.transport_addressing.to_transport_address(instance)
            }
            UnicastRoutingTarget::TransportAddress(address) => address.clone(),
        }
    }
}

#[async_trait]
impl UnicastRouter for TableUnicastRouter {
    async fn route(
        &self,
        message_type: &MessageType,
        distribution_strategy: &dyn DistributionStrategy,
        _context: &ContextBag,
    ) -> Result<Vec<UnicastRoutingStrategy>, RoutingError> {
        let Some(route) = self.routing_table.route_for(message_type) else {
            debug!(
                event = events::ROUTE_LOOKUP_MISS,
                component = COMPONENT,
                msg_type = %message_type,
                "no route registered for message type"
            );
            return Ok(Vec::new());
        };

        let selected = match route {
            UnicastRoute::PhysicalAddress(address) => {
                vec![UnicastRoutingTarget::TransportAddress(address)]
            }
            UnicastRoute::Instance(instance) => vec![UnicastRoutingTarget::Instance(instance)],
            UnicastRoute::Endpoint(endpoint) => {
                let candidates: Vec<UnicastRoutingTarget> = self
                    .endpoint_instances
                    .find_all(&endpoint)
                    .into_iter()
                    .map(UnicastRoutingTarget::Instance)
                    .collect();
                distribution_strategy.select_destination(&candidates)?
            }
        };

        Ok(selected
            .iter()
            .map(|target| UnicastRoutingStrategy::new(&self.target_address(target)))
            .collect())
    }
}
