//! Contexts flowing through the outgoing send pipeline.

use tokio_util::sync::CancellationToken;
use crate::extensions::ContextBag;
use crate::message::{MessageType, OutgoingLogicalMessage};
use crate::pipeline::routing_state::RoutingState;
use crate::routing::routing_strategy::UnicastRoutingStrategy;
use crate::send_options::DeliveryConstraint;
use std::collections::HashMap;

/// Context of a send before its destinations are known.
#[derive(Debug)]
pub struct OutgoingSendContext {
    message: OutgoingLogicalMessage,
    message_id: String,
    headers: HashMap<String, String>,
    extensions: ContextBag,
    cancellation: CancellationToken,
}

impl OutgoingSendContext {
    pub fn new(
        message: OutgoingLogicalMessage,
        message_id: &str,
        headers: HashMap<String, String>,
        extensions: ContextBag,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            message,
            message_id: message_id.to_string(),
            headers,
            extensions,
            cancellation,
        }
    }

    pub fn message(&self) -> &OutgoingLogicalMessage {
        &self.message
    }

    pub fn message_type(&self) -> &MessageType {
        self.message.message_type()
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.headers
    }

    pub fn extensions(&self) -> &ContextBag {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut ContextBag {
        &mut self.extensions
    }

    /// Routing intent of this send; the default state when the caller chose none.
    pub fn routing_state(&self) -> RoutingState {
        self.extensions
            .get::<RoutingState>()
            .cloned()
            .unwrap_or_default()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub(crate) fn into_logical_message_context(
        self,
        routing_strategies: Vec<UnicastRoutingStrategy>,
    ) -> OutgoingLogicalMessageContext {
        OutgoingLogicalMessageContext {
            message: self.message,
            message_id: self.message_id,
            headers: self.headers,
            routing_strategies,
            extensions: self.extensions,
            cancellation: self.cancellation,
        }
    }
}

/// Context of a send whose destinations were resolved, handed to the dispatch side.
#[derive(Debug)]
pub struct OutgoingLogicalMessageContext {
    message: OutgoingLogicalMessage,
    message_id: String,
    headers: HashMap<String, String>,
    routing_strategies: Vec<UnicastRoutingStrategy>,
    extensions: ContextBag,
    cancellation: CancellationToken,
}

impl OutgoingLogicalMessageContext {
    pub fn message(&self) -> &OutgoingLogicalMessage {
        &self.message
    }

    pub fn message_type(&self) -> &MessageType {
        self.message.message_type()
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn routing_strategies(&self) -> &[UnicastRoutingStrategy] {
        &self.routing_strategies
    }

    pub fn destinations(&self) -> Vec<String> {
        self.routing_strategies
            .iter()
            .map(|strategy| strategy.destination().to_string())
            .collect()
    }

    pub fn delivery_constraint(&self) -> Option<&DeliveryConstraint> {
        self.extensions.get::<DeliveryConstraint>()
    }

    pub fn extensions(&self) -> &ContextBag {
        &self.extensions
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }
}
