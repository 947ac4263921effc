//! Outgoing send pipeline.
//!
//! A send enters as an [`OutgoingSendContext`](crate::OutgoingSendContext) carrying the
//! caller's [`RoutingState`](crate::RoutingState), passes the
//! [`UnicastSendRouterConnector`](crate::UnicastSendRouterConnector) and leaves as an
//! [`OutgoingLogicalMessageContext`](crate::OutgoingLogicalMessageContext) holding the
//! resolved destinations for the dispatch stage.

pub(crate) mod contexts;
pub(crate) mod routing_state;
pub(crate) mod send_router_connector;
pub(crate) mod stage;
