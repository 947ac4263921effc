/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! # bus-router
//!
//! `bus-router` decides where outgoing messages of a message bus endpoint go.
//!
//! A send carries the caller's routing intent (at most one choice per send). The send
//! router honours an explicit destination, this instance's queue or this endpoint's shared
//! queue first; otherwise it asks the routing table for the message type and lets a
//! distribution strategy pick among the live instances of the routed endpoint.
//!
//! Typical usage is API-first and centered on [`RoutingSettings`] and
//! [`RoutingComponent`].
//!
//! ## Quick start
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use async_trait::async_trait;
//! use bus_router::{
//!     EndpointIdentity, EndpointInstance, MessageSession, MessageType,
//!     OutgoingLogicalMessage, OutgoingLogicalMessageContext, PipelineStage,
//!     RoutingComponent, RoutingError, RoutingSettings, SendOptions,
//! };
//!
//! #[derive(Default)]
//! struct PrintingDispatch {
//!     sent: Mutex<Vec<Vec<String>>>,
//! }
//!
//! #[async_trait]
//! impl PipelineStage<OutgoingLogicalMessageContext> for PrintingDispatch {
//!     async fn invoke(&self, context: OutgoingLogicalMessageContext) -> Result<(), RoutingError> {
//!         self.sent.lock().unwrap().push(context.destinations());
//!         Ok(())
//!     }
//! }
//!
//! struct OrderPlaced;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let order_placed = MessageType::of::<OrderPlaced>();
//!
//! let mut settings = RoutingSettings::new();
//! settings.route_to_endpoint(order_placed.clone(), "Sales").unwrap();
//!
//! let component =
//!     RoutingComponent::initialize(settings, &[order_placed], EndpointIdentity::new("Billing"))
//!         .unwrap();
//! component.add_or_replace_instances(
//!     "quick-start",
//!     vec![
//!         EndpointInstance::new("Sales").with_discriminator("1"),
//!         EndpointInstance::new("Sales").with_discriminator("2"),
//!     ],
//! );
//!
//! let dispatch = Arc::new(PrintingDispatch::default());
//! let session = component.session(dispatch.clone());
//!
//! session
//!     .send(OutgoingLogicalMessage::new(OrderPlaced), SendOptions::new())
//!     .await
//!     .unwrap();
//!
//! let mut options = SendOptions::new();
//! options.route_to_specific_instance("2").unwrap();
//! session
//!     .send(OutgoingLogicalMessage::new(OrderPlaced), options)
//!     .await
//!     .unwrap();
//!
//! assert_eq!(
//!     *dispatch.sent.lock().unwrap(),
//!     vec![vec!["Sales-1".to_string()], vec!["Sales-2".to_string()]]
//! );
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - API facade: [`RoutingSettings`], [`RoutingComponent`], [`MessageSession`]
//! - Control plane: route registration, routing table and endpoint instance snapshots
//! - Routing: unicast router and distribution strategies
//! - Pipeline: stage contracts, send contexts and the send router connector
//! - Scheduler: periodic tasks driven by deferred messages
//!
//! ## Observability model
//!
//! The workspace uses `tracing` for logs/events.
//! Library code emits events and does not initialize a global subscriber. Binaries and
//! tests are responsible for one-time `tracing_subscriber` initialization at process
//! boundaries.

mod control_plane;
pub use control_plane::endpoint_instances::{EndpointInstance, EndpointInstances};
pub use control_plane::route_table::{
    RoutePriority, RouteTableEntry, UnicastRoute, UnicastRoutingTable,
};
pub use control_plane::routing_settings::{
    ConfiguredUnicastRoutes, RoutingSettings, ROUTING_SETTINGS_SOURCE,
};
pub use control_plane::transport_addressing::{
    QueueAddressing, TransportAddressing, MACHINE_PROPERTY,
};

mod error;
pub use error::{DispatchError, RoutingError};

mod extensions;
pub use extensions::ContextBag;

mod message;
pub use message::{headers, MessageIntent, MessageType, OutgoingLogicalMessage};

#[doc(hidden)]
pub mod observability;

mod pipeline;
pub use pipeline::contexts::{OutgoingLogicalMessageContext, OutgoingSendContext};
pub use pipeline::routing_state::{RouteOption, RoutingIntent, RoutingState};
pub use pipeline::send_router_connector::UnicastSendRouterConnector;
pub use pipeline::stage::{ConnectedStage, PipelineStage, StageConnector};
/// Cancellation handle carried by the pipeline contexts.
pub use tokio_util::sync::CancellationToken;

mod routing;
pub use routing::distribution::{
    DistributionPolicy, DistributionStrategy, RoundRobinDistributionStrategy,
    SpecificInstanceDistributionStrategy,
};
pub use routing::routing_strategy::{AddressTag, UnicastRoutingStrategy, UnicastRoutingTarget};
pub use routing::unicast_router::{TableUnicastRouter, UnicastRouter};

mod routing_component;
pub use routing_component::{EndpointIdentity, RoutingComponent};

pub mod scheduler;

mod send_options;
pub use send_options::{DeliveryConstraint, SendOptions};

mod session;
pub use session::{MessageSession, PipelineMessageSession};
