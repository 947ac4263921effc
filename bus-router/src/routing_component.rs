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

use crate::control_plane::endpoint_instances::{EndpointInstance, EndpointInstances};
use crate::control_plane::route_table::{RouteTableEntry, UnicastRoutingTable};
use crate::control_plane::routing_settings::RoutingSettings;
use crate::control_plane::transport_addressing::{QueueAddressing, TransportAddressing};
use crate::error::RoutingError;
use crate::message::MessageType;
use crate::observability::{events, fields};
use crate::pipeline::contexts::{OutgoingLogicalMessageContext, OutgoingSendContext};
use crate::pipeline::send_router_connector::UnicastSendRouterConnector;
use crate::pipeline::stage::{ConnectedStage, PipelineStage, StageConnector};
use crate::routing::distribution::DistributionPolicy;
use crate::routing::unicast_router::TableUnicastRouter;
use crate::session::PipelineMessageSession;
use std::sync::Arc;
use tracing::info;

const COMPONENT: &str = "routing_component";

/// Name of this endpoint and, when it is scaled out, the discriminator of this instance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EndpointIdentity {
    name: String,
    instance_discriminator: Option<String>,
}

impl EndpointIdentity {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            instance_discriminator: None,
        }
    }

    pub fn with_instance_discriminator(mut self, discriminator: &str) -> Self {
        self.instance_discriminator = Some(discriminator.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instance_discriminator(&self) -> Option<&str> {
        self.instance_discriminator.as_deref()
    }
}

///
/// [`RoutingComponent`] turns finished [`RoutingSettings`] into a working send path.
///
/// Initialization evaluates the configured routes against the known message types,
/// which is where ambiguous configuration surfaces as
/// [`RoutingError::ConflictingRoutes`]. Afterwards routes and instances can still be
/// replaced per source; each replacement publishes a new snapshot.
///
/// # Examples
///
/// ```
/// use bus_router::{EndpointIdentity, MessageType, RoutingComponent, RoutingSettings};
///
/// let order_placed = MessageType::new("contracts", Some("sales"), "OrderPlaced");
/// let mut settings = RoutingSettings::new();
/// settings.route_to_endpoint(order_placed.clone(), "Sales").unwrap();
///
/// let component = RoutingComponent::initialize(
///     settings,
///     &[order_placed],
///     EndpointIdentity::new("Billing").with_instance_discriminator("blue"),
/// )
/// .unwrap();
///
/// assert_eq!(component.connector().shared_queue(), "Billing");
/// assert_eq!(component.connector().instance_specific_queue(), Some("Billing-blue"));
/// ```
pub struct RoutingComponent {
    endpoint: EndpointIdentity,
    routing_table: Arc<UnicastRoutingTable>,
    endpoint_instances: Arc<EndpointInstances>,
    distribution_policy: Arc<DistributionPolicy>,
    connector: Arc<UnicastSendRouterConnector>,
}

impl RoutingComponent {
    /// Initializes with queue-per-instance transport addressing.
    pub fn initialize(
        settings: RoutingSettings,
        known_types: &[MessageType],
        endpoint: EndpointIdentity,
    ) -> Result<Self, RoutingError> {
        Self::initialize_with_addressing(settings, known_types, endpoint, Arc::new(QueueAddressing))
    }

    pub fn initialize_with_addressing(
        settings: RoutingSettings,
        known_types: &[MessageType],
        endpoint: EndpointIdentity,
        transport_addressing: Arc<dyn TransportAddressing>,
    ) -> Result<Self, RoutingError> {
        let (routes, distribution_policy) = settings.into_parts();
        let routing_table = Arc::new(routes.build_table(known_types)?);
        let endpoint_instances = Arc::new(EndpointInstances::new());
        let distribution_policy = Arc::new(distribution_policy);

        let shared_queue =
            transport_addressing.to_transport_address(&EndpointInstance::new(endpoint.name()));
        let instance_specific_queue = endpoint.instance_discriminator().map(|discriminator| {
            transport_addressing.to_transport_address(
                &EndpointInstance::new(endpoint.name()).with_discriminator(discriminator),
            )
        });

        let unicast_router = Arc::new(TableUnicastRouter::new(
            routing_table.clone(),
            endpoint_instances.clone(),
            transport_addressing,
        ));
        let connector = Arc::new(UnicastSendRouterConnector::new(
            &shared_queue,
            instance_specific_queue.as_deref(),
            unicast_router,
            distribution_policy.clone(),
        ));

        info!(
            event = events::ROUTING_COMPONENT_INITIALIZED,
            component = COMPONENT,
            endpoint = endpoint.name(),
            instance = fields::format_optional(endpoint.instance_discriminator()),
            known_types = known_types.len(),
            snapshot_version = routing_table.version(),
            "routing component initialized"
        );

        Ok(Self {
            endpoint,
            routing_table,
            endpoint_instances,
            distribution_policy,
            connector,
        })
    }

    pub fn endpoint(&self) -> &EndpointIdentity {
        &self.endpoint
    }

    pub fn routing_table(&self) -> &Arc<UnicastRoutingTable> {
        &self.routing_table
    }

    pub fn endpoint_instances(&self) -> &Arc<EndpointInstances> {
        &self.endpoint_instances
    }

    pub fn distribution_policy(&self) -> &Arc<DistributionPolicy> {
        &self.distribution_policy
    }

    pub fn connector(&self) -> &Arc<UnicastSendRouterConnector> {
        &self.connector
    }

    pub fn add_or_replace_routes(
        &self,
        source_key: &str,
        entries: Vec<RouteTableEntry>,
    ) -> Result<(), RoutingError> {
        self.routing_table.add_or_replace_routes(source_key, entries)
    }

    pub fn add_or_replace_instances(&self, source_key: &str, instances: Vec<EndpointInstance>) {
        self.endpoint_instances
            .add_or_replace_instances(source_key, instances);
    }

    /// Joins the send router with the stage that dispatches resolved messages.
    pub fn connect(
        &self,
        next: Arc<dyn PipelineStage<OutgoingLogicalMessageContext>>,
    ) -> Arc<dyn PipelineStage<OutgoingSendContext>> {
        let connector: Arc<dyn StageConnector<OutgoingSendContext, OutgoingLogicalMessageContext>> =
            self.connector.clone();
        Arc::new(ConnectedStage::new(connector, next))
    }

    pub fn session(
        &self,
        next: Arc<dyn PipelineStage<OutgoingLogicalMessageContext>>,
    ) -> PipelineMessageSession {
        PipelineMessageSession::new(self.connect(next))
    }
}
