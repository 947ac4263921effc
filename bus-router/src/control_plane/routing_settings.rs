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

//! Configuration-time route registration.

use crate::control_plane::route_table::{
    RoutePriority, RouteTableEntry, UnicastRoute, UnicastRoutingTable,
};
use crate::error::RoutingError;
use crate::message::MessageType;
use crate::observability::events;
use crate::routing::distribution::{DistributionPolicy, DistributionStrategy};
use std::sync::Arc;
use tracing::warn;

const COMPONENT: &str = "routing_settings";

/// Source key under which routes registered through [`RoutingSettings`] live in the table.
pub const ROUTING_SETTINGS_SOURCE: &str = "routing-settings";

type RouteFactory = Box<dyn Fn(&[MessageType]) -> Vec<RouteTableEntry> + Send + Sync>;

/// Ordered, append-only list of route factories.
///
/// Factories are only evaluated once the full set of known message types is available.
#[derive(Default)]
pub struct ConfiguredUnicastRoutes {
    factories: Vec<RouteFactory>,
}

impl ConfiguredUnicastRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F>(&mut self, factory: F)
    where
        F: Fn(&[MessageType]) -> Vec<RouteTableEntry> + Send + Sync + 'static,
    {
        self.factories.push(Box::new(factory));
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Evaluates every factory against `known_types`, in registration order.
    pub fn build_entries(&self, known_types: &[MessageType]) -> Vec<RouteTableEntry> {
        self.factories
            .iter()
            .flat_map(|factory| factory(known_types))
            .collect()
    }

    /// Builds a routing table holding these routes under [`ROUTING_SETTINGS_SOURCE`].
    pub fn build_table(
        &self,
        known_types: &[MessageType],
    ) -> Result<UnicastRoutingTable, RoutingError> {
        let table = UnicastRoutingTable::new();
        table.add_or_replace_routes(ROUTING_SETTINGS_SOURCE, self.build_entries(known_types))?;
        Ok(table)
    }
}

///
/// [`RoutingSettings`] is where an endpoint declares where its outgoing messages go.
///
/// Destinations are logical endpoint names. Anything containing `@` looks like a physical
/// address and is rejected on the spot; physical placement belongs to endpoint instances.
///
/// # Examples
///
/// ```
/// use bus_router::{MessageType, RoutingSettings};
///
/// let mut settings = RoutingSettings::new();
/// let order_placed = MessageType::new("contracts", Some("sales"), "OrderPlaced");
///
/// settings.route_to_endpoint(order_placed.clone(), "Sales").unwrap();
/// settings.route_module_to_endpoint("contracts", "Fallback").unwrap();
/// assert!(settings.route_to_endpoint(order_placed, "sales@machine").is_err());
/// ```
#[derive(Default)]
pub struct RoutingSettings {
    routes: ConfiguredUnicastRoutes,
    distribution_policy: DistributionPolicy,
}

impl RoutingSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes one message type to `destination`. Beats module and namespace routes.
    pub fn route_to_endpoint(
        &mut self,
        message_type: MessageType,
        destination: &str,
    ) -> Result<(), RoutingError> {
        validate_destination(destination)?;

        let route = UnicastRoute::create_from_endpoint_name(destination);
        self.routes.add(move |_known_types| {
            vec![RouteTableEntry::new(
                message_type.clone(),
                route.clone(),
                RoutePriority::SpecificType,
            )]
        });
        Ok(())
    }

    /// Routes every known message type of `module` to `destination`.
    pub fn route_module_to_endpoint(
        &mut self,
        module: &str,
        destination: &str,
    ) -> Result<(), RoutingError> {
        validate_destination(destination)?;

        let module = module.to_string();
        let route = UnicastRoute::create_from_endpoint_name(destination);
        self.routes.add(move |known_types| {
            known_types
                .iter()
                .filter(|message_type| message_type.module() == module)
                .map(|message_type| {
                    RouteTableEntry::new(
                        message_type.clone(),
                        route.clone(),
                        RoutePriority::SpecificAssembly,
                    )
                })
                .collect()
        });
        Ok(())
    }

    /// Routes the known message types of `module` whose namespace is `namespace`.
    ///
    /// An empty `namespace` selects the types that have no namespace.
    pub fn route_namespace_to_endpoint(
        &mut self,
        module: &str,
        namespace: &str,
        destination: &str,
    ) -> Result<(), RoutingError> {
        validate_destination(destination)?;

        let module = module.to_string();
        let namespace = Some(namespace.to_string()).filter(|namespace| !namespace.is_empty());
        let route = UnicastRoute::create_from_endpoint_name(destination);
        self.routes.add(move |known_types| {
            known_types
                .iter()
                .filter(|message_type| {
                    message_type.module() == module
                        && message_type.namespace() == namespace.as_deref()
                })
                .map(|message_type| {
                    RouteTableEntry::new(
                        message_type.clone(),
                        route.clone(),
                        RoutePriority::SpecificAssembly,
                    )
                })
                .collect()
        });
        Ok(())
    }

    /// Overrides how instances are chosen for messages of `message_type`.
    pub fn set_distribution_strategy(
        &mut self,
        message_type: MessageType,
        strategy: Arc<dyn DistributionStrategy>,
    ) {
        self.distribution_policy
            .set_distribution_strategy(message_type, strategy);
    }

    pub fn configured_routes(&self) -> &ConfiguredUnicastRoutes {
        &self.routes
    }

    pub(crate) fn into_parts(self) -> (ConfiguredUnicastRoutes, DistributionPolicy) {
        (self.routes, self.distribution_policy)
    }
}

fn validate_destination(destination: &str) -> Result<(), RoutingError> {
    if destination.contains('@') {
        warn!(
            event = events::ROUTE_REGISTRATION_REJECTED,
            component = COMPONENT,
            destination,
            "route destination looks like a physical address"
        );
        return Err(RoutingError::InvalidDestination {
            destination: destination.to_string(),
        });
    }
    Ok(())
}
