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

use crate::error::RoutingError;
use crate::extensions::ContextBag;
use crate::pipeline::routing_state::{RouteOption, RoutingIntent, RoutingState};
use std::collections::HashMap;
use std::time::{Duration, SystemTime};

/// When the transport may hand a message to its receiver.
///
/// Routing never looks at this; it travels to the dispatch stage in the send's
/// [`ContextBag`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeliveryConstraint {
    DelayDeliveryWith(Duration),
    DoNotDeliverBefore(SystemTime),
}

///
/// [`SendOptions`] collects what a caller wants from a single send.
///
/// Routing intent is set-once: after any of [`SendOptions::set_destination`],
/// [`SendOptions::route_to_this_instance`], [`SendOptions::route_to_this_endpoint`] or
/// [`SendOptions::route_to_specific_instance`] succeeded, every further routing call
/// fails with [`RoutingError::RouteOptionAlreadySet`].
///
/// # Examples
///
/// ```
/// use bus_router::{RouteOption, SendOptions};
///
/// let mut options = SendOptions::new();
/// options.set_destination("Billing").unwrap();
/// assert_eq!(options.route_option(), RouteOption::ExplicitDestination);
///
/// // A second routing choice is rejected, even the same one.
/// assert!(options.set_destination("Billing").is_err());
/// assert!(options.route_to_this_endpoint().is_err());
/// ```
#[derive(Debug, Default)]
pub struct SendOptions {
    message_id: Option<String>,
    headers: HashMap<String, String>,
    extensions: ContextBag,
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends to the given logical endpoint or transport address, bypassing the routing table.
    pub fn set_destination(&mut self, destination: &str) -> Result<(), RoutingError> {
        self.set_intent(RoutingIntent::ExplicitDestination(destination.to_string()))
    }

    /// Sends to this endpoint instance's own queue.
    pub fn route_to_this_instance(&mut self) -> Result<(), RoutingError> {
        self.set_intent(RoutingIntent::ThisInstance)
    }

    /// Sends to the shared queue of this endpoint.
    pub fn route_to_this_endpoint(&mut self) -> Result<(), RoutingError> {
        self.set_intent(RoutingIntent::AnyInstanceOfThisEndpoint)
    }

    /// Sends to the instance of the routed endpoint identified by `discriminator`.
    pub fn route_to_specific_instance(&mut self, discriminator: &str) -> Result<(), RoutingError> {
        self.set_intent(RoutingIntent::SpecificInstance(discriminator.to_string()))
    }

    pub fn delay_delivery_with(&mut self, delay: Duration) {
        self.extensions
            .set(DeliveryConstraint::DelayDeliveryWith(delay));
    }

    pub fn do_not_deliver_before(&mut self, at: SystemTime) {
        self.extensions
            .set(DeliveryConstraint::DoNotDeliverBefore(at));
    }

    pub fn set_message_id(&mut self, message_id: &str) {
        self.message_id = Some(message_id.to_string());
    }

    pub fn set_header(&mut self, key: &str, value: &str) {
        self.headers.insert(key.to_string(), value.to_string());
    }

    pub fn route_option(&self) -> RouteOption {
        self.extensions
            .get::<RoutingState>()
            .map(RoutingState::option)
            .unwrap_or_default()
    }

    pub fn delivery_constraint(&self) -> Option<&DeliveryConstraint> {
        self.extensions.get::<DeliveryConstraint>()
    }

    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn extensions(&self) -> &ContextBag {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut ContextBag {
        &mut self.extensions
    }

    pub(crate) fn into_parts(self) -> (Option<String>, HashMap<String, String>, ContextBag) {
        (self.message_id, self.headers, self.extensions)
    }

    fn set_intent(&mut self, intent: RoutingIntent) -> Result<(), RoutingError> {
        self.extensions.get_or_create::<RoutingState>().set(intent)
    }
}
