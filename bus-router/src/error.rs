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

//! Error types raised while configuring routes and routing outgoing sends.

use crate::message::MessageType;
use crate::pipeline::routing_state::RouteOption;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Faults reported by the stage that physically dispatches a message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DispatchError {
    /// The transport has no queue with the given name.
    QueueNotFound { queue: String },
    /// Any other transport failure.
    Transport { reason: String },
}

impl Display for DispatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::QueueNotFound { queue } => write!(f, "queue '{queue}' not found"),
            DispatchError::Transport { reason } => write!(f, "transport failure: {reason}"),
        }
    }
}

impl Error for DispatchError {}

/// Failures of route registration and send routing.
///
/// None of these are retried by the router. They describe configuration or topology
/// defects; the one exception is [`RoutingError::Dispatch`], which carries a downstream
/// fault through untouched.
#[derive(Debug)]
pub enum RoutingError {
    RouteOptionAlreadySet {
        current: RouteOption,
    },
    InstanceDiscriminatorMissing,
    InvalidDestination {
        destination: String,
    },
    ConflictingRoutes {
        message_type: MessageType,
        first: String,
        second: String,
    },
    UnknownSpecificInstance {
        instance: String,
    },
    NoDestination {
        message_type: MessageType,
    },
    DestinationQueueNotFound {
        queue: String,
        message_type: MessageType,
        source: DispatchError,
    },
    Dispatch(DispatchError),
    Cancelled,
}

impl Display for RoutingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutingError::RouteOptionAlreadySet { current } => {
                write!(f, "Already specified routing option for this message: {current}")
            }
            RoutingError::InstanceDiscriminatorMissing => write!(
                f,
                "Cannot route to this specific instance because the endpoint instance \
                 discriminator was not provided by either host, a plugin or user. You can \
                 specify it via EndpointIdentity::with_instance_discriminator(discriminator)."
            ),
            RoutingError::InvalidDestination { destination } => write!(
                f,
                "A logical endpoint name should not contain '@', but received '{destination}'. \
                 To specify an endpoint's address, use the instance mapping file, or refer to \
                 the routing documentation."
            ),
            RoutingError::ConflictingRoutes {
                message_type,
                first,
                second,
            } => write!(
                f,
                "Incompatible routes configured for message type {message_type}: '{first}' and \
                 '{second}' were registered with the same priority"
            ),
            RoutingError::UnknownSpecificInstance { instance } => write!(
                f,
                "Specified instance {instance} has not been configured in the routing tables."
            ),
            RoutingError::NoDestination { message_type } => {
                write!(f, "No destination specified for message: {message_type}")
            }
            RoutingError::DestinationQueueNotFound {
                queue,
                message_type,
                ..
            } => write!(
                f,
                "The destination queue '{queue}' could not be found. The destination may be \
                 misconfigured for this kind of message ({message_type}) in the routing \
                 configuration. It may also be the case that the given queue hasn't been \
                 created yet, or has been deleted."
            ),
            RoutingError::Dispatch(err) => write!(f, "{err}"),
            RoutingError::Cancelled => write!(f, "send was cancelled before dispatch"),
        }
    }
}

impl Error for RoutingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RoutingError::DestinationQueueNotFound { source, .. } => Some(source),
            RoutingError::Dispatch(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DispatchError> for RoutingError {
    fn from(err: DispatchError) -> Self {
        RoutingError::Dispatch(err)
    }
}
