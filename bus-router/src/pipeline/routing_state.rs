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

//! Caller routing intent for a single outgoing send.

use crate::error::RoutingError;
use std::fmt::{Display, Formatter};

/// Which routing rule the caller asked for.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum RouteOption {
    #[default]
    None,
    ExplicitDestination,
    RouteToThisInstance,
    RouteToAnyInstanceOfThisEndpoint,
    RouteToSpecificInstance,
}

impl Display for RouteOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let option = match self {
            RouteOption::None => "None",
            RouteOption::ExplicitDestination => "ExplicitDestination",
            RouteOption::RouteToThisInstance => "RouteToThisInstance",
            RouteOption::RouteToAnyInstanceOfThisEndpoint => "RouteToAnyInstanceOfThisEndpoint",
            RouteOption::RouteToSpecificInstance => "RouteToSpecificInstance",
        };
        f.write_str(option)
    }
}

/// A [`RouteOption`] together with the payload that option needs.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum RoutingIntent {
    #[default]
    Unspecified,
    ExplicitDestination(String),
    ThisInstance,
    AnyInstanceOfThisEndpoint,
    SpecificInstance(String),
}

impl RoutingIntent {
    pub fn option(&self) -> RouteOption {
        match self {
            RoutingIntent::Unspecified => RouteOption::None,
            RoutingIntent::ExplicitDestination(_) => RouteOption::ExplicitDestination,
            RoutingIntent::ThisInstance => RouteOption::RouteToThisInstance,
            RoutingIntent::AnyInstanceOfThisEndpoint => {
                RouteOption::RouteToAnyInstanceOfThisEndpoint
            }
            RoutingIntent::SpecificInstance(_) => RouteOption::RouteToSpecificInstance,
        }
    }
}

/// Per-send routing state, stored in the send's [`ContextBag`](crate::ContextBag).
///
/// The intent can be chosen once. Any further attempt, including repeating the same
/// choice, is rejected with [`RoutingError::RouteOptionAlreadySet`].
#[derive(Clone, Debug, Default)]
pub struct RoutingState {
    intent: RoutingIntent,
}

impl RoutingState {
    pub fn set(&mut self, intent: RoutingIntent) -> Result<(), RoutingError> {
        if self.intent != RoutingIntent::Unspecified {
            return Err(RoutingError::RouteOptionAlreadySet {
                current: self.option(),
            });
        }

        self.intent = intent;
        Ok(())
    }

    pub fn option(&self) -> RouteOption {
        self.intent.option()
    }

    pub fn intent(&self) -> &RoutingIntent {
        &self.intent
    }

    pub fn explicit_destination(&self) -> Option<&str> {
        match &self.intent {
            RoutingIntent::ExplicitDestination(destination) => Some(destination),
            _ => None,
        }
    }

    pub fn specific_instance(&self) -> Option<&str> {
        match &self.intent {
            RoutingIntent::SpecificInstance(discriminator) => Some(discriminator),
            _ => None,
        }
    }
}
