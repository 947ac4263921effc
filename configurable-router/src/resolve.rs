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

use crate::config::{Config, ConfigError};
use async_trait::async_trait;
use bus_router::{
    MessageSession, OutgoingLogicalMessage, OutgoingLogicalMessageContext, PipelineStage,
    RoutingComponent, RoutingError, SendOptions,
};
use clap::ValueEnum;
use instance_mapping_file::InstanceMappingFile;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RouteOptionArg {
    /// Let the routing table and distribution strategy decide.
    #[default]
    Table,
    /// Send to the queue given with --target.
    Destination,
    ThisEndpoint,
    ThisInstance,
    /// Send to the instance whose discriminator is given with --target.
    SpecificInstance,
}

pub fn send_options(
    route_option: RouteOptionArg,
    target: Option<&str>,
) -> Result<SendOptions, ConfigError> {
    let missing_target = || ConfigError::MissingTarget {
        route_option: format!("{route_option:?}"),
    };

    let mut options = SendOptions::new();
    match route_option {
        RouteOptionArg::Table => {}
        RouteOptionArg::Destination => {
            options.set_destination(target.ok_or_else(missing_target)?)?;
        }
        RouteOptionArg::ThisEndpoint => options.route_to_this_endpoint()?,
        RouteOptionArg::ThisInstance => options.route_to_this_instance()?,
        RouteOptionArg::SpecificInstance => {
            options.route_to_specific_instance(target.ok_or_else(missing_target)?)?;
        }
    }
    Ok(options)
}

/// Terminal stage keeping the destinations of the last resolved send.
#[derive(Default)]
struct CapturedDestinations {
    destinations: Mutex<Vec<String>>,
}

#[async_trait]
impl PipelineStage<OutgoingLogicalMessageContext> for CapturedDestinations {
    async fn invoke(&self, context: OutgoingLogicalMessageContext) -> Result<(), RoutingError> {
        debug!(
            "captured {} with headers {:?}",
            context.message_type(),
            context.headers()
        );
        *self.destinations.lock().await = context.destinations();
        Ok(())
    }
}

/// Builds the routing component described by `config` and resolves one send of `message_type`.
pub async fn resolve(
    config: &Config,
    message_type: &str,
    options: SendOptions,
) -> Result<Vec<String>, ConfigError> {
    let message_type = config.message_type(message_type)?;
    let component = RoutingComponent::initialize(
        config.routing_settings()?,
        &config.known_message_types(),
        config.endpoint_identity(),
    )?;

    if let Some(instance_mapping) = &config.instance_mapping {
        let applied = InstanceMappingFile::new(instance_mapping.file_path.clone())
            .apply_to(component.endpoint_instances())?;
        info!("Applied {applied} endpoint instances from {}", instance_mapping.file_path);
    }

    let captured = Arc::new(CapturedDestinations::default());
    let session = component.session(captured.clone());
    session
        .send(OutgoingLogicalMessage::with_type(message_type, ()), options)
        .await?;

    let destinations = captured.destinations.lock().await.clone();
    Ok(destinations)
}
