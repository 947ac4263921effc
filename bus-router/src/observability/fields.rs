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

//! Canonical structured field keys and value-format helpers.

use crate::routing::routing_strategy::UnicastRoutingStrategy;

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";

pub const MSG_ID: &str = "msg_id";
pub const MSG_TYPE: &str = "msg_type";
pub const ROUTE_OPTION: &str = "route_option";
pub const DESTINATIONS: &str = "destinations";
pub const QUEUE: &str = "queue";
pub const ENDPOINT: &str = "endpoint";
pub const INSTANCE: &str = "instance";
pub const SOURCE_KEY: &str = "source_key";
pub const SNAPSHOT_VERSION: &str = "snapshot_version";
pub const TASK_ID: &str = "task_id";
pub const ERR: &str = "err";

pub const NONE: &str = "none";

/// Renders resolved destinations as a compact, comma separated list.
pub fn format_destinations(routing_strategies: &[UnicastRoutingStrategy]) -> String {
    if routing_strategies.is_empty() {
        return NONE.to_string();
    }

    routing_strategies
        .iter()
        .map(UnicastRoutingStrategy::destination)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn format_optional(value: Option<&str>) -> &str {
    value.unwrap_or(NONE)
}
