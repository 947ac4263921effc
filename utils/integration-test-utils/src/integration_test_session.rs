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

use async_trait::async_trait;
use bus_router::{
    DeliveryConstraint, MessageSession, MessageType, OutgoingLogicalMessage, RouteOption,
    RoutingError, RoutingState, SendOptions,
};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A send captured by [`TestableMessageSession`], with the options it was made with.
#[derive(Clone, Debug)]
pub struct SentMessage {
    pub message: OutgoingLogicalMessage,
    pub route_option: RouteOption,
    pub explicit_destination: Option<String>,
    pub delivery_constraint: Option<DeliveryConstraint>,
    pub message_id: Option<String>,
}

impl SentMessage {
    pub fn message_type(&self) -> &MessageType {
        self.message.message_type()
    }
}

/// [`MessageSession`] that records sends instead of routing them.
#[derive(Clone, Default)]
pub struct TestableMessageSession {
    sent_messages: Arc<Mutex<Vec<SentMessage>>>,
}

impl TestableMessageSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent_messages.lock().await.clone()
    }
}

#[async_trait]
impl MessageSession for TestableMessageSession {
    async fn send(
        &self,
        message: OutgoingLogicalMessage,
        options: SendOptions,
    ) -> Result<(), RoutingError> {
        let state = options.extensions().get::<RoutingState>();
        let sent = SentMessage {
            message,
            route_option: options.route_option(),
            explicit_destination: state
                .and_then(RoutingState::explicit_destination)
                .map(str::to_string),
            delivery_constraint: options.delivery_constraint().copied(),
            message_id: options.message_id().map(str::to_string),
        };
        self.sent_messages.lock().await.push(sent);
        Ok(())
    }
}
