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
    DeliveryConstraint, DispatchError, MessageType, OutgoingLogicalMessageContext, PipelineStage,
    RoutingError,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// What the dispatch side received for one send.
#[derive(Clone, Debug, PartialEq)]
pub struct DispatchedMessage {
    pub message_type: MessageType,
    pub message_id: String,
    pub destinations: Vec<String>,
    pub headers: HashMap<String, String>,
    pub delivery_constraint: Option<DeliveryConstraint>,
}

impl DispatchedMessage {
    fn from_context(context: &OutgoingLogicalMessageContext) -> Self {
        Self {
            message_type: context.message_type().clone(),
            message_id: context.message_id().to_string(),
            destinations: context.destinations(),
            headers: context.headers().clone(),
            delivery_constraint: context.delivery_constraint().copied(),
        }
    }
}

/// Terminal stage that records every resolved send instead of dispatching it.
#[derive(Clone, Default)]
pub struct RecordingDispatchStage {
    dispatched: Arc<Mutex<Vec<DispatchedMessage>>>,
}

impl RecordingDispatchStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn dispatched(&self) -> Vec<DispatchedMessage> {
        self.dispatched.lock().await.clone()
    }

    pub async fn invocations(&self) -> usize {
        self.dispatched.lock().await.len()
    }
}

#[async_trait]
impl PipelineStage<OutgoingLogicalMessageContext> for RecordingDispatchStage {
    async fn invoke(&self, context: OutgoingLogicalMessageContext) -> Result<(), RoutingError> {
        let dispatched = DispatchedMessage::from_context(&context);
        debug!("within recording dispatch stage! dispatched: {dispatched:?}");
        self.dispatched.lock().await.push(dispatched);
        Ok(())
    }
}

/// Terminal stage failing every send with a fixed transport fault.
#[derive(Clone)]
pub struct FailingDispatchStage {
    fault: DispatchError,
    attempts: Arc<Mutex<Vec<DispatchedMessage>>>,
}

impl FailingDispatchStage {
    pub fn queue_not_found(queue: &str) -> Self {
        Self::with_fault(DispatchError::QueueNotFound {
            queue: queue.to_string(),
        })
    }

    pub fn transport(reason: &str) -> Self {
        Self::with_fault(DispatchError::Transport {
            reason: reason.to_string(),
        })
    }

    fn with_fault(fault: DispatchError) -> Self {
        Self {
            fault,
            attempts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn attempts(&self) -> Vec<DispatchedMessage> {
        self.attempts.lock().await.clone()
    }
}

#[async_trait]
impl PipelineStage<OutgoingLogicalMessageContext> for FailingDispatchStage {
    async fn invoke(&self, context: OutgoingLogicalMessageContext) -> Result<(), RoutingError> {
        self.attempts
            .lock()
            .await
            .push(DispatchedMessage::from_context(&context));
        debug!("within failing dispatch stage! fault: {}", self.fault);
        Err(RoutingError::Dispatch(self.fault.clone()))
    }
}
