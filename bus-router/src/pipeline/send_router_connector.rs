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

//! Pipeline stage resolving the destinations of an outgoing send.

use crate::error::{DispatchError, RoutingError};
use crate::message::{headers, MessageIntent};
use crate::observability::{events, fields};
use crate::pipeline::contexts::{OutgoingLogicalMessageContext, OutgoingSendContext};
use crate::pipeline::routing_state::{RouteOption, RoutingIntent, RoutingState};
use crate::pipeline::stage::{PipelineStage, StageConnector};
use crate::routing::distribution::{
    DistributionPolicy, DistributionStrategy, SpecificInstanceDistributionStrategy,
};
use crate::routing::routing_strategy::UnicastRoutingStrategy;
use crate::routing::unicast_router::UnicastRouter;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

const COMPONENT: &str = "send_router_connector";

/// Resolves caller intent and routing configuration into the destinations of a send.
///
/// Precedence, strongest first: an explicit destination, this instance's own queue,
/// this endpoint's shared queue, and finally the routing table through the
/// [`UnicastRouter`]. Only the last one is subject to distribution.
pub struct UnicastSendRouterConnector {
    shared_queue: String,
    instance_specific_queue: Option<String>,
    unicast_router: Arc<dyn UnicastRouter>,
    distribution_policy: Arc<DistributionPolicy>,
}

impl UnicastSendRouterConnector {
    pub fn new(
        shared_queue: &str,
        instance_specific_queue: Option<&str>,
        unicast_router: Arc<dyn UnicastRouter>,
        distribution_policy: Arc<DistributionPolicy>,
    ) -> Self {
        Self {
            shared_queue: shared_queue.to_string(),
            instance_specific_queue: instance_specific_queue.map(str::to_string),
            unicast_router,
            distribution_policy,
        }
    }

    pub fn shared_queue(&self) -> &str {
        &self.shared_queue
    }

    pub fn instance_specific_queue(&self) -> Option<&str> {
        self.instance_specific_queue.as_deref()
    }

    fn direct_destination(&self, state: &RoutingState) -> Option<String> {
        let destination = match state.intent() {
            RoutingIntent::ExplicitDestination(destination) => Some(destination.as_str()),
            RoutingIntent::ThisInstance => self.instance_specific_queue.as_deref(),
            RoutingIntent::AnyInstanceOfThisEndpoint => Some(self.shared_queue.as_str()),
            RoutingIntent::Unspecified | RoutingIntent::SpecificInstance(_) => None,
        };

        destination
            .filter(|destination| !destination.is_empty())
            .map(str::to_string)
    }

    fn distribution_strategy(
        &self,
        context: &OutgoingSendContext,
        state: &RoutingState,
    ) -> Arc<dyn DistributionStrategy> {
        match state.specific_instance() {
            Some(instance) => Arc::new(SpecificInstanceDistributionStrategy::new(instance)),
            None => self
                .distribution_policy
                .distribution_strategy(context.message_type()),
        }
    }

    async fn resolve(
        &self,
        context: &OutgoingSendContext,
        state: &RoutingState,
    ) -> Result<Vec<UnicastRoutingStrategy>, RoutingError> {
        if let Some(destination) = self.direct_destination(state) {
            return Ok(vec![UnicastRoutingStrategy::new(&destination)]);
        }

        let distribution_strategy = self.distribution_strategy(context, state);
        let cancellation = context.cancellation();

        tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(RoutingError::Cancelled),
            resolved = self.unicast_router.route(
                context.message_type(),
                distribution_strategy.as_ref(),
                context.extensions(),
            ) => resolved,
        }
    }
}

#[async_trait]
impl StageConnector<OutgoingSendContext, OutgoingLogicalMessageContext>
    for UnicastSendRouterConnector
{
    async fn invoke(
        &self,
        mut context: OutgoingSendContext,
        next: &dyn PipelineStage<OutgoingLogicalMessageContext>,
    ) -> Result<(), RoutingError> {
        let state = context.routing_state();
        let message_type = context.message_type().clone();

        if state.option() == RouteOption::RouteToThisInstance
            && self.instance_specific_queue.is_none()
        {
            warn!(
                event = events::SEND_ROUTE_REJECTED,
                component = COMPONENT,
                msg_type = %message_type,
                route_option = %state.option(),
                "instance-specific routing requested without an instance discriminator"
            );
            return Err(RoutingError::InstanceDiscriminatorMissing);
        }

        let routing_strategies = match self.resolve(&context, &state).await {
            Ok(routing_strategies) => routing_strategies,
            Err(RoutingError::Cancelled) => {
                debug!(
                    event = events::SEND_CANCELLED,
                    component = COMPONENT,
                    msg_type = %message_type,
                    "send cancelled during route resolution"
                );
                return Err(RoutingError::Cancelled);
            }
            Err(err) => return Err(err),
        };

        if routing_strategies.is_empty() {
            warn!(
                event = events::SEND_ROUTE_EMPTY,
                component = COMPONENT,
                msg_type = %message_type,
                route_option = %state.option(),
                "no destination resolved for outgoing message"
            );
            return Err(RoutingError::NoDestination { message_type });
        }

        if context.cancellation().is_cancelled() {
            debug!(
                event = events::SEND_CANCELLED,
                component = COMPONENT,
                msg_type = %message_type,
                "send cancelled before dispatch"
            );
            return Err(RoutingError::Cancelled);
        }

        debug!(
            event = events::SEND_ROUTE_RESOLVED,
            component = COMPONENT,
            msg_type = %message_type,
            msg_id = context.message_id(),
            route_option = %state.option(),
            destinations = %fields::format_destinations(&routing_strategies),
            "outgoing message routed"
        );

        context.headers_mut().insert(
            headers::MESSAGE_INTENT.to_string(),
            MessageIntent::Send.to_string(),
        );

        let logical_context = context.into_logical_message_context(routing_strategies);
        match next.invoke(logical_context).await {
            Err(RoutingError::Dispatch(DispatchError::QueueNotFound { queue })) => {
                warn!(
                    event = events::SEND_DISPATCH_QUEUE_NOT_FOUND,
                    component = COMPONENT,
                    msg_type = %message_type,
                    queue = queue.as_str(),
                    "destination queue not found"
                );
                Err(RoutingError::DestinationQueueNotFound {
                    source: DispatchError::QueueNotFound {
                        queue: queue.clone(),
                    },
                    queue,
                    message_type,
                })
            }
            Err(err) => {
                debug!(
                    event = events::SEND_DISPATCH_FAILED,
                    component = COMPONENT,
                    msg_type = %message_type,
                    err = %err,
                    "downstream stage failed"
                );
                Err(err)
            }
            Ok(()) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::UnicastSendRouterConnector;
    use tokio_util::sync::CancellationToken;
    use crate::control_plane::endpoint_instances::EndpointInstance;
    use crate::error::{DispatchError, RoutingError};
    use crate::extensions::ContextBag;
    use crate::message::{headers, MessageType, OutgoingLogicalMessage};
    use crate::pipeline::contexts::{OutgoingLogicalMessageContext, OutgoingSendContext};
    use crate::pipeline::routing_state::{RoutingIntent, RoutingState};
    use crate::pipeline::stage::{PipelineStage, StageConnector};
    use crate::routing::distribution::{DistributionPolicy, DistributionStrategy};
    use crate::routing::routing_strategy::{UnicastRoutingStrategy, UnicastRoutingTarget};
    use crate::routing::unicast_router::UnicastRouter;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct InvoiceClosed;

    fn invoice_closed() -> MessageType {
        MessageType::new("contracts", Some("billing"), "InvoiceClosed")
    }

    /// Answers with fixed destinations and counts how often it was asked.
    struct FixedRouter {
        destinations: Vec<&'static str>,
        calls: AtomicUsize,
    }

    impl FixedRouter {
        fn new(destinations: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                destinations,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl UnicastRouter for FixedRouter {
        async fn route(
            &self,
            _message_type: &MessageType,
            distribution_strategy: &dyn DistributionStrategy,
            _context: &ContextBag,
        ) -> Result<Vec<UnicastRoutingStrategy>, RoutingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let candidates: Vec<UnicastRoutingTarget> = self
                .destinations
                .iter()
                .map(|d| {
                    UnicastRoutingTarget::Instance(EndpointInstance::new(d).with_discriminator(d))
                })
                .collect();
            if candidates.is_empty() {
                return Ok(Vec::new());
            }
            let selected = distribution_strategy.select_destination(&candidates)?;
            Ok(selected
                .iter()
                .map(|target| match target {
                    UnicastRoutingTarget::TransportAddress(address) => {
                        UnicastRoutingStrategy::new(address)
                    }
                    UnicastRoutingTarget::Instance(instance) => {
                        UnicastRoutingStrategy::new(instance.endpoint())
                    }
                })
                .collect())
        }
    }

    /// Never answers; used to exercise cancellation.
    struct PendingRouter;

    #[async_trait]
    impl UnicastRouter for PendingRouter {
        async fn route(
            &self,
            _message_type: &MessageType,
            _distribution_strategy: &dyn DistributionStrategy,
            _context: &ContextBag,
        ) -> Result<Vec<UnicastRoutingStrategy>, RoutingError> {
            std::future::pending().await
        }
    }

    #[derive(Default)]
    struct RecordingStage {
        received: Mutex<Vec<(Vec<String>, HashMap<String, String>)>>,
        fail_with: Option<DispatchError>,
    }

    #[async_trait]
    impl PipelineStage<OutgoingLogicalMessageContext> for RecordingStage {
        async fn invoke(&self, context: OutgoingLogicalMessageContext) -> Result<(), RoutingError> {
            self.received
                .lock()
                .unwrap()
                .push((context.destinations(), context.headers().clone()));
            match &self.fail_with {
                Some(err) => Err(RoutingError::Dispatch(err.clone())),
                None => Ok(()),
            }
        }
    }

    fn connector(
        instance_queue: Option<&str>,
        router: Arc<dyn UnicastRouter>,
    ) -> UnicastSendRouterConnector {
        UnicastSendRouterConnector::new(
            "Billing",
            instance_queue,
            router,
            Arc::new(DistributionPolicy::new()),
        )
    }

    fn send_context(
        intent: Option<RoutingIntent>,
        cancellation: CancellationToken,
    ) -> OutgoingSendContext {
        let mut extensions = ContextBag::new();
        if let Some(intent) = intent {
            extensions
                .get_or_create::<RoutingState>()
                .set(intent)
                .expect("fresh state accepts an intent");
        }
        OutgoingSendContext::new(
            OutgoingLogicalMessage::with_type(invoice_closed(), InvoiceClosed),
            "message-1",
            HashMap::new(),
            extensions,
            cancellation,
        )
    }

    #[tokio::test]
    async fn explicit_destination_ignores_router() {
        let router = FixedRouter::new(vec!["Sales"]);
        let connector = connector(None, router.clone());
        let next = RecordingStage::default();

        connector
            .invoke(
                send_context(
                    Some(RoutingIntent::ExplicitDestination("Audit".to_string())),
                    CancellationToken::new(),
                ),
                &next,
            )
            .await
            .expect("send should succeed");

        let received = next.received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].0, vec!["Audit".to_string()]);
        assert_eq!(
            received[0].1.get(headers::MESSAGE_INTENT).map(String::as_str),
            Some("Send")
        );
        assert_eq!(router.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn this_instance_without_discriminator_fails_before_resolution() {
        let router = FixedRouter::new(vec!["Sales"]);
        let connector = connector(None, router.clone());
        let next = RecordingStage::default();

        let err = connector
            .invoke(
                send_context(Some(RoutingIntent::ThisInstance), CancellationToken::new()),
                &next,
            )
            .await
            .expect_err("no instance queue is configured");

        assert!(matches!(err, RoutingError::InstanceDiscriminatorMissing));
        assert_eq!(router.calls.load(Ordering::SeqCst), 0);
        assert!(next.received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn this_instance_uses_instance_specific_queue() {
        let router = FixedRouter::new(vec![]);
        let connector = connector(Some("Billing-blue"), router.clone());
        let next = RecordingStage::default();

        connector
            .invoke(
                send_context(Some(RoutingIntent::ThisInstance), CancellationToken::new()),
                &next,
            )
            .await
            .expect("send should succeed");

        assert_eq!(
            next.received.lock().unwrap()[0].0,
            vec!["Billing-blue".to_string()]
        );
        assert_eq!(router.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn specific_instance_is_resolved_through_router() {
        let router = FixedRouter::new(vec!["A", "X"]);
        let connector = connector(None, router.clone());
        let next = RecordingStage::default();

        connector
            .invoke(
                send_context(
                    Some(RoutingIntent::SpecificInstance("X".to_string())),
                    CancellationToken::new(),
                ),
                &next,
            )
            .await
            .expect("X is a known instance");
        assert_eq!(next.received.lock().unwrap()[0].0, vec!["X".to_string()]);

        let err = connector
            .invoke(
                send_context(
                    Some(RoutingIntent::SpecificInstance("Y".to_string())),
                    CancellationToken::new(),
                ),
                &next,
            )
            .await
            .expect_err("Y was never registered");

        assert!(matches!(err, RoutingError::UnknownSpecificInstance { ref instance } if instance == "Y"));
        assert_eq!(router.calls.load(Ordering::SeqCst), 2);
        assert_eq!(next.received.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_resolution_names_the_message_type() {
        let connector = connector(None, FixedRouter::new(vec![]));
        let next = RecordingStage::default();

        let err = connector
            .invoke(send_context(None, CancellationToken::new()), &next)
            .await
            .expect_err("nothing is routed");

        assert_eq!(
            err.to_string(),
            "No destination specified for message: contracts::billing::InvoiceClosed"
        );
        assert!(next.received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn queue_not_found_is_translated_with_cause() {
        let connector = connector(None, FixedRouter::new(vec!["Archive"]));
        let next = RecordingStage {
            fail_with: Some(DispatchError::QueueNotFound {
                queue: "Archive".to_string(),
            }),
            ..Default::default()
        };

        let err = connector
            .invoke(send_context(None, CancellationToken::new()), &next)
            .await
            .expect_err("the queue is missing");

        let message = err.to_string();
        assert!(message.contains("Archive"));
        assert!(message.contains("InvoiceClosed"));
        assert!(matches!(
            err.source()
                .and_then(|cause| cause.downcast_ref::<DispatchError>()),
            Some(DispatchError::QueueNotFound { queue }) if queue == "Archive"
        ));
    }

    #[tokio::test]
    async fn other_dispatch_errors_pass_through() {
        let connector = connector(None, FixedRouter::new(vec!["Sales"]));
        let next = RecordingStage {
            fail_with: Some(DispatchError::Transport {
                reason: "broker offline".to_string(),
            }),
            ..Default::default()
        };

        let err = connector
            .invoke(send_context(None, CancellationToken::new()), &next)
            .await
            .expect_err("transport is down");

        assert!(matches!(
            err,
            RoutingError::Dispatch(DispatchError::Transport { .. })
        ));
    }

    #[tokio::test]
    async fn cancellation_during_resolution_skips_next_stage() {
        let connector = connector(None, Arc::new(PendingRouter));
        let next = RecordingStage::default();
        let token = CancellationToken::new();
        let context = send_context(None, token.clone());

        let send = connector.invoke(context, &next);
        token.cancel();
        let err = send.await.expect_err("send was cancelled");

        assert!(matches!(err, RoutingError::Cancelled));
        assert!(next.received.lock().unwrap().is_empty());
    }
}
