//! Caller-facing entry point for outgoing sends.

use tokio_util::sync::CancellationToken;
use crate::error::RoutingError;
use crate::message::{headers, OutgoingLogicalMessage};
use crate::pipeline::contexts::OutgoingSendContext;
use crate::pipeline::stage::PipelineStage;
use crate::send_options::SendOptions;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Sends messages on behalf of application code.
#[async_trait]
pub trait MessageSession: Send + Sync {
    async fn send(
        &self,
        message: OutgoingLogicalMessage,
        options: SendOptions,
    ) -> Result<(), RoutingError>;
}

/// [`MessageSession`] feeding every send into the head of an outgoing pipeline.
pub struct PipelineMessageSession {
    pipeline: Arc<dyn PipelineStage<OutgoingSendContext>>,
    cancellation: CancellationToken,
}

impl PipelineMessageSession {
    pub fn new(pipeline: Arc<dyn PipelineStage<OutgoingSendContext>>) -> Self {
        Self {
            pipeline,
            cancellation: CancellationToken::new(),
        }
    }

    /// Sends of this session observe `cancellation`.
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }
}

#[async_trait]
impl MessageSession for PipelineMessageSession {
    async fn send(
        &self,
        message: OutgoingLogicalMessage,
        options: SendOptions,
    ) -> Result<(), RoutingError> {
        let (message_id, mut message_headers, extensions) = options.into_parts();
        let message_id = message_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        message_headers.insert(headers::MESSAGE_ID.to_string(), message_id.clone());

        let context = OutgoingSendContext::new(
            message,
            &message_id,
            message_headers,
            extensions,
            self.cancellation.clone(),
        );
        self.pipeline.invoke(context).await
    }
}
