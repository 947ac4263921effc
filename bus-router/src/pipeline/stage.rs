//! Pipeline stage contracts.

use crate::error::RoutingError;
use async_trait::async_trait;
use std::sync::Arc;

/// A terminal or already-connected stage consuming a context of type `C`.
#[async_trait]
pub trait PipelineStage<C: Send + 'static>: Send + Sync {
    async fn invoke(&self, context: C) -> Result<(), RoutingError>;
}

/// A stage that turns an `In` context into an `Out` context and hands it to `next`.
///
/// The connector owns the call to `next`: it decides whether the next stage runs at all,
/// and it sees every error the next stage returns.
#[async_trait]
pub trait StageConnector<In: Send + 'static, Out: Send + 'static>: Send + Sync {
    async fn invoke(&self, context: In, next: &dyn PipelineStage<Out>) -> Result<(), RoutingError>;
}

/// A connector joined with the stage it forwards to, usable as a stage itself.
pub struct ConnectedStage<In, Out> {
    connector: Arc<dyn StageConnector<In, Out>>,
    next: Arc<dyn PipelineStage<Out>>,
}

impl<In: Send + 'static, Out: Send + 'static> ConnectedStage<In, Out> {
    pub fn new(
        connector: Arc<dyn StageConnector<In, Out>>,
        next: Arc<dyn PipelineStage<Out>>,
    ) -> Self {
        Self { connector, next }
    }
}

#[async_trait]
impl<In: Send + 'static, Out: Send + 'static> PipelineStage<In> for ConnectedStage<In, Out> {
    async fn invoke(&self, context: In) -> Result<(), RoutingError> {
        self.connector.invoke(context, self.next.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::{ConnectedStage, PipelineStage, StageConnector};
    use crate::error::RoutingError;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct Doubling;

    #[async_trait]
    impl StageConnector<u32, u64> for Doubling {
        async fn invoke(
            &self,
            context: u32,
            next: &dyn PipelineStage<u64>,
        ) -> Result<(), RoutingError> {
            next.invoke(u64::from(context) * 2).await
        }
    }

    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<u64>>,
    }

    #[async_trait]
    impl PipelineStage<u64> for Recording {
        async fn invoke(&self, context: u64) -> Result<(), RoutingError> {
            self.seen.lock().unwrap().push(context);
            Ok(())
        }
    }

    #[tokio::test]
    async fn connected_stage_forwards_the_transformed_context() {
        let recording = Arc::new(Recording::default());
        let connector: Arc<dyn StageConnector<u32, u64>> = Arc::new(Doubling);
        let next: Arc<dyn PipelineStage<u64>> = recording.clone();
        let stage = ConnectedStage::new(connector, next);

        stage.invoke(21).await.expect("stage should succeed");

        assert_eq!(*recording.seen.lock().unwrap(), vec![42]);
    }
}
