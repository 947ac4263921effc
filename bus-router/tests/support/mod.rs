use bus_router::{
    DistributionStrategy, EndpointIdentity, EndpointInstance, RoutingComponent, RoutingError,
    RoutingSettings, UnicastRoutingTarget,
};
use integration_test_utils::known_message_types;
use std::sync::atomic::{AtomicUsize, Ordering};

pub(crate) const THIS_ENDPOINT: &str = "Billing";

pub(crate) fn make_component(
    settings: RoutingSettings,
    discriminator: Option<&str>,
) -> RoutingComponent {
    let endpoint = match discriminator {
        Some(discriminator) => {
            EndpointIdentity::new(THIS_ENDPOINT).with_instance_discriminator(discriminator)
        }
        None => EndpointIdentity::new(THIS_ENDPOINT),
    };

    RoutingComponent::initialize(settings, &known_message_types(), endpoint)
        .expect("routing component should initialize")
}

#[allow(dead_code)]
pub(crate) fn sales_instances(discriminators: &[&str]) -> Vec<EndpointInstance> {
    discriminators
        .iter()
        .map(|discriminator| EndpointInstance::new("Sales").with_discriminator(discriminator))
        .collect()
}

/// Picks the first candidate and counts how often it was asked.
#[allow(dead_code)]
#[derive(Default)]
pub(crate) struct CountingDistributionStrategy {
    pub(crate) calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingDistributionStrategy {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DistributionStrategy for CountingDistributionStrategy {
    fn select_destination(
        &self,
        candidates: &[UnicastRoutingTarget],
    ) -> Result<Vec<UnicastRoutingTarget>, RoutingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(candidates.iter().take(1).cloned().collect())
    }
}
