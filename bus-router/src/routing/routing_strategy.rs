//! Resolved routing output and distribution candidates.

use crate::control_plane::endpoint_instances::EndpointInstance;

/// Physical addressing decision handed to the dispatch stage.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum AddressTag {
    Unicast { destination: String },
}

/// A resolved, send-ready destination producing one physical address.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct UnicastRoutingStrategy {
    destination: String,
}

impl UnicastRoutingStrategy {
    pub fn new(destination: &str) -> Self {
        Self {
            destination: destination.to_string(),
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn address_tag(&self) -> AddressTag {
        AddressTag::Unicast {
            destination: self.destination.clone(),
        }
    }
}

/// A candidate receiver considered by a distribution strategy.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum UnicastRoutingTarget {
    Instance(EndpointInstance),
    TransportAddress(String),
}

impl UnicastRoutingTarget {
    /// Endpoint the candidate belongs to; a bare transport address stands for itself.
    pub fn endpoint(&self) -> &str {
        match self {
            UnicastRoutingTarget::Instance(instance) => instance.endpoint(),
            UnicastRoutingTarget::TransportAddress(address) => address,
        }
    }

    /// Discriminator of the scaled-out instance, when the target is an instance that has one.
    pub fn discriminator(&self) -> Option<&str> {
        match self {
            UnicastRoutingTarget::Instance(instance) => instance.discriminator(),
            UnicastRoutingTarget::TransportAddress(_) => None,
        }
    }
}
