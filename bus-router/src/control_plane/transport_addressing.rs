//! Logical instance to physical queue address translation.

use crate::control_plane::endpoint_instances::EndpointInstance;

/// Instance property naming the host a queue lives on.
pub const MACHINE_PROPERTY: &str = "machine";

/// Translates a logical endpoint instance into the address the transport sends to.
pub trait TransportAddressing: Send + Sync {
    fn to_transport_address(&self, instance: &EndpointInstance) -> String;
}

/// Queue-per-instance addressing.
///
/// `Sales` maps to `Sales`, `Sales` with discriminator `blue` to `Sales-blue`, and a
/// `machine` property appends `@machine`.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueueAddressing;

impl TransportAddressing for QueueAddressing {
    fn to_transport_address(&self, instance: &EndpointInstance) -> String {
        let mut address = instance.endpoint().to_string();
        if let Some(discriminator) = instance.discriminator() {
            address.push('-');
            address.push_str(discriminator);
        }
        if let Some(machine) = instance.property(MACHINE_PROPERTY) {
            address.push('@');
            address.push_str(machine);
        }
        address
    }
}
