//! Unicast routing table: message type to route, published as versioned snapshots.

use crate::control_plane::endpoint_instances::EndpointInstance;
use crate::error::RoutingError;
use crate::message::MessageType;
use crate::observability::events;
use arc_swap::ArcSwap;
use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

const COMPONENT: &str = "route_table";

/// Precedence of a route entry. Declaration order is precedence order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum RoutePriority {
    SpecificType,
    SpecificAssembly,
}

/// Where messages of a type go.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum UnicastRoute {
    /// A logical endpoint; its instances are chosen by a distribution strategy.
    Endpoint(String),
    /// One specific instance of an endpoint.
    Instance(EndpointInstance),
    /// A literal transport address.
    PhysicalAddress(String),
}

impl UnicastRoute {
    pub fn create_from_endpoint_name(endpoint: &str) -> Self {
        UnicastRoute::Endpoint(endpoint.to_string())
    }

    pub fn create_from_endpoint_instance(instance: EndpointInstance) -> Self {
        UnicastRoute::Instance(instance)
    }

    pub fn create_from_physical_address(address: &str) -> Self {
        UnicastRoute::PhysicalAddress(address.to_string())
    }
}

impl Display for UnicastRoute {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UnicastRoute::Endpoint(endpoint) => write!(f, "endpoint:{endpoint}"),
            UnicastRoute::Instance(instance) => write!(f, "instance:{instance}"),
            UnicastRoute::PhysicalAddress(address) => write!(f, "address:{address}"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RouteTableEntry {
    pub message_type: MessageType,
    pub route: UnicastRoute,
    pub priority: RoutePriority,
}

impl RouteTableEntry {
    pub fn new(message_type: MessageType, route: UnicastRoute, priority: RoutePriority) -> Self {
        Self {
            message_type,
            route,
            priority,
        }
    }
}

/// Best route seen so far per message type, with the priority it was registered at.
pub(crate) type PrioritizedRoutes = HashMap<MessageType, (RoutePriority, UnicastRoute)>;

/// Offers one route for `message_type`. The best priority wins. Repeats of the same route
/// are tolerated; two different routes sharing the best priority are rejected.
fn merge_route(
    best: &mut PrioritizedRoutes,
    message_type: MessageType,
    priority: RoutePriority,
    route: UnicastRoute,
) -> Result<(), RoutingError> {
    match best.get_mut(&message_type) {
        None => {
            best.insert(message_type, (priority, route));
        }
        Some((best_priority, best_route)) => {
            if priority < *best_priority {
                *best_priority = priority;
                *best_route = route;
            } else if priority == *best_priority && route != *best_route {
                return Err(RoutingError::ConflictingRoutes {
                    message_type,
                    first: best_route.to_string(),
                    second: route.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Collapses entries to one route per message type, keeping the winning priority.
pub(crate) fn resolve_entries(
    entries: Vec<RouteTableEntry>,
) -> Result<PrioritizedRoutes, RoutingError> {
    let mut best = PrioritizedRoutes::new();
    for entry in entries {
        merge_route(&mut best, entry.message_type, entry.priority, entry.route)?;
    }
    Ok(best)
}

#[derive(Default)]
struct RoutingTableSnapshot {
    version: u64,
    by_source: BTreeMap<String, PrioritizedRoutes>,
    routes: HashMap<MessageType, UnicastRoute>,
}

impl RoutingTableSnapshot {
    /// Merges every source with the same precedence rule used inside one source.
    fn with_source(
        &self,
        source_key: &str,
        source_routes: PrioritizedRoutes,
    ) -> Result<Self, RoutingError> {
        let mut by_source = self.by_source.clone();
        by_source.insert(source_key.to_string(), source_routes);

        let mut merged = PrioritizedRoutes::new();
        for (message_type, (priority, route)) in by_source.values().flatten() {
            merge_route(&mut merged, message_type.clone(), *priority, route.clone())?;
        }

        Ok(Self {
            version: self.version + 1,
            by_source,
            routes: merged
                .into_iter()
                .map(|(message_type, (_, route))| (message_type, route))
                .collect(),
        })
    }
}

/// Routes per message type, grouped by the source that registered them.
///
/// Lookups are lock-free reads of the current snapshot. Writers are serialized and
/// publish a complete replacement snapshot.
pub struct UnicastRoutingTable {
    snapshot: ArcSwap<RoutingTableSnapshot>,
    writer: Mutex<()>,
}

impl UnicastRoutingTable {
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(RoutingTableSnapshot::default()),
            writer: Mutex::new(()),
        }
    }

    /// Replaces every route previously registered under `source_key`.
    ///
    /// On error the current snapshot stays in place.
    pub fn add_or_replace_routes(
        &self,
        source_key: &str,
        entries: Vec<RouteTableEntry>,
    ) -> Result<(), RoutingError> {
        let _writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let next = resolve_entries(entries)
            .and_then(|source_routes| self.snapshot.load().with_source(source_key, source_routes));

        match next {
            Ok(next) => {
                debug!(
                    event = events::ROUTE_TABLE_SNAPSHOT_APPLIED,
                    component = COMPONENT,
                    source_key,
                    snapshot_version = next.version,
                    route_count = next.routes.len(),
                    "routing table snapshot applied"
                );
                self.snapshot.store(Arc::new(next));
                Ok(())
            }
            Err(err) => {
                warn!(
                    event = events::ROUTE_TABLE_SNAPSHOT_REJECTED,
                    component = COMPONENT,
                    source_key,
                    err = %err,
                    "routing table snapshot rejected"
                );
                Err(err)
            }
        }
    }

    pub fn route_for(&self, message_type: &MessageType) -> Option<UnicastRoute> {
        self.snapshot.load().routes.get(message_type).cloned()
    }

    pub fn version(&self) -> u64 {
        self.snapshot.load().version
    }
}

impl Default for UnicastRoutingTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_entries, RoutePriority, RouteTableEntry, UnicastRoute, UnicastRoutingTable};
    use crate::error::RoutingError;
    use crate::message::MessageType;

    fn order_placed() -> MessageType {
        MessageType::new("contracts", Some("sales"), "OrderPlaced")
    }

    fn entry(route: &str, priority: RoutePriority) -> RouteTableEntry {
        RouteTableEntry::new(
            order_placed(),
            UnicastRoute::create_from_endpoint_name(route),
            priority,
        )
    }

    #[test]
    fn specific_type_overrides_assembly_regardless_of_order() {
        let resolved = resolve_entries(vec![
            entry("Sales", RoutePriority::SpecificType),
            entry("Fallback", RoutePriority::SpecificAssembly),
        ])
        .expect("entries should resolve");
        assert_eq!(
            resolved[&order_placed()],
            (
                RoutePriority::SpecificType,
                UnicastRoute::create_from_endpoint_name("Sales")
            )
        );

        let resolved = resolve_entries(vec![
            entry("Fallback", RoutePriority::SpecificAssembly),
            entry("Sales", RoutePriority::SpecificType),
        ])
        .expect("entries should resolve");
        assert_eq!(
            resolved[&order_placed()],
            (
                RoutePriority::SpecificType,
                UnicastRoute::create_from_endpoint_name("Sales")
            )
        );
    }

    #[test]
    fn identical_routes_at_same_priority_are_deduplicated() {
        let resolved = resolve_entries(vec![
            entry("Sales", RoutePriority::SpecificAssembly),
            entry("Sales", RoutePriority::SpecificAssembly),
        ])
        .expect("duplicates should resolve");

        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn different_routes_at_same_priority_conflict() {
        let err = resolve_entries(vec![
            entry("Sales", RoutePriority::SpecificType),
            entry("Shipping", RoutePriority::SpecificType),
        ])
        .expect_err("conflicting routes should fail");

        assert!(matches!(err, RoutingError::ConflictingRoutes { .. }));
    }

    #[test]
    fn table_replaces_routes_per_source() {
        let table = UnicastRoutingTable::new();
        table
            .add_or_replace_routes("config", vec![entry("Sales", RoutePriority::SpecificType)])
            .expect("first registration should succeed");
        table
            .add_or_replace_routes(
                "config",
                vec![entry("Shipping", RoutePriority::SpecificType)],
            )
            .expect("replacement should succeed");

        assert_eq!(
            table.route_for(&order_placed()),
            Some(UnicastRoute::create_from_endpoint_name("Shipping"))
        );
        assert_eq!(table.version(), 2);
    }

    #[test]
    fn conflicting_sources_leave_current_snapshot_untouched() {
        let table = UnicastRoutingTable::new();
        table
            .add_or_replace_routes("config", vec![entry("Sales", RoutePriority::SpecificType)])
            .expect("first registration should succeed");

        let result = table.add_or_replace_routes(
            "discovery",
            vec![entry("Shipping", RoutePriority::SpecificType)],
        );

        assert!(matches!(result, Err(RoutingError::ConflictingRoutes { .. })));
        assert_eq!(table.version(), 1);
        assert_eq!(
            table.route_for(&order_placed()),
            Some(UnicastRoute::create_from_endpoint_name("Sales"))
        );
    }

    #[test]
    fn specific_type_from_another_source_beats_assembly_route() {
        let table = UnicastRoutingTable::new();
        table
            .add_or_replace_routes(
                "config",
                vec![entry("Fallback", RoutePriority::SpecificAssembly)],
            )
            .expect("first registration should succeed");

        table
            .add_or_replace_routes("discovery", vec![entry("Sales", RoutePriority::SpecificType)])
            .expect("a more specific route from another source should apply");
        assert_eq!(
            table.route_for(&order_placed()),
            Some(UnicastRoute::create_from_endpoint_name("Sales"))
        );

        table
            .add_or_replace_routes("discovery", Vec::new())
            .expect("withdrawing routes should succeed");
        assert_eq!(
            table.route_for(&order_placed()),
            Some(UnicastRoute::create_from_endpoint_name("Fallback"))
        );
        assert_eq!(table.version(), 3);
    }

    #[test]
    fn unknown_type_has_no_route() {
        let table = UnicastRoutingTable::new();

        assert_eq!(
            table.route_for(&MessageType::new("contracts", None, "Ping")),
            None
        );
    }
}
