//! Routing and distribution-resolution layer.
//!
//! Turns a message type into the physical destinations of a send: the routing table
//! picks a route, the endpoint instances registry expands logical endpoints, and a
//! distribution strategy narrows the instances down before address translation.
//!
//! ```
//! use std::sync::Arc;
//! use bus_router::{
//!     ContextBag, EndpointInstance, EndpointInstances, MessageType, QueueAddressing,
//!     RoundRobinDistributionStrategy, RoutePriority, RouteTableEntry, TableUnicastRouter,
//!     UnicastRoute, UnicastRouter, UnicastRoutingTable,
//! };
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let order_placed = MessageType::new("contracts", Some("sales"), "OrderPlaced");
//!
//! let table = Arc::new(UnicastRoutingTable::new());
//! table
//!     .add_or_replace_routes(
//!         "doc",
//!         vec![RouteTableEntry::new(
//!             order_placed.clone(),
//!             UnicastRoute::create_from_endpoint_name("Sales"),
//!             RoutePriority::SpecificType,
//!         )],
//!     )
//!     .unwrap();
//!
//! let instances = Arc::new(EndpointInstances::new());
//! instances.add_or_replace_instances(
//!     "doc",
//!     vec![
//!         EndpointInstance::new("Sales").with_discriminator("1"),
//!         EndpointInstance::new("Sales").with_discriminator("2"),
//!     ],
//! );
//!
//! let router = TableUnicastRouter::new(table, instances, Arc::new(QueueAddressing));
//! let strategies = router
//!     .route(&order_placed, &RoundRobinDistributionStrategy::new(), &ContextBag::new())
//!     .await
//!     .unwrap();
//!
//! // Round robin hands the first send to the first instance.
//! assert_eq!(strategies[0].destination(), "Sales-1");
//! # });
//! ```

pub(crate) mod distribution;
pub(crate) mod routing_strategy;
pub(crate) mod unicast_router;
