//! Control-plane layer.
//!
//! Owns the routing configuration: route registration and validation, the routing table
//! and endpoint instance snapshots, and the translation of logical instances into
//! transport addresses. Every registration publishes a new snapshot so sends in flight
//! never observe a half-applied change.
//!
//! ```
//! use bus_router::{
//!     EndpointInstance, EndpointInstances, MessageType, RoutingError, RoutingSettings,
//!     UnicastRoute,
//! };
//!
//! let order_placed = MessageType::new("contracts", Some("sales"), "OrderPlaced");
//! let mut settings = RoutingSettings::new();
//! settings.route_to_endpoint(order_placed.clone(), "Sales").unwrap();
//!
//! let table = settings
//!     .configured_routes()
//!     .build_table(&[order_placed.clone()])
//!     .unwrap();
//! assert_eq!(
//!     table.route_for(&order_placed),
//!     Some(UnicastRoute::create_from_endpoint_name("Sales"))
//! );
//!
//! // Physical placement lives with the instances, never in route destinations.
//! assert!(matches!(
//!     settings.route_to_endpoint(order_placed, "Sales@host-a"),
//!     Err(RoutingError::InvalidDestination { .. })
//! ));
//! let instances = EndpointInstances::new();
//! instances.add_or_replace_instances(
//!     "doc",
//!     vec![EndpointInstance::new("Sales").with_property("machine", "host-a")],
//! );
//! assert_eq!(instances.find_all("Sales").len(), 1);
//! ```

pub(crate) mod endpoint_instances;
pub(crate) mod route_table;
pub(crate) mod routing_settings;
pub(crate) mod transport_addressing;
