//! Canonical structured event names used across `bus-router`.

// Send routing events.
pub const SEND_ROUTE_RESOLVED: &str = "send_route_resolved";
pub const SEND_ROUTE_EMPTY: &str = "send_route_empty";
pub const SEND_ROUTE_REJECTED: &str = "send_route_rejected";
pub const SEND_CANCELLED: &str = "send_cancelled";
pub const SEND_DISPATCH_QUEUE_NOT_FOUND: &str = "send_dispatch_queue_not_found";
pub const SEND_DISPATCH_FAILED: &str = "send_dispatch_failed";

// Unicast router and distribution events.
pub const ROUTE_LOOKUP_MISS: &str = "route_lookup_miss";
pub const SPECIFIC_INSTANCE_MISSING: &str = "specific_instance_missing";

// Control-plane snapshot events.
pub const ROUTING_COMPONENT_INITIALIZED: &str = "routing_component_initialized";
pub const ROUTE_REGISTRATION_REJECTED: &str = "route_registration_rejected";
pub const ROUTE_TABLE_SNAPSHOT_APPLIED: &str = "route_table_snapshot_applied";
pub const ROUTE_TABLE_SNAPSHOT_REJECTED: &str = "route_table_snapshot_rejected";
pub const INSTANCES_SNAPSHOT_APPLIED: &str = "instances_snapshot_applied";

// Scheduler events.
pub const SCHEDULER_TASK_SCHEDULED: &str = "scheduler_task_scheduled";
pub const SCHEDULER_TASK_DEFERRED: &str = "scheduler_task_deferred";
pub const SCHEDULER_TASK_FAILED: &str = "scheduler_task_failed";
