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

//! Registry of live endpoint instances, published as versioned snapshots.

use crate::observability::events;
use arc_swap::ArcSwap;
use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};
use tracing::debug;

const COMPONENT: &str = "endpoint_instances";

/// One live, addressable instance of a logical endpoint.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EndpointInstance {
    endpoint: String,
    discriminator: Option<String>,
    properties: BTreeMap<String, String>,
}

impl EndpointInstance {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            discriminator: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_discriminator(mut self, discriminator: &str) -> Self {
        self.discriminator = Some(discriminator.to_string());
        self
    }

    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn discriminator(&self) -> Option<&str> {
        self.discriminator.as_deref()
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

impl Display for EndpointInstance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.discriminator {
            Some(discriminator) => write!(f, "{}#{discriminator}", self.endpoint),
            None => f.write_str(&self.endpoint),
        }
    }
}

#[derive(Default)]
struct EndpointInstancesSnapshot {
    version: u64,
    by_source: BTreeMap<String, Vec<EndpointInstance>>,
    by_endpoint: HashMap<String, Vec<EndpointInstance>>,
}

impl EndpointInstancesSnapshot {
    fn with_source(&self, source_key: &str, instances: Vec<EndpointInstance>) -> Self {
        let mut by_source = self.by_source.clone();
        by_source.insert(source_key.to_string(), instances);

        let mut by_endpoint: HashMap<String, Vec<EndpointInstance>> = HashMap::new();
        for instance in by_source.values().flatten() {
            let known = by_endpoint.entry(instance.endpoint.clone()).or_default();
            if !known.contains(instance) {
                known.push(instance.clone());
            }
        }

        Self {
            version: self.version + 1,
            by_source,
            by_endpoint,
        }
    }
}

/// Known instances per endpoint.
///
/// Readers work on an immutable snapshot; every registration publishes a complete new one,
/// so a resolution in flight keeps seeing the set it started with.
pub struct EndpointInstances {
    snapshot: ArcSwap<EndpointInstancesSnapshot>,
    writer: Mutex<()>,
}

impl EndpointInstances {
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(EndpointInstancesSnapshot::default()),
            writer: Mutex::new(()),
        }
    }

    /// Replaces every instance previously registered under `source_key`.
    pub fn add_or_replace_instances(&self, source_key: &str, instances: Vec<EndpointInstance>) {
        let _writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let instance_count = instances.len();
        let next = self.snapshot.load().with_source(source_key, instances);
        let version = next.version;
        self.snapshot.store(Arc::new(next));

        debug!(
            event = events::INSTANCES_SNAPSHOT_APPLIED,
            component = COMPONENT,
            source_key,
            snapshot_version = version,
            instance_count,
            "endpoint instances snapshot applied"
        );
    }

    /// Returns the instances of `endpoint`.
    ///
    /// An endpoint nobody registered instances for is assumed to run as a single
    /// instance without discriminator.
    pub fn find_all(&self, endpoint: &str) -> Vec<EndpointInstance> {
        self.snapshot
            .load()
            .by_endpoint
            .get(endpoint)
            .filter(|instances| !instances.is_empty())
            .cloned()
            .unwrap_or_else(|| vec![EndpointInstance::new(endpoint)])
    }

    pub fn version(&self) -> u64 {
        self.snapshot.load().version
    }
}

impl Default for EndpointInstances {
    fn default() -> Self {
        Self::new()
    }
}
