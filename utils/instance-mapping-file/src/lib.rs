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

use bus_router::{EndpointInstance, EndpointInstances};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{self, canonicalize};
use std::io;
use std::path::PathBuf;
use tracing::{debug, error, warn};

/// Source key the file's instances are registered under.
pub const INSTANCE_MAPPING_FILE_SOURCE: &str = "instance-mapping-file";

#[derive(Debug)]
pub enum MappingFileError {
    NotFound { path: String, source: io::Error },
    Unreadable { path: String, source: io::Error },
    InvalidJson { path: String, source: serde_json::Error },
    InvalidFormat { path: String, reason: String },
}

impl Display for MappingFileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MappingFileError::NotFound { path, source } => {
                write!(f, "instance mapping file '{path}' not found: {source}")
            }
            MappingFileError::Unreadable { path, source } => {
                write!(f, "unable to read instance mapping file '{path}': {source}")
            }
            MappingFileError::InvalidJson { path, source } => {
                write!(f, "unable to parse instance mapping file '{path}': {source}")
            }
            MappingFileError::InvalidFormat { path, reason } => {
                write!(f, "invalid instance mapping file '{path}': {reason}")
            }
        }
    }
}

impl Error for MappingFileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MappingFileError::NotFound { source, .. } => Some(source),
            MappingFileError::Unreadable { source, .. } => Some(source),
            MappingFileError::InvalidJson { source, .. } => Some(source),
            MappingFileError::InvalidFormat { .. } => None,
        }
    }
}

/// Endpoint instances read from a static JSON file.
///
/// ```json
/// { "endpoints": [ { "name": "Sales", "instances": [
///     { "discriminator": "1", "properties": { "machine": "host-a" } } ] } ] }
/// ```
///
/// An endpoint listed without instances runs as a single instance without discriminator.
/// Malformed endpoint or instance entries are logged and skipped; a document that is not
/// shaped like the above is rejected as a whole.
pub struct InstanceMappingFile {
    mapping_file: String,
}

impl InstanceMappingFile {
    pub fn new(mapping_file: String) -> Self {
        InstanceMappingFile { mapping_file }
    }

    pub fn load(&self) -> Result<Vec<EndpointInstance>, MappingFileError> {
        let mapping_file = PathBuf::from(self.mapping_file.clone());
        debug!("instance mapping file: {mapping_file:?}");

        let mapping_file = canonicalize(mapping_file).map_err(|source| {
            MappingFileError::NotFound {
                path: self.mapping_file.clone(),
                source,
            }
        })?;

        let data =
            fs::read_to_string(mapping_file).map_err(|source| MappingFileError::Unreadable {
                path: self.mapping_file.clone(),
                source,
            })?;

        let document: Value =
            serde_json::from_str(&data).map_err(|source| MappingFileError::InvalidJson {
                path: self.mapping_file.clone(),
                source,
            })?;

        let endpoints = document
            .get("endpoints")
            .and_then(Value::as_array)
            .ok_or_else(|| MappingFileError::InvalidFormat {
                path: self.mapping_file.clone(),
                reason: "expected a top-level 'endpoints' array".to_string(),
            })?;

        let mut instances = Vec::new();
        for endpoint in endpoints {
            let Some(name) = endpoint.get("name").and_then(Value::as_str) else {
                error!("Skipping endpoint without a 'name': {endpoint}");
                continue;
            };

            match endpoint.get("instances").and_then(Value::as_array) {
                Some(entries) if !entries.is_empty() => {
                    for entry in entries {
                        if let Some(instance) = parse_instance(name, entry) {
                            instances.push(instance);
                        }
                    }
                }
                _ => {
                    debug!("Endpoint '{name}' has no instances listed, using its shared queue");
                    instances.push(EndpointInstance::new(name));
                }
            }
        }

        debug!("Finished reading instance mapping\n{instances:#?}");
        Ok(instances)
    }

    /// Loads the file and replaces the instances it contributed before.
    pub fn apply_to(&self, endpoint_instances: &EndpointInstances) -> Result<usize, MappingFileError> {
        let instances = self.load()?;
        let instance_count = instances.len();
        endpoint_instances.add_or_replace_instances(INSTANCE_MAPPING_FILE_SOURCE, instances);
        Ok(instance_count)
    }
}

fn parse_instance(endpoint: &str, entry: &Value) -> Option<EndpointInstance> {
    let Some(entry) = entry.as_object() else {
        warn!("Unable to parse instance '{entry}' of endpoint '{endpoint}'");
        return None;
    };

    let mut instance = EndpointInstance::new(endpoint);
    match entry.get("discriminator") {
        None | Some(Value::Null) => {}
        Some(Value::String(discriminator)) => {
            instance = instance.with_discriminator(discriminator);
        }
        Some(other) => {
            error!("Discriminator of endpoint '{endpoint}' must be a string, got {other}");
            return None;
        }
    }

    if let Some(properties) = entry.get("properties").and_then(Value::as_object) {
        for (key, value) in properties {
            match value.as_str() {
                Some(value) => instance = instance.with_property(key, value),
                None => warn!("Ignoring non-string property '{key}' of endpoint '{endpoint}'"),
            }
        }
    }

    Some(instance)
}

#[cfg(test)]
mod tests {
    use super::{InstanceMappingFile, MappingFileError};
    use bus_router::{EndpointInstance, EndpointInstances, MACHINE_PROPERTY};
    use std::fs;
    use std::path::PathBuf;

    fn testdata() -> String {
        format!(
            "{}/static-configs/instances.json",
            env!("CARGO_MANIFEST_DIR")
        )
    }

    fn scratch_file(name: &str, contents: &str) -> String {
        let path: PathBuf =
            std::env::temp_dir().join(format!("{name}-{}.json", std::process::id()));
        fs::write(&path, contents).expect("scratch file should be writable");
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn loads_instances_with_properties() {
        let instances = InstanceMappingFile::new(testdata())
            .load()
            .expect("testdata should load");

        assert_eq!(
            instances,
            vec![
                EndpointInstance::new("Sales")
                    .with_discriminator("1")
                    .with_property(MACHINE_PROPERTY, "host-a"),
                EndpointInstance::new("Sales")
                    .with_discriminator("2")
                    .with_property(MACHINE_PROPERTY, "host-b"),
                EndpointInstance::new("Shipping").with_property(MACHINE_PROPERTY, "host-c"),
            ]
        );
    }

    #[test]
    fn apply_to_publishes_a_snapshot() {
        let endpoint_instances = EndpointInstances::new();

        let applied = InstanceMappingFile::new(testdata())
            .apply_to(&endpoint_instances)
            .expect("testdata should apply");

        assert_eq!(applied, 3);
        assert_eq!(endpoint_instances.version(), 1);
        assert_eq!(endpoint_instances.find_all("Sales").len(), 2);
    }

    #[test]
    fn endpoint_without_instances_is_a_single_instance() {
        let path = scratch_file(
            "mapping-no-instances",
            r#"{ "endpoints": [ { "name": "Audit" } ] }"#,
        );

        let instances = InstanceMappingFile::new(path)
            .load()
            .expect("file should load");

        assert_eq!(instances, vec![EndpointInstance::new("Audit")]);
    }

    #[test]
    fn missing_file_is_reported() {
        let result = InstanceMappingFile::new("does/not/exist.json".to_string()).load();

        assert!(matches!(result, Err(MappingFileError::NotFound { .. })));
    }

    #[test]
    fn malformed_documents_are_rejected() {
        let not_json = scratch_file("mapping-not-json", "{ endpoints: ");
        let wrong_shape = scratch_file("mapping-wrong-shape", r#"{ "Sales": ["1"] }"#);

        assert!(matches!(
            InstanceMappingFile::new(not_json).load(),
            Err(MappingFileError::InvalidJson { .. })
        ));
        assert!(matches!(
            InstanceMappingFile::new(wrong_shape).load(),
            Err(MappingFileError::InvalidFormat { .. })
        ));
    }
}
