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

use bus_router::{EndpointIdentity, MessageType, RoutingError, RoutingSettings};
use instance_mapping_file::MappingFileError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub(crate) endpoint: EndpointConfig,
    pub(crate) message_types: Vec<String>,
    #[serde(default)]
    pub(crate) routes: Vec<RouteConfig>,
    #[serde(default)]
    pub(crate) instance_mapping: Option<InstanceMappingConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) instance_discriminator: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum RouteConfig {
    Type {
        message_type: String,
        destination: String,
    },
    Module {
        module: String,
        destination: String,
    },
    Namespace {
        module: String,
        namespace: String,
        destination: String,
    },
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct InstanceMappingConfig {
    pub(crate) file_path: String,
}

#[derive(Debug)]
pub enum ConfigError {
    Unreadable {
        path: String,
        source: io::Error,
    },
    Invalid {
        path: String,
        source: json5::Error,
    },
    UnknownMessageType {
        name: String,
    },
    MissingTarget {
        route_option: String,
    },
    Routing(RoutingError),
    MappingFile(MappingFileError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Unreadable { path, source } => {
                write!(f, "Unable to read config file '{path}': {source}")
            }
            ConfigError::Invalid { path, source } => {
                write!(f, "Unable to parse config file '{path}': {source}")
            }
            ConfigError::UnknownMessageType { name } => {
                write!(f, "Message type '{name}' is not listed in message_types")
            }
            ConfigError::MissingTarget { route_option } => {
                write!(f, "Route option '{route_option}' requires --target")
            }
            ConfigError::Routing(err) => write!(f, "{err}"),
            ConfigError::MappingFile(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Unreadable { source, .. } => Some(source),
            ConfigError::Invalid { source, .. } => Some(source),
            ConfigError::Routing(err) => Some(err),
            ConfigError::MappingFile(err) => Some(err),
            ConfigError::UnknownMessageType { .. } | ConfigError::MissingTarget { .. } => None,
        }
    }
}

impl From<RoutingError> for ConfigError {
    fn from(err: RoutingError) -> Self {
        ConfigError::Routing(err)
    }
}

impl From<MappingFileError> for ConfigError {
    fn from(err: MappingFileError) -> Self {
        ConfigError::MappingFile(err)
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_string(),
            source,
        })?;
        Self::parse(path, &contents)
    }

    pub(crate) fn parse(path: &str, contents: &str) -> Result<Self, ConfigError> {
        json5::from_str(contents).map_err(|source| ConfigError::Invalid {
            path: path.to_string(),
            source,
        })
    }

    pub fn known_message_types(&self) -> Vec<MessageType> {
        self.message_types
            .iter()
            .map(|name| MessageType::from_type_path(name))
            .collect()
    }

    /// Looks up a listed message type by its `module::namespace::Name` path.
    pub fn message_type(&self, name: &str) -> Result<MessageType, ConfigError> {
        let wanted = MessageType::from_type_path(name);
        self.known_message_types()
            .into_iter()
            .find(|message_type| *message_type == wanted)
            .ok_or_else(|| ConfigError::UnknownMessageType {
                name: name.to_string(),
            })
    }

    pub fn endpoint_identity(&self) -> EndpointIdentity {
        let identity = EndpointIdentity::new(&self.endpoint.name);
        match &self.endpoint.instance_discriminator {
            Some(discriminator) => identity.with_instance_discriminator(discriminator),
            None => identity,
        }
    }

    pub fn routing_settings(&self) -> Result<RoutingSettings, ConfigError> {
        let mut settings = RoutingSettings::new();
        for route in &self.routes {
            match route {
                RouteConfig::Type {
                    message_type,
                    destination,
                } => {
                    settings.route_to_endpoint(self.message_type(message_type)?, destination)?;
                }
                RouteConfig::Module {
                    module,
                    destination,
                } => {
                    settings.route_module_to_endpoint(module, destination)?;
                }
                RouteConfig::Namespace {
                    module,
                    namespace,
                    destination,
                } => {
                    settings.route_namespace_to_endpoint(module, namespace, destination)?;
                }
            }
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigError, RouteConfig};
    use bus_router::{MessageType, RoutingError};

    const DEFAULT_CONFIG: &str = include_str!("../DEFAULT_CONFIG.json5");

    #[test]
    fn default_config_parses() {
        let config = Config::parse("DEFAULT_CONFIG.json5", DEFAULT_CONFIG)
            .expect("default config should parse");

        assert_eq!(config.endpoint.name, "Billing");
        assert_eq!(config.known_message_types().len(), 4);
        assert_eq!(
            config.routes[0],
            RouteConfig::Type {
                message_type: "contracts::sales::OrderPlaced".to_string(),
                destination: "Sales".to_string(),
            }
        );
        assert_eq!(
            config.endpoint_identity().instance_discriminator(),
            Some("blue")
        );
        let settings = config
            .routing_settings()
            .expect("default routes should register");
        assert_eq!(settings.configured_routes().len(), 4);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = Config::parse(
            "inline",
            r#"{ endpoint: { name: "Billing", queue: "x" }, message_types: [] }"#,
        );

        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn message_types_resolve_by_path() {
        let config = Config::parse(
            "inline",
            r#"{ endpoint: { name: "Billing" }, message_types: ["contracts::Ping"] }"#,
        )
        .expect("config should parse");

        assert_eq!(
            config.message_type("contracts::Ping").ok(),
            Some(MessageType::new("contracts", None, "Ping"))
        );
        assert!(matches!(
            config.message_type("contracts::Pong"),
            Err(ConfigError::UnknownMessageType { .. })
        ));
        assert_eq!(config.endpoint_identity().instance_discriminator(), None);
    }

    #[test]
    fn physical_address_destinations_are_refused() {
        let config = Config::parse(
            "inline",
            r#"{
                endpoint: { name: "Billing" },
                message_types: ["contracts::Ping"],
                routes: [{ scope: "module", module: "contracts", destination: "Ops@host-a" }],
            }"#,
        )
        .expect("config should parse");

        assert!(matches!(
            config.routing_settings(),
            Err(ConfigError::Routing(RoutingError::InvalidDestination { .. }))
        ));
    }

    #[test]
    fn missing_file_is_unreadable() {
        assert!(matches!(
            Config::load("does/not/exist.json5"),
            Err(ConfigError::Unreadable { .. })
        ));
    }
}
