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

use std::any::{type_name, Any};
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// Well-known header keys stamped by the send path.
pub mod headers {
    pub const MESSAGE_INTENT: &str = "MessageIntent";
    pub const MESSAGE_ID: &str = "MessageId";
}

/// Logical intent of an outgoing message, written to [`headers::MESSAGE_INTENT`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MessageIntent {
    Send,
    Publish,
    Reply,
}

impl Display for MessageIntent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let intent = match self {
            MessageIntent::Send => "Send",
            MessageIntent::Publish => "Publish",
            MessageIntent::Reply => "Reply",
        };
        f.write_str(intent)
    }
}

///
/// [`MessageType`] identifies the logical type of a message.
///
/// Besides its name a type belongs to a `module` (the unit routes can be registered for
/// in bulk, usually a crate) and an optional `namespace` inside that module. Both are
/// needed to match module- and namespace-scoped routes.
///
/// # Examples
///
/// ```
/// use bus_router::MessageType;
///
/// let order_placed = MessageType::new("contracts", Some("sales"), "OrderPlaced");
/// assert_eq!(order_placed.full_name(), "contracts::sales::OrderPlaced");
///
/// let unscoped = MessageType::new("contracts", None, "Ping");
/// assert_eq!(unscoped.namespace(), None);
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MessageType {
    module: String,
    namespace: Option<String>,
    name: String,
}

impl MessageType {
    pub fn new(module: &str, namespace: Option<&str>, name: &str) -> Self {
        Self {
            module: module.to_string(),
            namespace: namespace
                .filter(|namespace| !namespace.is_empty())
                .map(str::to_string),
            name: name.to_string(),
        }
    }

    /// Derives the message type from a Rust type path.
    ///
    /// The crate becomes the module and the module path in between becomes the namespace.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::from_type_path(type_name::<T>())
    }

    /// Parses `module::namespace::Name` style paths; generic arguments are ignored.
    pub fn from_type_path(path: &str) -> Self {
        let path = path.split('<').next().unwrap_or(path);
        let segments: Vec<&str> = path.split("::").filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::new("", None, ""),
            [name] => Self::new("", None, name),
            [module, name] => Self::new(module, None, name),
            [module, namespace @ .., name] => {
                Self::new(module, Some(namespace.join("::").as_str()), name)
            }
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        let mut full_name = String::new();
        for part in [Some(self.module.as_str()), self.namespace()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
        {
            full_name.push_str(part);
            full_name.push_str("::");
        }
        full_name.push_str(&self.name);
        full_name
    }
}

impl Display for MessageType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_name())
    }
}

/// The message instance travelling through the outgoing pipeline together with its type.
#[derive(Clone)]
pub struct OutgoingLogicalMessage {
    message_type: MessageType,
    instance: Arc<dyn Any + Send + Sync>,
}

impl OutgoingLogicalMessage {
    pub fn new<T: Any + Send + Sync>(instance: T) -> Self {
        Self {
            message_type: MessageType::of::<T>(),
            instance: Arc::new(instance),
        }
    }

    /// Wraps an instance under an explicitly supplied message type.
    pub fn with_type<T: Any + Send + Sync>(message_type: MessageType, instance: T) -> Self {
        Self {
            message_type,
            instance: Arc::new(instance),
        }
    }

    pub fn message_type(&self) -> &MessageType {
        &self.message_type
    }

    pub fn instance<T: Any>(&self) -> Option<&T> {
        self.instance.downcast_ref::<T>()
    }
}

impl Debug for OutgoingLogicalMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutgoingLogicalMessage")
            .field("message_type", &self.message_type)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{MessageIntent, MessageType, OutgoingLogicalMessage};

    mod contracts {
        pub mod sales {
            pub struct OrderPlaced;
        }
    }

    #[test]
    fn message_type_of_splits_crate_namespace_and_name() {
        let message_type = MessageType::of::<contracts::sales::OrderPlaced>();

        assert_eq!(message_type.module(), "bus_router");
        assert_eq!(
            message_type.namespace(),
            Some("message::tests::contracts::sales")
        );
        assert_eq!(message_type.name(), "OrderPlaced");
    }

    #[test]
    fn empty_namespace_is_normalized_to_none() {
        let message_type = MessageType::new("contracts", Some(""), "Ping");

        assert_eq!(message_type.namespace(), None);
        assert_eq!(message_type.full_name(), "contracts::Ping");
    }

    #[test]
    fn from_type_path_ignores_generic_arguments() {
        let message_type = MessageType::from_type_path("contracts::Envelope<contracts::Ping>");

        assert_eq!(message_type, MessageType::new("contracts", None, "Envelope"));
    }

    #[test]
    fn outgoing_message_downcasts_to_its_instance() {
        let message = OutgoingLogicalMessage::with_type(
            MessageType::new("contracts", Some("sales"), "OrderPlaced"),
            42_u32,
        );

        assert_eq!(message.instance::<u32>(), Some(&42));
        assert!(message.instance::<String>().is_none());
    }

    #[test]
    fn message_intent_renders_header_value() {
        assert_eq!(MessageIntent::Send.to_string(), "Send");
        assert_eq!(MessageIntent::Reply.to_string(), "Reply");
    }
}
