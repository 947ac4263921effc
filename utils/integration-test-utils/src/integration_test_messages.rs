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

use bus_router::{MessageType, OutgoingLogicalMessage};

pub const CONTRACTS_MODULE: &str = "contracts";
pub const SALES_NAMESPACE: &str = "sales";
pub const BILLING_NAMESPACE: &str = "billing";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderPlaced {
    pub order_id: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrderCancelled {
    pub order_id: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InvoiceClosed {
    pub invoice_id: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ping;

pub fn order_placed_type() -> MessageType {
    MessageType::new(CONTRACTS_MODULE, Some(SALES_NAMESPACE), "OrderPlaced")
}

pub fn order_cancelled_type() -> MessageType {
    MessageType::new(CONTRACTS_MODULE, Some(SALES_NAMESPACE), "OrderCancelled")
}

pub fn invoice_closed_type() -> MessageType {
    MessageType::new(CONTRACTS_MODULE, Some(BILLING_NAMESPACE), "InvoiceClosed")
}

pub fn ping_type() -> MessageType {
    MessageType::new(CONTRACTS_MODULE, None, "Ping")
}

pub fn known_message_types() -> Vec<MessageType> {
    vec![
        order_placed_type(),
        order_cancelled_type(),
        invoice_closed_type(),
        ping_type(),
    ]
}

pub fn order_placed(order_id: u64) -> OutgoingLogicalMessage {
    OutgoingLogicalMessage::with_type(order_placed_type(), OrderPlaced { order_id })
}

pub fn order_cancelled(order_id: u64) -> OutgoingLogicalMessage {
    OutgoingLogicalMessage::with_type(order_cancelled_type(), OrderCancelled { order_id })
}

pub fn invoice_closed(invoice_id: u64) -> OutgoingLogicalMessage {
    OutgoingLogicalMessage::with_type(invoice_closed_type(), InvoiceClosed { invoice_id })
}

pub fn ping() -> OutgoingLogicalMessage {
    OutgoingLogicalMessage::with_type(ping_type(), Ping)
}
