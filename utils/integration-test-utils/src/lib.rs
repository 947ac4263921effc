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

mod integration_test_logging;
pub use integration_test_logging::init_logging;

mod integration_test_dispatch;
pub use integration_test_dispatch::{DispatchedMessage, FailingDispatchStage, RecordingDispatchStage};

mod integration_test_session;
pub use integration_test_session::{SentMessage, TestableMessageSession};

mod integration_test_messages;
pub use integration_test_messages::{
    invoice_closed, invoice_closed_type, known_message_types, order_cancelled,
    order_cancelled_type, order_placed, order_placed_type, ping, ping_type, InvoiceClosed,
    OrderCancelled, OrderPlaced, Ping, BILLING_NAMESPACE, CONTRACTS_MODULE, SALES_NAMESPACE,
};
