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

mod support;

use bus_router::scheduler::{DefaultScheduler, ScheduledTask, SchedulerError, TaskDefinition};
use bus_router::{DeliveryConstraint, MessageType, RouteOption, RoutingSettings};
use integration_test_utils::{RecordingDispatchStage, TestableMessageSession};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use support::make_component;
use uuid::Uuid;

fn counting_task(every: Duration) -> (TaskDefinition, Arc<AtomicUsize>) {
    let runs = Arc::new(AtomicUsize::new(0));
    let task_runs = runs.clone();
    let task = TaskDefinition::new("count", every, move || {
        let runs = task_runs.clone();
        async move {
            runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    });
    (task, runs)
}

#[tokio::test]
async fn starting_a_task_defers_the_next_run() {
    integration_test_utils::init_logging();

    let scheduler = DefaultScheduler::new();
    let (task, _) = counting_task(Duration::from_secs(5));
    let task_id = scheduler.schedule(task);
    let session = TestableMessageSession::new();

    scheduler
        .start(task_id, &session)
        .await
        .expect("task should start");

    let sent = session.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message_type(), &MessageType::of::<ScheduledTask>());
    assert_eq!(
        sent[0].route_option,
        RouteOption::RouteToAnyInstanceOfThisEndpoint
    );
    assert_eq!(
        sent[0].delivery_constraint,
        Some(DeliveryConstraint::DelayDeliveryWith(Duration::from_secs(5)))
    );
    assert_eq!(
        sent[0]
            .message
            .instance::<ScheduledTask>()
            .map(|scheduled| scheduled.task_id),
        Some(task_id)
    );
}

#[tokio::test]
async fn starting_a_task_runs_its_body_once() {
    integration_test_utils::init_logging();

    let scheduler = DefaultScheduler::new();
    let (task, runs) = counting_task(Duration::from_secs(5));
    let task_id = scheduler.schedule(task);

    scheduler
        .start(task_id, &TestableMessageSession::new())
        .await
        .expect("task should start");

    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn handling_the_deferred_message_starts_the_next_round() {
    integration_test_utils::init_logging();

    let scheduler = DefaultScheduler::new();
    let (task, runs) = counting_task(Duration::from_millis(250));
    let task_id = scheduler.schedule(task);
    let session = TestableMessageSession::new();

    scheduler
        .start(task_id, &session)
        .await
        .expect("task should start");
    let deferred = session.sent_messages().await[0]
        .message
        .instance::<ScheduledTask>()
        .cloned()
        .expect("a ScheduledTask was sent");
    scheduler
        .handle_scheduled_task(&deferred, &session)
        .await
        .expect("next round should start");

    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert_eq!(session.sent_messages().await.len(), 2);
}

#[tokio::test]
async fn unknown_and_failing_tasks_are_reported() {
    integration_test_utils::init_logging();

    let scheduler = DefaultScheduler::new();
    let session = TestableMessageSession::new();

    let err = scheduler
        .start(Uuid::new_v4(), &session)
        .await
        .expect_err("nothing was scheduled");
    assert!(matches!(err, SchedulerError::UnknownTask { .. }));
    assert!(session.sent_messages().await.is_empty());

    let task_id = scheduler.schedule(TaskDefinition::new(
        "broken",
        Duration::from_secs(1),
        || async { Err("disk full".into()) },
    ));
    let err = scheduler
        .start(task_id, &session)
        .await
        .expect_err("the body fails");

    assert!(matches!(err, SchedulerError::TaskFailed { task_id: failed, .. } if failed == task_id));
    assert_eq!(session.sent_messages().await.len(), 1);
}

#[tokio::test]
async fn deferred_message_travels_the_send_path_to_this_endpoint() {
    integration_test_utils::init_logging();

    let component = make_component(RoutingSettings::new(), Some("blue"));
    let dispatch = RecordingDispatchStage::new();
    let session = component.session(Arc::new(dispatch.clone()));
    let scheduler = DefaultScheduler::new();
    let (task, runs) = counting_task(Duration::from_secs(60));
    let task_id = scheduler.schedule(task);

    scheduler
        .start(task_id, &session)
        .await
        .expect("task should start");

    let dispatched = dispatch.dispatched().await;
    assert_eq!(dispatched.len(), 1);
    assert_eq!(dispatched[0].destinations, vec!["Billing".to_string()]);
    assert_eq!(
        dispatched[0].delivery_constraint,
        Some(DeliveryConstraint::DelayDeliveryWith(Duration::from_secs(60)))
    );
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}
