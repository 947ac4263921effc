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

//! Periodic tasks driven by deferred messages to this endpoint.
//!
//! Starting a task first sends a [`ScheduledTask`] message to this endpoint's shared
//! queue with a delivery delay of one period, then runs the task body. Whichever
//! instance receives that message calls [`DefaultScheduler::handle_scheduled_task`],
//! which starts the next round. No timers live in the process.

use crate::error::RoutingError;
use crate::message::OutgoingLogicalMessage;
use crate::observability::events;
use crate::send_options::SendOptions;
use crate::session::MessageSession;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, error};
use uuid::Uuid;

const COMPONENT: &str = "scheduler";

pub type TaskError = Box<dyn Error + Send + Sync>;

type TaskBody = Arc<dyn Fn() -> BoxFuture<'static, Result<(), TaskError>> + Send + Sync>;

/// A named piece of work repeated every `every`.
#[derive(Clone)]
pub struct TaskDefinition {
    id: Uuid,
    name: String,
    every: Duration,
    task: TaskBody,
}

impl TaskDefinition {
    pub fn new<F, Fut>(name: &str, every: Duration, task: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            every,
            task: Arc::new(move || -> BoxFuture<'static, Result<(), TaskError>> {
                Box::pin(task())
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn every(&self) -> Duration {
        self.every
    }
}

impl Debug for TaskDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskDefinition")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("every", &self.every)
            .finish_non_exhaustive()
    }
}

/// Message that triggers the next round of a scheduled task.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScheduledTask {
    pub task_id: Uuid,
    pub name: String,
    pub every: Duration,
}

#[derive(Debug)]
pub enum SchedulerError {
    UnknownTask { task_id: Uuid },
    DeferFailed { task_id: Uuid, source: RoutingError },
    TaskFailed { task_id: Uuid, source: TaskError },
}

impl Display for SchedulerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerError::UnknownTask { task_id } => {
                write!(f, "no task with id {task_id} has been scheduled")
            }
            SchedulerError::DeferFailed { task_id, source } => {
                write!(f, "failed to defer the next run of task {task_id}: {source}")
            }
            SchedulerError::TaskFailed { task_id, source } => {
                write!(f, "task {task_id} failed: {source}")
            }
        }
    }
}

impl Error for SchedulerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SchedulerError::UnknownTask { .. } => None,
            SchedulerError::DeferFailed { source, .. } => Some(source),
            SchedulerError::TaskFailed { source, .. } => Some(source.as_ref()),
        }
    }
}

#[derive(Default)]
pub struct DefaultScheduler {
    scheduled_tasks: RwLock<HashMap<Uuid, TaskDefinition>>,
}

impl DefaultScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `task`; it does not run until started.
    pub fn schedule(&self, task: TaskDefinition) -> Uuid {
        let task_id = task.id;
        debug!(
            event = events::SCHEDULER_TASK_SCHEDULED,
            component = COMPONENT,
            task_id = %task_id,
            task_name = task.name.as_str(),
            every_ms = task.every.as_millis() as u64,
            "task scheduled"
        );
        self.scheduled_tasks
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(task_id, task);
        task_id
    }

    pub fn is_scheduled(&self, task_id: Uuid) -> bool {
        self.scheduled_tasks
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(&task_id)
    }

    /// Defers the next run through `session`, then runs the task body once.
    pub async fn start(
        &self,
        task_id: Uuid,
        session: &dyn MessageSession,
    ) -> Result<(), SchedulerError> {
        let task = self
            .scheduled_tasks
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&task_id)
            .cloned()
            .ok_or(SchedulerError::UnknownTask { task_id })?;

        self.defer(&task, session)
            .await
            .map_err(|source| SchedulerError::DeferFailed { task_id, source })?;

        (task.task)().await.map_err(|source| {
            error!(
                event = events::SCHEDULER_TASK_FAILED,
                component = COMPONENT,
                task_id = %task_id,
                task_name = task.name.as_str(),
                err = %source,
                "scheduled task failed"
            );
            SchedulerError::TaskFailed { task_id, source }
        })
    }

    /// Reacts to a delivered [`ScheduledTask`] by starting the next round.
    pub async fn handle_scheduled_task(
        &self,
        message: &ScheduledTask,
        session: &dyn MessageSession,
    ) -> Result<(), SchedulerError> {
        self.start(message.task_id, session).await
    }

    async fn defer(
        &self,
        task: &TaskDefinition,
        session: &dyn MessageSession,
    ) -> Result<(), RoutingError> {
        let mut options = SendOptions::new();
        options.route_to_this_endpoint()?;
        options.delay_delivery_with(task.every);

        session
            .send(
                OutgoingLogicalMessage::new(ScheduledTask {
                    task_id: task.id,
                    name: task.name.clone(),
                    every: task.every,
                }),
                options,
            )
            .await?;

        debug!(
            event = events::SCHEDULER_TASK_DEFERRED,
            component = COMPONENT,
            task_id = %task.id,
            task_name = task.name.as_str(),
            "next task run deferred"
        );
        Ok(())
    }
}
