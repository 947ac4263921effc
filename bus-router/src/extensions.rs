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

//! Per-call extension state keyed by type.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

/// Bag of per-send state, holding at most one value per type.
///
/// Owned by exactly one send operation; nothing in here is shared between sends.
#[derive(Default)]
pub struct ContextBag {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ContextBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<T>())
    }

    pub fn get_mut<T: Any + Send + Sync>(&mut self) -> Option<&mut T> {
        self.entries
            .get_mut(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_mut::<T>())
    }

    /// Returns the stored value of type `T`, inserting `T::default()` first when absent.
    ///
    /// # Panics
    ///
    /// Never in practice: every entry is written by `set` or `get_or_create` under
    /// `TypeId::of::<T>()` with a value of type `T`, so the downcast always matches its key.
    pub fn get_or_create<T: Any + Send + Sync + Default>(&mut self) -> &mut T {
        self.entries
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(T::default()))
            .downcast_mut::<T>()
            .expect("context bag entries are keyed by their own TypeId")
    }

    /// Stores `value`, returning the value it replaced.
    pub fn set<T: Any + Send + Sync>(&mut self, value: T) -> Option<T> {
        self.entries
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|previous| previous.downcast::<T>().ok())
            .map(|previous| *previous)
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }
}

impl Debug for ContextBag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextBag")
            .field("entries", &self.entries.len())
            .finish()
    }
}
