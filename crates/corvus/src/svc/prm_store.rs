// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Parameter store: keyed opaque parameter values.
//!
//! Parameter identifiers live out-of-band on the port; the store sees an
//! id and an opaque value payload. Components read their parameters at
//! initialization and fall back to compiled-in defaults when the store
//! has no value, reporting the outcome so ground can tell which source
//! won.

use crate::comp::PassiveComponent;
use crate::ser::ParamBuffer;
use crate::types::PrmIdType;
use dashmap::DashMap;

/// Outcome of a parameter read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamValid {
    /// The store held a value; the out-param carries it.
    Valid,
    /// No stored value; the caller should use its compiled-in default.
    Invalid,
    /// The caller resolved the read with its default. Components report
    /// this state in their own bookkeeping; the store never returns it.
    Default,
}

pub struct PrmStore {
    base: PassiveComponent,
    params: DashMap<PrmIdType, ParamBuffer>,
}

impl PrmStore {
    pub fn new(name: &str, instance: u32) -> Self {
        Self {
            base: PassiveComponent::new(name, instance),
            params: DashMap::new(),
        }
    }

    /// Read parameter `id` into `value`.
    pub fn get_prm(&self, id: PrmIdType, value: &mut ParamBuffer) -> ParamValid {
        match self.params.get(&id) {
            Some(stored) => {
                *value = stored.clone();
                ParamValid::Valid
            }
            None => ParamValid::Invalid,
        }
    }

    /// Store parameter `id`, replacing any previous value.
    pub fn set_prm(&self, id: PrmIdType, value: &ParamBuffer) {
        log::debug!("[PrmStore] '{}' set parameter {}", self.base.name(), id);
        self.params.insert(id, value.clone());
    }

    /// Remove parameter `id`; true if it was present.
    pub fn clear_prm(&self, id: PrmIdType) -> bool {
        self.params.remove(&id).is_some()
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }
}
