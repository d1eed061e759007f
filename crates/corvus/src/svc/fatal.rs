// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Fatal event sink.
//!
//! A fatal event is terminal: whatever announced it has decided the
//! system cannot continue. The handler logs the event id and hands off to
//! a process-wide hook. Deployments install a hook that latches reset
//! reasons and reboots; tests install a capturing hook and survive.
//! Without a hook the handler panics, which halts the process under
//! flight `panic = "abort"` profiles.

use crate::comp::PassiveComponent;
use crate::types::EventIdType;
use parking_lot::RwLock;
use std::sync::Arc;

/// Receiver for the terminal fatal path.
pub trait FatalHook: Send + Sync {
    fn fatal_report(&self, event_id: EventIdType);
}

static FATAL_HOOK: RwLock<Option<Arc<dyn FatalHook>>> = RwLock::new(None);

/// Install the process-wide fatal hook, replacing any previous one.
pub fn install_fatal_hook(hook: Arc<dyn FatalHook>) {
    *FATAL_HOOK.write() = Some(hook);
}

/// Remove the process-wide fatal hook.
pub fn clear_fatal_hook() {
    *FATAL_HOOK.write() = None;
}

/// RAII fatal hook installation for tests.
pub struct ScopedFatalHook;

impl ScopedFatalHook {
    pub fn install(hook: Arc<dyn FatalHook>) -> Self {
        install_fatal_hook(hook);
        Self
    }
}

impl Drop for ScopedFatalHook {
    fn drop(&mut self) {
        clear_fatal_hook();
    }
}

/// Component terminus of the fatal announcement port.
pub struct FatalHandler {
    base: PassiveComponent,
}

impl FatalHandler {
    pub fn new(name: &str, instance: u32) -> Self {
        Self {
            base: PassiveComponent::new(name, instance),
        }
    }

    /// Fatal announcement input. Logs, then hands off to the hook; does
    /// not return through the default path.
    pub fn fatal_receive(&self, event_id: EventIdType) {
        log::error!(
            "[FatalHandler] '{}' FATAL event {} received",
            self.base.name(),
            event_id
        );
        let hook = FATAL_HOOK.read().clone();
        match hook {
            Some(hook) => hook.fatal_report(event_id),
            None => panic!("FATAL event {} with no handler installed", event_id),
        }
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }
}
