// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Task handle over `std::thread`.
//!
//! One task per active component. Options mirror what flight RTOS ports
//! expose (priority, stack size, core affinity, identifier); on a hosted OS
//! they are applied best-effort and never fail the start.

use std::thread::{Builder, JoinHandle};

/// Task start options. `None` means OS-chosen.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskOptions {
    /// Scheduling priority, niceness-style (lower is more favorable).
    /// Applied best-effort via `setpriority` on Unix.
    pub priority: Option<i32>,
    /// Stack size in bytes.
    pub stack_size: Option<usize>,
    /// Preferred CPU core. Recorded and logged only on hosted platforms.
    pub cpu_affinity: Option<usize>,
    /// Project-assigned task identifier, for trace correlation.
    pub identifier: Option<usize>,
}

/// Task operation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Operation completed.
    Ok,
    /// OS refused to spawn the thread.
    StartError,
    /// `start` was never called, or the task was already joined.
    NotStarted,
    /// The task routine panicked before completing.
    JoinError,
    /// `start` called twice.
    AlreadyStarted,
}

/// A started or startable task owning one `std::thread`.
pub struct Task {
    name: String,
    handle: Option<JoinHandle<()>>,
}

impl Task {
    /// Create an unstarted task.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            handle: None,
        }
    }

    /// Spawn the task routine.
    ///
    /// Priority and affinity are applied from inside the new thread before
    /// the routine runs, so the routine never observes default scheduling.
    pub fn start<F>(&mut self, opts: TaskOptions, routine: F) -> TaskStatus
    where
        F: FnOnce() + Send + 'static,
    {
        if self.handle.is_some() {
            log::warn!("[Task] '{}' already started", self.name);
            return TaskStatus::AlreadyStarted;
        }

        let mut builder = Builder::new().name(self.name.clone());
        if let Some(stack) = opts.stack_size {
            builder = builder.stack_size(stack);
        }

        let task_name = self.name.clone();
        let spawned = builder.spawn(move || {
            if let Some(prio) = opts.priority {
                apply_priority(&task_name, prio);
            }
            if let Some(core) = opts.cpu_affinity {
                log::debug!("[Task] '{}' affinity hint core {} (not applied on hosted OS)", task_name, core);
            }
            if let Some(id) = opts.identifier {
                log::debug!("[Task] '{}' started, identifier {}", task_name, id);
            }
            routine();
        });

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                TaskStatus::Ok
            }
            Err(e) => {
                log::error!("[Task] failed to start '{}': {}", self.name, e);
                TaskStatus::StartError
            }
        }
    }

    /// Block until the task routine returns.
    pub fn join(&mut self) -> TaskStatus {
        match self.handle.take() {
            Some(handle) => match handle.join() {
                Ok(()) => TaskStatus::Ok,
                Err(_) => {
                    log::error!("[Task] '{}' terminated by panic", self.name);
                    TaskStatus::JoinError
                }
            },
            None => TaskStatus::NotStarted,
        }
    }

    /// True between a successful `start` and `join`.
    pub fn is_started(&self) -> bool {
        self.handle.is_some()
    }

    /// Task name given at creation.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(unix)]
fn apply_priority(name: &str, prio: i32) {
    // PRIO_PROCESS with who=0 adjusts the calling thread on Linux.
    let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS as _, 0, prio) };
    if rc != 0 {
        log::debug!("[Task] '{}' priority {} rejected, running at inherited priority", name, prio);
    }
}

#[cfg(not(unix))]
fn apply_priority(name: &str, prio: i32) {
    log::debug!("[Task] '{}' priority {} not applied on this platform", name, prio);
}
