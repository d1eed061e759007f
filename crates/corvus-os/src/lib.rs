// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! # corvus-os - OS abstraction layer for the Corvus runtime
//!
//! Uniform wrappers over the host operating system primitives the framework
//! core builds on: preemptive tasks, bounded message queues, mutexes, and a
//! raw clock. Flight targets substitute their own backend behind the same
//! surface; this crate provides the hosted (std) backend.
//!
//! ## Modules
//!
//! - [`task`] - Task handle over `std::thread` with priority/stack/affinity
//!   options (best-effort on hosted platforms)
//! - [`queue`] - Bounded FIFO over crossbeam channels with blocking and
//!   non-blocking send/receive
//! - [`mutex`] - Mutex over `parking_lot` (no poisoning, `const` init)
//! - [`clock`] - Raw timestamp sampling for cycle ports
//!
//! ## Design constraints
//!
//! - No allocation after construction: queues preallocate their slots,
//!   send/receive move values without boxing.
//! - Blocking is explicit: every queue operation takes a [`queue::Blocking`]
//!   mode; nothing blocks unless asked to.

pub mod clock;
pub mod mutex;
pub mod queue;
pub mod task;

pub use clock::RawTime;
pub use mutex::{Mutex, MutexGuard};
pub use queue::{Blocking, Queue, QueueError};
pub use task::{Task, TaskOptions, TaskStatus};
