// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Component bases: the passive / queued / active tier hierarchy.
//!
//! - Passive: name, instance number, identifier base. Runs entirely on its
//!   callers' tasks.
//! - Queued: adds a bounded message queue and a dropped-message counter;
//!   still runs on whichever task drains it.
//! - Active: adds an owned task that drains the queue through the
//!   lifecycle state machine.
//!
//! Rust has no implementation inheritance; tiers compose by embedding the
//! tier below and delegating its accessors.

pub mod active;
pub mod passive;
pub mod queued;

pub use active::{ActiveComponent, Lifecycle};
pub use passive::PassiveComponent;
pub use queued::{Msg, MsgDispatch, MsgHandler, QueuedComponent, ACTIVE_COMPONENT_EXIT};
