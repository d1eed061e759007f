// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! # Corvus - Component runtime for embedded flight software
//!
//! A framework in which applications are composed from named components
//! that exchange typed messages over statically wired ports. The runtime
//! hosts the components, schedules their work, serializes their data for
//! transport and storage, and abstracts the host OS through the
//! `corvus-os` crate.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use corvus::comp::{ActiveComponent, MsgDispatch, MsgHandler};
//! use corvus::ser::SerBuffer;
//! use corvus_os::TaskOptions;
//!
//! struct Worker;
//!
//! impl MsgHandler for Worker {
//!     fn handle_msg(&mut self, selector: u32, args: &mut dyn SerBuffer) -> MsgDispatch {
//!         let _ = (selector, args);
//!         MsgDispatch::Ok
//!     }
//! }
//!
//! let mut worker = ActiveComponent::new("worker", 0, Worker);
//! worker.create_queue(16, 64);
//! worker.start(TaskOptions::default());
//! worker.exit();
//! worker.join();
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |                      Service Components                      |
//! |  RateGroupDriver | ComSplitter | TlmStore | PrmStore | Fatal |
//! +--------------------------------------------------------------+
//! |                     Component Execution                      |
//! |     Passive -> Queued -> Active | Msg dispatch | Ports       |
//! +--------------------------------------------------------------+
//! |                   Serialization & Packets                    |
//! |   SerBuf | Endian codecs | Time | Com/Cmd/Tlm/Log packets    |
//! +--------------------------------------------------------------+
//! |                   OS Abstraction (corvus-os)                 |
//! |         Task | Queue | Mutex | RawTime clock sample          |
//! +--------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`comp::ActiveComponent`] | Component with an owned task draining its queue |
//! | [`port::OutputPort`] | Typed one-way port: sync, guarded, or async |
//! | [`ser::SerBuf`] | Fixed-capacity endian-explicit serialize buffer |
//! | [`packet::TlmPacket`] | Multi-channel telemetry downlink packet |
//! | [`svc::RateGroupDriver`] | Tick fan-out to phased periodic schedules |
//!
//! ## Modules Overview
//!
//! - [`comp`] - Component bases (start here)
//! - [`port`] - Port wiring and invocation
//! - [`ser`] - Serialization buffers, time tags
//! - [`packet`] - Wire packet layouts
//! - [`svc`] - Reusable service components
//! - [`fault`] - Assertion handling
//! - [`mem`] - Allocator registry

/// Component bases: the passive / queued / active tier hierarchy.
pub mod comp;
/// Compile-time capacities and tuning constants.
pub mod config;
/// Assertion handling and the process-wide assert hook.
pub mod fault;
/// Memory allocator registry (recoverable-region support).
pub mod mem;
/// Wire packet layouts (command, telemetry, log).
pub mod packet;
/// Typed port wiring between components.
pub mod port;
/// Process-wide object registry for debug dumps.
#[cfg(feature = "object-registration")]
pub mod registry;
/// Endian-explicit fixed-capacity serialization.
pub mod ser;
/// Reusable service components (rate groups, telemetry, parameters).
pub mod svc;
/// Fixed-width identifier types shared across the framework.
pub mod types;

pub use comp::{ActiveComponent, Lifecycle, MsgDispatch, MsgHandler, PassiveComponent, QueuedComponent};
pub use port::{CallPort, NoArgs, OutputPort, QueueFullPolicy};
pub use ser::{ComBuffer, Endian, SerBuffer, SerError, SerResult, Serializable, Time, TimeBase};
