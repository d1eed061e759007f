// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Corvus global configuration - single source of truth.
//!
//! This module centralizes the compile-time sizing constants for the
//! framework. **Never hardcode these elsewhere!** Capacities are chosen at
//! build time; anything that must vary at runtime does not belong here.
//!
//! Feature switches (names, tracing, registration, assertion payloads) live
//! in `Cargo.toml`; this module owns only numbers.

// =======================================================================
// Serialize-buffer capacities (bytes)
// One constant per wire-facing buffer alias in `ser::buffer`.
// =======================================================================

/// Capacity of a general com buffer (framed transport payloads).
pub const COM_BUFFER_MAX_SIZE: usize = 512;

/// Capacity of a single telemetry channel value.
pub const TLM_BUFFER_MAX_SIZE: usize = 140;

/// Capacity of a single parameter value.
pub const PARAM_BUFFER_MAX_SIZE: usize = 140;

/// Capacity of a serialized event (log) argument block.
pub const LOG_BUFFER_MAX_SIZE: usize = 256;

/// Capacity of a sequencer statement argument block.
pub const STATEMENT_ARG_BUFFER_MAX_SIZE: usize = 128;

/// Capacity of the marshalled-argument blob inside a queued port message.
///
/// Must hold the largest async port argument; a length-prefixed
/// [`COM_BUFFER_MAX_SIZE`] payload is the worst case.
pub const MSG_ARG_BUFFER_MAX_SIZE: usize = COM_BUFFER_MAX_SIZE + 8;

// =======================================================================
// Rate-group driver
// =======================================================================

/// Number of divider slots (and cycle output ports) on the rate-group
/// driver. Unused slots stay at divisor 0 (disabled).
pub const RATE_GROUP_DIVIDER_SIZE: usize = 10;

// =======================================================================
// Assertions
// =======================================================================

/// Maximum numeric argument slots carried by an assertion report.
pub const ASSERT_ARG_SLOTS: usize = 6;
