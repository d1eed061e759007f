// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Framework-wide identifier and store types.
//!
//! Widths match the original flight heritage: identifiers are one word,
//! buffer-size counts are half a word. A code generator offsets locally
//! numbered ids by a component's id base to form these global values.

/// Command opcode.
pub type OpcodeType = u32;

/// Telemetry channel identifier.
pub type ChanIdType = u32;

/// Event (log) identifier.
pub type EventIdType = u32;

/// Parameter identifier.
pub type PrmIdType = u32;

/// Leading packet discriminator word.
pub type PacketDescriptorType = u32;

/// Length-prefix count for serialized byte runs.
pub type SizeStoreType = u16;

/// On-wire storage for a time base tag.
pub type TimeBaseStoreType = u16;
