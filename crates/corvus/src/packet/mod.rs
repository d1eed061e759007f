// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Typed wire packets.
//!
//! Every packet leads with a one-word descriptor so the transport can
//! demultiplex in a single pass: read the word, hand the rest to the right
//! decoder. Kind-specific layouts follow the descriptor; a decoder that
//! meets the wrong descriptor reports [`SerError::TypeMismatch`] and
//! touches nothing else.

pub mod cmd;
pub mod log;
pub mod tlm;

pub use cmd::CmdPacket;
pub use log::LogPacket;
pub use tlm::{TlmEntry, TlmPacket};

use crate::ser::{Endian, SerBuffer, SerError, SerResult};
use crate::types::PacketDescriptorType;

/// Packet kind discriminator. Values are wire-stable flight heritage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PacketType {
    Command = 0,
    Telemetry = 1,
    Log = 2,
    File = 3,
    PacketizedTlm = 4,
    Dp = 5,
    Idle = 6,
    Unknown = 0xFF,
}

impl PacketType {
    /// Map a wire word to a kind; anything unrecognized is `Unknown`.
    pub fn from_wire(value: PacketDescriptorType) -> Self {
        match value {
            0 => PacketType::Command,
            1 => PacketType::Telemetry,
            2 => PacketType::Log,
            3 => PacketType::File,
            4 => PacketType::PacketizedTlm,
            5 => PacketType::Dp,
            6 => PacketType::Idle,
            _ => PacketType::Unknown,
        }
    }
}

/// Write the leading descriptor word for `kind`.
pub(crate) fn write_descriptor(buf: &mut dyn SerBuffer, kind: PacketType) -> SerResult<()> {
    buf.write_u32(kind as PacketDescriptorType, Endian::Big)
}

/// Consume the descriptor word, requiring `expected`.
///
/// On mismatch the cursor is restored and [`SerError::TypeMismatch`]
/// returned, so the caller can retry with another decoder.
pub(crate) fn expect_descriptor(buf: &mut dyn SerBuffer, expected: PacketType) -> SerResult<()> {
    let start = buf.read_pos();
    let word = buf.read_u32(Endian::Big)?;
    if PacketType::from_wire(word) != expected {
        buf.set_read_pos(start)?;
        return Err(SerError::TypeMismatch);
    }
    Ok(())
}
