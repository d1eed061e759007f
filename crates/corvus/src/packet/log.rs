// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Event (log) packet: descriptor + event id + timestamp + argument bytes.
//!
//! The argument block carries no inner length; the outer transport frame
//! bounds the packet, so the decoder consumes to the end of the buffer.

use super::{expect_descriptor, write_descriptor, PacketType};
use crate::ser::{Endian, LogBuffer, SerBuffer, SerResult, Serializable, Time};
use crate::types::EventIdType;

/// One serialized event on its way to (or from) the ground.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogPacket {
    pub id: EventIdType,
    pub time: Time,
    pub args: LogBuffer,
}

impl LogPacket {
    /// Build a packet from an event's id, timestamp, and serialized args.
    pub fn new(id: EventIdType, time: Time, args: LogBuffer) -> Self {
        Self { id, time, args }
    }
}

impl Serializable for LogPacket {
    fn serialize(&self, buf: &mut dyn SerBuffer) -> SerResult<()> {
        write_descriptor(buf, PacketType::Log)?;
        buf.write_u32(self.id, Endian::Big)?;
        self.time.serialize(buf)?;
        // Length omitted: the outer frame carries it.
        buf.write_bytes_raw(self.args.as_bytes())
    }

    fn deserialize(&mut self, buf: &mut dyn SerBuffer) -> SerResult<()> {
        expect_descriptor(buf, PacketType::Log)?;
        self.id = buf.read_u32(Endian::Big)?;
        self.time.deserialize(buf)?;

        self.args.reset_ser();
        let rest = buf.remaining_read();
        let pos = buf.read_pos();
        self.args.write_bytes_raw(&buf.raw()[pos..pos + rest])?;
        buf.set_read_pos(pos + rest)
    }

    #[cfg(feature = "serializable-text")]
    fn to_text(&self) -> String {
        format!(
            "LogPacket(id={} time={} args={}B)",
            self.id,
            self.time.to_text(),
            self.args.len()
        )
    }
}
