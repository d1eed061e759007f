// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Telemetry packet: descriptor + back-to-back channel entries.
//!
//! Each entry is `(channel id, timestamp, length-prefixed value bytes)`.
//! A packet aggregates as many entries as its com buffer holds; the writer
//! checks room before each append and reports when the packet is full so
//! the caller can start the next one.

use super::{expect_descriptor, write_descriptor, PacketType};
use crate::ser::{ComBuffer, Endian, SerBuffer, SerResult, Serializable, Time, TlmBuffer};
use crate::types::ChanIdType;

/// One decoded telemetry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlmEntry {
    pub id: ChanIdType,
    pub time: Time,
    pub value: TlmBuffer,
}

/// Telemetry packet under construction (flight side) or decode (ground).
#[derive(Debug, Clone)]
pub struct TlmPacket {
    buf: ComBuffer,
    entries: usize,
}

impl TlmPacket {
    /// Start an empty packet: descriptor written, no entries.
    pub fn new() -> Self {
        let mut buf = ComBuffer::new();
        // Cannot fail: descriptor always fits an empty com buffer.
        let _ = write_descriptor(&mut buf, PacketType::Telemetry);
        Self { buf, entries: 0 }
    }

    /// Append one channel entry.
    ///
    /// On `BufferEmpty` the packet is unchanged (length restored); the
    /// caller should ship it and start a fresh one.
    pub fn add_entry(&mut self, id: ChanIdType, time: &Time, value: &TlmBuffer) -> SerResult<()> {
        let mark = self.buf.len();
        let result = (|| {
            self.buf.write_u32(id, Endian::Big)?;
            time.serialize(&mut self.buf)?;
            self.buf.write_bytes(value.as_bytes(), Endian::Big)
        })();
        if result.is_err() {
            // A partial entry would desync the ground decoder.
            let _ = self.buf.set_len(mark);
            return result;
        }
        self.entries += 1;
        Ok(())
    }

    /// Entries appended so far.
    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// The wire form accumulated so far.
    pub fn as_buffer(&self) -> &ComBuffer {
        &self.buf
    }

    /// Decode all entries from a received packet buffer.
    pub fn decode(buf: &mut dyn SerBuffer) -> SerResult<Vec<TlmEntry>> {
        expect_descriptor(buf, PacketType::Telemetry)?;
        let mut entries = Vec::new();
        while buf.remaining_read() > 0 {
            let id = buf.read_u32(Endian::Big)?;
            let mut time = Time::zero();
            time.deserialize(buf)?;
            let mut value = TlmBuffer::new();
            value.deserialize(buf)?;
            entries.push(TlmEntry { id, time, value });
        }
        Ok(entries)
    }
}

impl Default for TlmPacket {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ser::{SerError, TimeBase};

    fn value_u32(v: u32) -> TlmBuffer {
        let mut b = TlmBuffer::new();
        b.write_u32(v, Endian::Big).expect("write should succeed");
        b
    }

    #[test]
    fn test_entries_roundtrip_in_order() {
        let t = Time::new(TimeBase::Workstation, 5, 6);
        let mut pkt = TlmPacket::new();
        pkt.add_entry(100, &t, &value_u32(1)).expect("add should succeed");
        pkt.add_entry(200, &t, &value_u32(2)).expect("add should succeed");
        pkt.add_entry(300, &t, &value_u32(3)).expect("add should succeed");
        assert_eq!(pkt.entry_count(), 3);

        let mut wire = pkt.as_buffer().clone();
        let entries = TlmPacket::decode(&mut wire).expect("decode should succeed");
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![100, 200, 300]
        );
        for (i, e) in entries.iter().enumerate() {
            assert_eq!(e.time, t);
            let mut v = e.value.clone();
            assert_eq!(
                v.read_u32(Endian::Big).expect("read should succeed"),
                (i + 1) as u32
            );
        }
    }

    #[test]
    fn test_full_packet_rejects_entry_atomically() {
        let t = Time::zero();
        let big = {
            let mut b = TlmBuffer::new();
            b.write_bytes_raw(&[0xAA; 120]).expect("write should succeed");
            b
        };
        let mut pkt = TlmPacket::new();
        let mut added = 0;
        let overflow = loop {
            match pkt.add_entry(added, &t, &big) {
                Ok(()) => added += 1,
                Err(e) => break e,
            }
        };
        assert_eq!(overflow, SerError::BufferEmpty);
        assert!(added > 0);
        assert_eq!(pkt.entry_count(), added as usize);

        // The rejected entry left no partial bytes behind.
        let mut wire = pkt.as_buffer().clone();
        let entries = TlmPacket::decode(&mut wire).expect("decode should succeed");
        assert_eq!(entries.len(), added as usize);
    }

    #[test]
    fn test_decode_requires_telemetry_descriptor() {
        let mut wire = ComBuffer::new();
        write_descriptor(&mut wire, PacketType::Idle).expect("write should succeed");
        assert_eq!(
            TlmPacket::decode(&mut wire),
            Err(SerError::TypeMismatch)
        );
    }
}
