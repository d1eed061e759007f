// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Command packet: descriptor + opcode + opaque argument bytes.
//!
//! Flight software only ever *receives* commands, so this type has no
//! serialize side at all; building command packets is a ground concern and
//! misuse is a compile error rather than a runtime assert.

use super::{expect_descriptor, PacketType};
use crate::ser::{ComBuffer, Endian, SerBuffer, SerResult};
use crate::types::OpcodeType;

/// A decoded command: opcode plus raw argument bytes.
///
/// Argument bytes run to the end of the enclosing buffer; their layout is
/// the command handler's contract, opaque here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdPacket {
    opcode: OpcodeType,
    args: ComBuffer,
}

impl CmdPacket {
    /// Decode a command packet from `buf`.
    ///
    /// Consumes the descriptor (must be [`PacketType::Command`], else
    /// `TypeMismatch` with the cursor restored), the opcode, and all
    /// remaining bytes as arguments.
    pub fn from_buffer(buf: &mut dyn SerBuffer) -> SerResult<Self> {
        expect_descriptor(buf, PacketType::Command)?;
        let opcode = buf.read_u32(Endian::Big)?;

        let mut args = ComBuffer::new();
        let rest = buf.remaining_read();
        let pos = buf.read_pos();
        args.write_bytes_raw(&buf.raw()[pos..pos + rest])?;
        buf.set_read_pos(pos + rest)?;

        Ok(Self { opcode, args })
    }

    /// Command opcode (already offset into the global opcode space).
    pub fn opcode(&self) -> OpcodeType {
        self.opcode
    }

    /// Raw argument bytes, positioned for deserialization by the handler.
    pub fn args(&self) -> &ComBuffer {
        &self.args
    }

    /// Mutable argument access so a handler can deserialize in place.
    pub fn args_mut(&mut self) -> &mut ComBuffer {
        &mut self.args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::write_descriptor;
    use crate::ser::{SerBuf, SerError};

    fn encode_cmd(opcode: u32, args: &[u8]) -> SerBuf<64> {
        let mut buf = SerBuf::<64>::new();
        write_descriptor(&mut buf, PacketType::Command).expect("write should succeed");
        buf.write_u32(opcode, Endian::Big)
            .expect("write should succeed");
        buf.write_bytes_raw(args).expect("write should succeed");
        buf
    }

    #[test]
    fn test_decode_opcode_and_args() {
        let mut buf = encode_cmd(0x100, &[0xDE, 0xAD]);
        let pkt = CmdPacket::from_buffer(&mut buf).expect("decode should succeed");
        assert_eq!(pkt.opcode(), 0x100);
        assert_eq!(pkt.args().as_bytes(), &[0xDE, 0xAD]);
        assert_eq!(buf.remaining_read(), 0);
    }

    #[test]
    fn test_decode_empty_args() {
        let mut buf = encode_cmd(7, &[]);
        let pkt = CmdPacket::from_buffer(&mut buf).expect("decode should succeed");
        assert_eq!(pkt.opcode(), 7);
        assert!(pkt.args().is_empty());
    }

    #[test]
    fn test_wrong_descriptor_is_type_mismatch() {
        let mut buf = SerBuf::<64>::new();
        write_descriptor(&mut buf, PacketType::Log).expect("write should succeed");
        buf.write_u32(1, Endian::Big).expect("write should succeed");

        assert_eq!(
            CmdPacket::from_buffer(&mut buf),
            Err(SerError::TypeMismatch)
        );
        assert_eq!(buf.read_pos(), 0);
    }

    #[test]
    fn test_truncated_opcode_is_format_error() {
        let mut buf = SerBuf::<64>::new();
        write_descriptor(&mut buf, PacketType::Command).expect("write should succeed");
        buf.write_u16(0x12, Endian::Big).expect("write should succeed");

        assert_eq!(
            CmdPacket::from_buffer(&mut buf),
            Err(SerError::FormatError)
        );
    }
}
