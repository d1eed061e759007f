// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Fixed-capacity serialize buffers.
//!
//! [`SerBuffer`] is the contract: backing storage plus a logical length
//! (the serialize cursor) and an independent deserialize cursor. Concrete
//! storage is [`SerBuf<CAP>`]; the wire-facing aliases fix capacities from
//! `config.rs`. All appends bounds-check before touching memory, so a
//! failed operation leaves the buffer exactly as it was.

use super::{Endian, SerError, SerResult};
use crate::config;
use crate::types::SizeStoreType;

/// On-wire encodings for `bool` (flight heritage values).
const SER_TRUE: u8 = 0xFF;
const SER_FALSE: u8 = 0x00;

/// Generate an endian-explicit append method for a primitive type.
///
/// Each generated method checks remaining capacity (returns
/// [`SerError::BufferEmpty`] without side effects on overflow), writes the
/// value's bytes in the requested order, and advances the length.
macro_rules! impl_write {
    ($name:ident, $type:ty, $size:expr) => {
        fn $name(&mut self, value: $type, endian: Endian) -> SerResult<()> {
            let len = self.len();
            if len + $size > self.capacity() {
                return Err(SerError::BufferEmpty);
            }
            let bytes = match endian {
                Endian::Big => value.to_be_bytes(),
                Endian::Little => value.to_le_bytes(),
            };
            self.raw_mut()[len..len + $size].copy_from_slice(&bytes);
            self.set_len(len + $size)
        }
    };
}

/// Generate the matching endian-explicit read method.
///
/// Each generated method checks remaining valid data (returns
/// [`SerError::FormatError`] with the cursor unchanged on underrun), reads
/// the value's bytes in the requested order, and advances the cursor.
macro_rules! impl_read {
    ($name:ident, $type:ty, $size:expr) => {
        fn $name(&mut self, endian: Endian) -> SerResult<$type> {
            let pos = self.read_pos();
            if pos + $size > self.len() {
                return Err(SerError::FormatError);
            }
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(&self.raw()[pos..pos + $size]);
            self.set_read_pos(pos + $size)?;
            Ok(match endian {
                Endian::Big => <$type>::from_be_bytes(bytes),
                Endian::Little => <$type>::from_le_bytes(bytes),
            })
        }
    };
}

/// Serialize-buffer contract.
///
/// Implementors provide the storage accessors; every codec operation is a
/// provided method on top of them, so all buffer variants share one
/// bounds-checking implementation. The trait is object-safe: packets and
/// nested serializables take `&mut dyn SerBuffer`.
pub trait SerBuffer {
    /// Fixed storage capacity in bytes.
    fn capacity(&self) -> usize;

    /// Full backing storage (valid data is `[0..len]`).
    fn raw(&self) -> &[u8];

    /// Full backing storage, mutable.
    fn raw_mut(&mut self) -> &mut [u8];

    /// Current logical length (serialize cursor).
    fn len(&self) -> usize;

    /// Set the logical length. Fails with [`SerError::BufferEmpty`] past
    /// capacity. Shrinking clamps the read cursor.
    fn set_len(&mut self, len: usize) -> SerResult<()>;

    /// Current deserialize cursor.
    fn read_pos(&self) -> usize;

    /// Move the deserialize cursor. Fails with [`SerError::FormatError`]
    /// past the logical length.
    fn set_read_pos(&mut self, pos: usize) -> SerResult<()>;

    // ---- queries ------------------------------------------------------

    /// True when no data has been serialized.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The used prefix `[0..len]`.
    fn as_bytes(&self) -> &[u8] {
        &self.raw()[..self.len()]
    }

    /// Bytes of append room left.
    fn remaining_write(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Bytes of valid data left to deserialize.
    fn remaining_read(&self) -> usize {
        self.len() - self.read_pos()
    }

    // ---- cursor resets (memory is not zeroed) -------------------------

    /// Move the serialize cursor to 0 (read cursor clamps with it).
    fn reset_ser(&mut self) {
        // set_len(0) cannot fail.
        let _ = self.set_len(0);
    }

    /// Move the deserialize cursor back to 0.
    fn reset_deser(&mut self) {
        // set_read_pos(0) cannot fail.
        let _ = self.set_read_pos(0);
    }

    // ---- primitive appends --------------------------------------------

    impl_write!(write_u8, u8, 1);
    impl_write!(write_u16, u16, 2);
    impl_write!(write_u32, u32, 4);
    impl_write!(write_u64, u64, 8);
    impl_write!(write_i8, i8, 1);
    impl_write!(write_i16, i16, 2);
    impl_write!(write_i32, i32, 4);
    impl_write!(write_i64, i64, 8);
    impl_write!(write_f32, f32, 4);
    impl_write!(write_f64, f64, 8);

    /// Append a bool (wire values 0xFF / 0x00).
    fn write_bool(&mut self, value: bool, endian: Endian) -> SerResult<()> {
        self.write_u8(if value { SER_TRUE } else { SER_FALSE }, endian)
    }

    /// Append a byte run with a leading [`SizeStoreType`] count.
    ///
    /// Internal nested serialization uses this mode; the ground-facing log
    /// format uses [`SerBuffer::write_bytes_raw`] because the outer frame
    /// carries the length.
    fn write_bytes(&mut self, data: &[u8], endian: Endian) -> SerResult<()> {
        if data.len() > usize::from(SizeStoreType::MAX) {
            return Err(SerError::SizeMismatch);
        }
        if self.len() + core::mem::size_of::<SizeStoreType>() + data.len() > self.capacity() {
            return Err(SerError::BufferEmpty);
        }
        self.write_u16(data.len() as SizeStoreType, endian)?;
        self.write_bytes_raw(data)
    }

    /// Append a byte run with no length prefix.
    fn write_bytes_raw(&mut self, data: &[u8]) -> SerResult<()> {
        let len = self.len();
        if len + data.len() > self.capacity() {
            return Err(SerError::BufferEmpty);
        }
        self.raw_mut()[len..len + data.len()].copy_from_slice(data);
        self.set_len(len + data.len())
    }

    /// Append a nested serializable (recurses into its own serializer).
    fn write_serializable(&mut self, s: &dyn Serializable) -> SerResult<()>
    where
        Self: Sized,
    {
        s.serialize(self)
    }

    // ---- primitive reads ----------------------------------------------

    impl_read!(read_u8, u8, 1);
    impl_read!(read_u16, u16, 2);
    impl_read!(read_u32, u32, 4);
    impl_read!(read_u64, u64, 8);
    impl_read!(read_i8, i8, 1);
    impl_read!(read_i16, i16, 2);
    impl_read!(read_i32, i32, 4);
    impl_read!(read_i64, i64, 8);
    impl_read!(read_f32, f32, 4);
    impl_read!(read_f64, f64, 8);

    /// Read a bool. Any value other than the two wire encodings is a
    /// [`SerError::FormatError`] with the cursor left at the bad byte.
    fn read_bool(&mut self, endian: Endian) -> SerResult<bool> {
        let start = self.read_pos();
        match self.read_u8(endian)? {
            SER_TRUE => Ok(true),
            SER_FALSE => Ok(false),
            _ => {
                self.set_read_pos(start)?;
                Err(SerError::FormatError)
            }
        }
    }

    /// Read a length-prefixed byte run into `out`; returns the run length.
    ///
    /// A count larger than `out` is [`SerError::SizeMismatch`]; a count
    /// larger than the data present is [`SerError::FormatError`]. Both
    /// leave the cursor where it was before the call.
    fn read_bytes(&mut self, out: &mut [u8], endian: Endian) -> SerResult<usize> {
        let start = self.read_pos();
        let count = usize::from(self.read_u16(endian)?);
        if count > out.len() {
            self.set_read_pos(start)?;
            return Err(SerError::SizeMismatch);
        }
        if count > self.remaining_read() {
            self.set_read_pos(start)?;
            return Err(SerError::FormatError);
        }
        let pos = self.read_pos();
        out[..count].copy_from_slice(&self.raw()[pos..pos + count]);
        self.set_read_pos(pos + count)?;
        Ok(count)
    }

    /// Read exactly `out.len()` bytes with no length prefix.
    fn read_bytes_raw(&mut self, out: &mut [u8]) -> SerResult<()> {
        let pos = self.read_pos();
        if pos + out.len() > self.len() {
            return Err(SerError::FormatError);
        }
        out.copy_from_slice(&self.raw()[pos..pos + out.len()]);
        self.set_read_pos(pos + out.len())
    }

    /// Read a nested serializable.
    fn read_serializable(&mut self, s: &mut dyn Serializable) -> SerResult<()>
    where
        Self: Sized,
    {
        s.deserialize(self)
    }
}

/// A type with a self-describing wire form.
///
/// Nested serialization is recursive: a serializable writes itself through
/// the buffer contract, including any length prefixes its layout needs.
pub trait Serializable {
    /// Append this value's wire form.
    fn serialize(&self, buf: &mut dyn SerBuffer) -> SerResult<()>;

    /// Replace this value from the buffer's wire form.
    fn deserialize(&mut self, buf: &mut dyn SerBuffer) -> SerResult<()>;

    /// Human-readable rendering for ground displays.
    #[cfg(feature = "serializable-text")]
    fn to_text(&self) -> String {
        String::from("<serializable>")
    }
}

/// Fixed-capacity serialize buffer value type.
///
/// Cloning copies the backing array; only the used prefix is meaningful,
/// and equality compares the used prefix only.
#[derive(Clone)]
pub struct SerBuf<const CAP: usize> {
    bytes: [u8; CAP],
    len: usize,
    read: usize,
}

/// General com buffer (framed transport payloads).
pub type ComBuffer = SerBuf<{ config::COM_BUFFER_MAX_SIZE }>;
/// One telemetry channel value.
pub type TlmBuffer = SerBuf<{ config::TLM_BUFFER_MAX_SIZE }>;
/// One parameter value.
pub type ParamBuffer = SerBuf<{ config::PARAM_BUFFER_MAX_SIZE }>;
/// One serialized event argument block.
pub type LogBuffer = SerBuf<{ config::LOG_BUFFER_MAX_SIZE }>;
/// One sequencer statement argument block.
pub type StatementArgBuffer = SerBuf<{ config::STATEMENT_ARG_BUFFER_MAX_SIZE }>;
/// Marshalled-argument blob inside a queued port message.
pub type MsgArgBuffer = SerBuf<{ config::MSG_ARG_BUFFER_MAX_SIZE }>;

impl<const CAP: usize> SerBuf<CAP> {
    /// Create an empty buffer. Memory is zeroed once here, never again.
    pub const fn new() -> Self {
        Self {
            bytes: [0; CAP],
            len: 0,
            read: 0,
        }
    }

    /// Create a buffer holding a copy of `data`.
    pub fn from_bytes(data: &[u8]) -> SerResult<Self> {
        let mut buf = Self::new();
        buf.write_bytes_raw(data)?;
        Ok(buf)
    }
}

impl<const CAP: usize> Default for SerBuf<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> SerBuffer for SerBuf<CAP> {
    fn capacity(&self) -> usize {
        CAP
    }

    fn raw(&self) -> &[u8] {
        &self.bytes
    }

    fn raw_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    fn len(&self) -> usize {
        self.len
    }

    fn set_len(&mut self, len: usize) -> SerResult<()> {
        if len > CAP {
            return Err(SerError::BufferEmpty);
        }
        self.len = len;
        if self.read > len {
            self.read = len;
        }
        Ok(())
    }

    fn read_pos(&self) -> usize {
        self.read
    }

    fn set_read_pos(&mut self, pos: usize) -> SerResult<()> {
        if pos > self.len {
            return Err(SerError::FormatError);
        }
        self.read = pos;
        Ok(())
    }
}

impl<const CAP: usize> PartialEq for SerBuf<CAP> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<const CAP: usize> Eq for SerBuf<CAP> {}

impl<const CAP: usize> std::fmt::Debug for SerBuf<CAP> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SerBuf<{}>[len={} read={}]", CAP, self.len, self.read)?;
        for b in self.as_bytes().iter().take(32) {
            write!(f, " {:02X}", b)?;
        }
        if self.len > 32 {
            write!(f, " ..")?;
        }
        Ok(())
    }
}

/// Nested form of a buffer: its used prefix, length-prefixed.
impl<const CAP: usize> Serializable for SerBuf<CAP> {
    fn serialize(&self, buf: &mut dyn SerBuffer) -> SerResult<()> {
        buf.write_bytes(self.as_bytes(), Endian::Big)
    }

    fn deserialize(&mut self, buf: &mut dyn SerBuffer) -> SerResult<()> {
        self.reset_ser();
        let count = buf.read_bytes(&mut self.bytes, Endian::Big)?;
        self.set_len(count)
    }

    #[cfg(feature = "serializable-text")]
    fn to_text(&self) -> String {
        format!("{:?}", self)
    }
}

/// Primitive serializable impls: big-endian wire default.
macro_rules! impl_serializable_prim {
    ($type:ty, $write:ident, $read:ident) => {
        impl Serializable for $type {
            fn serialize(&self, buf: &mut dyn SerBuffer) -> SerResult<()> {
                buf.$write(*self, Endian::Big)
            }

            fn deserialize(&mut self, buf: &mut dyn SerBuffer) -> SerResult<()> {
                *self = buf.$read(Endian::Big)?;
                Ok(())
            }

            #[cfg(feature = "serializable-text")]
            fn to_text(&self) -> String {
                self.to_string()
            }
        }
    };
}

impl_serializable_prim!(u8, write_u8, read_u8);
impl_serializable_prim!(u16, write_u16, read_u16);
impl_serializable_prim!(u32, write_u32, read_u32);
impl_serializable_prim!(u64, write_u64, read_u64);
impl_serializable_prim!(i8, write_i8, read_i8);
impl_serializable_prim!(i16, write_i16, read_i16);
impl_serializable_prim!(i32, write_i32, read_i32);
impl_serializable_prim!(i64, write_i64, read_i64);
impl_serializable_prim!(f32, write_f32, read_f32);
impl_serializable_prim!(f64, write_f64, read_f64);

impl Serializable for bool {
    fn serialize(&self, buf: &mut dyn SerBuffer) -> SerResult<()> {
        buf.write_bool(*self, Endian::Big)
    }

    fn deserialize(&mut self, buf: &mut dyn SerBuffer) -> SerResult<()> {
        *self = buf.read_bool(Endian::Big)?;
        Ok(())
    }

    #[cfg(feature = "serializable-text")]
    fn to_text(&self) -> String {
        self.to_string()
    }
}

/// Raw OS timestamps marshal through async cycle ports.
impl Serializable for corvus_os::RawTime {
    fn serialize(&self, buf: &mut dyn SerBuffer) -> SerResult<()> {
        buf.write_u32(self.seconds, Endian::Big)?;
        buf.write_u32(self.useconds, Endian::Big)
    }

    fn deserialize(&mut self, buf: &mut dyn SerBuffer) -> SerResult<()> {
        self.seconds = buf.read_u32(Endian::Big)?;
        self.useconds = buf.read_u32(Endian::Big)?;
        Ok(())
    }

    #[cfg(feature = "serializable-text")]
    fn to_text(&self) -> String {
        format!("{}.{:06}", self.seconds, self.useconds)
    }
}
