// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Serialization subsystem: fixed-capacity buffers and the wire contract.
//!
//! Everything that crosses a port boundary or a transport frame goes
//! through [`SerBuffer`]: a fixed-capacity byte store with independent
//! serialize and deserialize cursors, endian-explicit primitive codecs, and
//! strict bounds checking. Capacities are fixed at compile time per alias
//! (see [`buffer`]), so the hot path never touches the heap.
//!
//! Errors are values; callers check every operation and abort on the first
//! non-ok with `?`.

pub mod buffer;
pub mod time;

pub use buffer::{
    ComBuffer, LogBuffer, MsgArgBuffer, ParamBuffer, SerBuf, SerBuffer, Serializable,
    StatementArgBuffer, TlmBuffer,
};
pub use time::{Time, TimeBase};

use std::fmt;

/// Serialization failure.
///
/// The vocabulary follows the flight heritage: `BufferEmpty` on an append
/// means *no room left* (the write would exceed capacity).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerError {
    /// Append would exceed capacity; length is unchanged.
    BufferEmpty,
    /// Deserialize ran past the end of valid data or met a malformed
    /// value; the read cursor is unchanged.
    FormatError,
    /// A length-prefixed run does not fit the destination, or a count
    /// field disagrees with the data present.
    SizeMismatch,
    /// The on-wire packet descriptor does not match the expected kind.
    TypeMismatch,
}

impl fmt::Display for SerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerError::BufferEmpty => write!(f, "no room left in buffer"),
            SerError::FormatError => write!(f, "malformed or truncated data"),
            SerError::SizeMismatch => write!(f, "size mismatch"),
            SerError::TypeMismatch => write!(f, "packet type mismatch"),
        }
    }
}

impl std::error::Error for SerError {}

pub type SerResult<T> = core::result::Result<T, SerError>;

/// Byte order for primitive codecs. The wire default is big-endian.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Endian {
    /// Most-significant byte first (wire default).
    #[default]
    Big,
    /// Least-significant byte first.
    Little,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(SerError::BufferEmpty.to_string(), "no room left in buffer");
        assert_eq!(
            SerError::FormatError.to_string(),
            "malformed or truncated data"
        );
        assert_eq!(SerError::SizeMismatch.to_string(), "size mismatch");
        assert_eq!(SerError::TypeMismatch.to_string(), "packet type mismatch");
    }

    #[test]
    fn test_default_endian_is_big() {
        assert_eq!(Endian::default(), Endian::Big);
    }
}
