// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Wire-level timestamps.
//!
//! A [`Time`] is a `(time base, seconds, microseconds)` triple. The base
//! tags which clock produced the value; comparing times across bases is a
//! ground-system decision, equality here is componentwise.

use super::{Endian, SerBuffer, SerError, SerResult, Serializable};
use crate::types::TimeBaseStoreType;
use corvus_os::RawTime;

/// Clock source tag. Values are flight heritage and wire-stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u16)]
pub enum TimeBase {
    /// No time source available.
    #[default]
    None = 0,
    /// Processor cycle count time.
    ProcessorTime = 1,
    /// Workstation (development host) time.
    Workstation = 2,
    /// Spacecraft clock.
    Spacecraft = 3,
    /// FPGA-maintained clock.
    Fpga = 4,
    /// Matches any base in comparisons made by ground tools.
    DontCare = 0xFFFF,
}

impl TryFrom<TimeBaseStoreType> for TimeBase {
    type Error = SerError;

    fn try_from(value: TimeBaseStoreType) -> SerResult<Self> {
        match value {
            0 => Ok(TimeBase::None),
            1 => Ok(TimeBase::ProcessorTime),
            2 => Ok(TimeBase::Workstation),
            3 => Ok(TimeBase::Spacecraft),
            4 => Ok(TimeBase::Fpga),
            0xFFFF => Ok(TimeBase::DontCare),
            _ => Err(SerError::FormatError),
        }
    }
}

/// A tagged timestamp: time base, seconds, microseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Time {
    pub base: TimeBase,
    pub seconds: u32,
    pub useconds: u32,
}

impl Time {
    /// Construct from explicit fields. `useconds` must be < 1_000_000.
    pub const fn new(base: TimeBase, seconds: u32, useconds: u32) -> Self {
        Self {
            base,
            seconds,
            useconds,
        }
    }

    /// The zero time, base [`TimeBase::None`].
    pub const fn zero() -> Self {
        Self::new(TimeBase::None, 0, 0)
    }

    /// Tag a raw OS clock sample with a base.
    pub fn from_raw(base: TimeBase, raw: RawTime) -> Self {
        Self::new(base, raw.seconds, raw.useconds)
    }

    /// Total microseconds, ignoring the base.
    pub fn as_usecs(&self) -> u64 {
        u64::from(self.seconds) * 1_000_000 + u64::from(self.useconds)
    }

    /// Order two times on the same clock. `None` when the bases differ
    /// and neither is [`TimeBase::DontCare`]: values from different
    /// clocks are incomparable.
    pub fn compare(&self, other: &Time) -> Option<std::cmp::Ordering> {
        let comparable = self.base == other.base
            || self.base == TimeBase::DontCare
            || other.base == TimeBase::DontCare;
        comparable.then(|| self.as_usecs().cmp(&other.as_usecs()))
    }
}

impl Serializable for Time {
    fn serialize(&self, buf: &mut dyn SerBuffer) -> SerResult<()> {
        buf.write_u16(self.base as TimeBaseStoreType, Endian::Big)?;
        buf.write_u32(self.seconds, Endian::Big)?;
        buf.write_u32(self.useconds, Endian::Big)
    }

    fn deserialize(&mut self, buf: &mut dyn SerBuffer) -> SerResult<()> {
        self.base = TimeBase::try_from(buf.read_u16(Endian::Big)?)?;
        self.seconds = buf.read_u32(Endian::Big)?;
        self.useconds = buf.read_u32(Endian::Big)?;
        Ok(())
    }

    #[cfg(feature = "serializable-text")]
    fn to_text(&self) -> String {
        format!("{:?}({}.{:06})", self.base, self.seconds, self.useconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ser::SerBuf;

    #[test]
    fn test_wire_layout_is_base_seconds_useconds() {
        let t = Time::new(TimeBase::Workstation, 0x0102_0304, 42);
        let mut buf = SerBuf::<16>::new();
        t.serialize(&mut buf).expect("serialize should succeed");
        assert_eq!(
            buf.as_bytes(),
            &[0x00, 0x02, 0x01, 0x02, 0x03, 0x04, 0x00, 0x00, 0x00, 0x2A]
        );
    }

    #[test]
    fn test_roundtrip() {
        let t = Time::new(TimeBase::Spacecraft, 1234, 999_999);
        let mut buf = SerBuf::<16>::new();
        t.serialize(&mut buf).expect("serialize should succeed");

        let mut back = Time::zero();
        back.deserialize(&mut buf).expect("deserialize should succeed");
        assert_eq!(back, t);
    }

    #[test]
    fn test_bad_base_tag_is_format_error() {
        let mut buf = SerBuf::<16>::new();
        buf.write_u16(0x0099, Endian::Big)
            .expect("write should succeed");
        buf.write_u32(0, Endian::Big).expect("write should succeed");
        buf.write_u32(0, Endian::Big).expect("write should succeed");

        let mut t = Time::zero();
        assert_eq!(t.deserialize(&mut buf), Err(SerError::FormatError));
    }

    #[test]
    fn test_equality_is_componentwise() {
        let a = Time::new(TimeBase::Workstation, 10, 11);
        let b = Time::new(TimeBase::Workstation, 10, 11);
        let c = Time::new(TimeBase::Spacecraft, 10, 11);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Time::new(TimeBase::Workstation, 10, 12));
    }

    #[test]
    fn test_compare_requires_matching_base() {
        use std::cmp::Ordering;
        let a = Time::new(TimeBase::Spacecraft, 10, 0);
        let b = Time::new(TimeBase::Spacecraft, 10, 1);
        assert_eq!(a.compare(&b), Some(Ordering::Less));
        assert_eq!(b.compare(&a), Some(Ordering::Greater));
        assert_eq!(a.compare(&a), Some(Ordering::Equal));

        let w = Time::new(TimeBase::Workstation, 10, 0);
        assert_eq!(a.compare(&w), None);
        let any = Time::new(TimeBase::DontCare, 9, 0);
        assert_eq!(a.compare(&any), Some(Ordering::Greater));
    }

    #[test]
    fn test_from_raw_tags_base() {
        let raw = RawTime::new(77, 88);
        let t = Time::from_raw(TimeBase::Workstation, raw);
        assert_eq!(t, Time::new(TimeBase::Workstation, 77, 88));
        assert_eq!(t.as_usecs(), 77_000_088);
    }
}
