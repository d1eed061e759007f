// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Raw clock sampling.
//!
//! [`RawTime`] is the timestamp carried through cycle ports: a cheap value
//! snapshot of the platform clock, not yet tagged with a time base. The
//! framework's wire-level `Time` type is built from it by the time service.

use std::time::{SystemTime, UNIX_EPOCH};

/// Raw platform timestamp: seconds and microseconds since the epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct RawTime {
    pub seconds: u32,
    pub useconds: u32,
}

impl RawTime {
    /// Sample the platform clock.
    pub fn now() -> Self {
        // Pre-epoch clocks read as zero rather than failing the tick path.
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            seconds: since_epoch.as_secs() as u32,
            useconds: since_epoch.subsec_micros(),
        }
    }

    /// The zero timestamp.
    pub const fn zero() -> Self {
        Self {
            seconds: 0,
            useconds: 0,
        }
    }

    /// Construct from explicit fields. `useconds` must be < 1_000_000.
    pub const fn new(seconds: u32, useconds: u32) -> Self {
        Self { seconds, useconds }
    }

    /// Microseconds elapsed from `earlier` to `self`, zero if reversed.
    pub fn diff_usec(&self, earlier: &RawTime) -> u64 {
        let a = u64::from(self.seconds) * 1_000_000 + u64::from(self.useconds);
        let b = u64::from(earlier.seconds) * 1_000_000 + u64::from(earlier.useconds);
        a.saturating_sub(b)
    }
}
