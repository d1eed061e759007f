// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Rate-group driver: fans one input tick out to phased periodic outputs.
//!
//! The driver keeps a tick counter and a `(divisor, offset)` pair per
//! output. On each tick it increments the counter, then fires output `i`
//! iff `divisor[i] != 0 && t % divisor[i] == offset[i]`, in ascending
//! index order. The input may arrive in interrupt context, so the tick
//! path does not allocate, log, or block; outputs must be wired to
//! ISR-safe handlers (typically a post to an async port, nothing more).

use crate::comp::PassiveComponent;
use crate::config::RATE_GROUP_DIVIDER_SIZE;
use crate::port::OutputPort;
use corvus_os::RawTime;

/// One output's schedule: fire when `tick % divisor == offset`.
///
/// `divisor == 0` disables the output. `offset >= divisor` is a
/// configuration error and leaves the output permanently silent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Divider {
    pub divisor: u32,
    pub offset: u32,
}

impl Divider {
    pub const fn new(divisor: u32, offset: u32) -> Self {
        Self { divisor, offset }
    }
}

/// Full schedule table, one entry per possible output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DividerSet {
    pub dividers: [Divider; RATE_GROUP_DIVIDER_SIZE],
}

pub struct RateGroupDriver {
    base: PassiveComponent,
    cycle_out: Vec<OutputPort<RawTime>>,
    dividers: [Divider; RATE_GROUP_DIVIDER_SIZE],
    configured: bool,
    /// Monotonic tick count, wrapped at `rollover`. Single writer (the
    /// tick source); wrap preserves every `tick % divisor` residue.
    ticks: u32,
    rollover: u32,
}

impl RateGroupDriver {
    pub fn new(name: &str, instance: u32) -> Self {
        let cycle_out = (0..RATE_GROUP_DIVIDER_SIZE)
            .map(|i| OutputPort::new(&format!("{}.cycle_out[{}]", name, i)))
            .collect();
        Self {
            base: PassiveComponent::new(name, instance),
            cycle_out,
            dividers: [Divider::default(); RATE_GROUP_DIVIDER_SIZE],
            configured: false,
            ticks: 0,
            rollover: 1,
        }
    }

    /// Install the schedule table. Must run before the first tick; until
    /// then every output is suppressed.
    ///
    /// The rollover point is the least common multiple of the non-zero
    /// divisors, so wrapping the counter never skips a due firing. A
    /// misconfigured entry (`offset >= divisor`) is reported here, once,
    /// where logging is still allowed.
    pub fn configure(&mut self, set: &DividerSet) {
        self.dividers = set.dividers;
        self.ticks = 0;
        self.rollover = 1;
        for (i, d) in self.dividers.iter().enumerate() {
            if d.divisor == 0 {
                continue;
            }
            if d.offset >= d.divisor {
                log::warn!(
                    "[RateGroupDriver] '{}' output {} offset {} >= divisor {}, output is silent",
                    self.base.name(),
                    i,
                    d.offset,
                    d.divisor
                );
                continue;
            }
            self.rollover = lcm(self.rollover, d.divisor);
        }
        self.configured = true;
    }

    /// Tick entry. ISR-safe: no allocation, no logging, no blocking.
    pub fn cycle_in(&mut self, now: &RawTime) {
        if !self.configured {
            return;
        }
        self.ticks = self.ticks.wrapping_add(1) % self.rollover;
        for (i, d) in self.dividers.iter().enumerate() {
            if d.divisor != 0 && self.ticks % d.divisor == d.offset {
                self.cycle_out[i].invoke_hook(now);
            }
        }
    }

    /// Wire output `i`. Unwired outputs are skipped when due.
    pub fn cycle_out_mut(&mut self, index: usize) -> &mut OutputPort<RawTime> {
        crate::corvus_assert!(index < RATE_GROUP_DIVIDER_SIZE, index as i64);
        &mut self.cycle_out[index]
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// Ticks seen since configuration, modulo the rollover point.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn rollover(&self) -> u32 {
        self.rollover
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Saturating lcm; a pathological divisor table degrades to plain
/// wrapping rather than overflowing.
fn lcm(a: u32, b: u32) -> u32 {
    if a == 0 || b == 0 {
        return a.max(b);
    }
    (a / gcd(a, b)).saturating_mul(b)
}
