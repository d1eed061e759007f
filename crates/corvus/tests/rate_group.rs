// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

#![allow(clippy::cast_possible_truncation)] // Test parameters

//! Rate-group driver integration tests: tick fan-out schedules, and the
//! ISR-style pattern of a cycle output posting to an active component.

use corvus::comp::{ActiveComponent, MsgDispatch, MsgHandler};
use corvus::port::QueueFullPolicy;
use corvus::ser::{SerBuffer, Serializable};
use corvus::svc::{Divider, DividerSet, RateGroupDriver};
use corvus_os::clock::RawTime;
use corvus_os::task::TaskOptions;
use parking_lot::Mutex;
use std::sync::Arc;

fn driver_with(dividers: &[(u32, u32)]) -> (RateGroupDriver, DividerSet) {
    let driver = RateGroupDriver::new("rg", 0);
    let mut set = DividerSet::default();
    for (i, &(divisor, offset)) in dividers.iter().enumerate() {
        set.dividers[i] = Divider::new(divisor, offset);
    }
    (driver, set)
}

#[test]
fn test_schedule_one_two_four() {
    let (mut driver, set) = driver_with(&[(1, 0), (2, 0), (4, 0)]);
    let fired: Arc<Mutex<Vec<Vec<usize>>>> = Arc::new(Mutex::new(Vec::new()));
    for i in 0..3 {
        let fired_in = Arc::clone(&fired);
        driver.cycle_out_mut(i).connect_sync(move |_: &RawTime| {
            fired_in
                .lock()
                .last_mut()
                .expect("tick slot should exist")
                .push(i);
        });
    }
    driver.configure(&set);

    for _ in 0..4 {
        fired.lock().push(Vec::new());
        driver.cycle_in(&RawTime::zero());
    }
    assert_eq!(
        *fired.lock(),
        vec![vec![0], vec![0, 1], vec![0], vec![0, 1, 2]]
    );
}

#[test]
fn test_phased_outputs_alternate() {
    let (mut driver, set) = driver_with(&[(2, 0), (2, 1)]);
    let fired: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
    for i in 0..2 {
        let fired_in = Arc::clone(&fired);
        driver.cycle_out_mut(i).connect_sync(move |_: &RawTime| {
            fired_in.lock().push(i);
        });
    }
    driver.configure(&set);

    for _ in 0..4 {
        driver.cycle_in(&RawTime::zero());
    }
    assert_eq!(*fired.lock(), vec![1, 0, 1, 0]);
}

/// Cycle output wired ISR-style: the sync handler only posts to an
/// active component's queue through an async port.
#[test]
fn test_cycle_posts_to_active_component() {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    struct CycleArgs {
        seconds: u32,
        useconds: u32,
    }
    impl Serializable for CycleArgs {
        fn serialize(&self, buf: &mut dyn SerBuffer) -> corvus::ser::SerResult<()> {
            buf.write_u32(self.seconds, corvus::ser::Endian::Big)?;
            buf.write_u32(self.useconds, corvus::ser::Endian::Big)
        }
        fn deserialize(&mut self, buf: &mut dyn SerBuffer) -> corvus::ser::SerResult<()> {
            self.seconds = buf.read_u32(corvus::ser::Endian::Big)?;
            self.useconds = buf.read_u32(corvus::ser::Endian::Big)?;
            Ok(())
        }
    }

    struct CycleCounter {
        cycles: Arc<Mutex<Vec<u32>>>,
    }
    impl MsgHandler for CycleCounter {
        fn handle_msg(&mut self, _selector: u32, args: &mut dyn SerBuffer) -> MsgDispatch {
            let mut decoded = CycleArgs::default();
            if decoded.deserialize(args).is_err() {
                return MsgDispatch::Error;
            }
            self.cycles.lock().push(decoded.seconds);
            MsgDispatch::Ok
        }
    }

    let cycles: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));
    let mut comp = ActiveComponent::new(
        "rg_member",
        0,
        CycleCounter {
            cycles: Arc::clone(&cycles),
        },
    );
    comp.create_queue(16, 32);

    let mut post = corvus::port::OutputPort::<CycleArgs>::new("cycle_post");
    post.connect_async(comp.queued(), 0, QueueFullPolicy::Drop);

    let (mut driver, set) = driver_with(&[(2, 0)]);
    driver.cycle_out_mut(0).connect_sync(move |now: &RawTime| {
        post.invoke(&CycleArgs {
            seconds: now.seconds,
            useconds: now.useconds,
        });
    });
    driver.configure(&set);
    comp.start(TaskOptions::default());

    for tick in 1..=6u32 {
        driver.cycle_in(&RawTime::new(tick, 0));
    }
    comp.exit();
    comp.join();

    // Divisor 2: ticks 2, 4, 6 reach the component, stamped with the
    // tick-time passed into cycle_in.
    assert_eq!(*cycles.lock(), vec![2, 4, 6]);
}
