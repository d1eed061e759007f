// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Telemetry store-and-forward database.
//!
//! Components write channel samples at their own rate; a rate group
//! drives [`TlmStore::run`], which packs every channel updated since the
//! last run into telemetry packets and pushes them downlink. The store
//! keeps the latest sample per channel, so a fast producer and a slow
//! downlink meet in the middle: intermediate samples are overwritten,
//! never queued.

use crate::comp::PassiveComponent;
use crate::packet::TlmPacket;
use crate::port::OutputPort;
use crate::ser::{ComBuffer, TlmBuffer, Time};
use crate::types::ChanIdType;
use dashmap::DashMap;

/// Whether a channel read produced a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlmValid {
    /// The channel has been written at least once; the out-params hold
    /// its latest sample.
    Valid,
    /// Never written; out-params untouched.
    Invalid,
}

struct ChannelSlot {
    time: Time,
    value: TlmBuffer,
    updated: bool,
}

pub struct TlmStore {
    base: PassiveComponent,
    channels: DashMap<ChanIdType, ChannelSlot>,
    pkt_send: OutputPort<ComBuffer>,
}

impl TlmStore {
    pub fn new(name: &str, instance: u32) -> Self {
        Self {
            base: PassiveComponent::new(name, instance),
            channels: DashMap::new(),
            pkt_send: OutputPort::new(&format!("{}.pkt_send", name)),
        }
    }

    /// Record a channel sample, replacing any previous one.
    pub fn tlm_recv(&self, id: ChanIdType, time: &Time, value: &TlmBuffer) {
        self.channels.insert(
            id,
            ChannelSlot {
                time: *time,
                value: value.clone(),
                updated: true,
            },
        );
    }

    /// Latest sample for `id`, or [`TlmValid::Invalid`] if never written.
    /// Reading does not clear the updated flag.
    pub fn tlm_get(&self, id: ChanIdType, time: &mut Time, value: &mut TlmBuffer) -> TlmValid {
        match self.channels.get(&id) {
            Some(slot) => {
                *time = slot.time;
                *value = slot.value.clone();
                TlmValid::Valid
            }
            None => TlmValid::Invalid,
        }
    }

    /// Scheduler entry: pack channels updated since the last run and push
    /// each full packet out `pkt_send`. Channels are drained in ascending
    /// id order so ground sees a stable layout.
    pub fn run(&self) {
        let mut pending: Vec<ChanIdType> = self
            .channels
            .iter()
            .filter(|entry| entry.value().updated)
            .map(|entry| *entry.key())
            .collect();
        if pending.is_empty() {
            return;
        }
        pending.sort_unstable();

        let mut packet = TlmPacket::new();
        for id in pending {
            // Copy the sample out and release the slot before any port
            // invocation: a pkt_send handler may call back into the store.
            let (time, value) = match self.channels.get(&id) {
                Some(slot) => (slot.time, slot.value.clone()),
                None => continue,
            };
            if packet.add_entry(id, &time, &value).is_err() {
                // Packet full: ship it and retry the entry in a fresh one.
                self.flush(&packet);
                packet = TlmPacket::new();
                if packet.add_entry(id, &time, &value).is_err() {
                    // A single entry exceeding a fresh packet means the
                    // buffer capacities are misconfigured.
                    crate::corvus_assert!(false, id as i64);
                    continue;
                }
            }
            if let Some(mut slot) = self.channels.get_mut(&id) {
                slot.updated = false;
            }
        }
        if packet.entry_count() > 0 {
            self.flush(&packet);
        }
    }

    fn flush(&self, packet: &TlmPacket) {
        log::debug!(
            "[TlmStore] '{}' sending {} channel(s)",
            self.base.name(),
            packet.entry_count()
        );
        self.pkt_send.invoke_hook(packet.as_buffer());
    }

    pub fn pkt_send_mut(&mut self) -> &mut OutputPort<ComBuffer> {
        &mut self.pkt_send
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// Channels written at least once.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::TlmPacket;
    use crate::ser::{Endian, SerBuffer, TimeBase};
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn sample(value: u32) -> TlmBuffer {
        let mut buf = TlmBuffer::new();
        buf.write_u32(value, Endian::Big).expect("write should succeed");
        buf
    }

    #[test]
    fn test_get_returns_latest_sample() {
        let store = TlmStore::new("tlm", 0);
        let t1 = Time::new(TimeBase::ProcessorTime, 5, 0);
        let t2 = Time::new(TimeBase::ProcessorTime, 6, 0);
        store.tlm_recv(100, &t1, &sample(1));
        store.tlm_recv(100, &t2, &sample(2));

        let mut time = Time::zero();
        let mut value = TlmBuffer::new();
        assert_eq!(store.tlm_get(100, &mut time, &mut value), TlmValid::Valid);
        assert_eq!(time, t2);
        assert_eq!(value, sample(2));
    }

    #[test]
    fn test_get_unwritten_channel_invalid() {
        let store = TlmStore::new("tlm", 0);
        let mut time = Time::zero();
        let mut value = TlmBuffer::new();
        assert_eq!(store.tlm_get(42, &mut time, &mut value), TlmValid::Invalid);
        assert_eq!(time, Time::zero());
    }

    #[test]
    fn test_run_handler_may_reenter_store() {
        use std::sync::mpsc;
        use std::sync::OnceLock;
        use std::time::Duration;

        fn wide_sample(fill: u8) -> TlmBuffer {
            let mut buf = TlmBuffer::new();
            buf.write_bytes_raw(&[fill; 120]).expect("write should succeed");
            buf
        }

        // The pkt_send handler reads the store back, as a downlink
        // health monitor would.
        let store_slot: Arc<OnceLock<Arc<TlmStore>>> = Arc::new(OnceLock::new());
        let reads: Arc<Mutex<Vec<TlmValid>>> = Arc::new(Mutex::new(Vec::new()));
        let mut store = TlmStore::new("tlm", 0);
        let slot_in = Arc::clone(&store_slot);
        let reads_in = Arc::clone(&reads);
        store.pkt_send_mut().connect_sync(move |_buf: &ComBuffer| {
            let store = slot_in.get().expect("store should be wired");
            let mut time = Time::zero();
            let mut value = TlmBuffer::new();
            reads_in.lock().push(store.tlm_get(3, &mut time, &mut value));
        });
        let store = Arc::new(store);
        assert!(store_slot.set(Arc::clone(&store)).is_ok());

        // Four 120-byte samples: three fill a packet, the fourth forces
        // a mid-loop flush while channel 4 is being drained.
        let now = Time::new(TimeBase::ProcessorTime, 2, 0);
        for id in 1..=4u32 {
            store.tlm_recv(id, &now, &wide_sample(id as u8));
        }

        let (done_tx, done_rx) = mpsc::channel();
        let store_run = Arc::clone(&store);
        std::thread::spawn(move || {
            store_run.run();
            let _ = done_tx.send(());
        });
        done_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("run should complete");

        // Two flushes, each handler read succeeding.
        assert_eq!(*reads.lock(), vec![TlmValid::Valid, TlmValid::Valid]);
    }

    #[test]
    fn test_run_sends_updated_channels_once() {
        let mut store = TlmStore::new("tlm", 0);
        let packets: Arc<Mutex<Vec<ComBuffer>>> = Arc::new(Mutex::new(Vec::new()));
        let packets_in = Arc::clone(&packets);
        store.pkt_send_mut().connect_sync(move |buf: &ComBuffer| {
            packets_in.lock().push(buf.clone());
        });

        let now = Time::new(TimeBase::ProcessorTime, 1, 0);
        store.tlm_recv(7, &now, &sample(70));
        store.tlm_recv(3, &now, &sample(30));
        store.run();

        {
            let sent = packets.lock();
            assert_eq!(sent.len(), 1);
            let mut buf = sent[0].clone();
            buf.reset_deser();
            let entries = TlmPacket::decode(&mut buf).expect("decode should succeed");
            // Ascending channel-id order.
            assert_eq!(entries[0].id, 3);
            assert_eq!(entries[1].id, 7);
        }

        // Nothing new: second run is silent.
        store.run();
        assert_eq!(packets.lock().len(), 1);

        // One channel refreshed: only it goes out.
        store.tlm_recv(7, &now, &sample(71));
        store.run();
        let sent = packets.lock();
        assert_eq!(sent.len(), 2);
        let mut buf = sent[1].clone();
        buf.reset_deser();
        let entries = TlmPacket::decode(&mut buf).expect("decode should succeed");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, 7);
    }
}
