// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Bounded FIFO message queue over crossbeam channels.
//!
//! One queue per queued/active component. The queue owns both endpoints, so
//! any number of producers can send through a shared reference while the
//! owning task drains it. Capacity is fixed at creation; the channel
//! preallocates its slots, so steady-state send/receive never allocates.

use crossbeam::channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Queue operation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// Non-blocking send found the queue full.
    Full,
    /// Non-blocking receive found the queue empty.
    Empty,
    /// The other endpoint is gone (owning component dropped mid-operation).
    Disconnected,
}

impl std::fmt::Display for QueueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueError::Full => write!(f, "queue full"),
            QueueError::Empty => write!(f, "queue empty"),
            QueueError::Disconnected => write!(f, "queue disconnected"),
        }
    }
}

impl std::error::Error for QueueError {}

/// Blocking mode for send/receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocking {
    /// Suspend the calling task until the operation can complete.
    Block,
    /// Return [`QueueError::Full`] / [`QueueError::Empty`] immediately.
    NonBlock,
}

/// Bounded multi-producer single-consumer message queue.
///
/// All operations take `&self`; the queue is safe to share behind an `Arc`
/// between the producing ports and the consuming dispatch loop.
pub struct Queue<T> {
    name: String,
    depth: usize,
    tx: Sender<T>,
    rx: Receiver<T>,
    /// Highest observed occupancy, for post-run margin analysis.
    high_water: AtomicUsize,
}

impl<T: Send> Queue<T> {
    /// Create a queue holding at most `depth` messages.
    pub fn new(name: &str, depth: usize) -> Self {
        let (tx, rx) = bounded(depth);
        log::debug!("[Queue] created '{}' depth={}", name, depth);
        Self {
            name: name.to_string(),
            depth,
            tx,
            rx,
            high_water: AtomicUsize::new(0),
        }
    }

    /// Enqueue a message.
    ///
    /// With [`Blocking::Block`] the caller suspends until a slot frees up.
    /// With [`Blocking::NonBlock`] a full queue returns [`QueueError::Full`]
    /// and the message is handed back untouched inside the error path of the
    /// caller (the value is dropped here; callers that need it back should
    /// use [`Queue::try_send`]).
    pub fn send(&self, item: T, mode: Blocking) -> Result<(), QueueError> {
        match mode {
            Blocking::Block => self.tx.send(item).map_err(|_| QueueError::Disconnected)?,
            Blocking::NonBlock => self.try_send(item).map_err(|(err, _)| err)?,
        }
        self.note_occupancy();
        Ok(())
    }

    /// Non-blocking enqueue that returns the message on failure.
    pub fn try_send(&self, item: T) -> Result<(), (QueueError, T)> {
        match self.tx.try_send(item) {
            Ok(()) => {
                self.note_occupancy();
                Ok(())
            }
            Err(TrySendError::Full(item)) => Err((QueueError::Full, item)),
            Err(TrySendError::Disconnected(item)) => Err((QueueError::Disconnected, item)),
        }
    }

    /// Dequeue the oldest message.
    pub fn receive(&self, mode: Blocking) -> Result<T, QueueError> {
        match mode {
            Blocking::Block => self.rx.recv().map_err(|_| QueueError::Disconnected),
            Blocking::NonBlock => self.rx.try_recv().map_err(|e| match e {
                TryRecvError::Empty => QueueError::Empty,
                TryRecvError::Disconnected => QueueError::Disconnected,
            }),
        }
    }

    /// Messages currently enqueued.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// True when no messages are pending.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Maximum number of messages the queue can hold.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Queue name given at creation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Highest occupancy seen since creation.
    pub fn high_water(&self) -> usize {
        self.high_water.load(Ordering::Relaxed)
    }

    fn note_occupancy(&self) {
        let depth_now = self.rx.len();
        self.high_water.fetch_max(depth_now, Ordering::Relaxed);
    }
}
